/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
//! reprojection of contour layers into geographic WGS84 coordinates

use std::path::Path;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};

use glidemap_common::{fs::path_to_lossy_string, log::ProgressSink};
use crate::layers::{read_feature_collection, write_feature_collection};
use crate::errors::{Result, GlidemapVectorError, op_failed};

/// the fixed target CRS of all exported layers
pub const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// resolve a CRS definition into a PROJ.4 string. Accepts PROJ.4 strings as-is and `EPSG:<code>` for
/// the codes we know (WGS84, web mercator, Lambert 93 and the WGS84 UTM zones)
pub fn resolve_crs_definition (def: &str)->Result<String> {
    let def = def.trim();
    if def.starts_with('+') {
        return Ok( def.to_string())
    }

    let code = def.strip_prefix("EPSG:").or_else( || def.strip_prefix("epsg:"))
        .and_then( |c| c.trim().parse::<u32>().ok())
        .ok_or_else( || GlidemapVectorError::CrsError( def.to_string()))?;

    match code {
        4326 => Ok( WGS84_PROJ.to_string()),
        3857 => Ok( "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs".to_string()),
        2154 => Ok( "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 +x_0=700000 +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs".to_string()),
        32601..=32660 => Ok( format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs", code - 32600)),
        32701..=32760 => Ok( format!("+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs", code - 32700)),
        _ => Err( GlidemapVectorError::CrsError( def.to_string()))
    }
}

fn is_geographic (proj_str: &str)->bool {
    proj_str.split_whitespace().any( |t| t == "+proj=longlat" || t == "+proj=latlong")
}

/// transforms points from a source CRS into WGS84 longitude/latitude degrees
pub struct CrsTransformer {
    source: Proj,
    target: Proj,
    source_is_geographic: bool,
}

impl std::fmt::Debug for CrsTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrsTransformer").field("source_is_geographic", &self.source_is_geographic).finish_non_exhaustive()
    }
}

impl CrsTransformer {
    pub fn new (source_def: &str)->Result<Self> {
        let source_str = resolve_crs_definition( source_def)?;
        let source = Proj::from_proj_string( &source_str)
            .map_err( |e| GlidemapVectorError::CrsError( format!("{source_def}: {e:?}")))?;
        let target = Proj::from_proj_string( WGS84_PROJ)
            .map_err( |e| GlidemapVectorError::CrsError( format!("{WGS84_PROJ}: {e:?}")))?;

        Ok( CrsTransformer { source, target, source_is_geographic: is_geographic( &source_str) } )
    }

    /// (x,y) in source CRS units to (longitude,latitude) degrees
    pub fn transform (&self, x: f64, y: f64)->Result<(f64,f64)> {
        let mut p = if self.source_is_geographic { (x.to_radians(), y.to_radians(), 0.0) } else { (x, y, 0.0) };
        transform( &self.source, &self.target, &mut p)
            .map_err( |e| GlidemapVectorError::TransformError( format!("({x},{y}): {e:?}")))?;
        Ok( (p.0.to_degrees(), p.1.to_degrees()) )
    }
}

fn geometry_kind (v: &GeoValue)->&'static str {
    match v {
        GeoValue::Point(_) => "Point",
        GeoValue::MultiPoint(_) => "MultiPoint",
        GeoValue::LineString(_) => "LineString",
        GeoValue::MultiLineString(_) => "MultiLineString",
        GeoValue::Polygon(_) => "Polygon",
        GeoValue::MultiPolygon(_) => "MultiPolygon",
        GeoValue::GeometryCollection(_) => "GeometryCollection",
    }
}

/// create a reprojected copy of a LineString FeatureCollection. Properties are copied as-is.
/// Any feature without a LineString geometry fails the whole collection
pub fn reproject_feature_collection (fc: &FeatureCollection, transformer: &CrsTransformer)->Result<FeatureCollection> {
    let mut features = Vec::with_capacity( fc.features.len());

    for (i,f) in fc.features.iter().enumerate() {
        let line = match f.geometry.as_ref().map( |g| &g.value) {
            Some(GeoValue::LineString(line)) => line,
            Some(other) => return Err( GlidemapVectorError::UnsupportedGeometry { feature: i, kind: geometry_kind(other).to_string() }),
            None => return Err( GlidemapVectorError::UnsupportedGeometry { feature: i, kind: "none".to_string() }),
        };

        let mut positions = Vec::with_capacity( line.len());
        for pos in line {
            if pos.len() < 2 {
                return Err( op_failed( format!("feature {i} has position with {} coordinates", pos.len())))
            }
            let (lon,lat) = transformer.transform( pos[0], pos[1])?;
            positions.push( vec![lon, lat]);
        }

        features.push( Feature {
            bbox: None,
            geometry: Some( Geometry::new( GeoValue::LineString(positions))),
            id: f.id.clone(),
            properties: f.properties.clone(),
            foreign_members: f.foreign_members.clone(),
        });
    }

    Ok( FeatureCollection { bbox: None, features, foreign_members: fc.foreign_members.clone() } )
}

/// read the contour layer at `in_path`, reproject it from `crs_def` into WGS84 and write the result to `out_path`
pub fn reproject_contours (in_path: impl AsRef<Path>, crs_def: &str, out_path: impl AsRef<Path>, progress: &ProgressSink)->Result<usize> {
    let in_path = in_path.as_ref();
    let out_path = out_path.as_ref();

    progress.info( format!("reprojecting {} from '{crs_def}' to WGS84", path_to_lossy_string(in_path)));
    let transformer = CrsTransformer::new( crs_def)?;
    let fc = read_feature_collection( in_path)?;
    let reprojected = reproject_feature_collection( &fc, &transformer)?;
    write_feature_collection( &reprojected, out_path)?;
    progress.info( format!("wrote {} reprojected features to {}", reprojected.features.len(), path_to_lossy_string(out_path)));

    Ok( reprojected.features.len())
}
