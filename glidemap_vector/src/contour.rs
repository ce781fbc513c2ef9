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
//! contour extraction from a merged reachability raster

use std::path::Path;
use geo_types::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};

use glidemap_common::{fs::path_to_lossy_string, log::ProgressSink};
use glidemap_raster::{RasterGrid, read_asc};
use crate::isolines::{trace_isolines, PixelPoint};
use crate::layers::write_feature_collection;
use crate::errors::{Result, GlidemapVectorError};

/// name of the elevation property of contour features
pub const ELEV_PROPERTY: &str = "ELEV";

/// a traced contour in projected-metric (or, after reprojection, geographic) coordinates
#[derive(Debug,Clone,PartialEq)]
pub struct ContourLine {
    pub elevation: i64,
    pub geometry: LineString<f64>,
}

impl ContourLine {
    pub fn to_feature (&self)->Feature {
        let mut properties = JsonObject::new();
        properties.insert( ELEV_PROPERTY.to_string(), JsonValue::String( self.elevation.to_string()));

        Feature {
            bbox: None,
            geometry: Some( Geometry::new( geojson::Value::from( &self.geometry))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// the contour levels `0, h, 2h, ..` strictly below `min(max_value + h, nodata)`
pub fn contour_levels (max_value: f64, interval: f64, nodata: f64)->Result<Vec<f64>> {
    if !(interval > 0.0) {
        return Err( GlidemapVectorError::InvalidInterval(interval))
    }

    let upper = (max_value + interval).min(nodata);
    let mut levels = Vec::new();
    let mut i = 0u64;
    loop {
        let level = i as f64 * interval;
        if level >= upper { break }
        levels.push(level);
        i += 1;
    }
    Ok(levels)
}

/// map a fractional pixel position to projected-metric coordinates of the grid.
/// Row 0 is the north edge whereas `yllcorner` anchors the south edge
#[inline]
pub fn pixel_to_metric (grid: &RasterGrid, p: &PixelPoint)->Coord<f64> {
    let hdr = &grid.header;
    Coord {
        x: hdr.xllcorner + p.col * hdr.cellsize,
        y: hdr.yllcorner + (hdr.nrows as f64 - p.row - 1.0) * hdr.cellsize,
    }
}

/// trace contours at all levels of `interval`. Returns an empty list if the grid has no data cells
pub fn extract_contours (grid: &RasterGrid, interval: f64)->Result<Vec<ContourLine>> {
    let nodata = grid.header.nodata;
    let max_value = match grid.max_value() {
        Some(v) => v,
        None => {
            if !(interval > 0.0) { return Err( GlidemapVectorError::InvalidInterval(interval)) }
            return Ok( Vec::new())
        }
    };

    let mut contours = Vec::new();
    for level in contour_levels( max_value, interval, nodata)? {
        let elevation = level.trunc() as i64;
        for iso in trace_isolines( &grid.data, level, |v| v == nodata) {
            let coords: Vec<Coord<f64>> = iso.points.iter().map( |p| pixel_to_metric( grid, p)).collect();
            contours.push( ContourLine { elevation, geometry: LineString::new(coords) });
        }
    }
    Ok(contours)
}

pub fn contours_to_feature_collection (contours: &[ContourLine])->FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: contours.iter().map( |c| c.to_feature()).collect(),
        foreign_members: None,
    }
}

/// read the merged raster at `raster_path`, trace its contours and write them as a GeoJSON
/// FeatureCollection (in the raster's projected CRS) to `out_path`. Returns the number of features
pub fn make_contours (raster_path: impl AsRef<Path>, interval: f64, out_path: impl AsRef<Path>, progress: &ProgressSink)->Result<usize> {
    let raster_path = raster_path.as_ref();
    let out_path = out_path.as_ref();

    progress.info( format!("extracting contours from {} every {interval}", path_to_lossy_string(raster_path)));
    let grid = read_asc( raster_path)?;
    let contours = extract_contours( &grid, interval)?;
    if contours.is_empty() {
        progress.warn( format!("no contours found in {}", path_to_lossy_string(raster_path)));
    }

    let fc = contours_to_feature_collection( &contours);
    write_feature_collection( &fc, out_path)?;
    progress.info( format!("wrote {} contour lines to {}", contours.len(), path_to_lossy_string(out_path)));

    Ok( contours.len())
}
