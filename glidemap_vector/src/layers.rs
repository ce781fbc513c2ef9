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
//! GeoJSON layer IO and the final merge of airfield and contour layers

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use serde::Serialize;
use serde_json::{json, Value};
use geojson::{FeatureCollection, GeoJson};

use glidemap_common::{fs::{write_atomic, path_to_lossy_string}, log::ProgressSink};
use crate::errors::{Result, GlidemapVectorError};

pub const MERGED_LAYER_NAME: &str = "OGRGeoJSON";
pub const CRS84_URN: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

fn read_json (path: &Path)->Result<Value> {
    if !path.is_file() {
        return Err( GlidemapVectorError::FileNotFound( path.to_path_buf()))
    }
    let s = fs::read_to_string(path)?;
    Ok( serde_json::from_str(&s)? )
}

fn check_feature_collection (path: &Path, v: &Value)->Result<()> {
    match v.get("type").and_then( |t| t.as_str()) {
        Some("FeatureCollection") => Ok(()),
        Some(other) => Err( GlidemapVectorError::NotAFeatureCollection { path: path.to_path_buf(), found: other.to_string() }),
        None => Err( GlidemapVectorError::NotAFeatureCollection { path: path.to_path_buf(), found: "none".to_string() })
    }
}

/// read a GeoJSON file that has to hold a FeatureCollection
pub fn read_feature_collection (path: impl AsRef<Path>)->Result<FeatureCollection> {
    let path = path.as_ref();
    let v = read_json( path)?;
    check_feature_collection( path, &v)?;

    match GeoJson::from_json_value(v)? {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err( GlidemapVectorError::NotAFeatureCollection { path: path.to_path_buf(), found: "unknown".to_string() })
    }
}

/// write compact GeoJSON. The file only appears at `path` once it is complete
pub fn write_feature_collection (fc: &FeatureCollection, path: impl AsRef<Path>)->Result<()> {
    write_json( fc, path.as_ref())
}

fn write_json<T: Serialize> (v: &T, path: &Path)->Result<()> {
    write_atomic( path, |file| {
        let mut w = BufWriter::new(file);
        serde_json::to_writer( &mut w, v).map_err( io::Error::from)?;
        w.flush()
    })?;
    Ok(())
}

#[derive(Serialize)]
struct MergedLayer<'a> {
    #[serde(rename="type")]
    typ: &'static str,
    name: &'a str,
    crs: Value,
    features: Vec<Value>,
}

/// concatenate the airfield features and the (reprojected) contour features into one layer with a
/// CRS84 annotation. Airfield features come first. Returns the total number of features
pub fn merge_layers (airfields_path: impl AsRef<Path>, contours_path: impl AsRef<Path>, out_path: impl AsRef<Path>,
                     progress: &ProgressSink)->Result<usize>
{
    let airfields_path = airfields_path.as_ref();
    let contours_path = contours_path.as_ref();
    let out_path = out_path.as_ref();

    progress.info( format!("merging {} and {}", path_to_lossy_string(airfields_path), path_to_lossy_string(contours_path)));

    let airfields = read_json( airfields_path)?;
    check_feature_collection( airfields_path, &airfields)?;
    let contours = read_json( contours_path)?;
    check_feature_collection( contours_path, &contours)?;

    let mut features: Vec<Value> = Vec::new();
    for v in [airfields, contours] {
        if let Some(Value::Array(list)) = v.get("features") {
            features.extend( list.iter().cloned());
        }
    }
    let n_features = features.len();

    let layer = MergedLayer {
        typ: "FeatureCollection",
        name: MERGED_LAYER_NAME,
        crs: json!({ "type": "name", "properties": { "name": CRS84_URN } }),
        features
    };
    write_json( &layer, out_path)?;
    progress.info( format!("wrote {n_features} features to {}", path_to_lossy_string(out_path)));

    Ok(n_features)
}
