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
use std::path::PathBuf;
use thiserror::Error;
use glidemap_raster::GlidemapRasterError;

pub type Result<T> = std::result::Result<T, GlidemapVectorError>;

#[derive(Error,Debug)]
pub enum GlidemapVectorError {

    #[error("invalid contour interval {0} (has to be positive)")]
    InvalidInterval(f64),

    #[error("feature {feature} has unsupported geometry {kind} (only LineString can be reprojected)")]
    UnsupportedGeometry { feature: usize, kind: String },

    #[error("unsupported or invalid CRS definition '{0}'")]
    CrsError(String),

    #[error("coordinate transformation failed: {0}")]
    TransformError(String),

    #[error("{path:?} is not a FeatureCollection (type: {found})")]
    NotAFeatureCollection { path: PathBuf, found: String },

    #[error("file not found: {0:?}")]
    FileNotFound(PathBuf),

    #[error("raster error: {0}")]
    RasterError( #[from] GlidemapRasterError),

    #[error("IO error: {0}")]
    IOError( #[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJsonError( #[from] geojson::Error),

    // generic self-created error
    #[error("vector operation failed: {0}")]
    OpFailedError(String),
}

pub fn op_failed<S: ToString> (msg: S)->GlidemapVectorError {
    GlidemapVectorError::OpFailedError(msg.to_string())
}
