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
use thiserror::Error;
use glidemap_common::GlidemapCommonError;
use glidemap_raster::GlidemapRasterError;
use glidemap_vector::GlidemapVectorError;

pub type Result<T> = std::result::Result<T, GlidemapError>;

#[derive(Error,Debug)]
pub enum GlidemapError {

    #[error("invalid config: {0}")]
    ConfigError(String),

    #[error("config load error: {0}")]
    ConfigLoadError( #[from] GlidemapCommonError),

    #[error("{0}")]
    RasterError( #[from] GlidemapRasterError),

    #[error("{0}")]
    VectorError( #[from] GlidemapVectorError),

    #[error("IO error: {0}")]
    IOError( #[from] std::io::Error),
}

pub fn config_error<S: ToString> (msg: S)->GlidemapError {
    GlidemapError::ConfigError(msg.to_string())
}
