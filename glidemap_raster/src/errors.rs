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

pub type Result<T> = std::result::Result<T, GlidemapRasterError>;

#[derive(Error,Debug)]
pub enum GlidemapRasterError {

    #[error("no {0} files found to merge")]
    NoInputFiles(String),

    #[error("malformed grid header in {path:?}: {msg}")]
    HeaderError { path: PathBuf, msg: String },

    #[error("malformed grid body in {path:?} at row {row}: {msg}")]
    BodyError { path: PathBuf, row: usize, msg: String },

    #[error("cellsize {found} of {path:?} does not match {expected}")]
    CellSizeMismatch { path: PathBuf, expected: f64, found: f64 },

    #[error("raster merge cancelled")]
    Cancelled,

    // pass through for IO errors
    #[error("raster IO error: {0}")]
    IOError( #[from] std::io::Error),

    #[error("grid shape error: {0}")]
    ShapeError( #[from] ndarray::ShapeError),

    // generic self-created error
    #[error("raster operation failed: {0}")]
    OpFailedError(String),
}

pub fn op_failed<S: ToString> (msg: S)->GlidemapRasterError {
    GlidemapRasterError::OpFailedError(msg.to_string())
}

pub fn header_error<S: ToString> (path: impl Into<PathBuf>, msg: S)->GlidemapRasterError {
    GlidemapRasterError::HeaderError { path: path.into(), msg: msg.to_string() }
}

pub fn body_error<S: ToString> (path: impl Into<PathBuf>, row: usize, msg: S)->GlidemapRasterError {
    GlidemapRasterError::BodyError { path: path.into(), row, msg: msg.to_string() }
}
