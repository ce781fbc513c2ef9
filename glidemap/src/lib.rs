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
#![allow(unused)]

//! glidemap run configuration and pipeline orchestration: merge the per-site reachability rasters of a
//! calculation folder, trace contours of the merged raster and export them as a WGS84 layer together
//! with the airfields

pub mod errors;
pub use errors::{GlidemapError, Result};

pub mod config;
pub use config::{GlidemapConfig, CrsConfig, load_config};

pub mod pipeline;
pub use pipeline::{run_pipeline, PipelineReport, PipelineContext, StageOutcome};
