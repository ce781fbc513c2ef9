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

//! vector side of glidemap: isoline tracing of the merged raster, contour layer export, reprojection
//! into WGS84 and the final merge with the airfield layer

pub mod errors;
pub use errors::{GlidemapVectorError, Result};

pub mod isolines;
pub use isolines::{trace_isolines, Isoline, PixelPoint};

pub mod contour;
pub use contour::{ContourLine, contour_levels, extract_contours, contours_to_feature_collection, make_contours, ELEV_PROPERTY};

pub mod reproject;
pub use reproject::{CrsTransformer, resolve_crs_definition, reproject_feature_collection, reproject_contours, WGS84_PROJ};

pub mod layers;
pub use layers::{read_feature_collection, write_feature_collection, merge_layers};
