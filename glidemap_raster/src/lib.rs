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

//! raster side of glidemap: the ASC grid codec, alignment of per-site grids into one global grid
//! and the streaming minimum-merge that produces the merged reachability raster plus its sector
//! attribution raster

pub mod errors;
pub use errors::{GlidemapRasterError, Result};

pub mod asc;
pub use asc::{RasterHeader, RasterGrid, AscRowReader, read_header, read_asc, write_asc, MAX_GRID_CELLS};

pub mod align;
pub use align::{AlignedGrid, Placement, align_headers};

pub mod merge;
pub use merge::{RasterMerger, MergedRasters, MergeReport, FileReport, FileOutcome, find_sub_rasters, SUB_RASTER_FILENAME};
