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
use std::path::{Path,PathBuf};
use glidemap_common::{define_cli, check_cli, log::{init_tracing, ProgressSink}, cancel::CancelToken};
use glidemap_raster::{RasterMerger, FileOutcome, find_sub_rasters};
use anyhow::Result;

define_cli! { ARGS [about="merge per-site reachability rasters into a minimum altitude raster and a sector raster"] =
    nodata: f64 [help="nodata value of merged rasters (the max altitude of the run)", long, default_value="3000"],
    calc_dir: String [help="calculation root dir containing the per-site output_sub.asc files"],
    merged_path: String [help="output path of merged raster"],
    sectors_path: String [help="output path of sector raster"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let cancel = CancelToken::new();
    cancel.cancel_on_ctrlc()?;

    let paths = find_sub_rasters( &ARGS.calc_dir)?;
    let merger = RasterMerger::new( ARGS.nodata).with_cancel_token( cancel);
    let result = merger.merge_to_files( &paths, &ARGS.merged_path, &ARGS.sectors_path)?;

    for f in &result.report.files {
        match &f.outcome {
            FileOutcome::Merged{rows} => println!("{:4}: {:?} ({rows} rows)", f.sector, f.path),
            other => println!("{:4}: {:?} skipped: {other:?}", f.sector, f.path)
        }
    }
    println!("{} ground cells removed", result.report.ground_cells_removed);

    Ok(())
}
