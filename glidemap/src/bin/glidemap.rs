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
use glidemap_common::{define_cli, check_cli, log::{init_tracing, ProgressSink}, cancel::CancelToken};
use glidemap::{load_config, run_pipeline, PipelineContext, StageOutcome};
use anyhow::Result;

define_cli! { ARGS [about="merge reachability rasters and export contour layers"] =
    config_path: String [help="path of RON run config"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let config = load_config( &ARGS.config_path)?;

    let cancel = CancelToken::new();
    cancel.cancel_on_ctrlc()?;
    let ctx = PipelineContext::new( ProgressSink::none(), cancel);

    let report = run_pipeline( &config, &ctx)?;

    println!("merged {} of {} rasters", report.merge.merged_count(), report.merge.files.len());
    for (stage,outcome) in [("contours", &report.contours), ("reprojection", &report.reprojection),
                            ("layer merge", &report.layer_merge), ("mapcss", &report.mapcss)] {
        println!("{stage:>14}: {outcome:?}");
    }
    if report.contours.is_done() {
        println!("{} contour lines", report.n_contours);
    }

    Ok(())
}
