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
//! the disk-to-disk stage sequence of a glidemap run.
//!
//! Only the raster merge can fail the run. Post-processing stages record their outcome in the
//! [`PipelineReport`], and stages that depend on a failed one are skipped.

use glidemap_common::{MinMaxAvg, cancel::CancelToken, log::ProgressSink, fs::{ensure_parent_dir, copy_file, path_to_lossy_string}};
use glidemap_raster::{RasterMerger, MergeReport, find_sub_rasters};
use glidemap_vector::{make_contours, reproject_contours, merge_layers};
use crate::config::GlidemapConfig;
use crate::errors::Result;

#[derive(Debug,Clone,PartialEq)]
pub enum StageOutcome {
    Done,
    Skipped,
    Failed(String),
}

impl StageOutcome {
    pub fn is_done (&self)->bool { *self == StageOutcome::Done }
}

/// what happened in a run
#[derive(Debug)]
pub struct PipelineReport {
    pub merge: MergeReport,
    /// value statistics of the merged raster (data cells only)
    pub merged_stats: MinMaxAvg,
    pub contours: StageOutcome,
    pub n_contours: usize,
    pub reprojection: StageOutcome,
    pub layer_merge: StageOutcome,
    pub mapcss: StageOutcome,
}

/// collaborators of a run
#[derive(Debug,Clone,Default)]
pub struct PipelineContext {
    pub progress: ProgressSink,
    pub cancel: CancelToken,
}

impl PipelineContext {
    pub fn new (progress: ProgressSink, cancel: CancelToken)->Self {
        PipelineContext { progress, cancel }
    }
}

fn stage_failed (progress: &ProgressSink, stage: &str, e: impl std::fmt::Display)->StageOutcome {
    let msg = e.to_string();
    progress.error( format!("{stage} failed: {msg}"));
    StageOutcome::Failed(msg)
}

/// discover and merge the sub-rasters of the calculation folder, then run the contour/export stages
pub fn run_pipeline (config: &GlidemapConfig, ctx: &PipelineContext)->Result<PipelineReport> {
    config.validate()?;
    let progress = &ctx.progress;
    progress.info( config.summary());

    //--- merge
    let paths = find_sub_rasters( &config.calculation_folder)?;
    progress.info( format!("found {} sub-rasters in {}", paths.len(), path_to_lossy_string(&config.calculation_folder)));

    ensure_parent_dir( &config.merged_output_raster)?;
    ensure_parent_dir( &config.sectors_raster)?;

    let merger = RasterMerger::new( config.max_altitude)
        .with_cancel_token( ctx.cancel.clone())
        .with_progress( progress.clone());
    let merged = merger.merge_to_files( &paths, &config.merged_output_raster, &config.sectors_raster)?;

    let mut merged_stats = MinMaxAvg::new();
    let hdr = &merged.merged.header;
    merged.merged.data.iter().filter( |v| !hdr.is_nodata(**v)).for_each( |v| merged_stats.add(*v));
    if merged_stats.is_empty() {
        progress.warn("merged raster has no data cells");
    } else {
        progress.info( format!("merged raster values: min={} max={} avg={:.1}", merged_stats.min, merged_stats.max, merged_stats.avg));
    }

    let mut report = PipelineReport {
        merge: merged.report,
        merged_stats,
        contours: StageOutcome::Skipped,
        n_contours: 0,
        reprojection: StageOutcome::Skipped,
        layer_merge: StageOutcome::Skipped,
        mapcss: StageOutcome::Skipped,
    };

    //--- contours (from the raster we just wrote)
    let contour_path = config.contours_custom_crs_path();
    match make_contours( &config.merged_output_raster, config.contour_height, &contour_path, progress) {
        Ok(n) => {
            report.n_contours = n;
            report.contours = StageOutcome::Done;
        }
        Err(e) => {
            report.contours = stage_failed( progress, "contour extraction", e);
            return Ok(report)
        }
    }

    if !config.export_vectors {
        progress.info("vector export disabled");
        return Ok(report)
    }

    //--- reprojection into WGS84
    let wgs84_path = config.contours_wgs84_path();
    match reproject_contours( &contour_path, &config.crs.definition, &wgs84_path, progress) {
        Ok(_) => report.reprojection = StageOutcome::Done,
        Err(e) => {
            report.reprojection = stage_failed( progress, "contour reprojection", e);
            return Ok(report)
        }
    }

    //--- merge with airfields
    let final_path = config.final_layer_path();
    match merge_layers( config.airfields_path(), &wgs84_path, &final_path, progress) {
        Ok(_) => report.layer_merge = StageOutcome::Done,
        Err(e) => {
            report.layer_merge = stage_failed( progress, "layer merge", e);
            return Ok(report)
        }
    }

    //--- styling sidecar
    report.mapcss = match &config.mapcss_template {
        Some(template) => {
            let mapcss_path = config.mapcss_path();
            match copy_file( template, &mapcss_path) {
                Ok(_) => {
                    progress.info( format!("mapcss copied to {}", path_to_lossy_string(&mapcss_path)));
                    StageOutcome::Done
                }
                Err(e) => stage_failed( progress, "mapcss copy", e)
            }
        }
        None => StageOutcome::Skipped
    };

    Ok(report)
}
