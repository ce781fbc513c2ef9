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
//! streaming minimum-merge of per-site reachability grids.
//!
//! Each input file is visited once, in discovery order, and its body is read row by row straight into
//! the global grid. Cells changed by a file that turns out to be malformed are restored, i.e. a failed
//! file does not contribute to the result. Lower values win, since the merged surface is the minimum altitude required to
//! reach any site. The value 0 means "on the ground" and never attributes to a sector; it is
//! removed from the merged grid once all files are processed.

use std::path::{Path, PathBuf};
use ndarray::Array2;

use glidemap_common::{fs::{files_named_in_tree, path_to_lossy_string}, log::ProgressSink, cancel::CancelToken};
use crate::asc::{RasterHeader, RasterGrid, AscRowReader, read_header, write_asc, check_grid_size};
use crate::align::{AlignedGrid, Placement, align_headers, same_cellsize};
use crate::errors::{Result, GlidemapRasterError, op_failed, body_error};

/// name of the per-site grid files produced by the reachability computation
pub const SUB_RASTER_FILENAME: &str = "output_sub.asc";

/// the ordered list of sub-raster files below `calc_root`. The order defines sector ids
pub fn find_sub_rasters (calc_root: impl AsRef<Path>)->Result<Vec<PathBuf>> {
    Ok( files_named_in_tree( &calc_root.as_ref(), SUB_RASTER_FILENAME)? )
}

/// what happened to one input file
#[derive(Debug,Clone,PartialEq)]
pub enum FileOutcome {
    Merged { rows: usize },
    OutOfBounds(Placement),
    CellSizeMismatch(f64),
    /// unreadable or malformed file. `rows` is the number of rows read before the error, their
    /// updates have been reverted
    Failed { rows: usize, reason: String },
}

#[derive(Debug,Clone,PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub sector: usize,
    pub outcome: FileOutcome,
}

#[derive(Debug,Clone,Default)]
pub struct MergeReport {
    pub files: Vec<FileReport>,
    pub ground_cells_removed: usize,
}

impl MergeReport {
    pub fn merged_count (&self)->usize {
        self.files.iter().filter( |f| matches!( f.outcome, FileOutcome::Merged{..})).count()
    }

    pub fn skipped_count (&self)->usize {
        self.files.len() - self.merged_count()
    }

    pub fn outcome_of (&self, sector: usize)->Option<&FileOutcome> {
        self.files.get(sector).map( |f| &f.outcome)
    }
}

/// previous state of a global grid cell that got changed by the file in progress
struct CellUndo {
    row: usize,
    col: usize,
    merged: f64,
    sector: f64,
}

/// result of a merge run
#[derive(Debug)]
pub struct MergedRasters {
    pub aligned: AlignedGrid,
    pub merged: RasterGrid,
    pub sectors: RasterGrid,
    pub report: MergeReport,
}

/// the merge engine. The nodata value of the merged grid doubles as the initial value of every cell
/// (the run's max altitude), hence anything reachable below it wins
pub struct RasterMerger {
    nodata: f64,
    cancel: CancelToken,
    progress: ProgressSink,
}

impl RasterMerger {
    pub fn new (nodata: f64)->Self {
        RasterMerger { nodata, cancel: CancelToken::default(), progress: ProgressSink::none() }
    }

    pub fn with_cancel_token (mut self, cancel: CancelToken)->Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress (mut self, progress: ProgressSink)->Self {
        self.progress = progress;
        self
    }

    pub fn nodata (&self)->f64 { self.nodata }

    fn check_cancelled (&self)->Result<()> {
        if self.cancel.is_cancelled() { Err(GlidemapRasterError::Cancelled) } else { Ok(()) }
    }

    /// merge the given files (sector id = index in `paths`) into a global grid that covers all of them.
    /// This only fails if there is nothing to merge or if the merge got cancelled, individual files that
    /// can't be merged are reported and skipped
    pub fn merge (&self, paths: &[PathBuf])->Result<MergedRasters> {
        let mut outcomes = self.init_outcomes( paths)?;
        let candidates = self.read_headers( paths, &mut outcomes);

        let cellsize = match candidates.first() {
            Some((_,hdr)) => hdr.cellsize,
            None => return Err( GlidemapRasterError::NoInputFiles( format!("readable {SUB_RASTER_FILENAME}")))
        };
        let candidates = self.filter_cellsize( paths, candidates, cellsize, &mut outcomes);

        let headers: Vec<RasterHeader> = candidates.iter().map( |(_,hdr)| *hdr).collect();
        let aligned = align_headers( &headers, cellsize)?;

        self.merge_candidates( paths, aligned, &candidates, outcomes)
    }

    /// merge the given files into a pre-computed grid (e.g. a fixed region). Files that do not
    /// fit into `aligned` are skipped as out of bounds
    pub fn merge_into_grid (&self, paths: &[PathBuf], aligned: AlignedGrid)->Result<MergedRasters> {
        let mut outcomes = self.init_outcomes( paths)?;
        let candidates = self.read_headers( paths, &mut outcomes);
        let candidates = self.filter_cellsize( paths, candidates, aligned.cellsize, &mut outcomes);

        self.merge_candidates( paths, aligned, &candidates, outcomes)
    }

    fn init_outcomes (&self, paths: &[PathBuf])->Result<Vec<Option<FileOutcome>>> {
        if paths.is_empty() {
            self.progress.warn( format!("No {SUB_RASTER_FILENAME} files found to merge."));
            Err( GlidemapRasterError::NoInputFiles(SUB_RASTER_FILENAME.to_string()))
        } else {
            Ok( vec![None; paths.len()] )
        }
    }

    /// header pass: we only need extents to align
    fn read_headers (&self, paths: &[PathBuf], outcomes: &mut [Option<FileOutcome>])->Vec<(usize,RasterHeader)> {
        let mut candidates: Vec<(usize,RasterHeader)> = Vec::with_capacity( paths.len());

        for (sector,path) in paths.iter().enumerate() {
            match read_header(path) {
                Ok(hdr) => candidates.push( (sector,hdr)),
                Err(e) => {
                    self.progress.warn( format!("skipping unreadable raster {}: {e}", path_to_lossy_string(path)));
                    outcomes[sector] = Some( FileOutcome::Failed { rows: 0, reason: e.to_string() });
                }
            }
        }
        candidates
    }

    fn filter_cellsize (&self, paths: &[PathBuf], mut candidates: Vec<(usize,RasterHeader)>, cellsize: f64,
                        outcomes: &mut [Option<FileOutcome>])->Vec<(usize,RasterHeader)>
    {
        candidates.retain( |(sector,hdr)| {
            if same_cellsize( cellsize, hdr.cellsize) {
                true
            } else {
                let e = GlidemapRasterError::CellSizeMismatch { path: paths[*sector].clone(), expected: cellsize, found: hdr.cellsize };
                self.progress.warn( format!("skipping raster: {e}"));
                outcomes[*sector] = Some( FileOutcome::CellSizeMismatch(hdr.cellsize));
                false
            }
        });
        candidates
    }

    /// body pass in discovery order
    fn merge_candidates (&self, paths: &[PathBuf], aligned: AlignedGrid, candidates: &[(usize,RasterHeader)],
                         mut outcomes: Vec<Option<FileOutcome>>)->Result<MergedRasters>
    {
        check_grid_size( aligned.nrows, aligned.ncols)?;
        self.progress.info( format!("aligned grid: {} rows x {} cols at origin ({},{})", aligned.nrows, aligned.ncols, aligned.min_x(), aligned.min_y()));

        let mut merged = Array2::from_elem( (aligned.nrows, aligned.ncols), self.nodata);
        let mut sectors = Array2::from_elem( (aligned.nrows, aligned.ncols), self.nodata);

        for (sector,hdr) in candidates {
            self.check_cancelled()?;

            let path = &paths[*sector];
            let path_str = path_to_lossy_string(path);
            self.progress.info( format!("aligning {path_str}"));

            let placement = aligned.placement(hdr);
            if !placement.is_within( &aligned) {
                self.progress.warn( format!("airfield local matrix going out of bound of reconstructed matrix, skipping: {path_str}"));
                outcomes[*sector] = Some( FileOutcome::OutOfBounds(placement));
                continue;
            }

            let mut rows = 0;
            let mut undo: Vec<CellUndo> = Vec::new();
            let outcome = match self.merge_file( path, hdr, &placement, *sector, &mut merged, &mut sectors, &mut undo, &mut rows) {
                Ok(()) => FileOutcome::Merged { rows },
                Err(GlidemapRasterError::Cancelled) => return Err(GlidemapRasterError::Cancelled),
                Err(e) => {
                    for u in undo.iter().rev() {
                        merged[[u.row,u.col]] = u.merged;
                        sectors[[u.row,u.col]] = u.sector;
                    }
                    self.progress.warn( format!("skipping {path_str} after {rows} rows, reverted {} cells: {e}", undo.len()));
                    FileOutcome::Failed { rows, reason: e.to_string() }
                }
            };
            outcomes[*sector] = Some(outcome);
        }

        self.progress.info("removing ground from merged raster");
        let mut ground_cells_removed = 0;
        for v in merged.iter_mut() {
            if *v == 0.0 {
                *v = self.nodata;
                ground_cells_removed += 1;
            }
        }

        let files = paths.iter().zip( outcomes.into_iter()).enumerate().map( |(sector,(path,outcome))| {
            FileReport {
                path: path.clone(),
                sector,
                outcome: outcome.unwrap_or_else( || FileOutcome::Failed { rows: 0, reason: "not processed".to_string() })
            }
        }).collect();
        let report = MergeReport { files, ground_cells_removed };

        let header = aligned.header( self.nodata);
        Ok( MergedRasters {
            aligned,
            merged: RasterGrid::from_data( header, merged)?,
            sectors: RasterGrid::from_data( header, sectors)?,
            report
        })
    }

    /// stream the body of one file into the global grids. The previous values of every changed cell
    /// are pushed to `undo` so that the caller can revert the file if this fails half way
    fn merge_file (&self, path: &Path, hdr: &RasterHeader, placement: &Placement, sector: usize,
                   merged: &mut Array2<f64>, sectors: &mut Array2<f64>, undo: &mut Vec<CellUndo>, rows: &mut usize) -> Result<()>
    {
        let mut reader = AscRowReader::open(path)?;
        if reader.header() != hdr {
            return Err( op_failed( format!("header of {path:?} changed during merge")))
        }

        let sector_id = sector as f64;
        let input_nodata = hdr.nodata;
        let r0 = placement.start_row as usize;
        let c0 = placement.start_col as usize;
        let mut buf: Vec<f64> = Vec::with_capacity( hdr.ncols);

        for i in 0..hdr.nrows {
            self.check_cancelled()?;

            if !reader.next_row( &mut buf)? {
                return Err( body_error( path, i, format!("expected {} rows", hdr.nrows)))
            }

            let r = r0 + i;
            for (j,v) in buf.iter().enumerate() {
                let v = *v;
                let c = c0 + j;
                let improves = v != input_nodata && v < merged[[r,c]];
                if improves || v == 0.0 {
                    undo.push( CellUndo { row: r, col: c, merged: merged[[r,c]], sector: sectors[[r,c]] });
                }
                if improves {
                    merged[[r,c]] = v;
                    sectors[[r,c]] = sector_id;
                }
                if v == 0.0 {
                    sectors[[r,c]] = self.nodata;
                }
            }
            *rows += 1;
        }

        if reader.has_trailing_rows()? {
            self.progress.warn( format!("ignoring rows beyond nrows={} in {}", hdr.nrows, path_to_lossy_string(path)));
        }

        Ok(())
    }

    /// merge and write the merged and sector grids. Nothing is written if the merge fails or is cancelled
    pub fn merge_to_files (&self, paths: &[PathBuf], merged_path: impl AsRef<Path>, sectors_path: impl AsRef<Path>)->Result<MergedRasters> {
        let result = self.merge( paths)?;
        self.check_cancelled()?;

        let merged_path = merged_path.as_ref();
        let sectors_path = sectors_path.as_ref();
        self.progress.info( format!("writing final raster to {}", path_to_lossy_string(merged_path)));
        write_asc( &result.merged, merged_path)?;
        self.progress.info( format!("writing sector raster to {}", path_to_lossy_string(sectors_path)));
        write_asc( &result.sectors, sectors_path)?;

        self.progress.info( format!("merged {} of {} rasters ({} skipped)",
            result.report.merged_count(), result.report.files.len(), result.report.skipped_count()));
        Ok(result)
    }
}
