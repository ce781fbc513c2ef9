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

use std::{fs, path::{Path,PathBuf}};
use glidemap_common::{BoundingBox, cancel::CancelToken, log::ProgressSink};
use glidemap_raster::{
    RasterMerger, FileOutcome, GlidemapRasterError, AlignedGrid, read_asc, find_sub_rasters, SUB_RASTER_FILENAME
};

// run with "cargo test --test test_merge -- --nocapture"

const MAX_ALT: f64 = 3000.0;

fn write_sub (root: &Path, site: &str, xll: f64, yll: f64, cellsize: f64, rows: &[&str])->PathBuf {
    write_sub_with_nodata( root, site, xll, yll, cellsize, -9999.0, rows)
}

fn write_sub_with_nodata (root: &Path, site: &str, xll: f64, yll: f64, cellsize: f64, nodata: f64, rows: &[&str])->PathBuf {
    let dir = root.join(site);
    fs::create_dir_all( &dir).unwrap();
    let path = dir.join( SUB_RASTER_FILENAME);

    let ncols = rows[0].split_whitespace().count();
    let mut s = format!("ncols {ncols}\nnrows {}\nxllcorner {xll}\nyllcorner {yll}\ncellsize {cellsize}\nNODATA_value {nodata}\n", rows.len());
    for r in rows {
        s.push_str(r);
        s.push('\n');
    }
    fs::write( &path, s).unwrap();
    path
}

#[test]
fn test_overlapping_minimum_merge() {
    let root = tempfile::tempdir().unwrap();
    let a = write_sub( root.path(), "a_site", 0.0, 0.0, 1.0, &["10 10 10", "10 5 10", "10 10 10"]);
    let b = write_sub( root.path(), "b_site", 1.0, 0.0, 1.0, &["8 8 8", "8 8 8", "8 8 8"]);

    let paths = find_sub_rasters( root.path()).unwrap();
    assert_eq!( paths, vec![a.clone(), b.clone()]);

    let res = RasterMerger::new( MAX_ALT).merge( &paths).unwrap();
    let merged = &res.merged;
    let sectors = &res.sectors;
    println!("{:?}\n{:?}", merged.data, sectors.data);

    assert_eq!( (merged.nrows(), merged.ncols()), (3,4));
    for r in 0..3 {
        assert_eq!( merged.get(r,0), 10.0);
        assert_eq!( sectors.get(r,0), 0.0);
        for c in 1..4 {
            if (r,c) == (1,1) {
                assert_eq!( merged.get(r,c), 5.0);
                assert_eq!( sectors.get(r,c), 0.0);
            } else {
                assert_eq!( merged.get(r,c), 8.0);
                assert_eq!( sectors.get(r,c), 1.0);
            }
        }
    }

    assert_eq!( res.report.merged_count(), 2);
    assert_eq!( res.report.outcome_of(1), Some(&FileOutcome::Merged { rows: 3 }));
    assert_eq!( res.report.ground_cells_removed, 0);
}

#[test]
fn test_non_overlapping_values_preserved() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 0.0, 0.0, 1.0, &["1 2", "3 4"]);
    write_sub( root.path(), "b", 0.0, 3.0, 1.0, &["5 6", "7 8"]);

    let paths = find_sub_rasters( root.path()).unwrap();
    let res = RasterMerger::new( MAX_ALT).merge( &paths).unwrap();
    let m = &res.merged;

    assert_eq!( (m.nrows(), m.ncols()), (5,2));
    // b is north of a, hence on top
    assert_eq!( (m.get(0,0), m.get(1,1)), (5.0, 8.0));
    assert_eq!( (m.get(3,0), m.get(4,1)), (1.0, 4.0));
    // gap row is untouched
    assert_eq!( m.get(2,0), MAX_ALT);
    assert_eq!( res.sectors.get(2,1), MAX_ALT);
    assert_eq!( res.sectors.get(0,0), 1.0);
    assert_eq!( res.sectors.get(4,1), 0.0);
}

#[test]
fn test_ground_cells_eliminated() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 0.0, 0.0, 1.0, &["0 20", "-9999 30"]);
    write_sub( root.path(), "b", 0.0, 0.0, 1.0, &["15 0", "25 35"]);

    let paths = find_sub_rasters( root.path()).unwrap();
    let res = RasterMerger::new( MAX_ALT).merge( &paths).unwrap();
    let m = &res.merged;
    let s = &res.sectors;

    assert!( m.data.iter().all( |v| *v != 0.0));
    assert_eq!( m.get(0,0), MAX_ALT);
    assert_eq!( s.get(0,0), MAX_ALT);
    assert_eq!( m.get(0,1), MAX_ALT);
    assert_eq!( s.get(0,1), MAX_ALT);

    // input nodata never wins
    assert_eq!( m.get(1,0), 25.0);
    assert_eq!( s.get(1,0), 1.0);
    assert_eq!( m.get(1,1), 30.0);
    assert_eq!( s.get(1,1), 0.0);
    assert_eq!( res.report.ground_cells_removed, 2);
}

#[test]
fn test_out_of_bounds_file_skipped() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 0.0, 0.0, 1.0, &["1 1", "1 1"]);
    write_sub( root.path(), "b", 5.0, 0.0, 1.0, &["2 2", "2 2"]);
    write_sub( root.path(), "c", 1.0, 1.0, 1.0, &["3 3", "3 3"]);

    let paths = find_sub_rasters( root.path()).unwrap();
    let grid = AlignedGrid { bbox: BoundingBox::new( 0.0, 0.0, 3.0, 3.0), cellsize: 1.0, nrows: 3, ncols: 3 };
    let res = RasterMerger::new( MAX_ALT).merge_into_grid( &paths, grid).unwrap();

    assert!( matches!( res.report.outcome_of(1), Some(FileOutcome::OutOfBounds(_))));
    assert_eq!( res.report.merged_count(), 2);
    assert_eq!( res.merged.get(2,0), 1.0);
    assert_eq!( res.merged.get(0,2), 3.0);
    assert_eq!( res.sectors.get(0,2), 2.0);
    assert!( res.merged.data.iter().all( |v| *v != 2.0));
}

#[test]
fn test_malformed_and_mismatched_files() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 0.0, 0.0, 1.0, &["9 9", "9 9"]);
    write_sub( root.path(), "b", 0.0, 0.0, 1.0, &["4 4", "4 oops"]);
    write_sub( root.path(), "c", 0.0, 0.0, 2.0, &["1"]);
    fs::create_dir_all( root.path().join("d")).unwrap();
    fs::write( root.path().join("d").join(SUB_RASTER_FILENAME), "not a grid\n").unwrap();

    let paths = find_sub_rasters( root.path()).unwrap();
    assert_eq!( paths.len(), 4);

    let (progress,rx) = ProgressSink::with_channel(64);
    let res = RasterMerger::new( MAX_ALT).with_progress( progress).merge( &paths).unwrap();
    let m = &res.merged;

    // b failed in its second row, the lower values of its first row are reverted
    assert!( m.data.iter().all( |v| *v == 9.0));
    assert!( res.sectors.data.iter().all( |v| *v == 0.0));
    assert!( matches!( res.report.outcome_of(1), Some(FileOutcome::Failed { rows: 1, .. })));
    assert_eq!( res.report.outcome_of(2), Some(&FileOutcome::CellSizeMismatch(2.0)));
    assert!( matches!( res.report.outcome_of(3), Some(FileOutcome::Failed { rows: 0, .. })));
    assert_eq!( res.report.skipped_count(), 3);

    let mut msgs = Vec::new();
    while let Ok(Some(msg)) = rx.try_recv() {
        msgs.push(msg);
    }
    for m in &msgs { println!("{m}") }
    assert!( msgs.iter().any( |m| m.starts_with("aligning")));
    assert!( msgs.iter().any( |m| m == "removing ground from merged raster"));
    assert!( msgs.iter().any( |m| m.contains("reverted 2 cells")));
}

#[test]
fn test_failed_file_ground_cells_reverted() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 0.0, 0.0, 1.0, &["5 6", "7 8"]);
    write_sub( root.path(), "b", 0.0, 0.0, 1.0, &["0 1", "2"]);

    let paths = find_sub_rasters( root.path()).unwrap();
    let res = RasterMerger::new( MAX_ALT).merge( &paths).unwrap();

    assert_eq!( res.merged.data.iter().copied().collect::<Vec<f64>>(), vec![5.0, 6.0, 7.0, 8.0]);
    assert!( res.sectors.data.iter().all( |v| *v == 0.0));
    assert_eq!( res.report.ground_cells_removed, 0);
    assert_eq!( res.report.merged_count(), 1);
}

#[test]
fn test_oversized_header_skipped() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 0.0, 0.0, 1.0, &["1 2", "3 4"]);
    fs::create_dir_all( root.path().join("b")).unwrap();
    fs::write( root.path().join("b").join(SUB_RASTER_FILENAME),
        "ncols 10000000000000000000\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -9999\n1 1\n1 1\n").unwrap();

    let paths = find_sub_rasters( root.path()).unwrap();
    assert_eq!( paths.len(), 2);

    let res = RasterMerger::new( MAX_ALT).merge( &paths).unwrap();
    assert_eq!( (res.merged.nrows(), res.merged.ncols()), (2,2));
    assert_eq!( res.merged.get(1,1), 4.0);
    assert_eq!( res.report.outcome_of(0), Some(&FileOutcome::Merged { rows: 2 }));
    assert!( matches!( res.report.outcome_of(1), Some(FileOutcome::Failed { rows: 0, .. })));
}

#[test]
fn test_sites_too_far_apart() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 0.0, 0.0, 1.0, &["1 2", "3 4"]);
    write_sub( root.path(), "b", 1.0e12, 1.0e12, 1.0, &["1 2", "3 4"]);

    let paths = find_sub_rasters( root.path()).unwrap();
    let res = RasterMerger::new( MAX_ALT).merge( &paths);
    assert!( matches!( res, Err(GlidemapRasterError::OpFailedError(_))));
}

#[test]
fn test_input_nodata_is_per_file() {
    let root = tempfile::tempdir().unwrap();
    // a uses the run sentinel as its nodata value, b uses -1
    write_sub_with_nodata( root.path(), "a", 0.0, 0.0, 1.0, MAX_ALT, &["3000 100", "3000 3000"]);
    write_sub_with_nodata( root.path(), "b", 0.0, 0.0, 1.0, -1.0, &["-1 -1", "200 -1"]);

    let paths = find_sub_rasters( root.path()).unwrap();
    let res = RasterMerger::new( MAX_ALT).merge( &paths).unwrap();
    let m = &res.merged;
    let s = &res.sectors;

    // nodata cells of a are not credited to a
    assert_eq!( (m.get(0,0), s.get(0,0)), (MAX_ALT, MAX_ALT));
    assert_eq!( (m.get(0,1), s.get(0,1)), (100.0, 0.0));
    // -1 is b's nodata and never wins although it is below every merged value
    assert_eq!( (m.get(1,1), s.get(1,1)), (MAX_ALT, MAX_ALT));
    assert_eq!( (m.get(1,0), s.get(1,0)), (200.0, 1.0));
    assert!( m.data.iter().all( |v| *v >= 0.0));
}

#[test]
fn test_merge_to_files() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 10.0, 20.0, 5.0, &["100 200", "300 0"]);

    let out = tempfile::tempdir().unwrap();
    let merged_path = out.path().join("merged.asc");
    let sectors_path = out.path().join("sectors.asc");

    let paths = find_sub_rasters( root.path()).unwrap();
    RasterMerger::new( MAX_ALT).merge_to_files( &paths, &merged_path, &sectors_path).unwrap();

    let merged = read_asc( &merged_path).unwrap();
    assert_eq!( merged.header.xllcorner, 10.0);
    assert_eq!( merged.header.yllcorner, 20.0);
    assert_eq!( merged.header.nodata, MAX_ALT);
    assert_eq!( merged.get(1,1), MAX_ALT);
    assert_eq!( merged.get(0,1), 200.0);

    let sectors = read_asc( &sectors_path).unwrap();
    assert_eq!( sectors.get(0,0), 0.0);
    assert_eq!( sectors.get(1,1), MAX_ALT);
}

#[test]
fn test_cancelled_merge_writes_nothing() {
    let root = tempfile::tempdir().unwrap();
    write_sub( root.path(), "a", 0.0, 0.0, 1.0, &["1 2", "3 4"]);

    let out = tempfile::tempdir().unwrap();
    let merged_path = out.path().join("merged.asc");
    let sectors_path = out.path().join("sectors.asc");

    let cancel = CancelToken::new();
    cancel.cancel();

    let paths = find_sub_rasters( root.path()).unwrap();
    let res = RasterMerger::new( MAX_ALT).with_cancel_token( cancel).merge_to_files( &paths, &merged_path, &sectors_path);
    assert!( matches!( res, Err(GlidemapRasterError::Cancelled)));
    assert!( !merged_path.exists());
    assert!( !sectors_path.exists());
}

#[test]
fn test_no_inputs() {
    let root = tempfile::tempdir().unwrap();
    let paths = find_sub_rasters( root.path()).unwrap();
    assert!( paths.is_empty());
    assert!( matches!( RasterMerger::new( MAX_ALT).merge( &paths), Err(GlidemapRasterError::NoInputFiles(_))));
}
