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
use serde_json::{json, Value};
use glidemap::{GlidemapConfig, CrsConfig, PipelineContext, StageOutcome, GlidemapError, run_pipeline};
use glidemap_common::{fs::EnvPathBuf, cancel::CancelToken, log::ProgressSink};
use glidemap_raster::{read_asc, GlidemapRasterError, SUB_RASTER_FILENAME};

// run with "cargo test --test test_pipeline -- --nocapture"

const MAX_ALT: f64 = 4200.0;

fn write_sub (calc: &Path, site: &str, xll: f64, rows: &[&str]) {
    let dir = calc.join(site);
    fs::create_dir_all( &dir).unwrap();
    let ncols = rows[0].split_whitespace().count();
    let mut s = format!("ncols {ncols}\nnrows {}\nxllcorner {xll}\nyllcorner 5000000\ncellsize 100\nNODATA_value -9999\n", rows.len());
    for r in rows {
        s.push_str(r);
        s.push('\n');
    }
    fs::write( dir.join(SUB_RASTER_FILENAME), s).unwrap();
}

fn setup (root: &Path)->GlidemapConfig {
    let calc = root.join("results").join("20-200-250-4200");
    write_sub( &calc, "LSZA", 500000.0, &["500 400 300 200", "500 400 300 200", "500 400 300 200"]);
    write_sub( &calc, "LSZB", 500200.0, &["450 350 250 150", "450 350 250 150", "450 350 250 150"]);

    let airfields = root.join("results").join("airfields");
    fs::create_dir_all( &airfields).unwrap();
    let af = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "geometry": { "type": "Point", "coordinates": [9.0, 45.1] }, "properties": { "name": "LSZA" } }
        ]
    });
    fs::write( airfields.join("alps.geojson"), af.to_string()).unwrap();

    let template = root.join("style.mapcss");
    fs::write( &template, "way[ELEV] { color: red; }\n").unwrap();

    GlidemapConfig {
        name: "alps".to_string(),
        merged_output_name: "alps".to_string(),
        glide_ratio: 20.0,
        ground_clearance: 200.0,
        circuit_height: 250.0,
        max_altitude: MAX_ALT,
        crs: CrsConfig { definition: "EPSG:32632".to_string(), name: "UTM 32N".to_string() },
        contour_height: 100.0,
        merged_output_raster: EnvPathBuf::new( calc.join("output.asc")),
        sectors_raster: EnvPathBuf::new( calc.join("sectors.asc")),
        calculation_folder: EnvPathBuf::new( &calc),
        result_folder: EnvPathBuf::new( root.join("results")),
        export_vectors: true,
        mapcss_template: Some( EnvPathBuf::new( &template)),
    }
}

#[test]
fn test_full_run() {
    let root = tempfile::tempdir().unwrap();
    let config = setup( root.path());

    let (progress,rx) = ProgressSink::with_channel(256);
    let ctx = PipelineContext::new( progress, CancelToken::new());
    let report = run_pipeline( &config, &ctx).unwrap();

    let mut msgs = Vec::new();
    while let Ok(Some(m)) = rx.try_recv() { msgs.push(m) }
    for m in &msgs { println!("{m}") }

    assert_eq!( report.merge.merged_count(), 2);
    assert_eq!( report.contours, StageOutcome::Done);
    assert!( report.n_contours > 0);
    assert_eq!( report.reprojection, StageOutcome::Done);
    assert_eq!( report.layer_merge, StageOutcome::Done);
    assert_eq!( report.mapcss, StageOutcome::Done);
    assert_eq!( report.merged_stats.max, 500.0);
    assert_eq!( report.merged_stats.min, 150.0);

    // merged raster: 3 rows x 6 cols, overlap takes the minimum
    let merged = read_asc( &config.merged_output_raster).unwrap();
    assert_eq!( (merged.nrows(), merged.ncols()), (3,6));
    assert_eq!( merged.get(0,2), 300.0);
    assert_eq!( merged.get(0,3), 200.0);
    let sectors = read_asc( &config.sectors_raster).unwrap();
    assert_eq!( sectors.get(0,0), 0.0);
    assert_eq!( sectors.get(0,3), 0.0);
    assert_eq!( sectors.get(0,5), 1.0);

    let calc = config.calculation_folder.clone();
    assert!( calc.join("alps_customCRS.geojson").is_file());
    assert!( calc.join("alps_20-200-250_noAirfields.geojson").is_file());
    assert!( calc.join("alps_20-200-250.mapcss").is_file());

    let v: Value = serde_json::from_str( &fs::read_to_string( calc.join("alps_20-200-250.geojson")).unwrap()).unwrap();
    assert_eq!( v["name"], "OGRGeoJSON");
    let features = v["features"].as_array().unwrap();
    assert_eq!( features.len(), 1 + report.n_contours);
    assert_eq!( features[0]["properties"]["name"], "LSZA");

    // contours are in WGS84 now, close to the UTM 32N central meridian
    let lon = features[1]["geometry"]["coordinates"][0][0].as_f64().unwrap();
    let lat = features[1]["geometry"]["coordinates"][0][1].as_f64().unwrap();
    assert!( (lon - 9.0).abs() < 0.1 && lat > 45.0 && lat < 45.2, "lon={lon}, lat={lat}");
}

#[test]
fn test_export_disabled() {
    let root = tempfile::tempdir().unwrap();
    let mut config = setup( root.path());
    config.export_vectors = false;

    let report = run_pipeline( &config, &PipelineContext::default()).unwrap();
    assert_eq!( report.contours, StageOutcome::Done);
    assert_eq!( report.reprojection, StageOutcome::Skipped);
    assert_eq!( report.layer_merge, StageOutcome::Skipped);
    assert_eq!( report.mapcss, StageOutcome::Skipped);
    assert!( !config.final_layer_path().exists());
}

#[test]
fn test_failed_stages_do_not_abort() {
    let root = tempfile::tempdir().unwrap();
    let config = setup( root.path());
    fs::remove_file( config.airfields_path()).unwrap();

    let report = run_pipeline( &config, &PipelineContext::default()).unwrap();
    assert_eq!( report.reprojection, StageOutcome::Done);
    assert!( matches!( report.layer_merge, StageOutcome::Failed(_)));
    assert_eq!( report.mapcss, StageOutcome::Skipped);

    let mut config = setup( root.path());
    config.crs.definition = "EPSG:99999".to_string();
    let report = run_pipeline( &config, &PipelineContext::default()).unwrap();
    assert!( matches!( report.reprojection, StageOutcome::Failed(_)));
    assert_eq!( report.layer_merge, StageOutcome::Skipped);
}

#[test]
fn test_merge_errors_are_fatal() {
    let root = tempfile::tempdir().unwrap();
    let config = setup( root.path());

    let cancel = CancelToken::new();
    cancel.cancel();
    let res = run_pipeline( &config, &PipelineContext::new( ProgressSink::none(), cancel));
    assert!( matches!( res, Err(GlidemapError::RasterError(GlidemapRasterError::Cancelled))));
    assert!( !config.merged_output_raster.exists());
    assert!( !config.sectors_raster.exists());

    let empty = root.path().join("empty");
    fs::create_dir_all( &empty).unwrap();
    let mut config = setup( root.path());
    config.calculation_folder = EnvPathBuf::new( &empty);
    let res = run_pipeline( &config, &PipelineContext::default());
    assert!( matches!( res, Err(GlidemapError::RasterError(GlidemapRasterError::NoInputFiles(_)))));
}
