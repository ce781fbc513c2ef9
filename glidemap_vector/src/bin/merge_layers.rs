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
use glidemap_common::{define_cli, check_cli, log::{init_tracing, ProgressSink}};
use glidemap_vector::merge_layers;
use anyhow::Result;

define_cli! { ARGS [about="merge an airfield GeoJSON layer and a contour GeoJSON layer into one CRS84 layer"] =
    airfields_path: String [help="airfield GeoJSON FeatureCollection"],
    contours_path: String [help="reprojected contour GeoJSON FeatureCollection"],
    out_path: String [help="output GeoJSON file"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let n = merge_layers( &ARGS.airfields_path, &ARGS.contours_path, &ARGS.out_path, &ProgressSink::none())?;
    println!("{n} features written to {}", ARGS.out_path);
    Ok(())
}
