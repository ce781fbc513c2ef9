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
use glidemap_vector::make_contours;
use anyhow::Result;

define_cli! { ARGS [about="trace contour lines of a merged reachability raster into a GeoJSON file"] =
    interval: f64 [help="contour interval", short, long, default_value="100"],
    raster_path: String [help="input ASC raster"],
    out_path: String [help="output GeoJSON file"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let n = make_contours( &ARGS.raster_path, ARGS.interval, &ARGS.out_path, &ProgressSink::none())?;
    println!("{n} contour lines written to {}", ARGS.out_path);
    Ok(())
}
