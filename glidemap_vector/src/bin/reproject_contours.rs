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
use glidemap_vector::reproject_contours;
use anyhow::Result;

define_cli! { ARGS [about="reproject a LineString GeoJSON layer into WGS84 longitude/latitude"] =
    crs: String [help="source CRS (PROJ.4 string or EPSG:<code>)", long],
    src_path: String [help="input GeoJSON file"],
    tgt_path: String [help="output GeoJSON file"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let n = reproject_contours( &ARGS.src_path, &ARGS.crs, &ARGS.tgt_path, &ProgressSink::none())?;
    println!("{n} features reprojected");
    Ok(())
}
