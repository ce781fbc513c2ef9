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
//! run configuration and the output file naming derived from it

use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use glidemap_common::{load_config_path, fs::EnvPathBuf};
use crate::errors::{Result, config_error};

/// source CRS of the per-site rasters
#[derive(Clone,Serialize,Deserialize,Debug,PartialEq)]
pub struct CrsConfig {
    /// PROJ.4 string or "EPSG:<code>"
    pub definition: String,
    /// human readable name (only used for display)
    pub name: String,
}

/// the immutable parameters of one run. Paths can use `~` and `$VAR` elements
#[derive(Clone,Serialize,Deserialize,Debug)]
pub struct GlidemapConfig {
    /// region name, also the name of the airfield layer
    pub name: String,
    /// base name of all contour/layer outputs
    pub merged_output_name: String,

    pub glide_ratio: f64,
    pub ground_clearance: f64,
    pub circuit_height: f64,

    /// nodata sentinel of the merged rasters
    pub max_altitude: f64,

    pub crs: CrsConfig,

    /// contour interval
    pub contour_height: f64,

    /// root of the per-site sub-rasters, also receives the contour and layer outputs
    pub calculation_folder: EnvPathBuf,
    pub merged_output_raster: EnvPathBuf,
    pub sectors_raster: EnvPathBuf,
    pub result_folder: EnvPathBuf,

    /// do we reproject, merge with airfields and copy the styling sidecar
    #[serde(default)]
    pub export_vectors: bool,

    #[serde(default)]
    pub mapcss_template: Option<EnvPathBuf>,
}

impl GlidemapConfig {
    pub fn validate (&self)->Result<()> {
        if !(self.contour_height > 0.0) {
            return Err( config_error( format!("contour_height has to be positive: {}", self.contour_height)))
        }
        if !(self.max_altitude > 0.0) {
            return Err( config_error( format!("max_altitude has to be positive: {}", self.max_altitude)))
        }
        if self.merged_output_name.is_empty() {
            return Err( config_error("empty merged_output_name"))
        }
        Ok(())
    }

    /// the "{glide_ratio}-{ground_clearance}-{circuit_height}" tag of exported layers
    pub fn glide_tag (&self)->String {
        format!("{}-{}-{}", self.glide_ratio, self.ground_clearance, self.circuit_height)
    }

    /// contours in the source CRS
    pub fn contours_custom_crs_path (&self)->PathBuf {
        self.calculation_folder.join( format!("{}_customCRS.geojson", self.merged_output_name))
    }

    /// contours in WGS84
    pub fn contours_wgs84_path (&self)->PathBuf {
        self.calculation_folder.join( format!("{}_{}_noAirfields.geojson", self.merged_output_name, self.glide_tag()))
    }

    /// contours merged with airfields
    pub fn final_layer_path (&self)->PathBuf {
        self.calculation_folder.join( format!("{}_{}.geojson", self.merged_output_name, self.glide_tag()))
    }

    pub fn mapcss_path (&self)->PathBuf {
        self.calculation_folder.join( format!("{}_{}.mapcss", self.merged_output_name, self.glide_tag()))
    }

    /// the externally produced airfield point layer
    pub fn airfields_path (&self)->PathBuf {
        self.result_folder.join("airfields").join( format!("{}.geojson", self.name))
    }

    pub fn summary (&self)->String {
        format!("calculating {} with glide {}, ground clearance {}, circuit height {}, up to {}m ({})",
            self.name, self.glide_ratio, self.ground_clearance, self.circuit_height, self.max_altitude, self.crs.name)
    }
}

/// load and validate a RON config file
pub fn load_config (path: impl AsRef<Path>)->Result<GlidemapConfig> {
    let config: GlidemapConfig = load_config_path( path)?;
    config.validate()?;
    Ok(config)
}
