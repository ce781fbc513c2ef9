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
//! computing the global grid that covers a set of per-site grids with a shared cellsize

use glidemap_common::BoundingBox;
use crate::asc::{RasterHeader, check_grid_size};
use crate::errors::{Result, GlidemapRasterError};

/// the global grid all sub-rasters get merged into
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct AlignedGrid {
    pub bbox: BoundingBox<f64>,
    pub cellsize: f64,
    pub nrows: usize,
    pub ncols: usize,
}

impl AlignedGrid {
    pub fn min_x (&self)->f64 { self.bbox.west }
    pub fn min_y (&self)->f64 { self.bbox.south }
    pub fn max_x (&self)->f64 { self.bbox.east }
    pub fn max_y (&self)->f64 { self.bbox.north }

    /// header of the merged grid, anchored at the global origin
    pub fn header (&self, nodata: f64)->RasterHeader {
        RasterHeader::new( self.ncols, self.nrows, self.min_x(), self.min_y(), self.cellsize, nodata)
    }

    /// where the grid described by `hdr` lands in the aligned grid. Row 0 is the north edge while
    /// `yllcorner` anchors the south edge, hence the row inversion
    pub fn placement (&self, hdr: &RasterHeader)->Placement {
        let cs = self.cellsize;
        let start_row = self.nrows as i64 - ((hdr.yllcorner + hdr.nrows as f64 * cs - self.min_y()) / cs).floor() as i64;
        let start_col = ((hdr.xllcorner - self.min_x()) / cs).floor() as i64;

        Placement {
            start_row,
            end_row: start_row + hdr.nrows as i64,
            start_col,
            end_col: start_col + hdr.ncols as i64,
        }
    }
}

/// sub-grid window within the aligned grid (end indices are exclusive).
/// Indices are signed so that out-of-bounds placements can be represented and reported
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct Placement {
    pub start_row: i64,
    pub end_row: i64,
    pub start_col: i64,
    pub end_col: i64,
}

impl Placement {
    pub fn is_within (&self, grid: &AlignedGrid)->bool {
        self.start_row >= 0 && self.end_row <= grid.nrows as i64 &&
        self.start_col >= 0 && self.end_col <= grid.ncols as i64
    }
}

/// do two cellsizes denote the same grid resolution
pub fn same_cellsize (a: f64, b: f64)->bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

/// compute the global bounding box and grid dimensions for the given headers, which have to share `cellsize`.
/// Grid dimensions are truncated, i.e. a fractional remainder of the extent is dropped
pub fn align_headers (headers: &[RasterHeader], cellsize: f64)->Result<AlignedGrid> {
    let mut it = headers.iter();
    let first = it.next().ok_or_else( || GlidemapRasterError::NoInputFiles("raster header".to_string()))?;

    let extent_of = |h: &RasterHeader| BoundingBox::new(
        h.xllcorner, h.yllcorner,
        h.xllcorner + h.ncols as f64 * cellsize,
        h.yllcorner + h.nrows as f64 * cellsize
    );
    let bbox = it.fold( extent_of(first), |acc, h| acc.union( &extent_of(h)));

    let ncols = (bbox.width() / cellsize).trunc() as usize;
    let nrows = (bbox.height() / cellsize).trunc() as usize;
    check_grid_size( nrows, ncols)?;

    Ok( AlignedGrid { bbox, cellsize, nrows, ncols } )
}
