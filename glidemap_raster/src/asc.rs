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
//! ESRI ASCII grid ("ASC") reading and writing.
//!
//! The format has six `<key> <value>` header lines in fixed order (`ncols`, `nrows`, `xllcorner`,
//! `yllcorner`, `cellsize`, `NODATA_value`) followed by `nrows` lines of `ncols` whitespace
//! separated values. Row 0 is the northernmost row.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::fmt::Write as FmtWrite;
use ndarray::Array2;
use serde::{Serialize, Deserialize};

use glidemap_common::{BoundingBox, fs::write_atomic};
use crate::errors::{Result, op_failed, header_error, body_error};

pub const ASC_HEADER_KEYS: [&str;6] = ["ncols", "nrows", "xllcorner", "yllcorner", "cellsize", "NODATA_value"];

/// upper limit for the number of cells of a grid we allocate (2GB of f64 values)
pub const MAX_GRID_CELLS: usize = 1 << 28;

/// fails if a grid of the given dimensions would exceed [`MAX_GRID_CELLS`]
pub fn check_grid_size (nrows: usize, ncols: usize)->Result<()> {
    match nrows.checked_mul(ncols) {
        Some(n) if n <= MAX_GRID_CELLS => Ok(()),
        _ => Err( op_failed( format!("grid of {nrows} x {ncols} cells exceeds limit of {MAX_GRID_CELLS} cells")))
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct RasterHeader {
    pub ncols: usize,
    pub nrows: usize,
    pub xllcorner: f64,
    pub yllcorner: f64,
    pub cellsize: f64,
    pub nodata: f64,
}

impl RasterHeader {
    pub fn new (ncols: usize, nrows: usize, xllcorner: f64, yllcorner: f64, cellsize: f64, nodata: f64)->Self {
        RasterHeader { ncols, nrows, xllcorner, yllcorner, cellsize, nodata }
    }

    /// metric extent covered by the grid (west,south,east,north)
    pub fn extent (&self)->BoundingBox<f64> {
        BoundingBox::new(
            self.xllcorner,
            self.yllcorner,
            self.xllcorner + self.ncols as f64 * self.cellsize,
            self.yllcorner + self.nrows as f64 * self.cellsize
        )
    }

    /// NaN cells are treated as nodata as well so that they never get written as such
    #[inline]
    pub fn is_nodata (&self, v: f64)->bool {
        v == self.nodata || v.is_nan()
    }
}

/// a fully materialized grid
#[derive(Debug,Clone,PartialEq)]
pub struct RasterGrid {
    pub header: RasterHeader,
    pub data: Array2<f64>, // (nrows,ncols)
}

impl RasterGrid {
    pub fn filled (header: RasterHeader, value: f64)->Self {
        let data = Array2::from_elem( (header.nrows, header.ncols), value);
        RasterGrid { header, data }
    }

    pub fn from_data (header: RasterHeader, data: Array2<f64>)->Result<Self> {
        if data.dim() != (header.nrows, header.ncols) {
            return Err( op_failed( format!("grid data shape {:?} does not match header {}x{}", data.dim(), header.nrows, header.ncols)))
        }
        Ok( RasterGrid { header, data } )
    }

    /// row-major values, e.g. from test fixtures
    pub fn from_rows (header: RasterHeader, values: Vec<f64>)->Result<Self> {
        let data = Array2::from_shape_vec( (header.nrows, header.ncols), values)?;
        Ok( RasterGrid { header, data } )
    }

    pub fn nrows (&self)->usize { self.header.nrows }
    pub fn ncols (&self)->usize { self.header.ncols }

    #[inline]
    pub fn get (&self, row: usize, col: usize)->f64 { self.data[[row,col]] }

    pub fn is_nodata_at (&self, row: usize, col: usize)->bool {
        self.header.is_nodata( self.data[[row,col]])
    }

    /// largest value that is not nodata, or None if the grid does not contain any data cell
    pub fn max_value (&self)->Option<f64> {
        let hdr = &self.header;
        self.data.iter()
            .filter( |v| !hdr.is_nodata(**v))
            .fold( None, |acc: Option<f64>, v| Some( acc.map_or(*v, |m| m.max(*v))))
    }

    /// number of cells holding data
    pub fn data_cells (&self)->usize {
        self.data.iter().filter( |v| !self.header.is_nodata(**v)).count()
    }
}

/* #region reading ********************************************************************************/

fn parse_header_line (path: &Path, line: &str, key: &str)->Result<f64> {
    let mut it = line.split_whitespace();
    match (it.next(), it.next()) {
        (Some(k), Some(v)) if k.eq_ignore_ascii_case(key) => {
            v.parse::<f64>().map_err( |_| header_error( path, format!("invalid {key} value '{v}'")))
        }
        (Some(k), _) => Err( header_error( path, format!("expected '{key}' but found '{k}'"))),
        _ => Err( header_error( path, format!("missing '{key}' line")))
    }
}

fn parse_count (path: &Path, v: f64, key: &str)->Result<usize> {
    if v > MAX_GRID_CELLS as f64 {
        Err( header_error( path, format!("{key} exceeds grid size limit: {v}")))
    } else if v >= 0.0 && v.fract() == 0.0 {
        Ok( v as usize )
    } else {
        Err( header_error( path, format!("{key} is not a non-negative integer: {v}")))
    }
}

/// read the six header lines from an already opened reader
pub fn read_header_from<R: BufRead> (reader: &mut R, path: &Path)->Result<RasterHeader> {
    let mut vals = [0.0f64; 6];
    let mut line = String::new();

    for (i,key) in ASC_HEADER_KEYS.iter().enumerate() {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err( header_error( path, format!("unexpected end of file before '{key}'")))
        }
        vals[i] = parse_header_line( path, &line, key)?;
    }

    let ncols = parse_count( path, vals[0], "ncols")?;
    let nrows = parse_count( path, vals[1], "nrows")?;
    if let Err(e) = check_grid_size( nrows, ncols) {
        return Err( header_error( path, e))
    }
    if !(vals[2].is_finite() && vals[3].is_finite()) {
        return Err( header_error( path, format!("non-finite lower left corner ({},{})", vals[2], vals[3])))
    }
    let cellsize = vals[4];
    if !(cellsize > 0.0 && cellsize.is_finite()) {
        return Err( header_error( path, format!("cellsize has to be positive: {cellsize}")))
    }

    Ok( RasterHeader::new( ncols, nrows, vals[2], vals[3], cellsize, vals[5]) )
}

/// read only the header of a grid file (the body is not touched)
pub fn read_header (path: impl AsRef<Path>)->Result<RasterHeader> {
    let path = path.as_ref();
    let mut reader = BufReader::new( File::open(path)?);
    read_header_from( &mut reader, path)
}

/// streaming row access to the body of a grid file
pub struct AscRowReader<R: BufRead> {
    reader: R,
    path: PathBuf,
    header: RasterHeader,
    row: usize,
    line: String,
}

impl AscRowReader<BufReader<File>> {
    pub fn open (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new( File::open(path)?);
        AscRowReader::new( reader, path)
    }
}

impl<R: BufRead> AscRowReader<R> {
    pub fn new (mut reader: R, path: &Path)->Result<Self> {
        let header = read_header_from( &mut reader, path)?;
        Ok( AscRowReader { reader, path: path.to_path_buf(), header, row: 0, line: String::new() } )
    }

    pub fn header (&self)->&RasterHeader { &self.header }

    /// number of rows returned so far
    pub fn rows_read (&self)->usize { self.row }

    fn next_non_blank_line (&mut self)->Result<bool> {
        loop {
            self.line.clear();
            if self.reader.read_line( &mut self.line)? == 0 {
                return Ok(false)
            }
            if !self.line.trim().is_empty() {
                return Ok(true)
            }
        }
    }

    /// parse the next body row into `buf` (which is cleared first). Returns `false` after the last
    /// header-declared row or if the file ends early
    pub fn next_row (&mut self, buf: &mut Vec<f64>)->Result<bool> {
        if self.row >= self.header.nrows || !self.next_non_blank_line()? {
            return Ok(false)
        }

        buf.clear();
        for tok in self.line.split_whitespace() {
            let v = tok.parse::<f64>().map_err( |_| body_error( &self.path, self.row, format!("invalid value '{tok}'")))?;
            buf.push(v);
        }

        if buf.len() != self.header.ncols {
            return Err( body_error( &self.path, self.row, format!("expected {} values, found {}", self.header.ncols, buf.len())))
        }

        self.row += 1;
        Ok(true)
    }

    /// check if there is non-blank content after the header-declared rows
    pub fn has_trailing_rows (&mut self)->Result<bool> {
        if self.row < self.header.nrows {
            Ok(false)
        } else {
            self.next_non_blank_line()
        }
    }
}

/// read a complete grid file into memory
pub fn read_asc (path: impl AsRef<Path>)->Result<RasterGrid> {
    let path = path.as_ref();
    let mut reader = AscRowReader::open(path)?;
    let header = *reader.header();

    let n_cells = header.nrows.checked_mul( header.ncols)
        .ok_or_else( || header_error( path, format!("grid size overflow {} x {}", header.nrows, header.ncols)))?;
    let mut values: Vec<f64> = Vec::with_capacity( n_cells);
    let mut buf: Vec<f64> = Vec::with_capacity( header.ncols);
    while reader.next_row( &mut buf)? {
        values.extend_from_slice( &buf);
    }

    if reader.rows_read() != header.nrows {
        return Err( body_error( path, reader.rows_read(), format!("expected {} rows", header.nrows)))
    }

    RasterGrid::from_rows( header, values)
}

/* #endregion reading */

/* #region writing ********************************************************************************/

/// write grid in ASC format. NaN cells are written as the header nodata value
pub fn write_asc_to<W: Write> (grid: &RasterGrid, w: &mut W)->std::io::Result<()> {
    let hdr = &grid.header;
    writeln!( w, "ncols {}", hdr.ncols)?;
    writeln!( w, "nrows {}", hdr.nrows)?;
    writeln!( w, "xllcorner {}", hdr.xllcorner)?;
    writeln!( w, "yllcorner {}", hdr.yllcorner)?;
    writeln!( w, "cellsize {}", hdr.cellsize)?;
    writeln!( w, "NODATA_value {}", hdr.nodata)?;

    let mut line = String::with_capacity( hdr.ncols * 8);
    for row in grid.data.rows() {
        line.clear();
        for (j,v) in row.iter().enumerate() {
            if j > 0 { line.push(' ') }
            let v = if v.is_nan() { hdr.nodata } else { *v };
            let _ = write!( line, "{}", v);
        }
        line.push('\n');
        w.write_all( line.as_bytes())?;
    }

    w.flush()
}

/// write grid to `path`. The file is written to a temporary sibling and renamed into place when complete
pub fn write_asc (grid: &RasterGrid, path: impl AsRef<Path>)->Result<()> {
    write_atomic( path, |file| {
        let mut w = BufWriter::new(file);
        write_asc_to( grid, &mut w)
    })?;
    Ok(())
}

/* #endregion writing */
