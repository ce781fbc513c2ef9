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
//! marching squares isoline tracing over a 2D grid.
//!
//! Grid points are cell corners, i.e. a grid of nrows x ncols values has (nrows-1) x (ncols-1) cells.
//! Resulting vertices are in fractional pixel space (row, col). Segments are joined into maximal
//! polylines through the cell edges they share. Since every edge is shared by at most two cells, and
//! no cell uses an edge twice, each edge has at most two incident segments.

use hashbrown::HashMap;
use ndarray::Array2;

/// vertex in fractional pixel coordinates
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct PixelPoint {
    pub row: f64,
    pub col: f64,
}

/// a traced isoline. Closed lines repeat their first vertex at the end
#[derive(Debug,Clone,PartialEq)]
pub struct Isoline {
    pub points: Vec<PixelPoint>,
}

impl Isoline {
    pub fn is_closed (&self)->bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }
}

/// cell edge a segment endpoint lies on
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
enum Edge {
    /// between grid points (r,c) and (r,c+1)
    H(usize,usize),
    /// between grid points (r,c) and (r+1,c)
    V(usize,usize),
}

// case bits
const UL: u8 = 1;
const UR: u8 = 2;
const LR: u8 = 4;
const LL: u8 = 8;

struct Tracer<'a> {
    data: &'a Array2<f64>,
    level: f64,
    segments: Vec<(Edge,Edge)>,
    incident: HashMap<Edge,[Option<usize>;2]>,
}

impl<'a> Tracer<'a> {
    fn new (data: &'a Array2<f64>, level: f64)->Self {
        Tracer { data, level, segments: Vec::new(), incident: HashMap::new() }
    }

    fn add_segment (&mut self, a: Edge, b: Edge) {
        let idx = self.segments.len();
        self.segments.push( (a,b));
        for e in [a,b] {
            let slots = self.incident.entry(e).or_insert( [None,None]);
            if slots[0].is_none() { slots[0] = Some(idx) } else { slots[1] = Some(idx) }
        }
    }

    fn degree (&self, e: &Edge)->usize {
        self.incident.get(e).map_or( 0, |s| s.iter().filter( |i| i.is_some()).count())
    }

    fn march<F> (&mut self, is_nodata: F) where F: Fn(f64)->bool {
        let (nrows,ncols) = self.data.dim();
        if nrows < 2 || ncols < 2 { return }
        let level = self.level;

        for r in 0..nrows-1 {
            for c in 0..ncols-1 {
                let ul = self.data[[r,c]];
                let ur = self.data[[r,c+1]];
                let lr = self.data[[r+1,c+1]];
                let ll = self.data[[r+1,c]];

                if [ul,ur,lr,ll].iter().any( |v| is_nodata(*v)) { continue }

                let mut case = 0u8;
                if ul >= level { case |= UL }
                if ur >= level { case |= UR }
                if lr >= level { case |= LR }
                if ll >= level { case |= LL }

                let top = Edge::H(r,c);
                let right = Edge::V(r,c+1);
                let bottom = Edge::H(r+1,c);
                let left = Edge::V(r,c);

                match case {
                    0 | 15 => {}
                    1 | 14 => self.add_segment( left, top),
                    2 | 13 => self.add_segment( top, right),
                    3 | 12 => self.add_segment( left, right),
                    4 | 11 => self.add_segment( right, bottom),
                    6 | 9 => self.add_segment( top, bottom),
                    7 | 8 => self.add_segment( left, bottom),
                    5 | 10 => {
                        let centre_above = (ul + ur + lr + ll) / 4.0 >= level;
                        if centre_above == (case == 5) {
                            self.add_segment( top, right);
                            self.add_segment( left, bottom);
                        } else {
                            self.add_segment( left, top);
                            self.add_segment( right, bottom);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn interpolate (&self, e: Edge)->PixelPoint {
        let (r0,c0, r1,c1) = match e {
            Edge::H(r,c) => (r,c, r,c+1),
            Edge::V(r,c) => (r,c, r+1,c),
        };
        let v0 = self.data[[r0,c0]];
        let v1 = self.data[[r1,c1]];
        let t = if v1 != v0 { ((self.level - v0) / (v1 - v0)).clamp( 0.0, 1.0) } else { 0.5 };

        PixelPoint {
            row: r0 as f64 + t * (r1 as f64 - r0 as f64),
            col: c0 as f64 + t * (c1 as f64 - c0 as f64),
        }
    }

    fn walk (&self, start_seg: usize, start_edge: Edge, used: &mut [bool])->Vec<Edge> {
        let mut edges = vec![start_edge];
        let mut seg = start_seg;
        let mut at = start_edge;

        loop {
            used[seg] = true;
            let (a,b) = self.segments[seg];
            let next = if a == at { b } else { a };
            edges.push( next);

            let cont = self.incident.get(&next).and_then( |slots| {
                slots.iter().flatten().copied().find( |i| *i != seg && !used[*i])
            });
            match cont {
                Some(s) => { seg = s; at = next; }
                None => break
            }
        }
        edges
    }

    /// join segments into polylines. Open chains are started from their degree-1 ends (in segment
    /// creation order), everything left afterwards is a closed loop
    fn join (&self)->Vec<Isoline> {
        let mut used = vec![false; self.segments.len()];
        let mut lines: Vec<Isoline> = Vec::new();

        for (i,(a,b)) in self.segments.iter().enumerate() {
            for e in [a,b] {
                if !used[i] && self.degree(e) == 1 {
                    let edges = self.walk( i, *e, &mut used);
                    lines.push( self.to_isoline( &edges));
                }
            }
        }

        for i in 0..self.segments.len() {
            if !used[i] {
                let (a,_) = self.segments[i];
                let edges = self.walk( i, a, &mut used);
                lines.push( self.to_isoline( &edges));
            }
        }

        lines
    }

    fn to_isoline (&self, edges: &[Edge])->Isoline {
        Isoline { points: edges.iter().map( |e| self.interpolate(*e)).collect() }
    }
}

/// trace all isolines of `level` through `data`. Cells with any corner for which `is_nodata`
/// returns true (or that is NaN) are skipped
pub fn trace_isolines<F> (data: &Array2<f64>, level: f64, is_nodata: F)->Vec<Isoline> where F: Fn(f64)->bool {
    let mut tracer = Tracer::new( data, level);
    tracer.march( |v| v.is_nan() || is_nodata(v));
    tracer.join()
}
