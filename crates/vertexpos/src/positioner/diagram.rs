//! What the positioner needs from the diagram being built.
//!
//! The half-edge graph lives elsewhere; the positioner only reads the two
//! sites on either side of an edge, their offset directions, and the offset
//! distances at the edge endpoints. `EdgeTable` is a flat in-memory
//! implementation for tools and tests.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::site::Site;

/// Edge index into an `EdgeTable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct EdgeId(pub usize);

/// Borrowed view of an edge about to be split.
#[derive(Clone, Copy, Debug)]
pub struct SplitEdge<'a> {
    /// Site of the edge's face, with its offset direction.
    pub s1: &'a Site,
    pub k1: f64,
    /// Site of the twin edge's face, with its offset direction.
    pub s2: &'a Site,
    pub k2: f64,
    /// Offset distance at the source vertex.
    pub t_src: f64,
    /// Offset distance at the target vertex.
    pub t_trg: f64,
}

impl SplitEdge<'_> {
    #[inline]
    pub fn t_min(&self) -> f64 {
        self.t_src.min(self.t_trg)
    }
    #[inline]
    pub fn t_max(&self) -> f64 {
        self.t_src.max(self.t_trg)
    }
}

pub trait Diagram {
    type Edge: Copy + std::fmt::Debug;

    /// Radius of the circle enclosing all input geometry.
    fn far_radius(&self) -> f64;

    /// The sites and offset range of `e`, or `None` if `e` is unknown.
    fn split_edge(&self, e: Self::Edge) -> Option<SplitEdge<'_>>;
}

/// One edge: indices into `EdgeTable::sites` plus directions and endpoint offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeRecord {
    pub face_site: usize,
    pub k1: f64,
    pub twin_site: usize,
    pub k2: f64,
    pub t_src: f64,
    pub t_trg: f64,
}

/// Flat diagram: owned sites and edge records.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeTable {
    pub far_radius: f64,
    pub sites: Vec<Site>,
    pub edges: Vec<EdgeRecord>,
}

impl EdgeTable {
    pub fn new(far_radius: f64) -> Self {
        Self {
            far_radius,
            sites: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Append a site and return its index.
    pub fn add_site(&mut self, s: Site) -> usize {
        self.sites.push(s);
        self.sites.len() - 1
    }

    /// Append an edge between two existing sites.
    pub fn add_edge(&mut self, rec: EdgeRecord) -> EdgeId {
        self.edges.push(rec);
        EdgeId(self.edges.len() - 1)
    }
}

impl Diagram for EdgeTable {
    type Edge = EdgeId;

    fn far_radius(&self) -> f64 {
        self.far_radius
    }

    fn split_edge(&self, e: EdgeId) -> Option<SplitEdge<'_>> {
        let rec = self.edges.get(e.0)?;
        Some(SplitEdge {
            s1: self.sites.get(rec.face_site)?,
            k1: rec.k1,
            s2: self.sites.get(rec.twin_site)?,
            k2: rec.k2,
            t_src: rec.t_src,
            t_trg: rec.t_trg,
        })
    }
}
