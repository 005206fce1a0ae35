//! Position of a new Voronoi vertex on an edge split by a new site.
//!
//! Purpose
//! - Given the two sites that define an edge and a newly inserted site, find
//!   the point at equal offset distance from all three, check that it is a
//!   genuine vertex of the diagram, and return it.
//!
//! Pipeline
//! - Classify the site triple once (`Composition`): three points go to the
//!   closed-form `Solver`; everything else is reduced to a linear (LLL) or
//!   quadratic/linear (QLL) system and solved in double-double.
//! - Line and arc sites are tried with both offset directions `k3 = ±1`.
//! - Candidates pass through the t-range, region, far-circle, distance and
//!   on-edge checks; survivors are ranked by `TieBreak`.
//!
//! State
//! - Per-call data (edge, `t_min`, `t_max`) lives in `SplitCtx` and is passed
//!   explicitly. The positioner itself only keeps the last accepted `k3` and the
//!   `errstat` log, which gains exactly one entry per `position` call.
//!
//! References
//! - Code cross-refs: `kernels::{reduce, lll_solver, qll_solver}`, `ppp::PppSolver`,
//!   `crate::site::Site`, `crate::numeric::quadratic_roots`

mod diagram;
mod kernels;
mod ppp;
mod types;

pub use diagram::{Diagram, EdgeId, EdgeRecord, EdgeTable, SplitEdge};
pub use kernels::{lll_solver, qll_solve, qll_solver, reduce, solve_reduced, Reduced};
pub use ppp::{PppSolver, Solver};
pub use types::{InRegionFilter, PositionerCfg, Solution, TFilter, TieBreak};

use std::cmp::Ordering;

use tracing::{debug, trace, warn};

use crate::error::PositionError;
use crate::site::Site;
use crate::Point;

/// Site-triple category, decided once per solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Composition {
    ThreePoints,
    Reduced(Reduced),
}

impl Composition {
    pub fn classify(s1: &Site, k1: f64, s2: &Site, k2: f64, s3: &Site, k3: f64) -> Self {
        if s1.is_point() && s2.is_point() && s3.is_point() {
            Composition::ThreePoints
        } else {
            Composition::Reduced(reduce([s1.eqn(k1), s2.eqn(k2), s3.eqn(k3)]))
        }
    }
}

/// Per-call context: the edge being split and its offset range.
#[derive(Clone, Copy, Debug)]
pub struct SplitCtx<'a> {
    pub edge: SplitEdge<'a>,
    pub t_min: f64,
    pub t_max: f64,
}

impl<'a> SplitCtx<'a> {
    pub fn new(edge: SplitEdge<'a>, t_slack: f64) -> Self {
        Self {
            edge,
            t_min: edge.t_min() - t_slack,
            t_max: edge.t_max() + t_slack,
        }
    }
}

/// Computes positions of new vertices for one diagram build.
///
/// Not reentrant: `position` takes `&mut self` and appends to `errstat`.
pub struct VertexPositioner<'d, D: Diagram, S: Solver = PppSolver> {
    vd: &'d D,
    cfg: PositionerCfg,
    ppp: S,
    k3: f64,
    errstat: Vec<f64>,
}

impl<'d, D: Diagram> VertexPositioner<'d, D, PppSolver> {
    pub fn new(vd: &'d D) -> Self {
        Self::with_cfg(vd, PositionerCfg::default())
    }

    pub fn with_cfg(vd: &'d D, cfg: PositionerCfg) -> Self {
        Self::with_solver(vd, cfg, PppSolver::default())
    }
}

impl<'d, D: Diagram, S: Solver> VertexPositioner<'d, D, S> {
    pub fn with_solver(vd: &'d D, cfg: PositionerCfg, ppp: S) -> Self {
        Self {
            vd,
            cfg,
            ppp,
            k3: 1.0,
            errstat: Vec::new(),
        }
    }

    #[inline]
    pub fn cfg(&self) -> &PositionerCfg {
        &self.cfg
    }

    /// Offset direction towards the new site from the last successful call.
    #[inline]
    pub fn get_k3(&self) -> f64 {
        self.k3
    }

    /// One edge-error entry per `position` call, oldest first.
    #[inline]
    pub fn get_stat(&self) -> &[f64] {
        &self.errstat
    }

    /// Position of the new vertex on edge `e`, equidistant to the edge's two
    /// sites and to `s3`.
    pub fn position(&mut self, e: D::Edge, s3: &Site) -> Result<Point, PositionError> {
        let vd = self.vd;
        let edge = vd
            .split_edge(e)
            .ok_or_else(|| PositionError::UnknownEdge(format!("{e:?}")))?;
        self.position_on_edge(&edge, s3).map(|sl| sl.p)
    }

    /// Like `position`, for an edge view supplied directly by the caller.
    pub fn position_on_edge(
        &mut self,
        edge: &SplitEdge<'_>,
        s3: &Site,
    ) -> Result<Solution, PositionError> {
        edge.s1.validate()?;
        edge.s2.validate()?;
        s3.validate()?;
        let ctx = SplitCtx::new(*edge, self.cfg.t_slack);
        let raw = self.candidates(edge, s3);
        let survivors = self.filter_candidates(&ctx, s3, &raw);
        match self.select(&ctx, survivors) {
            Some(sl) => {
                let err = self.edge_error(&ctx.edge, &sl);
                self.errstat.push(err);
                self.k3 = sl.k3;
                debug!(x = sl.p.x, y = sl.p.y, t = sl.t, k3 = sl.k3, err, "vertex positioned");
                Ok(sl)
            }
            None => {
                let err = raw
                    .iter()
                    .map(|s| self.edge_error(&ctx.edge, s))
                    .fold(f64::INFINITY, f64::min);
                self.errstat.push(err);
                warn!(
                    candidates = raw.len(),
                    t_min = ctx.t_min,
                    t_max = ctx.t_max,
                    "no vertex candidate survived"
                );
                Err(PositionError::NoSolution {
                    candidates: raw.len(),
                    t_min: ctx.t_min,
                    t_max: ctx.t_max,
                })
            }
        }
    }

    /// Unfiltered kernel output for every offset direction tried for `s3`.
    pub fn candidates(&self, edge: &SplitEdge<'_>, s3: &Site) -> Vec<Solution> {
        let dirs: &[f64] = if s3.is_point() { &[1.0] } else { &[1.0, -1.0] };
        let mut out = Vec::new();
        for &k3 in dirs {
            out.extend(self.solve(edge.s1, edge.k1, edge.s2, edge.k2, s3, k3));
        }
        debug!(n = out.len(), "kernel candidates");
        out
    }

    /// Dispatch on the site composition.
    pub fn solve(
        &self,
        s1: &Site,
        k1: f64,
        s2: &Site,
        k2: f64,
        s3: &Site,
        k3: f64,
    ) -> Vec<Solution> {
        match Composition::classify(s1, k1, s2, k2, s3, k3) {
            Composition::ThreePoints => self.ppp.solve(s1, k1, s2, k2, s3, k3).into_iter().collect(),
            Composition::Reduced(sys) => solve_reduced(&sys, k3, &self.cfg),
        }
    }

    /// Kernel path without the closed-form shortcut, for any composition.
    pub fn solve_generic(
        &self,
        s1: &Site,
        k1: f64,
        s2: &Site,
        k2: f64,
        s3: &Site,
        k3: f64,
    ) -> Vec<Solution> {
        let sys = reduce([s1.eqn(k1), s2.eqn(k2), s3.eqn(k3)]);
        solve_reduced(&sys, k3, &self.cfg)
    }

    /// Candidates passing every check, in input order.
    pub fn filter_candidates(
        &self,
        ctx: &SplitCtx<'_>,
        s3: &Site,
        raw: &[Solution],
    ) -> Vec<Solution> {
        raw.iter()
            .copied()
            .filter(|s| match self.rejection(ctx, s3, s) {
                Some(reason) => {
                    trace!(x = s.p.x, y = s.p.y, t = s.t, k3 = s.k3, reason, "candidate rejected");
                    false
                }
                None => true,
            })
            .collect()
    }

    fn rejection(&self, ctx: &SplitCtx<'_>, s3: &Site, s: &Solution) -> Option<&'static str> {
        let regions = [
            InRegionFilter::new(ctx.edge.s1),
            InRegionFilter::new(ctx.edge.s2),
            InRegionFilter::new(s3),
        ];
        if !TFilter::new(ctx.t_min, ctx.t_max).accepts(s) {
            Some("t_range")
        } else if !regions.iter().all(|f| f.accepts(s)) {
            Some("in_region")
        } else if !self.check_far_circle(s.p) {
            Some("far_circle")
        } else if !self.check_dist(&ctx.edge, s, s3) {
            Some("dist")
        } else if !self.solution_on_edge(ctx, s) {
            Some("on_edge")
        } else {
            None
        }
    }

    fn select(&self, ctx: &SplitCtx<'_>, survivors: Vec<Solution>) -> Option<Solution> {
        if survivors.len() > 1 {
            warn!(n = survivors.len(), tie_break = ?self.cfg.tie_break, "several candidates survive");
        }
        survivors
            .into_iter()
            .min_by(|a, b| self.rank(ctx, a, b))
    }

    fn rank(&self, ctx: &SplitCtx<'_>, a: &Solution, b: &Solution) -> Ordering {
        let primary = match self.cfg.tie_break {
            TieBreak::MinEdgeError => self
                .edge_error(&ctx.edge, a)
                .total_cmp(&self.edge_error(&ctx.edge, b)),
            TieBreak::MinT => a.t.total_cmp(&b.t),
        };
        primary
            .then(a.t.total_cmp(&b.t))
            .then(a.p.x.total_cmp(&b.p.x))
            .then(a.p.y.total_cmp(&b.p.y))
    }

    /// Deviation of `s` from the edge locus at offset `s.t`:
    /// `max(|d1 − t|, |d2 − t|)` with `d1`, `d2` the distances to the edge's sites.
    pub fn edge_error(&self, edge: &SplitEdge<'_>, s: &Solution) -> f64 {
        let d1 = edge.s1.distance(s.p);
        let d2 = edge.s2.distance(s.p);
        (d1 - s.t).abs().max((d2 - s.t).abs())
    }

    pub fn solution_on_edge(&self, ctx: &SplitCtx<'_>, s: &Solution) -> bool {
        self.edge_error(&ctx.edge, s) <= self.cfg.edge_tol * s.t.abs().max(1.0)
    }

    /// Reject points far outside the diagram extent.
    pub fn check_far_circle(&self, p: Point) -> bool {
        p.norm() < self.cfg.far_factor * self.vd.far_radius()
    }

    /// Distances to all three sites agree with each other and with `t`.
    pub fn check_dist(&self, edge: &SplitEdge<'_>, s: &Solution, s3: &Site) -> bool {
        let d1 = edge.s1.distance(s.p);
        let d2 = edge.s2.distance(s.p);
        let d3 = s3.distance(s.p);
        let ok = self.equal(d1, d2)
            && self.equal(d1, d3)
            && self.equal(d2, d3)
            && self.equal(s.t, d1)
            && self.equal(s.t, d2)
            && self.equal(s.t, d3);
        if !ok {
            trace!(d1, d2, d3, t = s.t, "distance mismatch");
        }
        ok
    }

    /// Epsilon-relative equality with an absolute floor.
    pub fn equal(&self, d1: f64, d2: f64) -> bool {
        let diff = (d1 - d2).abs();
        diff <= self.cfg.dist_abs_tol || diff <= self.cfg.dist_rel_tol * d1.abs().max(d2.abs())
    }
}
