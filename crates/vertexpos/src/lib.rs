//! Vertex positioning for incremental Voronoi diagrams of points, line
//! segments and circular arcs.
//!
//! When a new site splits an existing edge, the new vertex is the point at
//! equal offset distance `t` from the edge's two sites and the new site.
//! This crate builds the offset equations, solves them in double-double
//! precision, filters spurious roots, and returns the vertex.
//!
//! Layout
//! - `numeric`: double-double reals and a stable quadratic solver.
//! - `site`: point/line/arc sites and their offset equations.
//! - `positioner`: kernels, closed-form three-point solver, filters, and
//!   `VertexPositioner`.
//! - `gen`: replayable random scenes for tests and benchmarks.

pub mod error;
pub mod gen;
pub mod numeric;
pub mod positioner;
pub mod site;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plane point / vector.
pub type Point = nalgebra::Vector2<f64>;

pub use error::PositionError;
pub use positioner::{PositionerCfg, Solution, VertexPositioner};
pub use site::Site;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::PositionError;
    pub use crate::numeric::DoubleDouble;
    pub use crate::positioner::{
        Diagram, EdgeId, EdgeRecord, EdgeTable, PositionerCfg, PppSolver, Solution, Solver,
        SplitEdge, TieBreak, VertexPositioner,
    };
    pub use crate::site::{ArcSite, LineSite, OffsetEq, PointSite, Site};
    pub use crate::Point;
}
