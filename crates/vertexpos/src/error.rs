//! Errors surfaced by the positioner.
//!
//! Kernel degeneracies (singular systems, complex roots) never appear here:
//! they yield empty candidate lists. Only the terminal "nothing survived"
//! state and malformed inputs are reported.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("edge {0} is not part of the diagram")]
    UnknownEdge(String),

    #[error("invalid site: {0}")]
    InvalidSite(&'static str),

    #[error("no vertex candidate survived ({candidates} raw candidates, t in [{t_min}, {t_max}])")]
    NoSolution {
        candidates: usize,
        t_min: f64,
        t_max: f64,
    },
}
