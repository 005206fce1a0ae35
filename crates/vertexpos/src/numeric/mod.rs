//! Extended-precision numerics for the vertex kernels.
//!
//! - `DoubleDouble`: ~106-bit reals from error-free f64 transforms.
//! - `quadratic_roots`: cancellation-free real roots with explicit handling of
//!   the degenerate leading coefficient and the double-root case.

mod dd;
mod quadratic;

pub use dd::DoubleDouble;
pub use quadratic::{quadratic_roots, Roots};

#[cfg(test)]
mod tests;
