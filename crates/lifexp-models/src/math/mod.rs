//! Dense linear-algebra helpers on top of `ndarray`.
pub mod linalg;

pub use linalg::{pinv_solve_symmetric, symmetric_eigen};
