pub mod pricing;
pub mod solver;

pub use pricing::*;
pub use solver::*;
