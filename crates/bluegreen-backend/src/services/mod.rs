//! Business endpoints.

pub mod calculate;

pub use calculate::calculate;
