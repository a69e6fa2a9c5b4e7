//! CLI command implementations.

pub mod employee;
pub mod hours;
pub mod log;
pub mod seed;
pub mod util;
