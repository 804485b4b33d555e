pub mod error;
pub mod espp;
pub mod rsu;
mod solver;
