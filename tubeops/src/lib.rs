//! tube - quality-capped YouTube playlist downloads.

pub mod cli;
pub mod dl;
