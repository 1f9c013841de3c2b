//! Random data generation for stress testing and benches.

pub mod generator;
