#![forbid(unsafe_code)]

//! Time-driven motion.
//!
//! Nothing here reads a wall clock. Motion advances only by the `dt` values
//! fed in, so a run is fully determined by its tick sequence.

pub mod spring;
