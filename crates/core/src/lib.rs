//! `tasktrack-core`: state and derivation layer of the task tracker.
//!
//! Owns the category and task stores, their mutation contracts, and the
//! pure derivations consumed by a presentation layer: display ordering,
//! board partitions, color similarity warnings, and activity statistics.
//! No I/O happens here; all data lives in memory for the life of the
//! process.

pub mod board;
pub mod category;
pub mod color;
pub mod command;
pub mod error;
pub mod ordering;
pub mod seed;
pub mod stats;
pub mod task;
pub mod tracker;
pub mod types;

pub use error::CoreError;
pub use tracker::{Snapshot, Tracker};
