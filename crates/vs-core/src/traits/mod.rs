//! Core traits for vibessh

mod source;

pub use source::NodeSource;
