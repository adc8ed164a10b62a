//! vibessh: pick or resolve a node, then hand the terminal to ssh

pub mod commands;
pub mod output;
pub mod picker;
