//! CLI library components for wellmatch.

pub mod commands;
pub mod logging;
