//! Shared utilities (artifact discovery, display formatting).

pub mod format;
pub mod fs;
