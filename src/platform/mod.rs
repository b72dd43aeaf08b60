//! Platform-specific helpers for the rest of the crate.
//!
//! Launcher naming, file permission handling and process signalling differ
//! between Unix and Windows; everything that branches on the target lives
//! here.

pub mod file_ops;
pub mod process;

mod constants;

pub use constants::launcher_script_name;
