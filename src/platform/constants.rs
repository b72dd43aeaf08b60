//! Platform-specific constants and utility functions.

/// Name of the distribution's own launcher script, reported to the server as
/// `program.name`.
pub fn launcher_script_name() -> &'static str {
    #[cfg(windows)]
    return "kc.bat";
    #[cfg(not(windows))]
    return "kc.sh";
}
