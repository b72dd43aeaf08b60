/// Initialize the logger with the specified verbosity level
///
/// Lifecycle progress is logged at info level, so that is the default.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=info, 1=debug, 2+=trace)
pub fn setup_logger(verbose: u8) {
    let env_filter = match verbose {
        0 => "keycloak_local=info,keycloak=info",
        1 => "keycloak_local=debug,keycloak=info",
        _ => "keycloak_local=trace,keycloak=trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(env_filter))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}
