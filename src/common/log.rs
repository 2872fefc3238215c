//! Logging utilities
//!
//! Protocol traffic owns stdout, so log output always goes to stderr.

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level` when set. Calling this more
/// than once is harmless; later calls leave the first logger in place.
///
/// # Parameters
///
/// * `level` - Default log level (error, warn, info, debug, trace)
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .try_init();
}
