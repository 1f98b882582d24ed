/// Logging setup for the humidity monitoring service
///
/// Library modules log through the `log` facade; binaries call `init` once
/// to install `env_logger`. The level defaults to `info` and follows
/// `RUST_LOG` when set (e.g. `RUST_LOG=humon_service=debug`).

use env_logger::Env;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the stderr logger. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let env = Env::default().default_filter_or(DEFAULT_FILTER);
    if env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .try_init()
        .is_err()
    {
        log::debug!("logger already initialized");
    }
}
