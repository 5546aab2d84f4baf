use lkit_config::HarnessConfig;
use tracing::Level;

/// Install a test-friendly fmt subscriber: debug level when the harness
/// config asks for debug output, warnings only otherwise.
///
/// Returns `false` if a global subscriber was already installed, which is
/// the normal case for every test after the first in a binary.
pub fn init_logging(config: &HarnessConfig) -> bool {
    let level = if config.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_test_writer()
        .try_init()
        .is_ok()
}
