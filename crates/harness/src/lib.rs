pub mod shop;
pub mod sink;

pub use shop::{TestShop, palette};
pub use sink::RecordingSink;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a test-friendly subscriber once per process; `RUST_LOG` controls
/// the filter.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
