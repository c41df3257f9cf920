use std::borrow::Cow;

use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once; `RUST_LOG` overrides `filter`.
pub fn init_logger(test_name: &str, filter: &str) {
    let mut filter = Cow::Borrowed(filter);
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        filter = Cow::Owned(env);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).expect("tracing directives"))
        .with_test_writer()
        .try_init()
        .ok();

    tracing::info!("{test_name}");
}
