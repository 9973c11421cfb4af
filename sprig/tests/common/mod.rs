use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
