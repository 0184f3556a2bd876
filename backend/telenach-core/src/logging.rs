use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,telenach_core=debug"));

    // try_init: a second call (tests, embedding hosts) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
