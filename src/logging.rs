use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the global fmt subscriber. Level comes from `ATP_LOG_LEVEL`
/// (trace/debug/info/warn/error), INFO when unset or unrecognised.
pub fn init_tracing() {
    let level = std::env::var("ATP_LOG_LEVEL")
        .ok()
        .and_then(|raw| raw.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
