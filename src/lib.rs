pub mod config;
pub mod error;
pub mod process;
pub mod record;
pub mod report;
pub mod rules;
pub mod schema;
pub mod verify;

pub use config::{CleanConfig, DedupKey, QuantityPolicy};
pub use error::RecordError;
pub use process::{clean_and_deduplicate, clean_with_config, CleanOutcome};
pub use record::{CleanRecord, OrderId, RawRecord};

/// Route `tracing` output to the test harness. Safe to call from every test.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ordercleaner=debug")),
        )
        .with_test_writer()
        .finish();
    // Already set by an earlier test.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
