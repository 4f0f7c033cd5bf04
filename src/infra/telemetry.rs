use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "aula_sync_insert_total",
            Unit::Count,
            "Total number of rows inserted by lesson-tree reconciliation."
        );
        describe_counter!(
            "aula_sync_update_total",
            Unit::Count,
            "Total number of rows updated by lesson-tree reconciliation."
        );
        describe_counter!(
            "aula_sync_delete_total",
            Unit::Count,
            "Total number of rows deleted by keep-set reconciliation."
        );
        describe_counter!(
            "aula_draft_write_total",
            Unit::Count,
            "Total number of draft snapshots written to either location."
        );
        describe_counter!(
            "aula_draft_skip_total",
            Unit::Count,
            "Total number of draft write cycles skipped due to storage errors."
        );
        describe_counter!(
            "aula_quiz_completion_total",
            Unit::Count,
            "Total number of quiz completion facts recorded."
        );
        describe_histogram!(
            "aula_sync_save_ms",
            Unit::Milliseconds,
            "Lesson-tree reconciliation latency in milliseconds."
        );
    });
}
