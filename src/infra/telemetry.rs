use std::sync::Once;

use metrics::{Unit, describe_counter};
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
///
/// Intended for host applications and examples; libraries embedding brezza
/// usually bring their own subscriber, in which case only
/// [`describe_metrics`] matters.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let default_directive = logging.level.parse().map_err(|err| {
        InfraError::telemetry(format!("invalid log level `{}`: {err}", logging.level))
    })?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_directive)
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

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "brezza_cache_hit_total",
            Unit::Count,
            "Snapshot reads served from a fresh cached snapshot."
        );
        describe_counter!(
            "brezza_cache_miss_total",
            Unit::Count,
            "Snapshot reads that found no cached snapshot."
        );
        describe_counter!(
            "brezza_cache_stale_total",
            Unit::Count,
            "Snapshots marked stale by tag invalidation or refetched on read."
        );
        describe_counter!(
            "brezza_mutation_rollback_total",
            Unit::Count,
            "Optimistic patches reverted after a failed mutation."
        );
    });
}
