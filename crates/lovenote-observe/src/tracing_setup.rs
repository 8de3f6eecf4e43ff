//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! // Warnings and errors only, `RUST_LOG` may override
//! lovenote_observe::tracing_setup::init_tracing("warn", false).unwrap();
//!
//! // Debug logging for the workspace crates, spans exported to stdout
//! lovenote_observe::tracing_setup::init_tracing("info,lovenote=debug", true).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Map the CLI verbosity flags to a default filter directive.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,lovenote=debug,lovenote_core=debug,lovenote_infra=debug",
        _ => "trace",
    }
}

/// Initialize the global tracing subscriber.
///
/// - Installs a `fmt` layer writing to stderr so `--json` output on stdout
///   stays clean.
/// - `RUST_LOG` wins over `default_directive` when set.
/// - When `enable_otel` is true, tracing spans are bridged to OpenTelemetry
///   with a stdout exporter.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set or if
/// the directive cannot be parsed.
pub fn init_tracing(
    default_directive: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.trim().is_empty() => EnvFilter::try_new(from_env)?,
        _ => EnvFilter::try_new(default_directive)?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("lovenote");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// No-op when OTel was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_by_verbosity() {
        assert_eq!(default_directive(0, true), "error");
        assert_eq!(default_directive(0, false), "warn");
        assert!(default_directive(1, false).contains("lovenote_core=debug"));
        assert_eq!(default_directive(3, false), "trace");
    }

    #[test]
    fn test_directives_parse() {
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(default_directive(verbose, false)).is_ok());
        }
    }
}
