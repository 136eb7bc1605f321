/// URL for accessing the PostgreSQL database holding the todos table
pub const DB_URL: &str = "DATABASE_URL";
/// Port the HTTP server listens on. Defaults to 8080 when unset.
pub const SERVER_PORT: &str = "SERVER_PORT";
/// Log level configuration for the application. Accepts the same per-module directive
/// syntax as [tracing_subscriber::EnvFilter].
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Typically http://localhost:4317 when an OpenTelemetry
/// collector sidecar is present. Span/metric export stays off unless both export URLs are set.
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL, usually the same collector endpoint as the span export URL
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";
