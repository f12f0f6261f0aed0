//! Health check handler.

/// Liveness probe.
///
/// Returns a plain `OK` without touching the database or any upstream
/// dependency.
pub async fn health_check() -> &'static str {
    "OK"
}
