use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
///
/// Returns `false` when a global subscriber was already set.
#[must_use]
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_existing_subscriber() {
        let _ = init_tracing();
        assert!(!init_tracing());
    }
}
