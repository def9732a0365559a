use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the event filter: `RUST_LOG` when set, otherwise the given directives.
pub fn filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Installs the global subscriber writing to stderr. Later calls are no-ops.
pub fn init(default_directives: &str) {
    let _ = tracing_subscriber::registry()
        .with(filter(default_directives))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init("warn");
        init("debug");
        tracing::debug!("after init");
    }
}
