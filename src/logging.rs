use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["kgate", "kgate_kinetics", "kgate_msm"];

/// Maps a `-v` count to a level name.
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the `target=level,...` directive string for the workspace crates.
fn default_directives(verbosity: u8) -> String {
    let level = level_for(verbosity);
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing based on CLI verbosity level.
///
/// `RUST_LOG` overrides the flag if set. Logs go to stderr so JSON on
/// stdout stays clean.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(7), "trace");
    }

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            default_directives(2),
            "kgate=debug,kgate_kinetics=debug,kgate_msm=debug"
        );
    }
}
