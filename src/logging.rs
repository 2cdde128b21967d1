use tracing_subscriber::EnvFilter;

/// Diagnostics level for a `-v` count. Operator messages go through
/// `OutputFormatter`, so the default only lets errors through.
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "off";
    }

    match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Install the stderr fmt subscriber. `RUST_LOG`, when set, wins over `-v`.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("extract_text={}", level_for(verbose, quiet)))
    });

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0, false), "error");
        assert_eq!(level_for(1, false), "warn");
        assert_eq!(level_for(3, false), "debug");
        assert_eq!(level_for(9, false), "trace");
        assert_eq!(level_for(3, true), "off");
    }

    #[test]
    fn test_init_is_repeatable() {
        init_logging(0, true);
        init_logging(2, false);
    }
}
