use tracing_subscriber::EnvFilter;

/// Verbosity level for diagnostic logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Errors only
    Silent = 0,
    /// Warnings about suspicious catalogs (default)
    Normal = 1,
    /// Fallbacks, skipped elements and loaded files
    Verbose = 2,
}

impl VerbosityLevel {
    /// From the `-q` flag and the number of `-v` flags
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => VerbosityLevel::Silent,
            (false, 0) => VerbosityLevel::Normal,
            (false, _) => VerbosityLevel::Verbose,
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            VerbosityLevel::Silent => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flags when set.
pub fn init_logging(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    // A subscriber may already be installed, e.g. by a test harness
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
    fn test_verbosity_from_flags() {
        assert_eq!(VerbosityLevel::from_flags(false, 0), VerbosityLevel::Normal);
        assert_eq!(VerbosityLevel::from_flags(false, 2), VerbosityLevel::Verbose);
        assert_eq!(VerbosityLevel::from_flags(true, 3), VerbosityLevel::Silent);
        assert!(VerbosityLevel::Verbose > VerbosityLevel::Normal);
    }

    #[test]
    fn test_directives() {
        assert_eq!(VerbosityLevel::Silent.directive(), "error");
        assert_eq!(VerbosityLevel::Normal.directive(), "warn");
        assert_eq!(VerbosityLevel::Verbose.directive(), "debug");
    }
}
