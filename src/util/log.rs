//! Verbosity levels and tracing setup.
//!
//! Build events come in four severities. They map onto tracing levels as:
//!
//! | severity | level   |
//! |----------|---------|
//! | error    | `ERROR` |
//! | warning  | `WARN`  |
//! | info     | `INFO`  |
//! | notice   | `DEBUG` |
//!
//! A verbosity of `n` shows every severity up to and including `n`.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// How much of the build log to show, from 0 (errors only) to 3 (notices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const ERROR: Verbosity = Verbosity(0);
    pub const WARNING: Verbosity = Verbosity(1);
    pub const INFO: Verbosity = Verbosity(2);
    pub const NOTICE: Verbosity = Verbosity(3);

    /// Create a verbosity, rejecting levels above 3.
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::NOTICE.0).then_some(Verbosity(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// The `EnvFilter` directive for this verbosity.
    ///
    /// The level applies to every target, so a host program's own events
    /// are filtered the same way as the engine's.
    pub fn directive(self) -> &'static str {
        match self.0 {
            0 => "error",
            1 => "warn",
            2 => "info",
            _ => "debug",
        }
    }

    pub fn filter(self) -> EnvFilter {
        EnvFilter::new(self.directive())
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::INFO
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .ok()
            .and_then(Verbosity::new)
            .ok_or_else(|| format!("invalid verbosity '{}'; expected 0, 1, 2 or 3", s))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity` when set. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| verbosity.filter());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_parse_verbosity() {
        assert_eq!("0".parse::<Verbosity>().unwrap(), Verbosity::ERROR);
        assert_eq!("3".parse::<Verbosity>().unwrap(), Verbosity::NOTICE);
        assert!("4".parse::<Verbosity>().is_err());
        assert!("loud".parse::<Verbosity>().is_err());
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(Verbosity::default(), Verbosity::INFO);
        assert_eq!(Verbosity::default().directive(), "info");
    }

    fn under<T>(verbosity: Verbosity, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(verbosity.filter());
        tracing::subscriber::with_default(subscriber, f)
    }

    #[test]
    fn test_filter_applies_to_host_targets() {
        under(Verbosity::NOTICE, || {
            assert!(tracing::enabled!(target: "build", Level::ERROR));
            assert!(tracing::enabled!(target: "build", Level::DEBUG));
            assert!(tracing::enabled!(target: "tbs::builder::engine", Level::DEBUG));
        });
        under(Verbosity::INFO, || {
            assert!(tracing::enabled!(target: "build", Level::INFO));
            assert!(!tracing::enabled!(target: "build", Level::DEBUG));
            assert!(!tracing::enabled!(target: "tbs::builder::engine", Level::DEBUG));
        });
        under(Verbosity::ERROR, || {
            assert!(tracing::enabled!(target: "build", Level::ERROR));
            assert!(!tracing::enabled!(target: "build", Level::WARN));
        });
    }
}
