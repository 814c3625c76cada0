//! Shared option semantics and configuration lookup.
//!
//! Every backend's options carry a minimum log level and an on-demand flag,
//! and can be resolved from the hosting key/value configuration. Resolution
//! is all-or-nothing: a missing section or a malformed value fails before any
//! database interaction, while a key merely absent from its section leaves
//! the prior value in place.

use config::{Config, Map, Value};

use crate::error::{LogError, LogResult};
use crate::level::LogLevel;

/// The option contract shared by every logging backend.
pub trait LoggerOptions {
    /// Minimum level this backend accepts on the hub path.
    fn log_level(&self) -> LogLevel;

    /// Whether expensive setup (connection, collection provisioning) is
    /// deferred until first use instead of running at construction.
    fn on_demand(&self) -> bool;

    /// Overrides these options from the hosting configuration.
    ///
    /// The backend's configuration section must exist; individual keys within
    /// it are optional. Exactly one of configuration-driven or code-driven
    /// options applies per adapter instance.
    fn read_from_configuration(&mut self, configuration: &Config) -> LogResult<()>;
}

/// A required section of the hosting configuration, with typed key lookup.
///
/// Values are read back from their string form, so `capped = "true"` and
/// `capped = true` resolve identically; a value that does not parse fails the
/// whole resolution.
#[derive(Debug, Clone)]
pub struct ConfigSection {
    path: String,
    values: Map<String, Value>,
}

impl ConfigSection {
    /// Opens the section at `path` (dotted-key syntax, e.g.
    /// `"loghub.mongodb"`).
    ///
    /// A missing section is a fatal [`LogError::Configuration`]: an adapter
    /// asked to configure itself from the application configuration must not
    /// silently run on implicit defaults.
    pub fn open(configuration: &Config, path: &str) -> LogResult<Self> {
        let values = configuration.get_table(path).map_err(|err| {
            LogError::Configuration(format!(
                "required configuration section `{path}` could not be read: {err}"
            ))
        })?;
        Ok(Self {
            path: path.to_string(),
            values,
        })
    }

    /// The dotted path this section was opened at.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn raw(&self, key: &str) -> LogResult<Option<String>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => value.clone().into_string().map(Some).map_err(|err| {
                LogError::Configuration(format!("`{}.{}` is not readable: {err}", self.path, key))
            }),
        }
    }

    /// Reads a string value, `None` when the key is absent.
    pub fn string(&self, key: &str) -> LogResult<Option<String>> {
        self.raw(key)
    }

    /// Reads and parses a boolean value, `None` when the key is absent.
    pub fn boolean(&self, key: &str) -> LogResult<Option<bool>> {
        match self.raw(key)? {
            None => Ok(None),
            Some(raw) => raw.parse::<bool>().map(Some).map_err(|_| {
                LogError::Configuration(format!(
                    "`{}.{}` must be a boolean, got `{raw}`",
                    self.path, key
                ))
            }),
        }
    }

    /// Reads and parses an integer value, `None` when the key is absent.
    pub fn integer(&self, key: &str) -> LogResult<Option<i64>> {
        match self.raw(key)? {
            None => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
                LogError::Configuration(format!(
                    "`{}.{}` must be an integer, got `{raw}`",
                    self.path, key
                ))
            }),
        }
    }

    /// Reads a log level given as its integer ordinal, `None` when absent.
    pub fn level(&self, key: &str) -> LogResult<Option<LogLevel>> {
        match self.integer(key)? {
            None => Ok(None),
            Some(ordinal) => LogLevel::from_ordinal(ordinal).map(Some).ok_or_else(|| {
                LogError::Configuration(format!(
                    "`{}.{}` must be a log level ordinal between 0 and 5, got `{ordinal}`",
                    self.path, key
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn configuration(toml: &str) -> Config {
        Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
    }

    #[test]
    fn missing_section_is_fatal() {
        let cfg = configuration("[other.section]\nkey = 1\n");
        let err = ConfigSection::open(&cfg, "loghub.test").unwrap_err();
        assert!(matches!(err, LogError::Configuration(_)));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let cfg = configuration("[loghub.test]\npresent = \"yes\"\n");
        let section = ConfigSection::open(&cfg, "loghub.test").unwrap();
        assert_eq!(section.string("present").unwrap().as_deref(), Some("yes"));
        assert_eq!(section.string("absent").unwrap(), None);
    }

    #[test]
    fn scalars_parse_from_string_form() {
        let cfg = configuration("[loghub.test]\ncapped = \"true\"\nmax_size = \"1000\"\n");
        let section = ConfigSection::open(&cfg, "loghub.test").unwrap();
        assert_eq!(section.boolean("capped").unwrap(), Some(true));
        assert_eq!(section.integer("max_size").unwrap(), Some(1000));
    }

    #[test]
    fn malformed_scalars_fail_resolution() {
        let cfg = configuration("[loghub.test]\ncapped = \"yep\"\nmax_size = \"lots\"\n");
        let section = ConfigSection::open(&cfg, "loghub.test").unwrap();
        assert!(section.boolean("capped").is_err());
        assert!(section.integer("max_size").is_err());
    }

    #[test]
    fn levels_resolve_from_ordinals() {
        let cfg = configuration("[loghub.test]\nlog_level = \"3\"\nbad = \"9\"\n");
        let section = ConfigSection::open(&cfg, "loghub.test").unwrap();
        assert_eq!(section.level("log_level").unwrap(), Some(LogLevel::Warning));
        assert!(section.level("bad").is_err());
    }
}
