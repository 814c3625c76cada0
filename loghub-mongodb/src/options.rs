//! Options for the MongoDB logging backend.

use config::Config;

use loghub_core::error::{LogError, LogResult};
use loghub_core::level::LogLevel;
use loghub_core::options::{ConfigSection, LoggerOptions};

/// Configuration section the adapter reads its options from.
pub const CONFIG_SECTION: &str = "loghub.mongodb";

/// Default collection name.
pub const DEFAULT_COLLECTION_NAME: &str = "logs";
/// Default capped-collection size bound, in bytes.
pub const DEFAULT_MAX_SIZE: u64 = 100_000_000;
/// Default capped-collection document-count bound.
pub const DEFAULT_MAX_DOCUMENTS: u64 = 1_000;

/// Options for [`MongoLogger`](crate::MongoLogger).
///
/// Capped sizing bounds take effect only together with `capped = true`, and
/// only at collection creation time; MongoDB does not let them change once
/// the collection exists.
#[derive(Debug, Clone, PartialEq)]
pub struct MongoLoggerOptions {
    /// Connection URL of the form `mongodb://host:port/DatabaseName`. The
    /// database name segment is required.
    pub database_url: Option<String>,
    /// Name of the target collection. Default is `"logs"`.
    pub collection_name: String,
    /// Whether to create the collection capped. Default is false.
    pub capped: bool,
    /// Max total size in bytes of a created capped collection. Default is
    /// 100,000,000 bytes.
    pub max_size: u64,
    /// Max number of documents of a created capped collection. Default is
    /// 1,000 documents.
    pub max_documents: u64,
    /// Minimum level accepted on the hub path. Default is `Trace`.
    pub log_level: LogLevel,
    /// Defer connection checks and collection provisioning until first use.
    /// Default is false.
    pub on_demand: bool,
}

impl Default for MongoLoggerOptions {
    fn default() -> Self {
        Self {
            database_url: None,
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            capped: false,
            max_size: DEFAULT_MAX_SIZE,
            max_documents: DEFAULT_MAX_DOCUMENTS,
            log_level: LogLevel::Trace,
            on_demand: false,
        }
    }
}

impl MongoLoggerOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options by mutating the defaults.
    ///
    /// ```ignore
    /// let options = MongoLoggerOptions::with(|options| {
    ///     options.database_url = Some("mongodb://localhost:27017/observability".into());
    ///     options.capped = true;
    /// });
    /// ```
    pub fn with(mutate: impl FnOnce(&mut Self)) -> Self {
        let mut options = Self::default();
        mutate(&mut options);
        options
    }

    /// Resolves options from the hosting configuration's
    /// [`CONFIG_SECTION`] section.
    pub fn from_configuration(configuration: &Config) -> LogResult<Self> {
        let mut options = Self::default();
        options.read_from_configuration(configuration)?;
        Ok(options)
    }

    /// Checks the resolved options before any database interaction.
    ///
    /// A capped collection with a zero bound would be rejected by the server
    /// at creation time, long after resolution; failing here keeps
    /// configuration mistakes at the construction boundary. Sizing bounds set
    /// without `capped` stay a no-op for compatibility, surfaced as a
    /// warning.
    pub(crate) fn validate(&self) -> LogResult<()> {
        if self.capped {
            if self.max_size == 0 || self.max_documents == 0 {
                return Err(LogError::InvalidOptions(
                    "a capped collection requires positive `max_size` and `max_documents`".into(),
                ));
            }
        } else if self.max_size != DEFAULT_MAX_SIZE || self.max_documents != DEFAULT_MAX_DOCUMENTS {
            tracing::warn!(
                max_size = self.max_size,
                max_documents = self.max_documents,
                "capped sizing bounds are set but `capped` is false; they will be ignored"
            );
        }
        Ok(())
    }
}

impl LoggerOptions for MongoLoggerOptions {
    fn log_level(&self) -> LogLevel {
        self.log_level
    }

    fn on_demand(&self) -> bool {
        self.on_demand
    }

    fn read_from_configuration(&mut self, configuration: &Config) -> LogResult<()> {
        let section = ConfigSection::open(configuration, CONFIG_SECTION)?;

        if let Some(log_level) = section.level("log_level")? {
            self.log_level = log_level;
        }
        if let Some(on_demand) = section.boolean("on_demand")? {
            self.on_demand = on_demand;
        }
        if let Some(database_url) = section.string("database_url")? {
            self.database_url = Some(database_url);
        }
        if let Some(collection_name) = section.string("collection_name")? {
            self.collection_name = collection_name;
        }
        if let Some(capped) = section.boolean("capped")? {
            self.capped = capped;
        }
        if let Some(max_size) = section.integer("max_size")? {
            self.max_size = unsigned(&section, "max_size", max_size)?;
        }
        if let Some(max_documents) = section.integer("max_documents")? {
            self.max_documents = unsigned(&section, "max_documents", max_documents)?;
        }

        Ok(())
    }
}

fn unsigned(section: &ConfigSection, key: &str, value: i64) -> LogResult<u64> {
    u64::try_from(value).map_err(|_| {
        LogError::Configuration(format!(
            "`{}.{key}` must be a non-negative integer, got `{value}`",
            section.path()
        ))
    })
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
    fn defaults_match_the_documented_contract() {
        let options = MongoLoggerOptions::default();
        assert_eq!(options.collection_name, "logs");
        assert!(!options.capped);
        assert_eq!(options.max_size, 100_000_000);
        assert_eq!(options.max_documents, 1_000);
        assert_eq!(options.log_level, LogLevel::Trace);
        assert!(!options.on_demand);
        assert!(options.database_url.is_none());
    }

    #[test]
    fn mutator_construction_touches_only_named_fields() {
        let options = MongoLoggerOptions::with(|options| {
            options.collection_name = "audit".into();
        });
        assert_eq!(options.collection_name, "audit");
        assert_eq!(options.max_documents, DEFAULT_MAX_DOCUMENTS);
    }

    #[test]
    fn configuration_overrides_every_recognized_key() {
        let cfg = configuration(
            r#"
            [loghub.mongodb]
            log_level = "3"
            on_demand = "true"
            database_url = "mongodb://db:27017/observability"
            collection_name = "audit"
            capped = "true"
            max_size = "4096"
            max_documents = "64"
            "#,
        );
        let options = MongoLoggerOptions::from_configuration(&cfg).unwrap();
        assert_eq!(options.log_level, LogLevel::Warning);
        assert!(options.on_demand);
        assert_eq!(
            options.database_url.as_deref(),
            Some("mongodb://db:27017/observability")
        );
        assert_eq!(options.collection_name, "audit");
        assert!(options.capped);
        assert_eq!(options.max_size, 4096);
        assert_eq!(options.max_documents, 64);
    }

    #[test]
    fn missing_keys_keep_prior_values() {
        let cfg = configuration("[loghub.mongodb]\ncollection_name = \"audit\"\n");
        let mut options = MongoLoggerOptions::with(|options| {
            options.database_url = Some("mongodb://prior:27017/kept".into());
        });
        options.read_from_configuration(&cfg).unwrap();
        assert_eq!(
            options.database_url.as_deref(),
            Some("mongodb://prior:27017/kept")
        );
        assert_eq!(options.collection_name, "audit");
    }

    #[test]
    fn missing_section_fails_resolution() {
        let cfg = configuration("[loghub.console]\nlog_level = \"2\"\n");
        let err = MongoLoggerOptions::from_configuration(&cfg).unwrap_err();
        assert!(matches!(err, LogError::Configuration(_)));
    }

    #[test]
    fn malformed_values_fail_resolution() {
        let cfg = configuration("[loghub.mongodb]\ncapped = \"definitely\"\n");
        assert!(MongoLoggerOptions::from_configuration(&cfg).is_err());

        let cfg = configuration("[loghub.mongodb]\nmax_size = \"-5\"\n");
        assert!(MongoLoggerOptions::from_configuration(&cfg).is_err());
    }

    #[test]
    fn capped_requires_positive_bounds() {
        let options = MongoLoggerOptions::with(|options| {
            options.capped = true;
            options.max_documents = 0;
        });
        assert!(matches!(
            options.validate(),
            Err(LogError::InvalidOptions(_))
        ));

        let options = MongoLoggerOptions::with(|options| {
            options.capped = true;
            options.max_size = 1_000;
            options.max_documents = 10;
        });
        assert!(options.validate().is_ok());
    }

    #[test]
    fn uncapped_sizing_is_tolerated() {
        // Ignored by the server, warned about here, but never an error.
        let options = MongoLoggerOptions::with(|options| {
            options.max_size = 1;
        });
        assert!(options.validate().is_ok());
    }
}
