use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub path: String,
    /// Create a handful of demo accounts and posts on an empty database
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub search: Search,
    pub session: Session,
    pub security: Security,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Try to load from settings.toml (optional for deployment)
        let config_file_name = "settings.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in hultagram-server directory (for development)
        let dev_path = PathBuf::from("hultagram-server").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        builder = Self::with_defaults(builder)?;

        // 2. Override with environment variables (highest priority)
        let overrides = [
            ("DATABASE_PATH", "database.path"),
            ("SEED_DEMO_DATA", "database.seed_demo_data"),
            ("PORT", "server.port"),
            ("HOST", "server.host"),
            ("SEARCH_CASE_SENSITIVE", "search.case_sensitive"),
            ("SESSION_TTL_DAYS", "session.ttl_days"),
            ("BCRYPT_COST", "security.bcrypt_cost"),
        ];
        for (var, key) in overrides {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "hultagram.db")?
            .set_default("database.seed_demo_data", false)?
            .set_default("search.case_sensitive", false)?
            .set_default("session.ttl_days", crate::session::DEFAULT_SESSION_TTL_DAYS)?
            .set_default("security.bcrypt_cost", bcrypt::DEFAULT_COST as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let settings: Settings = Settings::with_defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.database.path, "hultagram.db");
        assert!(!settings.database.seed_demo_data);
        assert!(!settings.search.case_sensitive);
        assert_eq!(settings.session.ttl_days, 30);
        assert_eq!(settings.security.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_string_overrides_coerce() {
        let settings: Settings = Settings::with_defaults(Config::builder())
            .unwrap()
            .set_override("search.case_sensitive", "true")
            .unwrap()
            .set_override("server.port", "8080")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.search.case_sensitive);
        assert_eq!(settings.server.port, 8080);
    }
}
