use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Минимальный интервал опроса состояния
pub const MIN_POLLING_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub watcher: WatcherConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatcherConfig {
    pub mode: String,
    pub polling_interval_ms: u64,
    /// Файл со снимком состояния приложения (TOML)
    pub state_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: String::new(),
            },
            watcher: WatcherConfig {
                mode: "polling".to_string(),
                polling_interval_ms: 250,
                state_path: PathBuf::from("state.toml"),
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(figment::providers::Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("CHANWATCH_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек наблюдателя
        match self.watcher.mode.as_str() {
            "polling" | "dry_run" => {}
            _ => anyhow::bail!("Неверный режим наблюдения: {}", self.watcher.mode),
        }

        if self.watcher.polling_interval_ms < MIN_POLLING_INTERVAL_MS {
            anyhow::bail!(
                "polling_interval_ms должно быть минимум {}",
                MIN_POLLING_INTERVAL_MS
            );
        }

        if self.watcher.mode == "polling" && self.watcher.state_path.as_os_str().is_empty() {
            anyhow::bail!("state_path не может быть пустым в режиме polling");
        }

        Ok(())
    }

    /// Директива для EnvFilter: уровень из CLI имеет приоритет над конфигурацией,
    /// `filter` дописывается к `level` как уточнение по модулям
    pub fn log_directive(&self, cli_level: Option<&str>) -> String {
        if let Some(level) = cli_level {
            return level.to_string();
        }

        if self.logging.filter.is_empty() {
            self.logging.level.clone()
        } else {
            format!("{},{}", self.logging.level, self.logging.filter)
        }
    }

    pub fn is_json_logging(&self) -> bool {
        self.logging.format == "json"
    }

    pub fn is_dry_run_mode(&self) -> bool {
        self.watcher.mode == "dry_run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_dry_run_mode());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.watcher.mode = "websocket".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.watcher.polling_interval_ms = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.watcher.state_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_state_path_allowed_in_dry_run() {
        let mut config = Config::default();
        config.watcher.mode = "dry_run".to_string();
        config.watcher.state_path = PathBuf::new();
        assert!(config.validate().is_ok());
        assert!(config.is_dry_run_mode());
    }

    #[test]
    fn test_load_merges_file_over_defaults() {
        let path = std::env::temp_dir().join(format!("chanwatch-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[watcher]\nmode = \"dry_run\"\npolling_interval_ms = 500\nstate_path = \"\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.watcher.polling_interval_ms, 500);
        assert!(config.is_dry_run_mode());
        assert_eq!(config.logging.level, "info");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_logging_settings_reach_directive() {
        let path = std::env::temp_dir().join(format!("chanwatch-logging-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[logging]\nlevel = \"debug\"\nformat = \"json\"\nfilter = \"figment=warn\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.log_directive(None), "debug,figment=warn");
        assert!(config.is_json_logging());

        // Явно переданный уровень из CLI важнее конфигурации
        assert_eq!(config.log_directive(Some("trace")), "trace");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_default_log_directive() {
        let config = Config::default();
        assert_eq!(config.log_directive(None), "info");
        assert!(!config.is_json_logging());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("chanwatch-config-does-not-exist.toml");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.watcher.mode, "polling");
    }
}
