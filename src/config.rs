/// Configuration management for the WordNet SAP tool
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    pub synsets_path: PathBuf,
    pub hypernyms_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// `text` or `json`
    pub format: String,
    /// Include the vertex paths up to the ancestor in vertex-level answers
    pub show_paths: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

const DEFAULT_SYNSETS: &str = "synsets.txt";
const DEFAULT_HYPERNYMS: &str = "hypernyms.txt";
const DEFAULT_FORMAT: &str = "text";
const DEFAULT_LOG_LEVEL: &str = "info";

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataSettings {
                synsets_path: PathBuf::from(DEFAULT_SYNSETS),
                hypernyms_path: PathBuf::from(DEFAULT_HYPERNYMS),
            },
            output: OutputSettings {
                format: DEFAULT_FORMAT.to_string(),
                show_paths: false,
            },
            logging: LoggingSettings {
                level: DEFAULT_LOG_LEVEL.to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields with `WORDNET_SAP_*` environment variables when present
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("WORDNET_SAP_SYNSETS") {
            self.data.synsets_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("WORDNET_SAP_HYPERNYMS") {
            self.data.hypernyms_path = PathBuf::from(path);
        }

        if let Ok(format) = std::env::var("WORDNET_SAP_OUTPUT_FORMAT") {
            self.output.format = format;
        }

        if let Ok(show_paths) = std::env::var("WORDNET_SAP_SHOW_PATHS") {
            self.output.show_paths = show_paths.parse()?;
        }

        if let Ok(level) = std::env::var("WORDNET_SAP_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge_with(&mut self, other: Config) {
        if other.data.synsets_path != Path::new(DEFAULT_SYNSETS) {
            self.data.synsets_path = other.data.synsets_path;
        }
        if other.data.hypernyms_path != Path::new(DEFAULT_HYPERNYMS) {
            self.data.hypernyms_path = other.data.hypernyms_path;
        }

        if other.output.format != DEFAULT_FORMAT {
            self.output.format = other.output.format;
        }
        self.output.show_paths = other.output.show_paths;

        if other.logging.level != DEFAULT_LOG_LEVEL {
            self.logging.level = other.logging.level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.data.synsets_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Synsets path must not be empty"));
        }

        if self.data.hypernyms_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Hypernyms path must not be empty"));
        }

        match self.output.format.to_lowercase().as_str() {
            "text" | "json" => {}
            other => return Err(anyhow::anyhow!("Unsupported output format '{}'", other)),
        }

        if self.logging.level.trim().is_empty() {
            return Err(anyhow::anyhow!("Log level must not be empty"));
        }

        Ok(())
    }
}
