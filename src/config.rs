use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the dataset lives and how big its matrices are.
///
/// Matrix dimensions are only ever defaulted here; the loaders take them as
/// explicit arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Directory containing the `.dat` files.
    pub data_folder: PathBuf,
    #[serde(default = "default_num_users")]
    pub num_users: usize,
    #[serde(default = "default_num_articles")]
    pub num_articles: usize,
    /// Size of the tag vocabulary; when set, article tag ids are bounds-checked.
    #[serde(default)]
    pub num_tags: Option<usize>,
    #[serde(default = "default_likes_file")]
    pub likes_file: String,
    #[serde(default = "default_citations_file")]
    pub citations_file: String,
    #[serde(default = "default_tags_file")]
    pub tags_file: String,
    #[serde(default = "default_item_tags_file")]
    pub item_tags_file: String,
}

/// Recall@M evaluation settings
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    #[serde(default = "default_m")]
    pub m: usize,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Log progress every N rows; 0 turns progress logging off.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            m: default_m(),
            parallel: default_parallel(),
            progress_every: default_progress_every(),
        }
    }
}

fn default_num_users() -> usize {
    5551
}

fn default_num_articles() -> usize {
    13584
}

fn default_likes_file() -> String {
    "train_data.dat".to_string()
}

fn default_citations_file() -> String {
    "citations.dat".to_string()
}

fn default_tags_file() -> String {
    "tags.dat".to_string()
}

fn default_item_tags_file() -> String {
    "item-tag.dat".to_string()
}

fn default_m() -> usize {
    50
}

fn default_parallel() -> bool {
    true
}

fn default_progress_every() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in CITEVAL_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("CITEVAL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::load_from(&config_path)
    }

    /// Load and validate a specific config file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let folder = &self.dataset.data_folder;
        if !folder.exists() {
            anyhow::bail!(
                "data_folder path does not exist: {}. Set dataset.data_folder in config.toml.",
                folder.display()
            );
        }

        if !folder.is_dir() {
            anyhow::bail!("data_folder must be a directory, not a file: {}", folder.display());
        }

        if self.dataset.num_users == 0 || self.dataset.num_articles == 0 {
            anyhow::bail!("dataset.num_users and dataset.num_articles must be greater than 0");
        }

        if self.dataset.num_tags == Some(0) {
            anyhow::bail!("dataset.num_tags must be greater than 0 when set");
        }

        if self.eval.m == 0 {
            anyhow::bail!("eval.m must be greater than 0");
        }

        Ok(())
    }

    /// Get the dataset directory
    pub fn data_folder(&self) -> &Path {
        &self.dataset.data_folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn folder_str(temp_dir: &TempDir) -> String {
        let folder = temp_dir.path().canonicalize().unwrap();
        folder.to_str().unwrap().replace('\\', "\\\\")
    }

    fn write_config(temp_dir: &TempDir, body: &str) -> PathBuf {
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_applied() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            &format!("[dataset]\ndata_folder = \"{}\"\n", folder_str(&temp_dir)),
        );
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.dataset.num_users, 5551);
        assert_eq!(config.dataset.num_articles, 13584);
        assert_eq!(config.dataset.likes_file, "train_data.dat");
        assert_eq!(config.dataset.num_tags, None);
        assert_eq!(config.eval.m, 50);
        assert!(config.eval.parallel);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            &format!(
                r#"
log_level = "debug"

[dataset]
data_folder = "{}"
num_users = 10
num_articles = 20
num_tags = 5
citations_file = "cites.txt"

[eval]
m = 3
parallel = false
progress_every = 0
"#,
                folder_str(&temp_dir)
            ),
        );
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.dataset.num_users, 10);
        assert_eq!(config.dataset.num_tags, Some(5));
        assert_eq!(config.dataset.citations_file, "cites.txt");
        assert_eq!(config.eval.m, 3);
        assert!(!config.eval.parallel);
        assert_eq!(config.eval.progress_every, 0);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_zero_m_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            &format!(
                "[dataset]\ndata_folder = \"{}\"\n[eval]\nm = 0\n",
                folder_str(&temp_dir)
            ),
        );
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("eval.m"));
    }

    #[test]
    fn test_missing_data_folder_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[dataset]\ndata_folder = \"/definitely/not/here\"\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_load_uses_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            &format!(
                "[dataset]\ndata_folder = \"{}\"\nnum_users = 7\n",
                folder_str(&temp_dir)
            ),
        );
        let original = std::env::var("CITEVAL_CONFIG").ok();
        std::env::set_var("CITEVAL_CONFIG", path.to_str().unwrap());
        let config = Config::load();
        std::env::remove_var("CITEVAL_CONFIG");
        if let Some(v) = original {
            std::env::set_var("CITEVAL_CONFIG", v);
        }
        assert_eq!(config.unwrap().dataset.num_users, 7);
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("CITEVAL_CONFIG").ok();
        std::env::set_var("CITEVAL_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("CITEVAL_CONFIG");
        if let Some(v) = original {
            std::env::set_var("CITEVAL_CONFIG", v);
        }
    }
}
