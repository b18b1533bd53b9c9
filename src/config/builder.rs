use std::path::{Path, PathBuf};

use super::definition::Configuration;
use super::file::load_config_file;
use super::ConfigError;

/// Environment variable overriding the feature config file name.
pub const FEATURES_CONFIG_ENV: &str = "FEATURES_CONFIG";

/// File names tried in each search directory when no override is set.
pub const DEFAULT_FILE_NAMES: [&str; 2] = ["features.toml", "features.json"];

/// Dotfolder under the home directory searched after the working directory.
pub const HOME_CONFIG_DIR: &str = ".di";

/// Locates and loads the feature configuration document.
///
/// Directories are searched in registration order and, within each directory,
/// file names in registration order. The first file that exists is loaded;
/// later candidates are never consulted, even if the first fails to parse.
///
/// ## Default search
///
/// 1. `./features.toml`, `./features.json`
/// 2. `~/.di/features.toml`, `~/.di/features.json`
///
/// Setting `FEATURES_CONFIG` replaces the file names with its value. An
/// absolute value names the file directly.
///
/// ## Example
///
/// ```no_run
/// use di_locator::ConfigLoader;
///
/// let config = ConfigLoader::builder()
///     .with_dir("/etc/myapp")
///     .with_file_name("features.toml")
///     .load()?;
/// # Ok::<(), di_locator::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "loaders do nothing until .load() is called"]
pub struct ConfigLoader {
    dirs: Vec<PathBuf>,
    file_names: Vec<String>,
}

impl ConfigLoader {
    /// Creates an empty loader with no search directories or file names.
    pub fn builder() -> Self {
        Self::default()
    }

    /// The standard search: working directory, then `~/.di`, honouring `FEATURES_CONFIG`.
    pub fn standard() -> Self {
        let mut loader = Self::builder();
        if let Ok(cwd) = std::env::current_dir() {
            loader = loader.with_dir(cwd);
        }
        if let Some(home) = home_config_dir() {
            loader = loader.with_dir(home);
        }
        match std::env::var(FEATURES_CONFIG_ENV) {
            Ok(name) if !name.is_empty() => loader.with_file_name(name),
            _ => DEFAULT_FILE_NAMES
                .iter()
                .fold(loader, |loader, name| loader.with_file_name(*name)),
        }
    }

    /// Adds a directory to search.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a file name to look for in each directory.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_names.push(name.into());
        self
    }

    /// Candidate paths in search order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.dirs
            .iter()
            .flat_map(|dir| self.file_names.iter().map(move |name| dir.join(name)))
            .collect()
    }

    /// Loads the first candidate that exists.
    pub fn load(self) -> Result<Configuration, ConfigError> {
        let candidates = self.candidates();

        for path in &candidates {
            tracing::debug!(path = %path.display(), "looking for feature config");
            if let Some(config) = load_config_file(path)? {
                tracing::info!(
                    path = %path.display(),
                    features = config.features().len(),
                    "loaded feature config"
                );
                return Ok(config);
            }
        }

        Err(ConfigError::NotFound {
            file_name: self.file_names.join(" | "),
            searched: candidates,
        })
    }
}

/// `~/.di`, if a home directory can be determined.
pub fn home_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(HOME_CONFIG_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CLOCK: &str = r#"
        version = 1
        [features.clock]
        factory = "time.SystemClock"
        implements = "time.Clock"
    "#;

    const FIXED_CLOCK: &str = r#"
        version = 1
        [features.clock]
        factory = "time.FixedClock"
        implements = "time.Clock"
    "#;

    fn factory_of(config: &Configuration) -> &str {
        &config.feature_default("clock").unwrap().factory_ref
    }

    #[test]
    fn test_first_directory_wins() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(cwd.path().join("features.toml"), CLOCK).unwrap();
        fs::write(home.path().join("features.toml"), FIXED_CLOCK).unwrap();

        let config = ConfigLoader::builder()
            .with_dir(cwd.path())
            .with_dir(home.path())
            .with_file_name("features.toml")
            .load()
            .unwrap();
        assert_eq!(factory_of(&config), "time.SystemClock");
    }

    #[test]
    fn test_falls_back_to_later_directory() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("features.toml"), FIXED_CLOCK).unwrap();

        let config = ConfigLoader::builder()
            .with_dir(cwd.path())
            .with_dir(home.path())
            .with_file_name("features.toml")
            .load()
            .unwrap();
        assert_eq!(factory_of(&config), "time.FixedClock");
    }

    #[test]
    fn test_file_name_order_within_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("features.json"),
            r#"{"version": 1, "features": {"clock": {"factory": "time.JsonClock", "implements": "time.Clock"}}}"#,
        )
        .unwrap();

        let loader = ConfigLoader::builder()
            .with_dir(dir.path())
            .with_file_name("features.toml")
            .with_file_name("features.json");
        assert_eq!(loader.candidates().len(), 2);

        let config = loader.load().unwrap();
        assert_eq!(factory_of(&config), "time.JsonClock");
    }

    #[test]
    fn test_not_found_lists_searched_paths() {
        let dir = TempDir::new().unwrap();
        let result = ConfigLoader::builder()
            .with_dir(dir.path())
            .with_file_name("features.toml")
            .load();

        match result {
            Err(ConfigError::NotFound { searched, .. }) => {
                assert_eq!(searched, vec![dir.path().join("features.toml")]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_first_file_is_format_error() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(cwd.path().join("features.toml"), "version = 1\nfeatures = 7\n").unwrap();
        fs::write(home.path().join("features.toml"), CLOCK).unwrap();

        let result = ConfigLoader::builder()
            .with_dir(cwd.path())
            .with_dir(home.path())
            .with_file_name("features.toml")
            .load();
        assert!(result.unwrap_err().is_format_error());
    }

    #[test]
    fn test_standard_searches_cwd_before_home() {
        let loader = ConfigLoader::standard();
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(loader.dirs.first(), Some(&cwd));
        assert_eq!(loader.dirs.get(1), home_config_dir().as_ref());
        assert!(!loader.file_names.is_empty());

        let candidates = loader.candidates();
        let per_dir = loader.file_names.len();
        assert_eq!(candidates.len(), per_dir * loader.dirs.len());
        assert_eq!(candidates[0], cwd.join(&loader.file_names[0]));
        if let Some(home) = home_config_dir() {
            assert_eq!(candidates[per_dir], home.join(&loader.file_names[0]));
        }
    }

    #[test]
    fn test_home_config_dir_name() {
        if let Some(dir) = home_config_dir() {
            assert!(dir.ends_with(HOME_CONFIG_DIR));
        }
    }
}
