use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub editor: EditorConfig,
    pub fallback: FallbackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub syntax_theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub language: String,
    pub tab_size: usize,
    pub use_spaces: bool,
    pub line_numbers: bool,
    pub show_instructions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default)]
    pub command: Option<String>,
    pub suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme {
                syntax_theme: String::from("base16-ocean.dark"),
            },
            editor: EditorConfig {
                language: String::from("Python"),
                tab_size: 4,
                use_spaces: true,
                line_numbers: true,
                show_instructions: true,
            },
            fallback: FallbackConfig {
                command: None,
                suffix: String::from(".py"),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match fs::read_to_string(&config_path) {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            let default_config = Self::default();
                            let _ = default_config.save();
                            return Ok(default_config);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate();
                                log::info!("Loaded config from: {}", config_path.display());
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                // Backup broken config
                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = fs::copy(&config_path, &backup_path) {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                let default_config = Self::default();
                                let _ = default_config.save();
                                return Ok(default_config);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save();
        Ok(default_config)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate();

            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create config directory: {}", parent.display())
                })?;
            }

            let content = serde_json::to_string_pretty(&config_to_save)
                .context("failed to serialize config")?;
            fs::write(&config_path, content)
                .with_context(|| format!("failed to write config: {}", config_path.display()))?;
            log::info!("Saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Clamp out-of-range values back to their defaults.
    pub fn validate(&mut self) {
        if self.editor.tab_size == 0 || self.editor.tab_size > 16 {
            log::warn!("Invalid tab size: {}, using default", self.editor.tab_size);
            self.editor.tab_size = 4;
        }

        if self.editor.language.is_empty() {
            log::warn!("Empty language, using default");
            self.editor.language = "Python".to_string();
        }

        if self.theme.syntax_theme.is_empty() {
            log::warn!("Empty syntax theme, using default");
            self.theme.syntax_theme = "base16-ocean.dark".to_string();
        }

        if !self.fallback.suffix.starts_with('.') {
            log::warn!(
                "Temp file suffix '{}' lacks a leading dot, using default",
                self.fallback.suffix
            );
            self.fallback.suffix = ".py".to_string();
        }
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("EMENDO_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("EMENDO_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "emendo", "emendo")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn config_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn set_config_dir(path: &std::path::Path) -> (Option<String>, Option<String>) {
        let previous_dir = std::env::var("EMENDO_CONFIG_DIR").ok();
        let previous_path = std::env::var("EMENDO_CONFIG_PATH").ok();
        std::env::set_var("EMENDO_CONFIG_DIR", path);
        std::env::remove_var("EMENDO_CONFIG_PATH");
        (previous_dir, previous_path)
    }

    fn restore_config_env(previous: (Option<String>, Option<String>)) {
        match previous.0 {
            Some(value) => std::env::set_var("EMENDO_CONFIG_DIR", value),
            None => std::env::remove_var("EMENDO_CONFIG_DIR"),
        }

        match previous.1 {
            Some(value) => std::env::set_var("EMENDO_CONFIG_PATH", value),
            None => std::env::remove_var("EMENDO_CONFIG_PATH"),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.theme.syntax_theme, "base16-ocean.dark");
        assert_eq!(config.editor.language, "Python");
        assert_eq!(config.editor.tab_size, 4);
        assert!(config.editor.use_spaces);
        assert!(config.editor.line_numbers);
        assert!(config.editor.show_instructions);
        assert!(config.fallback.command.is_none());
        assert_eq!(config.fallback.suffix, ".py");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"theme\""));
        assert!(json.contains("\"editor\""));
        assert!(json.contains("\"fallback\""));

        let config_from_json: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.theme.syntax_theme, config_from_json.theme.syntax_theme);
        assert_eq!(config.editor.language, config_from_json.editor.language);
        assert_eq!(config.fallback.suffix, config_from_json.fallback.suffix);
    }

    #[test]
    fn test_config_load_creates_default() {
        let _guard = config_test_lock().lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let previous = set_config_dir(temp_dir.path());

        let config = Config::load().unwrap();
        assert_eq!(config.editor.language, "Python");
        assert!(temp_dir.path().join("config.json").exists());

        restore_config_env(previous);
    }

    #[test]
    fn test_config_load_broken_file_is_backed_up() {
        let _guard = config_test_lock().lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let previous = set_config_dir(temp_dir.path());

        fs::write(temp_dir.path().join("config.json"), "{not json").unwrap();

        let config = Config::load().unwrap();
        assert_eq!(config.editor.tab_size, 4);
        assert!(temp_dir.path().join("config.bak").exists());

        restore_config_env(previous);
    }

    #[test]
    fn test_validate_clamps_tab_size() {
        let mut config = Config::default();
        config.editor.tab_size = 0;
        config.validate();
        assert_eq!(config.editor.tab_size, 4);

        config.editor.tab_size = 99;
        config.validate();
        assert_eq!(config.editor.tab_size, 4);
    }

    #[test]
    fn test_validate_fixes_suffix() {
        let mut config = Config::default();
        config.fallback.suffix = "py".to_string();
        config.validate();
        assert_eq!(config.fallback.suffix, ".py");

        config.fallback.suffix = String::new();
        config.validate();
        assert_eq!(config.fallback.suffix, ".py");
    }

    #[test]
    fn test_validate_fixes_empty_names() {
        let mut config = Config::default();
        config.editor.language = String::new();
        config.theme.syntax_theme = String::new();
        config.validate();
        assert_eq!(config.editor.language, "Python");
        assert_eq!(config.theme.syntax_theme, "base16-ocean.dark");
    }
}
