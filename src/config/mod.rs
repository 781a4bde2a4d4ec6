use crate::errors::{AppError, AppResult};
use crate::utils::date::Language;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "worknight";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Typed view of `config.yaml`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub home_url: Option<String>,
    #[serde(default)]
    pub browser_configuration: BrowserConfiguration,
    #[serde(default)]
    pub account_preferences: AccountPreferences,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BrowserConfiguration {
    #[serde(default)]
    pub firefox: FirefoxConfiguration,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FirefoxConfiguration {
    /// Passed to Firefox as `about:config` preferences.
    #[serde(default)]
    pub preferences: BTreeMap<String, serde_json::Value>,
    /// geckodriver executable, `geckodriver` from `PATH` when unset.
    #[serde(default)]
    pub driver_path: Option<String>,
    /// Attach to an already running WebDriver server instead of spawning one.
    #[serde(default)]
    pub webdriver_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPreferences {
    /// Language the portal renders dates in.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for AccountPreferences {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

impl Config {
    pub fn home_url(&self) -> AppResult<&str> {
        self.home_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(AppError::MissingHomeUrl)
    }

    pub fn language(&self) -> AppResult<Language> {
        self.account_preferences.language.parse()
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }
}

/// The configuration file as stored on disk.
///
/// Kept as a raw YAML mapping so `config set` can write keys the typed
/// [`Config`] does not know about.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    root: Mapping,
}

impl ConfigFile {
    /// Load `path`, or start empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let root = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<Value>(&content)? {
                Value::Null => Mapping::new(),
                Value::Mapping(m) => m,
                _ => {
                    return Err(AppError::Config(format!(
                        "{} does not contain a mapping",
                        path.display()
                    )));
                }
            }
        } else {
            Mapping::new()
        };
        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> AppResult<Config> {
        Ok(serde_yaml::from_value(Value::Mapping(self.root.clone()))?)
    }

    /// Set `key` below the chain of `parents`, creating missing mappings,
    /// and save the file.
    pub fn set(&mut self, parents: &[String], key: &str, value: &str) -> AppResult<()> {
        let mut node = &mut self.root;
        for parent in parents {
            let slot = node
                .entry(Value::String(parent.clone()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            node = match slot {
                Value::Mapping(m) => m,
                _ => {
                    return Err(AppError::Config(format!(
                        "'{parent}' is already set to a value, not a section"
                    )));
                }
            };
        }
        node.insert(Value::String(key.to_string()), scalar(value));
        self.save()
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        let body = serde_yaml::to_string(&self.root)?;
        Ok(format!("---\n{body}"))
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, self.to_yaml()?)?;
        Ok(())
    }
}

/// Booleans and numbers keep their type (Firefox preferences need them);
/// everything else is stored as a string.
fn scalar(value: &str) -> Value {
    match serde_yaml::from_str::<Value>(value) {
        Ok(v @ (Value::Bool(_) | Value::Number(_))) => v,
        _ => Value::String(value.to_string()),
    }
}
