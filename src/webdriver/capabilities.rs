use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Firefox session settings turned into `moz:firefoxOptions`.
#[derive(Debug, Clone, Default)]
pub struct FirefoxOptions {
    pub headless: bool,
    pub dev_console: bool,
    /// Existing profile directory (`firefox -CreateProfile selenium`).
    pub profile_path: Option<PathBuf>,
    pub preferences: BTreeMap<String, Value>,
    pub log_level: Option<String>,
}

impl FirefoxOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(profile) = &self.profile_path {
            args.push("-profile".to_string());
            args.push(profile.to_string_lossy().to_string());
        }
        if self.dev_console {
            args.push("-devtools".to_string());
        }
        if self.headless {
            args.push("-headless".to_string());
        }
        args
    }

    /// `alwaysMatch` capabilities of a new session.
    pub fn to_capabilities(&self) -> Value {
        let mut firefox = Map::new();
        firefox.insert("args".into(), json!(self.args()));
        if !self.preferences.is_empty() {
            firefox.insert("prefs".into(), json!(self.preferences));
        }
        if let Some(level) = &self.log_level {
            firefox.insert("log".into(), json!({ "level": level }));
        }

        json!({
            "browserName": "firefox",
            "moz:firefoxOptions": Value::Object(firefox),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_profile_and_prefs() {
        let mut prefs = BTreeMap::new();
        prefs.insert("intl.accept_languages".to_string(), json!("en-GB"));
        let opts = FirefoxOptions {
            headless: true,
            dev_console: false,
            profile_path: Some(PathBuf::from("/tmp/selenium")),
            preferences: prefs,
            log_level: Some("trace".into()),
        };

        let caps = opts.to_capabilities();
        let ff = &caps["moz:firefoxOptions"];
        assert_eq!(ff["args"], json!(["-profile", "/tmp/selenium", "-headless"]));
        assert_eq!(ff["prefs"]["intl.accept_languages"], "en-GB");
        assert_eq!(ff["log"]["level"], "trace");
        assert_eq!(caps["browserName"], "firefox");
    }

    #[test]
    fn no_prefs_key_when_empty() {
        let caps = FirefoxOptions::default().to_capabilities();
        assert!(caps["moz:firefoxOptions"].get("prefs").is_none());
    }
}
