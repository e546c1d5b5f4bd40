use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Config {
    /// Appends `test=1` to outgoing tracking requests.
    pub test: bool,
    /// Enables diagnostic logging of payloads and failures.
    pub debug: bool,
    pub track_endpoint_path: String,
    pub email_endpoint_path: String,
    pub host: String,
    pub protocol: String,
    /// Unrecognized override keys, stored but never interpreted.
    pub extra: BTreeMap<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test: false,
            debug: false,
            track_endpoint_path: "/track".to_string(),
            email_endpoint_path: "/email".to_string(),
            host: "api.mixpanel.com:80".to_string(),
            protocol: "http".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

/// Partial config: only the fields present here overwrite the live config.
/// Unknown keys are accepted and kept around rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub test: Option<bool>,
    pub debug: Option<bool>,
    pub track_endpoint_path: Option<String>,
    pub email_endpoint_path: Option<String>,
    pub host: Option<String>,
    pub protocol: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Config {
    /// Shallow merge: overwrites only the keys the overrides provide.
    pub fn merge(&mut self, overrides: ConfigOverrides) {
        if let Some(test) = overrides.test {
            self.test = test;
        }
        if let Some(debug) = overrides.debug {
            self.debug = debug;
        }
        if let Some(path) = overrides.track_endpoint_path {
            self.track_endpoint_path = path;
        }
        if let Some(path) = overrides.email_endpoint_path {
            self.email_endpoint_path = path;
        }
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(protocol) = overrides.protocol {
            self.protocol = protocol;
        }
        self.extra.extend(overrides.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_the_tracking_api() {
        let config = Config::default();
        assert!(!config.test);
        assert!(!config.debug);
        assert_eq!(config.track_endpoint_path, "/track");
        assert_eq!(config.email_endpoint_path, "/email");
        assert_eq!(config.host, "api.mixpanel.com:80");
        assert_eq!(config.protocol, "http");
        assert!(config.extra.is_empty());
    }

    #[test]
    fn merge_overwrites_only_provided_keys() {
        let mut config = Config::default();
        config.merge(ConfigOverrides {
            test: Some(true),
            track_endpoint_path: Some("/track2".to_string()),
            ..Default::default()
        });
        assert!(config.test);
        assert_eq!(config.track_endpoint_path, "/track2");
        assert!(!config.debug);
        assert_eq!(config.email_endpoint_path, "/email");
    }

    #[test]
    fn merge_keeps_unknown_keys() {
        let mut config = Config::default();
        let overrides: ConfigOverrides =
            serde_json::from_value(json!({ "debug": true, "api_version": 2 })).unwrap();
        config.merge(overrides);
        assert!(config.debug);
        assert_eq!(config.extra.get("api_version"), Some(&json!(2)));
    }
}
