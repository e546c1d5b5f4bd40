use std::sync::{Arc, RwLock};

use serde_json::{json, Map, Value};

use crate::errors::MixpanelError;
use crate::types::{Config, ConfigOverrides};
use crate::utils::{send_email_request, send_track_request};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Client for the legacy Mixpanel tracking and email API.
///
/// Holds the project token and a live configuration shared by every send.
/// Create one per process and reuse it; the token is fixed after
/// construction, the configuration can be adjusted at any time with
/// [`Mixpanel::set_config`].
#[derive(Debug, Clone)]
pub struct Mixpanel {
    token: String,
    config: Arc<RwLock<Config>>,
}

impl Mixpanel {
    /// Creates a client for the given project token. Fails when the token
    /// is empty, since every outgoing payload must carry one.
    pub fn init(token: &str, config: Option<Config>) -> Result<Self, MixpanelError> {
        if token.is_empty() {
            return Err(MixpanelError::Configuration(
                "the Mixpanel client needs a project token".to_string(),
            ));
        }
        Ok(Self {
            token: token.to_string(),
            config: Arc::new(RwLock::new(config.unwrap_or_default())),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Merges the overrides into the live configuration. Only provided keys
    /// are overwritten; unknown keys are stored untouched.
    pub fn set_config(&self, overrides: ConfigOverrides) {
        self.config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .merge(overrides);
    }

    // In-flight requests keep the values read here even if set_config runs
    // concurrently; the next call sees the merged config.
    fn config_snapshot(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Sends an event. The caller's properties are enriched with `token`
    /// and `time` (current unix seconds) when those keys are absent; the
    /// supplied value is never overwritten.
    pub async fn track(
        &self,
        event: &str,
        properties: Option<Value>,
    ) -> Result<(), MixpanelError> {
        let config = self.config_snapshot();
        let mut props = into_object(properties);
        props
            .entry("token")
            .or_insert_with(|| json!(self.token));
        props
            .entry("time")
            .or_insert_with(|| json!(chrono::Utc::now().timestamp()));

        let data = json!({
            "event": event,
            "properties": props,
        });

        #[cfg(feature = "tracing")]
        if config.debug {
            debug!(payload = %data, "sending event to Mixpanel");
        }

        send_track_request(&config, &data).await
    }

    /// Tracks one step of a funnel as an `mp_funnel` event.
    ///
    /// NOTE: not the recommended way of using funnels; prefer plain events
    /// and the funnel builder in the web interface. Kept for compatibility.
    pub async fn track_funnel(
        &self,
        funnel: &str,
        step: i64,
        goal: &str,
        properties: Option<Value>,
    ) -> Result<(), MixpanelError> {
        let mut props = into_object(properties);
        props.insert("funnel".to_string(), json!(funnel));
        props.insert("step".to_string(), json!(step));
        props.insert("goal".to_string(), json!(goal));
        self.track("mp_funnel", Some(Value::Object(props))).await
    }

    /// Reports a sent email for instrumentation. `options` may carry extra
    /// form fields; an object-valued `properties` field is JSON-encoded and
    /// then base64-encoded before transmission. Returns the raw response
    /// body, which this client does not interpret.
    pub async fn email(
        &self,
        campaign: &str,
        distinct_id: &str,
        body: &str,
        options: Option<Value>,
    ) -> Result<String, MixpanelError> {
        let config = self.config_snapshot();
        let mut opts = into_object(options);
        opts.entry("token").or_insert_with(|| json!(self.token));
        opts.insert("campaign".to_string(), json!(campaign));
        opts.insert("distinct_id".to_string(), json!(distinct_id));
        opts.insert("body".to_string(), json!(body));

        let encoded_properties = match opts.get("properties") {
            Some(props @ Value::Object(_)) => Some(base64::encode(serde_json::to_vec(props)?)),
            _ => None,
        };
        if let Some(encoded) = encoded_properties {
            opts.insert("properties".to_string(), Value::String(encoded));
        }

        let data = Value::Object(opts);

        #[cfg(feature = "tracing")]
        if config.debug {
            debug!(payload = %data, "sending email to Mixpanel");
        }

        send_email_request(&config, &data).await
    }
}

fn into_object(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
