use crate::errors::MixpanelError;
use crate::types::Config;
use reqwest::Client;
use serde_json::Value;

#[cfg(feature = "tracing")]
use tracing::{debug, error};

/// Sends a tracking payload as a GET request with a base64-encoded `data`
/// query parameter. Mixpanel answers these with a bare `"1"` on success;
/// any other body is a rejection.
pub async fn send_track_request(config: &Config, data: &Value) -> Result<(), MixpanelError> {
    let encoded = base64::encode(serde_json::to_vec(data)?);
    let mut query: Vec<(&str, String)> = vec![("data", encoded), ("ip", "0".to_string())];
    if config.test {
        query.push(("test", "1".to_string()));
    }

    let url = format!(
        "{}://{}{}",
        config.protocol, config.host, config.track_endpoint_path
    );
    #[cfg(feature = "tracing")]
    if config.debug {
        debug!(%url, "sending track request to Mixpanel");
    }

    let res = Client::new()
        .get(&url)
        .query(&query)
        .send()
        .await
        .map_err(|err| transport_failure(config, err))?;
    let body = res
        .text()
        .await
        .map_err(|err| transport_failure(config, err))?;

    if body == "1" {
        Ok(())
    } else {
        #[cfg(feature = "tracing")]
        if config.debug {
            error!(%body, "Mixpanel rejected track request");
        }
        Err(MixpanelError::RemoteRejection { body })
    }
}

/// Sends an email payload as a form-urlencoded POST. The response body is
/// handed back verbatim; this sender never interprets it as an error, the
/// caller decides what the body means.
pub async fn send_email_request(config: &Config, data: &Value) -> Result<String, MixpanelError> {
    let mut form = flatten_form(data);
    if config.test {
        // Not documented as supported for /email, kept for parity with /track.
        form.push(("test".to_string(), "1".to_string()));
    }

    let url = format!(
        "{}://{}{}",
        config.protocol, config.host, config.email_endpoint_path
    );
    #[cfg(feature = "tracing")]
    if config.debug {
        debug!(%url, "sending email request to Mixpanel");
    }

    let res = Client::new()
        .post(&url)
        .form(&form)
        .send()
        .await
        .map_err(|err| transport_failure(config, err))?;
    let body = res
        .text()
        .await
        .map_err(|err| transport_failure(config, err))?;
    Ok(body)
}

/// Renders a JSON object as flat form fields, the way `querystring` does:
/// strings verbatim, numbers and booleans in their plain text form.
pub(crate) fn flatten_form(data: &Value) -> Vec<(String, String)> {
    match data {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn transport_failure(config: &Config, err: reqwest::Error) -> MixpanelError {
    #[cfg(feature = "tracing")]
    if config.debug {
        error!(error = %err, "request to Mixpanel failed");
    }
    MixpanelError::Transport(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_renders_scalars_as_plain_text() {
        let fields = flatten_form(&json!({
            "campaign": "campA",
            "step": 2,
            "opened": true,
            "note": null,
        }));
        assert!(fields.contains(&("campaign".to_string(), "campA".to_string())));
        assert!(fields.contains(&("step".to_string(), "2".to_string())));
        assert!(fields.contains(&("opened".to_string(), "true".to_string())));
        assert!(fields.contains(&("note".to_string(), String::new())));
    }

    #[test]
    fn flatten_of_non_object_is_empty() {
        assert!(flatten_form(&json!("not a map")).is_empty());
    }
}
