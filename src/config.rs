use crate::constants::{BODY_ID, CHAT_API_PATH, CONTAINER_ID, FORM_ID, INPUT_ID, TOGGLE_ID};
use crate::errors::{ChatboxError, ChatboxResult};
use serde::{Deserialize, Serialize};

/// Where the widget posts messages and which element identifiers it binds to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub endpoint: String,
    pub container_id: String,
    pub body_id: String,
    pub form_id: String,
    pub input_id: String,
    pub toggle_id: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint: CHAT_API_PATH.to_string(),
            container_id: CONTAINER_ID.to_string(),
            body_id: BODY_ID.to_string(),
            form_id: FORM_ID.to_string(),
            input_id: INPUT_ID.to_string(),
            toggle_id: TOGGLE_ID.to_string(),
        }
    }
}

pub fn validate_config(config: &WidgetConfig) -> ChatboxResult<()> {
    // The endpoint is a path on the embedding site, never a full URL
    if !config.endpoint.starts_with('/') {
        return Err(ChatboxError::config_error(
            "endpoint must be an absolute path",
        ));
    }

    let ids = [
        ("container_id", &config.container_id),
        ("body_id", &config.body_id),
        ("form_id", &config.form_id),
        ("input_id", &config.input_id),
        ("toggle_id", &config.toggle_id),
    ];

    for (name, id) in ids {
        if id.is_empty() {
            return Err(ChatboxError::config_error(format!(
                "{} must not be empty",
                name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_valid() {
        let config = WidgetConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_empty_id() {
        let mut config = WidgetConfig::default();
        config.toggle_id = "".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_rejects_relative_endpoint() {
        let mut config = WidgetConfig::default();
        config.endpoint = "api/chat/".to_string();
        assert!(validate_config(&config).is_err());
    }
}
