use crate::commands::CommandError;
use serde::Serialize;
use serde_json::{json, Value};

pub const MISSING_COMMAND: &str = "No command provided";

/// The only shape an error ever takes on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_formats: Option<bool>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            has_formats: None,
        }
    }

    pub fn to_value(&self) -> Value {
        json!(self)
    }
}

impl From<&CommandError> for ErrorEnvelope {
    fn from(err: &CommandError) -> Self {
        Self {
            error: err.to_string(),
            has_formats: err.has_formats(),
        }
    }
}

/// Collapses a command outcome into the single document written to stdout.
pub fn render(outcome: Result<Value, CommandError>) -> Value {
    match outcome {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("command failed: {err}");
            ErrorEnvelope::from(&err).to_value()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supersonic_core::{CatalogError, SelectionError};

    #[test]
    fn unknown_command_envelope() {
        let value = render(Err(CommandError::UnknownCommand("frobnicate".into())));
        assert_eq!(value.to_string(), r#"{"error":"Unknown command: frobnicate"}"#);
    }

    #[test]
    fn signature_envelope_flags_formats() {
        let value = render(Err(SelectionError::SignatureRequired.into()));
        assert_eq!(
            value,
            json!({"error": "Audio streams require signature decoding", "hasFormats": true})
        );
    }

    #[test]
    fn no_audio_envelope_has_no_flag() {
        let value = render(Err(SelectionError::NoAudioAvailable.into()));
        assert_eq!(value, json!({"error": "No audio streams available"}));
    }

    #[test]
    fn catalog_message_is_forwarded_verbatim() {
        let err = CommandError::from(CatalogError::Status {
            status: 429,
            endpoint: "search".into(),
        });
        assert_eq!(
            render(Err(err)),
            json!({"error": "server returned HTTP 429 for search"})
        );
    }

    #[test]
    fn success_passes_through() {
        let payload = json!([{"videoId": "abc"}]);
        assert_eq!(render(Ok(payload.clone())), payload);
    }

    #[test]
    fn missing_command_envelope_omits_format_flag() {
        assert_eq!(
            ErrorEnvelope::new(MISSING_COMMAND).to_value().to_string(),
            r#"{"error":"No command provided"}"#
        );
    }
}
