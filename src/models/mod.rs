pub mod common;
pub mod image;
pub mod state;

pub use common::*;
pub use image::*;
pub use state::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_decodes_nested_payload() {
        let body = json!({ "status": "success", "data": { "image_base64": "abc123", "text": "A city" } });
        let envelope: GenerationEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.data.image_base64, "abc123");
        assert_eq!(envelope.data.caption(), Some("A city"));
    }

    #[test]
    fn test_envelope_without_text_or_status() {
        let body = json!({ "data": { "image_base64": "abc123", "text": null } });
        let envelope: GenerationEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.status, "success");
        assert_eq!(envelope.data.text, None);
    }

    #[test]
    fn test_missing_caption_serializes_as_null() {
        let envelope = GenerationEnvelope::success(GenerationResult::new("abc123"));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "status": "success", "data": { "image_base64": "abc123", "text": null } })
        );
    }

    #[test]
    fn test_envelope_rejects_missing_image() {
        let body = json!({ "data": { "image_base64": null, "text": "only words" } });
        assert!(serde_json::from_value::<GenerationEnvelope>(body).is_err());
    }

    #[test]
    fn test_error_body_messages() {
        let plain: ErrorBody = serde_json::from_value(json!({ "detail": "rate limited" })).unwrap();
        assert_eq!(plain.message().as_deref(), Some("rate limited"));

        let listed: ErrorBody = serde_json::from_value(json!({
            "detail": [{ "loc": ["body", "prompt"], "msg": "field required", "type": "value_error.missing" }]
        }))
        .unwrap();
        assert_eq!(listed.message().as_deref(), Some("field required"));

        let empty: ErrorBody = serde_json::from_value(json!({ "detail": "" })).unwrap();
        assert_eq!(empty.message(), None);
    }

    #[test]
    fn test_blank_caption_is_hidden() {
        let result = GenerationResult::new("abc").with_text("   ");
        assert_eq!(result.caption(), None);
    }

    #[test]
    fn test_state_defaults() {
        let state = UiState::new();
        assert!(state.can_submit());
        assert!(!state.show_progress());
        assert_eq!(state.progress_percent(), 0);
    }
}
