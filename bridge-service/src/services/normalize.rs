//! Remote response normalization.
//!
//! The remote service answers in several shapes. Each decoder below handles
//! one shape and returns `None` when it does not apply; the first `Some` wins
//! and anything left over is wrapped as a generic result.

use serde_json::{json, Value};

type Decoder = fn(&Value) -> Option<Value>;

const DECODERS: [Decoder; 3] = [from_data_envelope, from_result_object, from_sequence];

/// Convert a raw remote response into the shape returned to callers.
pub fn normalize_response(response: Value) -> Value {
    DECODERS
        .iter()
        .find_map(|decode| decode(&response))
        .unwrap_or_else(|| json!({ "status": "success", "result": response }))
}

/// `{"data": [first, ...]}` as produced by Gradio's prediction route.
fn from_data_envelope(response: &Value) -> Option<Value> {
    let first = response.get("data")?.as_array()?.first()?;

    Some(match first {
        // Gradio JSON outputs frequently arrive serialized a second time.
        Value::String(text) => serde_json::from_str(text)
            .unwrap_or_else(|_| json!({ "status": "success", "raw_result": text })),
        other => other.clone(),
    })
}

/// Already a result document.
fn from_result_object(response: &Value) -> Option<Value> {
    let object = response.as_object()?;
    if object.contains_key("status") || object.contains_key("scores") {
        Some(response.clone())
    } else {
        None
    }
}

/// A bare list of outputs.
fn from_sequence(response: &Value) -> Option<Value> {
    let first = response.as_array()?.first()?;
    if first.is_object() {
        Some(first.clone())
    } else {
        Some(json!({ "result": first }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_envelope_with_json_string_is_parsed() {
        let response = json!({
            "data": ["{\"status\":\"success\",\"scores\":{\"aesthetic_score\":7.1}}"]
        });

        assert_eq!(
            normalize_response(response),
            json!({"status": "success", "scores": {"aesthetic_score": 7.1}})
        );
    }

    #[test]
    fn test_data_envelope_with_plain_string_is_wrapped() {
        let response = json!({ "data": ["looks great", "ignored"] });

        assert_eq!(
            normalize_response(response),
            json!({"status": "success", "raw_result": "looks great"})
        );
    }

    #[test]
    fn test_data_envelope_with_object_is_used_directly() {
        let inner = json!({"scores": {"blur_score": 3.2}});
        let response = json!({ "data": [inner.clone()] });

        assert_eq!(normalize_response(response), inner);
    }

    #[test]
    fn test_empty_data_envelope_falls_through_to_wrap() {
        let response = json!({ "data": [] });

        assert_eq!(
            normalize_response(response.clone()),
            json!({"status": "success", "result": response})
        );
    }

    #[test]
    fn test_normalized_result_is_unchanged() {
        let result = json!({
            "status": "success",
            "scores": {
                "aesthetic_score": 6.5,
                "blur_score": 7.0,
                "composition_score": 5.25,
                "combined_score": 6.3
            }
        });

        let once = normalize_response(result.clone());
        assert_eq!(once, result);
        assert_eq!(normalize_response(once), result);
    }

    #[test]
    fn test_status_key_alone_is_enough() {
        let response = json!({"status": "error", "message": "model busy"});
        assert_eq!(normalize_response(response.clone()), response);
    }

    #[test]
    fn test_sequence_takes_first_element() {
        let response = json!([{"status": "success"}, {"status": "other"}]);
        assert_eq!(normalize_response(response), json!({"status": "success"}));

        let response = json!([4.2, 1.0]);
        assert_eq!(normalize_response(response), json!({"result": 4.2}));
    }

    #[test]
    fn test_unrecognized_shape_is_wrapped() {
        assert_eq!(
            normalize_response(json!({"label": "portrait"})),
            json!({"status": "success", "result": {"label": "portrait"}})
        );
        assert_eq!(
            normalize_response(json!(8.5)),
            json!({"status": "success", "result": 8.5})
        );
    }
}
