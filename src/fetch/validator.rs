//! Predicates over response and payload shape.

use http::header::CONTENT_TYPE;
use serde_json::Value;

use crate::fetch::ResponseEnvelope;

/// 2xx status and a JSON content type.
pub fn is_usable_response(response: &ResponseEnvelope) -> bool {
    response.status().is_success()
        && response
            .header_str(CONTENT_TYPE.as_str())
            .is_some_and(|ct| ct.contains("application/json"))
}

/// A JSON object or array.
pub fn is_usable_data(data: &Value) -> bool {
    data.is_object() || data.is_array()
}
