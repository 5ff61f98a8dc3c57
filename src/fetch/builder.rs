//! Response reconstruction.
//!
//! # Responsibilities
//! - Serialize rewritten JSON as the new body
//! - Carry over status, reason phrase, URL and headers
//! - Drop `content-length`, which no longer matches the body

use http::header::CONTENT_LENGTH;
use serde_json::Value;

use crate::fetch::ResponseEnvelope;

/// Build a new envelope around `data` using `original`'s metadata.
pub fn rebuild(original: &ResponseEnvelope, data: &Value) -> Result<ResponseEnvelope, serde_json::Error> {
    let body = serde_json::to_vec(data)?;
    let mut headers = original.headers().clone();
    headers.remove(CONTENT_LENGTH);

    Ok(
        ResponseEnvelope::new(original.status(), original.status_text(), headers, body)
            .with_url(original.url()),
    )
}
