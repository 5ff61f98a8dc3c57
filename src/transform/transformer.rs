//! Route-specific payload rewriting.
//!
//! # Responsibilities
//! - Spoof the reported location (IP region, country, timezone, torrent flag)
//! - Clear geo and copyright block flags on single releases and release lists

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::fake_location;
use crate::fetch::validator::is_usable_data;
use crate::observability::{DiagnosticEvent, Diagnostics};
use crate::routing::RouteClass;
use crate::transform::payload::{location, replace_if_set, BLOCK_FLAGS};

/// Result of running a payload through the transformer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutcome {
    /// Route not targeted, or payload not a JSON object/array.
    Unchanged,
    Rewritten(Value),
}

/// The payload has a shape the route's rewrite cannot handle.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{route} payload must be an array, got {found}")]
    ExpectedArray { route: RouteClass, found: &'static str },

    #[error("{route} payload must be an object, got {found}")]
    ExpectedObject { route: RouteClass, found: &'static str },
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Stateless rewriter; safe to share across concurrent calls.
#[derive(Clone)]
pub struct DataTransformer {
    diagnostics: Arc<dyn Diagnostics>,
}

impl DataTransformer {
    pub fn new(diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self { diagnostics }
    }

    /// Rewrite `data` according to the route it came from.
    pub fn transform(&self, route: RouteClass, data: Value) -> Result<TransformOutcome, TransformError> {
        if !is_usable_data(&data) {
            self.diagnostics.warning(DiagnosticEvent::InvalidData { route });
            return Ok(TransformOutcome::Unchanged);
        }

        let rewritten = match route {
            RouteClass::NonTarget => return Ok(TransformOutcome::Unchanged),
            RouteClass::UserLocation => match data {
                Value::Object(object) => Value::Object(spoof_location(object)),
                other => {
                    return Err(TransformError::ExpectedObject {
                        route,
                        found: kind_of(&other),
                    })
                }
            },
            RouteClass::ReleaseLatest | RouteClass::ReleaseRandom => match data {
                Value::Array(items) => Value::Array(clear_each(items)),
                other => {
                    return Err(TransformError::ExpectedArray {
                        route,
                        found: kind_of(&other),
                    })
                }
            },
            RouteClass::ReleaseOther | RouteClass::VideoEpisode => match data {
                Value::Array(items) => Value::Array(clear_each(items)),
                Value::Object(object) => Value::Object(clear_block_flags(object)),
                other => {
                    return Err(TransformError::ExpectedObject {
                        route,
                        found: kind_of(&other),
                    })
                }
            },
        };

        Ok(TransformOutcome::Rewritten(rewritten))
    }
}

fn spoof_location(mut object: Map<String, Value>) -> Map<String, Value> {
    let spoofed = object.get(location::IP).and_then(Value::as_str).and_then(spoof_ip);
    if let (Some(spoofed), Some(ip)) = (spoofed, object.get_mut(location::IP)) {
        *ip = Value::String(spoofed);
    }
    replace_if_set(&mut object, location::COUNTRY, fake_location::COUNTRY.into());
    replace_if_set(&mut object, location::ISO_CODE, fake_location::ISO_CODE.into());
    replace_if_set(&mut object, location::TIMEZONE, fake_location::TIMEZONE.into());
    if let Some(Value::Object(restrictions)) = object.get_mut(location::RESTRICTIONS) {
        replace_if_set(restrictions, location::HIDE_TORRENTS, Value::Bool(false));
    }
    object
}

/// Replace the first two components of a four-part dotted address.
fn spoof_ip(ip: &str) -> Option<String> {
    let octets: Vec<&str> = ip.split('.').collect();
    if octets.len() != 4 {
        return None;
    }
    let [a, b] = fake_location::IP_REGION;
    Some(format!("{}.{}.{}.{}", a, b, octets[2], octets[3]))
}

fn clear_each(items: Vec<Value>) -> Vec<Value> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(object) => Value::Object(clear_block_flags(object)),
            other => other,
        })
        .collect()
}

fn clear_block_flags(mut object: Map<String, Value>) -> Map<String, Value> {
    for flag in BLOCK_FLAGS {
        replace_if_set(&mut object, flag, Value::Bool(false));
    }
    object
}
