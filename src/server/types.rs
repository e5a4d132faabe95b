use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /score`. Only JSON objects are accepted; a missing or null
/// `essay` reads as empty text.
#[derive(Debug, Default, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ScoreRequest {
    pub essay: Option<String>,
}

impl TryFrom<Map<String, Value>> for ScoreRequest {
    type Error = String;

    fn try_from(mut body: Map<String, Value>) -> Result<Self, Self::Error> {
        let essay = match body.remove("essay") {
            None | Some(Value::Null) => None,
            Some(Value::String(essay)) => Some(essay),
            Some(other) => {
                return Err(format!(
                    "field `essay` must be a string, got {}",
                    json_kind(&other)
                ));
            }
        };

        Ok(Self { essay })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub backend: String,
    pub started_at: DateTime<Utc>,
}
