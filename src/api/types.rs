use serde::Serialize;
use serde_json::Value;

/// Body of `POST /api/ask`.
#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

/// Answer returned by the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Answer {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Answer {
    /// Reads an answer out of a success body.
    ///
    /// A missing or non-string `answer` becomes an empty string; bodies that
    /// are not JSON objects yield an empty answer.
    pub fn from_body(body: Option<&Value>) -> Self {
        let field = |key: &str| body.and_then(|b| b.get(key)).and_then(Value::as_str);

        Self {
            answer: field("answer").unwrap_or_default().to_string(),
            model: field("model").map(str::to_string),
        }
    }
}
