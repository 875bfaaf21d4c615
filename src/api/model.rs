use serde::{Deserialize, Serialize};

/// Request body for `/sum` and `/multiply`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Numbers {
    #[serde(default)]
    pub token: String,
    /// `None` when the field is absent or null
    #[serde(default)]
    pub values: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumResponse {
    pub token: String,
    pub sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplyResponse {
    pub token: String,
    pub multiply: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Query string for `/results`, kept as ordered pairs
///
/// A repeated parameter resolves to its first value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ResultsQuery(pub Vec<(String, String)>);

impl ResultsQuery {
    /// First `token` value, if any
    pub fn token(&self) -> Option<&str> {
        self
            .0
            .iter()
            .find(|(name, _)| name == "token")
            .map(|(_, value)| value.as_str())
    }
}
