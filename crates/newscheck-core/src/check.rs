//! Wire types for the detection service's `/api/check` contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Number of reference sources requested when the caller does not choose.
pub const DEFAULT_NUM_SOURCES: u8 = 5;

/// Bounds the service accepts for `num_sources`.
pub const MIN_NUM_SOURCES: u8 = 1;
pub const MAX_NUM_SOURCES: u8 = 10;

/// How the service should interpret `content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Free text pasted by the user.
    #[default]
    Text,
    /// An article URL the service fetches itself.
    Url,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub content: String,
    pub input_type: InputType,
    pub num_sources: u8,
}

/// Verdict classification returned by the service.
///
/// Decoding never fails: an unknown, null, or missing code becomes
/// [`VerdictCode::Uncertain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictCode {
    HighlyLikelyTrue,
    LikelyTrue,
    #[default]
    Uncertain,
    LikelyFalse,
    HighlyLikelyFalse,
}

impl VerdictCode {
    pub const ALL: [VerdictCode; 5] = [
        Self::HighlyLikelyTrue,
        Self::LikelyTrue,
        Self::Uncertain,
        Self::LikelyFalse,
        Self::HighlyLikelyFalse,
    ];

    /// Parse a wire code, case-insensitively. Unrecognised codes map to `Uncertain`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "HIGHLY_LIKELY_TRUE" => Self::HighlyLikelyTrue,
            "LIKELY_TRUE" => Self::LikelyTrue,
            "LIKELY_FALSE" => Self::LikelyFalse,
            "HIGHLY_LIKELY_FALSE" => Self::HighlyLikelyFalse,
            _ => Self::Uncertain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighlyLikelyTrue => "HIGHLY_LIKELY_TRUE",
            Self::LikelyTrue => "LIKELY_TRUE",
            Self::Uncertain => "UNCERTAIN",
            Self::LikelyFalse => "LIKELY_FALSE",
            Self::HighlyLikelyFalse => "HIGHLY_LIKELY_FALSE",
        }
    }
}

impl<'de> Deserialize<'de> for VerdictCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_code).unwrap_or_default())
    }
}

/// The service's classification of the submitted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub code: VerdictCode,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub explanation: String,
    /// Colour hint chosen by the service (`green`, `orange`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub similarity_percentage: f64,
    #[serde(default)]
    pub confidence_percentage: f64,
}

impl Verdict {
    pub fn similarity(&self) -> f64 {
        clamp_percentage(self.similarity_percentage)
    }

    pub fn confidence(&self) -> f64 {
        clamp_percentage(self.confidence_percentage)
    }
}

/// A matched article from a trusted source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub domain: String,
    /// Search backend that surfaced the article, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub similarity_percentage: f64,
}

impl Reference {
    /// Title to show for the card, falling back to the URL when the title is absent or blank.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => &self.url,
        }
    }

    pub fn similarity(&self) -> f64 {
        clamp_percentage(self.similarity_percentage)
    }
}

/// Top-level result of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub references: Vec<Reference>,
    /// Server-local ISO 8601 time the check ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub fact_checker_initialized: Option<bool>,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

impl HealthStatus {
    /// The service answers and its checker has finished initialising.
    pub fn is_ready(&self) -> bool {
        self.status == "healthy" && self.fact_checker_initialized.unwrap_or(true)
    }
}

/// Body of `GET /api/trusted-sources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustedSources {
    pub sources: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub count: usize,
}

impl TrustedSources {
    /// Trusted domains in sorted order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

/// Clamp a server-supplied percentage into `[0, 100]`; NaN reads as 0.
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
