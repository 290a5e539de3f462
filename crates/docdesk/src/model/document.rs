//! Document records as served by the remote store.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Type tag shown when the store omits one.
pub const DEFAULT_DOCUMENT_TYPE: &str = "Policy";

/// Category shown when the store omits one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Lifecycle status of an indexed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Active,
    Processing,
    Inactive,
}

impl DocumentStatus {
    /// Maps a raw status string. Missing values count as active,
    /// anything unrecognised as inactive.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("Active") => DocumentStatus::Active,
            Some("Processing") => DocumentStatus::Processing,
            Some(_) => DocumentStatus::Inactive,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Active => write!(f, "Active"),
            DocumentStatus::Processing => write!(f, "Processing"),
            DocumentStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

/// A metadata entry for one indexed file, cached verbatim from the last
/// successful list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Opaque identifier. Numeric ids from the store are kept as strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    pub title: String,

    /// Non-string values are dropped and display as the default.
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub doc_type: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_text"
    )]
    pub category: Option<String>,

    /// Non-string values are kept as their JSON text, which maps to
    /// [`DocumentStatus::Inactive`].
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_status"
    )]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "deserialize_chunk_count")]
    pub chunk_count: u64,
}

impl DocumentRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            doc_type: None,
            category: None,
            status: None,
            chunk_count: 0,
        }
    }

    pub fn doc_type(&self) -> &str {
        non_empty_or(self.doc_type.as_deref(), DEFAULT_DOCUMENT_TYPE)
    }

    pub fn category(&self) -> &str {
        non_empty_or(self.category.as_deref(), DEFAULT_CATEGORY)
    }

    pub fn status(&self) -> DocumentStatus {
        DocumentStatus::from_raw(self.status.as_deref())
    }

    /// Indexed chunk count, only meaningful for active documents.
    pub fn indexed_chunks(&self) -> Option<u64> {
        match self.status() {
            DocumentStatus::Active => Some(self.chunk_count),
            _ => None,
        }
    }
}

fn non_empty_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Other(Value),
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawText>::deserialize(deserializer)? {
        Some(RawText::Text(s)) => Some(s),
        Some(RawText::Other(_)) | None => None,
    })
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawText>::deserialize(deserializer)? {
        Some(RawText::Text(s)) => Some(s),
        Some(RawText::Other(Value::Null)) | None => None,
        Some(RawText::Other(other)) => Some(other.to_string()),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Integer(u64),
    Float(f64),
    Other(IgnoredAny),
}

/// Accepts integers and integral floats. Anything else counts as zero.
fn deserialize_chunk_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Integer(n)) => n,
        Some(RawCount::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            f as u64
        }
        Some(RawCount::Float(_)) | Some(RawCount::Other(_)) | None => 0,
    })
}
