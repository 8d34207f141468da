use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub mod catalog;

/// Category values chosen by the caller. Any missing field is filled with a
/// uniform random draw from the catalog before generation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorySelections {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub decade: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
}

/// A suggested movie: the six fields the model replies with, plus the
/// category metadata, poster URL and review code attached before the
/// suggestion is returned.
///
/// Every field is defaulted so partial model payloads and hand-entered
/// weekly picks both deserialize; validation of required fields happens at
/// the handler level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieInfo {
    pub title: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    pub country: String,
    pub director: String,
    pub description: String,
    pub watch_info: String,
    /// Empty when no usable poster was found
    pub poster_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,
    /// 6-character review correlation code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// One inbound SMS review. Correlation to a movie is purely by `code`;
/// reviews with absent or unknown codes are stored but never returned
/// by lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub from: String,
    pub to: Option<String>,
    pub code: Option<String>,
    pub review: String,
    /// The SMS body exactly as received
    pub raw: String,
    pub timestamp: DateTime<Utc>,
}

/// One member signup. Append-only; repeat signups with the same phone
/// number create duplicate entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub phone: String,
    pub consent: bool,
    pub date: DateTime<Utc>,
}

/// Models occasionally reply with `"year": 1998` despite the prompt asking
/// for a string; accept both.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
