//! People-search index integration
//!
//! Provides:
//! - Raw result types returned by the semantic search index
//! - The `PeopleSearch` trait used by the pipeline
//! - An HTTP client for a neural, people-scoped search endpoint

mod http_people_search;

pub use http_people_search::HttpPeopleSearch;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Hard bounds on the number of results requested per call
pub const MIN_RESULTS: usize = 1;
pub const MAX_RESULTS: usize = 100;

/// Result as returned by the search index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub person: Option<PersonRecord>,
}

impl RawResult {
    pub fn new(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            text: text.into(),
            summary: None,
            person: None,
        }
    }
}

/// Structured person entity some indexes attach to profile results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default, alias = "fullName", alias = "full_name")]
    pub name: Option<String>,
    #[serde(default, alias = "headline", alias = "jobTitle")]
    pub title: Option<String>,
    #[serde(default, alias = "currentCompany", alias = "current_company")]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Semantic people-search backend
#[async_trait]
pub trait PeopleSearch: Send + Sync {
    /// Search for profiles; `max_characters` caps the text returned per result
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        max_characters: usize,
    ) -> Result<Vec<RawResult>>;
}

/// Decode a search response body, tolerating either `{results: [...]}` or a bare array
///
/// Entries are converted one by one; an entry that does not fit `RawResult`
/// (no `url`, wrong types) is skipped rather than failing the whole batch.
pub fn decode_results(body: &str) -> Result<Vec<RawResult>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Envelope {
        Wrapped { results: Vec<Value> },
        Bare(Vec<Value>),
    }

    let entries = match serde_json::from_str::<Envelope>(body)? {
        Envelope::Wrapped { results } => results,
        Envelope::Bare(results) => results,
    };

    let total = entries.len();
    let results: Vec<RawResult> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<RawResult>(entry) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!(index = idx, error = %e, "skipping malformed search result");
                None
            }
        })
        .collect();

    if results.len() < total {
        tracing::debug!(kept = results.len(), total, "dropped malformed search results");
    }
    Ok(results)
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrapped_results() {
        let body = r#"{"requestId":"x","results":[
            {"url":"https://www.linkedin.com/in/jane-doe","title":"Jane Doe - RN","text":"ICU"},
            {"url":"https://example.com","person":{"fullName":"Sam Lee","headline":"CNA"}}
        ]}"#;
        let results = decode_results(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Jane Doe - RN");
        assert_eq!(results[1].text, "");
        let person = results[1].person.as_ref().unwrap();
        assert_eq!(person.name.as_deref(), Some("Sam Lee"));
        assert_eq!(person.title.as_deref(), Some("CNA"));
    }

    #[test]
    fn test_decode_bare_array() {
        let body = r#"[{"url":"https://www.linkedin.com/in/a","summary":"{}"}]"#;
        let results = decode_results(body).unwrap();
        assert_eq!(results[0].summary.as_deref(), Some("{}"));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let body = r#"{"results":[
            {"url":"https://www.linkedin.com/in/maria-lopez","title":"Maria Lopez - ER Nurse","text":"RN"},
            {"url":"https://www.linkedin.com/in/sam-lee","title":null,"text":"ER RN"},
            {"title":"No Url Here","text":"CNA"},
            {"url":42,"title":"Numeric url"},
            {"url":"https://www.linkedin.com/in/ana-ruiz","title":"Ana Ruiz","text":null}
        ]}"#;
        let results = decode_results(body).unwrap();
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://www.linkedin.com/in/maria-lopez",
                "https://www.linkedin.com/in/sam-lee",
                "https://www.linkedin.com/in/ana-ruiz",
            ]
        );
        assert_eq!(results[1].title, "");
        assert_eq!(results[1].text, "ER RN");
        assert_eq!(results[2].text, "");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_results("{\"oops\": true}").is_err());
    }
}
