//! Search query types.
//!
//! Two query shapes reach the storage layer:
//!
//! - [`KeyValueQuery`] - a single clause of a known [`QueryType`] against one
//!   searchable field, built by the adapter.
//! - [`RawQuery`] - a caller-supplied query document, admitted only after it
//!   passes the raw query policy enforced by [`RawQuery::parse`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{StorageError, StorageResult};

/// Fields of the user info document that key/value search may target.
///
/// The `.keyword` sub-fields hold the unanalyzed value and match whole values
/// only.
pub const SEARCHABLE_FIELDS: &[&str] = &[
    "id",
    "name",
    "job",
    "childNames",
    "comment",
    "name.keyword",
    "job.keyword",
    "childNames.keyword",
];

/// Top-level keys a raw query document may contain.
///
/// Everything else (aggregations, scripts, `_source` filtering, runtime
/// mappings) is rejected so that results always map back onto records.
pub const ALLOWED_RAW_QUERY_KEYS: &[&str] = &[
    "query",
    "size",
    "from",
    "sort",
    "track_total_hits",
    "min_score",
    "timeout",
];

/// Keys that run engine-side scripts. Rejected at any depth of `query` and
/// `sort`.
pub const SCRIPT_KEYS: &[&str] = &["script", "script_score", "_script"];

/// The kind of single-clause query used by key/value search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Analyzed full-text match.
    Match,
    /// Exact term.
    Term,
    /// `*` / `?` glob.
    Wildcard,
    /// Term prefix.
    Prefix,
    /// Phrase whose last term is a prefix.
    MatchPhrasePrefix,
    /// Regular expression.
    Regexp,
    /// Edit-distance match.
    Fuzzy,
}

impl QueryType {
    /// All supported query types.
    pub const ALL: [QueryType; 7] = [
        QueryType::Match,
        QueryType::Term,
        QueryType::Wildcard,
        QueryType::Prefix,
        QueryType::MatchPhrasePrefix,
        QueryType::Regexp,
        QueryType::Fuzzy,
    ];

    /// Returns the engine's name for this query type.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Match => "match",
            QueryType::Term => "term",
            QueryType::Wildcard => "wildcard",
            QueryType::Prefix => "prefix",
            QueryType::MatchPhrasePrefix => "match_phrase_prefix",
            QueryType::Regexp => "regexp",
            QueryType::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryType::ALL
            .into_iter()
            .find(|qt| qt.as_str() == s)
            .ok_or_else(|| StorageError::InvalidQuery {
                message: format!(
                    "unsupported query type '{}', expected one of: {}",
                    s,
                    QueryType::ALL.map(|qt| qt.as_str()).join(", ")
                ),
            })
    }
}

/// A single-clause search against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueQuery {
    query_type: QueryType,
    key: String,
    value: String,
}

impl KeyValueQuery {
    /// Creates a key/value query, rejecting fields outside [`SEARCHABLE_FIELDS`].
    pub fn new(
        query_type: QueryType,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> StorageResult<Self> {
        let key = key.into();
        if !SEARCHABLE_FIELDS.contains(&key.as_str()) {
            return Err(StorageError::InvalidQuery {
                message: format!(
                    "unsupported search key '{}', expected one of: {}",
                    key,
                    SEARCHABLE_FIELDS.join(", ")
                ),
            });
        }

        Ok(Self {
            query_type,
            key,
            value: value.into(),
        })
    }

    /// Parses the query type name and validates the key.
    pub fn parse(query_type: &str, key: &str, value: &str) -> StorageResult<Self> {
        Self::new(query_type.parse()?, key, value)
    }

    /// Returns the query type.
    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    /// Returns the targeted field.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the searched value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Builds the engine query document: `{"query": {<type>: {<key>: <value>}}}`.
    pub fn to_query_body(&self) -> Value {
        let mut clause = Map::new();
        clause.insert(self.key.clone(), Value::String(self.value.clone()));

        let mut query = Map::new();
        query.insert(self.query_type.as_str().to_string(), Value::Object(clause));

        json!({ "query": query })
    }
}

/// A caller-supplied query document that passed the raw query policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery {
    body: Map<String, Value>,
}

impl RawQuery {
    /// Parses and validates a raw query document.
    ///
    /// The text must be a JSON object whose top-level keys all appear in
    /// [`ALLOWED_RAW_QUERY_KEYS`]; `size` and `from` must be non-negative
    /// integers. Neither `query` nor `sort` may contain a [`SCRIPT_KEYS`] key
    /// at any depth.
    pub fn parse(text: &str) -> StorageResult<Self> {
        if text.trim().is_empty() {
            return Err(invalid("query must not be empty"));
        }

        let value: Value = serde_json::from_str(text)
            .map_err(|e| invalid(format!("malformed JSON: {}", e)))?;

        let Value::Object(body) = value else {
            return Err(invalid("query must be a JSON object"));
        };

        if let Some(key) = body
            .keys()
            .find(|k| !ALLOWED_RAW_QUERY_KEYS.contains(&k.as_str()))
        {
            return Err(invalid(format!(
                "top-level key '{}' is not allowed, expected any of: {}",
                key,
                ALLOWED_RAW_QUERY_KEYS.join(", ")
            )));
        }

        for key in ["size", "from"] {
            if let Some(v) = body.get(key) {
                if v.as_u64().is_none() {
                    return Err(invalid(format!("'{}' must be a non-negative integer", key)));
                }
            }
        }

        if let Some(query) = body.get("query") {
            if !query.is_object() {
                return Err(invalid("'query' must be a JSON object"));
            }
        }

        for key in ["query", "sort"] {
            if let Some(script) = body.get(key).and_then(find_script_key) {
                return Err(invalid(format!("'{}' is not allowed in '{}'", script, key)));
            }
        }

        Ok(Self { body })
    }

    /// Returns the `query` clause, if any.
    pub fn query_clause(&self) -> Option<&Value> {
        self.body.get("query")
    }

    /// Returns the requested page size, if any.
    pub fn size(&self) -> Option<u64> {
        self.body.get("size").and_then(Value::as_u64)
    }

    /// Returns the requested offset, if any.
    pub fn from(&self) -> Option<u64> {
        self.body.get("from").and_then(Value::as_u64)
    }

    /// Returns the document to send, with `size` capped at `max_size`.
    pub fn to_body(&self, max_size: u64) -> Value {
        let mut body = self.body.clone();
        if self.size().is_some_and(|size| size > max_size) {
            body.insert("size".to_string(), Value::from(max_size));
        }
        Value::Object(body)
    }
}

fn find_script_key(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => map.iter().find_map(|(key, nested)| {
            if SCRIPT_KEYS.contains(&key.as_str()) {
                Some(key.as_str())
            } else {
                find_script_key(nested)
            }
        }),
        Value::Array(items) => items.iter().find_map(find_script_key),
        _ => None,
    }
}

fn invalid(message: impl Into<String>) -> StorageError {
    StorageError::InvalidQuery {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_type_round_trips_names() {
        for qt in QueryType::ALL {
            assert_eq!(qt.as_str().parse::<QueryType>().unwrap(), qt);
        }
        assert_eq!(QueryType::MatchPhrasePrefix.to_string(), "match_phrase_prefix");
    }

    #[test]
    fn test_unknown_query_type() {
        let err = "script".parse::<QueryType>().unwrap_err();
        assert!(matches!(err, StorageError::InvalidQuery { .. }));
        assert!(err.to_string().contains("match_phrase_prefix"));
    }

    #[test]
    fn test_key_value_query_body() {
        let query = KeyValueQuery::parse("match", "name", "Alice").unwrap();
        assert_eq!(
            query.to_query_body(),
            json!({ "query": { "match": { "name": "Alice" } } })
        );
    }

    #[test]
    fn test_key_value_query_accepts_keyword_subfields() {
        for key in ["name.keyword", "job.keyword", "childNames.keyword"] {
            let query = KeyValueQuery::parse("term", key, "Alice").unwrap();
            assert_eq!(query.key(), key);
        }
        assert!(KeyValueQuery::parse("term", "comment.keyword", "x").is_err());
    }

    #[test]
    fn test_key_value_query_rejects_unknown_field() {
        let err = KeyValueQuery::parse("term", "password", "x").unwrap_err();
        assert!(err.to_string().contains("unsupported search key 'password'"));
    }

    #[test]
    fn test_raw_query_accepts_allowed_keys() {
        let query =
            RawQuery::parse(r#"{"query": {"match_all": {}}, "size": 5, "from": 10}"#).unwrap();
        assert_eq!(query.size(), Some(5));
        assert_eq!(query.from(), Some(10));
        assert_eq!(query.query_clause(), Some(&json!({ "match_all": {} })));
    }

    #[test]
    fn test_raw_query_rejections() {
        for text in [
            "",
            "   ",
            "{not json",
            "[1, 2]",
            r#""match_all""#,
            r#"{"aggs": {"jobs": {"terms": {"field": "job"}}}}"#,
            r#"{"query": {"match_all": {}}, "_source": false}"#,
            r#"{"query": {"match_all": {}}, "script_fields": {}}"#,
            r#"{"size": -1}"#,
            r#"{"from": "ten"}"#,
            r#"{"query": "name:Alice"}"#,
            r#"{"query": {"script": {"script": {"source": "doc['job'].size() > 0"}}}}"#,
            r#"{"query": {"bool": {"filter": [{"script": {"script": "true"}}]}}}"#,
            r#"{"query": {"function_score": {"query": {"match_all": {}}, "script_score": {"script": {"source": "1"}}}}}"#,
            r#"{"sort": {"_script": {"type": "number", "script": {"source": "1"}, "order": "asc"}}}"#,
            r#"{"sort": [{"name.keyword": "asc"}, {"_script": {"type": "number", "script": "1"}}]}"#,
        ] {
            let result = RawQuery::parse(text);
            assert!(
                matches!(result, Err(StorageError::InvalidQuery { .. })),
                "expected rejection for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_raw_query_script_rejection_names_key() {
        let err = RawQuery::parse(r#"{"sort": {"_script": {"script": "1"}}}"#).unwrap_err();
        assert_eq!(err.to_string(), "invalid query: '_script' is not allowed in 'sort'");
    }

    #[test]
    fn test_raw_query_accepts_sort_without_scripts() {
        let text = r#"{"query": {"match": {"job": "cook"}}, "sort": [{"name.keyword": "asc"}]}"#;
        let query = RawQuery::parse(text).unwrap();
        assert_eq!(query.to_body(10)["sort"], json!([{ "name.keyword": "asc" }]));
    }

    #[test]
    fn test_raw_query_size_cap() {
        let query = RawQuery::parse(r#"{"size": 50000}"#).unwrap();
        assert_eq!(query.to_body(10000)["size"], 10000);

        let query = RawQuery::parse(r#"{"size": 3}"#).unwrap();
        assert_eq!(query.to_body(10000)["size"], 3);

        let query = RawQuery::parse(r#"{"query": {"term": {"job": "cook"}}}"#).unwrap();
        assert!(query.to_body(10000).get("size").is_none());
    }
}
