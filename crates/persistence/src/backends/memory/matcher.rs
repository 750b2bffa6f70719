//! In-process evaluation of single-clause queries.
//!
//! Text fields (`name`, `job`, `childNames`, `comment`) are compared term by
//! term after a lowercase, split-on-non-alphanumeric analysis, as the engine's
//! standard analyzer would index them. `id` and any `<field>.keyword` sub-field
//! are compared as whole values.

use regex::Regex;
use serde_json::Value;

use crate::error::{StorageError, StorageResult};
use crate::types::{KeyValueQuery, QueryType, RawQuery, UserInfo};

/// Largest edit distance accepted by `fuzzy`.
const MAX_EDITS: usize = 2;

/// A compiled query clause.
#[derive(Debug)]
pub(crate) enum Clause {
    MatchAll,
    Field(FieldClause),
}

#[derive(Debug)]
pub(crate) struct FieldClause {
    query_type: QueryType,
    field: String,
    keyword: bool,
    value: String,
    pattern: Option<Regex>,
}

impl Clause {
    pub(crate) fn from_key_value(query: &KeyValueQuery) -> StorageResult<Self> {
        FieldClause::new(query.query_type(), query.key(), query.value().to_string())
            .map(Clause::Field)
    }

    /// Compiles a raw query. Only `match_all` and a single
    /// `{<type>: {<field>: <value>}}` clause are understood.
    pub(crate) fn from_raw(query: &RawQuery) -> StorageResult<Self> {
        let Some(clause) = query.query_clause() else {
            return Ok(Clause::MatchAll);
        };

        let (kind, body) = single_entry(clause)?;
        if kind == "match_all" {
            return Ok(Clause::MatchAll);
        }

        let query_type: QueryType = kind.parse()?;
        let (field, spec) = single_entry(body)?;

        let value = match spec {
            Value::String(s) => s.clone(),
            Value::Object(options) => options
                .get("value")
                .or_else(|| options.get("query"))
                .and_then(Value::as_str)
                .ok_or_else(unsupported)?
                .to_string(),
            _ => return Err(unsupported()),
        };

        FieldClause::new(query_type, field, value).map(Clause::Field)
    }

    pub(crate) fn matches(&self, record: &UserInfo) -> bool {
        match self {
            Clause::MatchAll => true,
            Clause::Field(clause) => clause.matches(record),
        }
    }
}

impl FieldClause {
    fn new(query_type: QueryType, field: &str, value: String) -> StorageResult<Self> {
        let (field, keyword) = match field.strip_suffix(".keyword") {
            Some(base) => (base, true),
            None => (field, field == "id"),
        };

        let pattern = match query_type {
            QueryType::Wildcard => Some(compile(&glob_to_regex(&value))?),
            QueryType::Regexp => Some(compile(&format!("^(?:{})$", value))?),
            _ => None,
        };

        Ok(Self {
            query_type,
            field: field.to_string(),
            keyword,
            value,
            pattern,
        })
    }

    fn matches(&self, record: &UserInfo) -> bool {
        let values = field_values(record, &self.field);
        if values.is_empty() {
            return false;
        }

        if self.query_type == QueryType::MatchPhrasePrefix && !self.keyword {
            let query = analyze(&self.value);
            return values
                .iter()
                .any(|v| phrase_prefix(&analyze(v), &query));
        }

        if self.query_type == QueryType::Match && !self.keyword {
            let query = analyze(&self.value);
            return values
                .iter()
                .flat_map(|v| analyze(v))
                .any(|term| query.contains(&term));
        }

        let terms: Vec<String> = if self.keyword {
            values.iter().map(|v| v.to_string()).collect()
        } else {
            values.iter().flat_map(|v| analyze(v)).collect()
        };

        terms.iter().any(|term| self.matches_term(term))
    }

    fn matches_term(&self, term: &str) -> bool {
        match self.query_type {
            QueryType::Match | QueryType::Term => term == self.value,
            QueryType::Prefix | QueryType::MatchPhrasePrefix => term.starts_with(&self.value),
            QueryType::Wildcard | QueryType::Regexp => self
                .pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(term)),
            QueryType::Fuzzy => levenshtein(term, &self.value) <= MAX_EDITS,
        }
    }
}

fn field_values<'a>(record: &'a UserInfo, field: &str) -> Vec<&'a str> {
    match field {
        "id" => vec![record.id.as_str()],
        "name" => vec![record.name.as_str()],
        "job" => vec![record.job.as_str()],
        "comment" => vec![record.comment.as_str()],
        "childNames" => record.child_names.iter().map(String::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Lowercases and splits on anything that is not alphanumeric.
fn analyze(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// All query terms appear consecutively; the last one only as a prefix.
fn phrase_prefix(terms: &[String], query: &[String]) -> bool {
    let Some((last, head)) = query.split_last() else {
        return false;
    };
    if terms.len() < query.len() {
        return false;
    }

    (0..=terms.len() - query.len()).any(|start| {
        head.iter()
            .zip(&terms[start..])
            .all(|(q, t)| q == t)
            && terms[start + head.len()].starts_with(last.as_str())
    })
}

fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push('^');
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    pattern
}

fn compile(pattern: &str) -> StorageResult<Regex> {
    Regex::new(pattern).map_err(|e| StorageError::InvalidQuery {
        message: format!("invalid pattern: {}", e),
    })
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

fn single_entry(value: &Value) -> StorageResult<(&str, &Value)> {
    let object = value.as_object().ok_or_else(unsupported)?;
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some((key, value)), None) => Ok((key.as_str(), value)),
        _ => Err(unsupported()),
    }
}

fn unsupported() -> StorageError {
    StorageError::InvalidQuery {
        message: "the memory backend only supports match_all or a single \
                  {<queryType>: {<field>: <value>}} clause"
            .to_string(),
    }
}
