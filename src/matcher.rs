//! Partial structural matching of configuration records.
//!
//! An expected record lists only the fields a check cares about. Every
//! expected field must be present in the actual record and equal to it;
//! fields the expectation does not mention are ignored. Sequences are
//! compared positionally, so reordering repeated blocks is a mismatch.

use thiserror::Error;

use crate::record::Record;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// No block of the requested type in the configuration
    #[error("no {block_type} block found")]
    MissingBlockType { block_type: String },

    /// No record with the requested metadata path
    #[error("no resource named {path}")]
    ResourceNotFound { path: String },

    /// Expected field absent from the actual record
    #[error("missing key '{key}' (expected {expected})")]
    MissingKey { key: String, expected: Value },

    /// Field present but unequal
    #[error("value mismatch at '{key}': expected {expected}, found {actual}")]
    ValueMismatch {
        key: String,
        expected: Value,
        actual: Value,
    },

    /// Expected a record or sequence, found a different shape
    #[error("structural mismatch at '{key}': expected a {expected}, found a {actual}")]
    StructuralMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Sequence length differs from the expected one
    #[error("wrong number of resources at '{key}': expected {expected}, found {actual}")]
    LengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
}

impl MatchError {
    /// Dotted location of the discrepancy, or the block/resource name for
    /// lookup failures.
    pub fn key(&self) -> &str {
        match self {
            MatchError::MissingBlockType { block_type } => block_type,
            MatchError::ResourceNotFound { path } => path,
            MatchError::MissingKey { key, .. }
            | MatchError::ValueMismatch { key, .. }
            | MatchError::StructuralMismatch { key, .. }
            | MatchError::LengthMismatch { key, .. } => key,
        }
    }
}

/// Checks that every field of `expected` is present and equal in `actual`.
pub fn matches(actual: &Record, expected: &Record) -> Result<(), MatchError> {
    match_record(actual, expected, "")
}

/// Compares two sequences element by element in order.
pub fn matches_list(actual: &[Value], expected: &[Value]) -> Result<(), MatchError> {
    match_sequence(actual, expected, "")
}

/// Returns the first record whose metadata path equals `path`.
pub fn find_by_path<'a>(records: &'a [Record], path: &str) -> Option<&'a Record> {
    records.iter().find(|record| record.path() == Some(path))
}

fn match_record(actual: &Record, expected: &Record, at: &str) -> Result<(), MatchError> {
    for (key, want) in expected.iter() {
        let here = child(at, key);
        let Some(got) = actual.get(key) else {
            return Err(MatchError::MissingKey {
                key: here,
                expected: want.clone(),
            });
        };
        match_value(got, want, here)?;
    }
    Ok(())
}

fn match_sequence(actual: &[Value], expected: &[Value], at: &str) -> Result<(), MatchError> {
    if actual.len() != expected.len() {
        return Err(MatchError::LengthMismatch {
            key: at.to_string(),
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (i, (got, want)) in actual.iter().zip(expected).enumerate() {
        match_value(got, want, format!("{at}[{i}]"))?;
    }
    Ok(())
}

fn match_value(actual: &Value, expected: &Value, here: String) -> Result<(), MatchError> {
    match (expected, actual) {
        (Value::Record(want), Value::Record(got)) => match_record(got, want, &here),
        (Value::Sequence(want), Value::Sequence(got)) => match_sequence(got, want, &here),
        (Value::Record(_) | Value::Sequence(_), other) => Err(MatchError::StructuralMismatch {
            key: here,
            expected: expected.kind(),
            actual: other.kind(),
        }),
        (want, got) if want == got => Ok(()),
        (want, got) => Err(MatchError::ValueMismatch {
            key: here,
            expected: want.clone(),
            actual: got.clone(),
        }),
    }
}

fn child(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{at}.{key}")
    }
}
