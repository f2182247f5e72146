//! Identifier normalization
//!
//! Article ids frequently arrive float-encoded (`1430.0`) because they were read
//! from a numeric table column. Every public entry point that accepts a list of
//! article ids funnels through [`normalize_ids`] so lookups always happen in the
//! integer id domain used by the matrix and the catalog.

use crate::error::{RecommenderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type UserId = i64;
pub type ArticleId = i64;

/// Identifier as supplied by a caller, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Int(v) => write!(f, "{}", v),
            RawId::Float(v) => write!(f, "{}", v),
            RawId::Text(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for RawId {
    fn from(v: i64) -> Self {
        RawId::Int(v)
    }
}

impl From<i32> for RawId {
    fn from(v: i32) -> Self {
        RawId::Int(i64::from(v))
    }
}

impl From<u32> for RawId {
    fn from(v: u32) -> Self {
        RawId::Int(i64::from(v))
    }
}

impl From<f64> for RawId {
    fn from(v: f64) -> Self {
        RawId::Float(v)
    }
}

impl From<f32> for RawId {
    fn from(v: f32) -> Self {
        RawId::Float(f64::from(v))
    }
}

impl From<&str> for RawId {
    fn from(v: &str) -> Self {
        RawId::Text(v.to_string())
    }
}

impl From<String> for RawId {
    fn from(v: String) -> Self {
        RawId::Text(v)
    }
}

impl From<&RawId> for RawId {
    fn from(v: &RawId) -> Self {
        v.clone()
    }
}

/// Coerce a raw identifier to an integer id: float first, then truncate toward zero
pub fn normalize_id(raw: impl Into<RawId>) -> Result<i64> {
    match raw.into() {
        RawId::Int(v) => Ok(v),
        RawId::Float(v) => float_to_id(v),
        RawId::Text(s) => {
            let parsed: f64 = s.trim().parse().map_err(|_| {
                RecommenderError::InvalidIdentifier(format!("{:?} is not numeric", s))
            })?;
            float_to_id(parsed)
        }
    }
}

/// Normalize every id in order; fails on the first id that cannot be coerced
pub fn normalize_ids<I, T>(raw: I) -> Result<Vec<i64>>
where
    I: IntoIterator<Item = T>,
    T: Into<RawId>,
{
    raw.into_iter().map(normalize_id).collect()
}

fn float_to_id(v: f64) -> Result<i64> {
    if !v.is_finite() || v.trunc() > i64::MAX as f64 || v.trunc() < i64::MIN as f64 {
        return Err(RecommenderError::InvalidIdentifier(format!(
            "{} cannot be represented as an integer id",
            v
        )));
    }
    Ok(v.trunc() as i64)
}
