use crate::error::{RecommenderError, Result};
use crate::ids::{normalize_id, ArticleId, RawId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column names of the tabular interaction log
pub const USER_ID_COLUMN: &str = "user_id";
pub const ARTICLE_ID_COLUMN: &str = "article_id";
pub const TITLE_COLUMN: &str = "title";
pub const CLUSTER_COLUMN: &str = "title_cluster";

/// One row of the interaction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// `None` for anonymous rows; these never reach the interaction matrix
    pub user_id: Option<UserId>,
    pub article_id: ArticleId,
    /// `None` when the row has a `null` title
    pub title: Option<String>,
    pub cluster_label: Option<i64>,
}

impl Interaction {
    pub fn new(user_id: UserId, article_id: ArticleId, title: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            article_id,
            title: Some(title.into()),
            cluster_label: None,
        }
    }

    pub fn with_cluster(mut self, cluster_label: i64) -> Self {
        self.cluster_label = Some(cluster_label);
        self
    }
}

/// Validated, ordered interaction log
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    records: Vec<Interaction>,
    has_cluster_column: bool,
}

impl InteractionLog {
    /// Build from typed records. The cluster column is considered present when at
    /// least one record carries a label.
    pub fn from_records(records: Vec<Interaction>) -> Self {
        let has_cluster_column = records.iter().any(|r| r.cluster_label.is_some());
        Self {
            records,
            has_cluster_column,
        }
    }

    /// Build from typed records with an explicit cluster-column flag, for tables
    /// whose cluster column exists but is entirely empty.
    pub fn with_cluster_column(records: Vec<Interaction>, has_cluster_column: bool) -> Self {
        Self {
            records,
            has_cluster_column,
        }
    }

    /// Parse a JSON array of row objects.
    ///
    /// Required columns: `user_id` (may be `null`), `article_id`, `title` (may be `null`).
    /// Optional column: `title_cluster`. Any other keys are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let rows = value.as_array().ok_or_else(|| {
            RecommenderError::MalformedLog("expected a JSON array of row objects".to_string())
        })?;

        let mut records = Vec::with_capacity(rows.len());
        let mut has_cluster_column = false;

        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_object().ok_or_else(|| {
                RecommenderError::MalformedLog(format!("row {} is not an object", idx))
            })?;

            if row.contains_key(CLUSTER_COLUMN) {
                has_cluster_column = true;
            }

            let user_id = optional_id(row, idx, USER_ID_COLUMN, true)?;
            let article_id = optional_id(row, idx, ARTICLE_ID_COLUMN, true)?.ok_or_else(|| {
                RecommenderError::MalformedLog(format!(
                    "row {}: column `{}` is null",
                    idx, ARTICLE_ID_COLUMN
                ))
            })?;
            let title = match required(row, idx, TITLE_COLUMN)? {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => {
                    return Err(RecommenderError::MalformedLog(format!(
                        "row {}: column `{}` must be a string, got {}",
                        idx, TITLE_COLUMN, other
                    )))
                }
            };
            let cluster_label = optional_id(row, idx, CLUSTER_COLUMN, false)?;

            records.push(Interaction {
                user_id,
                article_id,
                title,
                cluster_label,
            });
        }

        Ok(Self {
            records,
            has_cluster_column,
        })
    }

    pub fn records(&self) -> &[Interaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_cluster_column(&self) -> bool {
        self.has_cluster_column
    }
}

fn required<'a>(row: &'a Map<String, Value>, idx: usize, column: &str) -> Result<&'a Value> {
    row.get(column).ok_or_else(|| {
        RecommenderError::MalformedLog(format!(
            "row {}: missing required column `{}`",
            idx, column
        ))
    })
}

fn optional_id(
    row: &Map<String, Value>,
    idx: usize,
    column: &str,
    is_required: bool,
) -> Result<Option<i64>> {
    let value = if is_required {
        required(row, idx, column)?
    } else {
        match row.get(column) {
            Some(v) => v,
            None => return Ok(None),
        }
    };

    if value.is_null() {
        return Ok(None);
    }

    let raw: RawId = serde_json::from_value(value.clone()).map_err(|_| {
        RecommenderError::MalformedLog(format!(
            "row {}: column `{}` has unsupported value {}",
            idx, column, value
        ))
    })?;

    normalize_id(raw)
        .map(Some)
        .map_err(|e| RecommenderError::MalformedLog(format!("row {}: column `{}`: {}", idx, column, e)))
}

/// Neighbor of a target user, as produced by neighbor ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub neighbor_id: UserId,
    pub similarity: f64,
    pub num_interactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredUser {
    pub user_id: UserId,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    pub article_id: ArticleId,
    pub similarity: f64,
}

/// Article paired with the number of distinct users who interacted with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleCount {
    pub article_id: ArticleId,
    pub unique_users: u64,
}

/// Recommended ids with their titles, index-aligned
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Recommendations {
    pub ids: Vec<ArticleId>,
    pub titles: Vec<String>,
}

impl Recommendations {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_parses_float_ids_and_ignores_extra_columns() {
        let json = r#"[
            {"user_id": 1.0, "article_id": 1430.0, "title": "using pixiedust", "title_cluster": 3, "email": "a@x.com"},
            {"user_id": null, "article_id": "1314", "title": "healthcare python"}
        ]"#;

        let log = InteractionLog::from_json(json).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.has_cluster_column());

        let first = &log.records()[0];
        assert_eq!(first.user_id, Some(1));
        assert_eq!(first.article_id, 1430);
        assert_eq!(first.cluster_label, Some(3));

        let second = &log.records()[1];
        assert_eq!(second.user_id, None);
        assert_eq!(second.article_id, 1314);
        assert_eq!(second.cluster_label, None);
    }

    #[test]
    fn test_from_json_missing_required_column() {
        let json = r#"[{"user_id": 1, "article_id": 101}]"#;
        let err = InteractionLog::from_json(json).unwrap_err();
        match err {
            RecommenderError::MalformedLog(msg) => {
                assert!(msg.contains("row 0"));
                assert!(msg.contains("title"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_json_null_title_is_untitled() {
        let json = r#"[
            {"user_id": 1, "article_id": 101, "title": null},
            {"user_id": 2, "article_id": 102, "title": "B"}
        ]"#;
        let log = InteractionLog::from_json(json).unwrap();
        assert_eq!(log.records()[0].title, None);
        assert_eq!(log.records()[1].title.as_deref(), Some("B"));

        let numeric = r#"[{"user_id": 1, "article_id": 101, "title": 7}]"#;
        assert!(matches!(
            InteractionLog::from_json(numeric),
            Err(RecommenderError::MalformedLog(_))
        ));
    }

    #[test]
    fn test_from_json_missing_user_column_is_malformed() {
        let json = r#"[{"article_id": 101, "title": "A"}]"#;
        assert!(matches!(
            InteractionLog::from_json(json),
            Err(RecommenderError::MalformedLog(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(matches!(
            InteractionLog::from_json(r#"{"user_id": 1}"#),
            Err(RecommenderError::MalformedLog(_))
        ));
        assert!(matches!(
            InteractionLog::from_json("not json"),
            Err(RecommenderError::Serialization(_))
        ));
    }

    #[test]
    fn test_empty_json_log() {
        let log = InteractionLog::from_json("[]").unwrap();
        assert!(log.is_empty());
        assert!(!log.has_cluster_column());
    }

    #[test]
    fn test_from_records_cluster_column_detection() {
        let without = InteractionLog::from_records(vec![Interaction::new(1, 101, "A")]);
        assert!(!without.has_cluster_column());

        let with = InteractionLog::from_records(vec![
            Interaction::new(1, 101, "A"),
            Interaction::new(2, 102, "B").with_cluster(4),
        ]);
        assert!(with.has_cluster_column());

        let explicit = InteractionLog::with_cluster_column(vec![Interaction::new(1, 101, "A")], true);
        assert!(explicit.has_cluster_column());
    }
}
