//! Article metadata: titles, cluster labels and raw popularity
//!
//! Built from the full interaction log, anonymous rows included. For every
//! attribute the first row that mentions an article wins, except that a `null`
//! title is filled in by the first later row that has one.

use crate::error::Result;
use crate::ids::{normalize_ids, ArticleId, RawId};
use crate::models::InteractionLog;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct ArticleEntry {
    title: Option<String>,
    cluster_label: Option<i64>,
    /// Raw number of log rows mentioning the article
    occurrences: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleCatalog {
    entries: HashMap<ArticleId, ArticleEntry>,
    /// Distinct members per cluster label, in first-occurrence order
    cluster_members: HashMap<i64, Vec<ArticleId>>,
    has_cluster_column: bool,
}

impl ArticleCatalog {
    pub fn build(log: &InteractionLog) -> Self {
        let mut entries: HashMap<ArticleId, ArticleEntry> = HashMap::new();
        let mut cluster_members: HashMap<i64, Vec<ArticleId>> = HashMap::new();

        for record in log.records() {
            entries
                .entry(record.article_id)
                .and_modify(|entry| {
                    entry.occurrences += 1;
                    if entry.title.is_none() {
                        entry.title = record.title.clone();
                    }
                })
                .or_insert_with(|| ArticleEntry {
                    title: record.title.clone(),
                    cluster_label: record.cluster_label,
                    occurrences: 1,
                });

            if let Some(label) = record.cluster_label {
                let members = cluster_members.entry(label).or_default();
                if !members.contains(&record.article_id) {
                    members.push(record.article_id);
                }
            }
        }

        debug!(
            "Built article catalog: {} articles, {} clusters",
            entries.len(),
            cluster_members.len()
        );

        Self {
            entries,
            cluster_members,
            has_cluster_column: log.has_cluster_column(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_cluster_column(&self) -> bool {
        self.has_cluster_column
    }

    pub fn title(&self, article_id: ArticleId) -> Option<&str> {
        self.entries.get(&article_id).and_then(|e| e.title.as_deref())
    }

    pub fn cluster_label(&self, article_id: ArticleId) -> Option<i64> {
        self.entries.get(&article_id).and_then(|e| e.cluster_label)
    }

    pub fn cluster_members(&self, label: i64) -> &[ArticleId] {
        self.cluster_members
            .get(&label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Titles for the given ids, in input order. Unknown and untitled ids are dropped.
    pub fn names_for<I, T>(&self, article_ids: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: Into<RawId>,
    {
        let ids = normalize_ids(article_ids)?;
        Ok(self.titles_of(&ids))
    }

    pub(crate) fn titles_of(&self, ids: &[ArticleId]) -> Vec<String> {
        let titles: Vec<String> = ids
            .iter()
            .filter_map(|id| self.title(*id).map(str::to_string))
            .collect();

        if titles.len() < ids.len() {
            debug!(
                "Dropped {} unknown or untitled article ids during title lookup",
                ids.len() - titles.len()
            );
        }

        titles
    }

    /// One title per id, index-aligned; unknown or untitled articles get an empty title
    pub(crate) fn aligned_titles(&self, ids: &[ArticleId]) -> Vec<String> {
        ids.iter()
            .map(|id| self.title(*id).unwrap_or_default().to_string())
            .collect()
    }

    /// All distinct articles ranked by raw occurrence count, descending.
    /// Equal counts are ordered by ascending article id.
    pub fn by_occurrence(&self) -> Vec<(ArticleId, u64)> {
        let mut counts: Vec<(ArticleId, u64)> = self
            .entries
            .iter()
            .map(|(id, e)| (*id, e.occurrences))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }
}
