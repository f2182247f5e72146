//! User × article interaction matrix
//!
//! Rows are the sorted distinct user ids, columns the sorted distinct article ids,
//! each cell is 1.0 when the user interacted with the article at least once.
//! Rows without a user id are discarded before the matrix is built.

use crate::ids::{ArticleId, UserId};
use crate::models::InteractionLog;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix {
    user_ids: Vec<UserId>,
    article_ids: Vec<ArticleId>,
    user_index: HashMap<UserId, usize>,
    article_index: HashMap<ArticleId, usize>,
    values: Array2<f64>,
    /// Row sums: number of distinct articles each user interacted with
    interaction_counts: Array1<f64>,
    /// Column sums: number of distinct users per article
    unique_user_counts: Array1<f64>,
    row_norms: Array1<f64>,
}

impl InteractionMatrix {
    /// Build the binary matrix from an interaction log. An empty log yields a 0 × 0 matrix.
    pub fn build(log: &InteractionLog) -> Self {
        let pairs: Vec<(UserId, ArticleId)> = log
            .records()
            .iter()
            .filter_map(|r| r.user_id.map(|uid| (uid, r.article_id)))
            .collect();

        let user_ids: Vec<UserId> = pairs
            .iter()
            .map(|(u, _)| *u)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let article_ids: Vec<ArticleId> = pairs
            .iter()
            .map(|(_, a)| *a)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_index = index_of(&user_ids);
        let article_index = index_of(&article_ids);

        let mut values = Array2::<f64>::zeros((user_ids.len(), article_ids.len()));
        for (uid, aid) in &pairs {
            values[[user_index[uid], article_index[aid]]] = 1.0;
        }

        let interaction_counts = values.sum_axis(Axis(1));
        let unique_user_counts = values.sum_axis(Axis(0));
        // Cells are 0/1, so the squared norm equals the row sum
        let row_norms = interaction_counts.mapv(f64::sqrt);

        debug!(
            "Built interaction matrix: {} users x {} articles from {} records ({} discarded without user_id)",
            user_ids.len(),
            article_ids.len(),
            log.len(),
            log.len() - pairs.len()
        );

        Self {
            user_ids,
            article_ids,
            user_index,
            article_index,
            values,
            interaction_counts,
            unique_user_counts,
            row_norms,
        }
    }

    /// (users, articles)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn article_ids(&self) -> &[ArticleId] {
        &self.article_ids
    }

    pub fn user_index(&self, user_id: UserId) -> Option<usize> {
        self.user_index.get(&user_id).copied()
    }

    pub fn article_index(&self, article_id: ArticleId) -> Option<usize> {
        self.article_index.get(&article_id).copied()
    }

    /// Cell value, `None` when either id is unknown
    pub fn get(&self, user_id: UserId, article_id: ArticleId) -> Option<u8> {
        let row = self.user_index(user_id)?;
        let col = self.article_index(article_id)?;
        Some(self.values[[row, col]] as u8)
    }

    pub fn row(&self, user_id: UserId) -> Option<ArrayView1<'_, f64>> {
        self.user_index(user_id).map(|idx| self.values.row(idx))
    }

    /// Articles the user interacted with, in column order
    pub fn articles_of(&self, user_id: UserId) -> Option<Vec<ArticleId>> {
        let row = self.row(user_id)?;
        Some(
            row.iter()
                .zip(&self.article_ids)
                .filter(|(cell, _)| **cell == 1.0)
                .map(|(_, aid)| *aid)
                .collect(),
        )
    }

    pub fn interaction_count(&self, user_id: UserId) -> Option<u64> {
        self.user_index(user_id)
            .map(|idx| self.interaction_counts[idx] as u64)
    }

    pub fn unique_users(&self, article_id: ArticleId) -> Option<u64> {
        self.article_index(article_id)
            .map(|idx| self.unique_user_counts[idx] as u64)
    }

    /// Cosine similarity between the user's row and every row, in row order.
    ///
    /// Rows with a zero norm score 0.
    pub fn user_similarities(&self, user_id: UserId) -> Option<Array1<f64>> {
        let idx = self.user_index(user_id)?;
        let target = self.values.row(idx);
        let target_norm = self.row_norms[idx];

        let dots = self.values.dot(&target);
        let sims = dots
            .iter()
            .zip(self.row_norms.iter())
            .map(|(dot, norm)| {
                let denom = target_norm * norm;
                if denom == 0.0 {
                    0.0
                } else {
                    dot / denom
                }
            })
            .collect::<Array1<f64>>();

        Some(sims)
    }

    pub fn interaction_counts(&self) -> ArrayView1<'_, f64> {
        self.interaction_counts.view()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}

fn index_of(ids: &[i64]) -> HashMap<i64, usize> {
    ids.iter().enumerate().map(|(idx, id)| (*id, idx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interaction;

    fn sample_log() -> InteractionLog {
        InteractionLog::from_records(vec![
            Interaction::new(1, 101, "A"),
            Interaction::new(2, 101, "A"),
            Interaction::new(1, 102, "B"),
            Interaction::new(3, 102, "B"),
            Interaction::new(2, 103, "C"),
            Interaction::new(4, 104, "D"),
        ])
    }

    #[test]
    fn test_build_shape_and_ordering() {
        let matrix = InteractionMatrix::build(&sample_log());
        assert_eq!(matrix.shape(), (4, 4));
        assert_eq!(matrix.user_ids(), &[1, 2, 3, 4]);
        assert_eq!(matrix.article_ids(), &[101, 102, 103, 104]);
        assert!(matrix.values().iter().all(|v| *v == 0.0 || *v == 1.0));
    }

    #[test]
    fn test_duplicates_collapse_and_missing_users_dropped() {
        let mut anonymous = Interaction::new(0, 999, "Z");
        anonymous.user_id = None;

        let log = InteractionLog::from_records(vec![
            Interaction::new(5, 101, "A"),
            Interaction::new(5, 101, "A"),
            Interaction::new(5, 101, "A"),
            anonymous,
        ]);
        let matrix = InteractionMatrix::build(&log);

        assert_eq!(matrix.shape(), (1, 1));
        assert_eq!(matrix.get(5, 101), Some(1));
        assert_eq!(matrix.article_index(999), None);
        assert_eq!(matrix.interaction_count(5), Some(1));
        assert_eq!(matrix.unique_users(101), Some(1));
    }

    #[test]
    fn test_empty_log_yields_empty_matrix() {
        let matrix = InteractionMatrix::build(&InteractionLog::default());
        assert_eq!(matrix.shape(), (0, 0));
        assert!(matrix.is_empty());
        assert!(matrix.user_similarities(1).is_none());
    }

    #[test]
    fn test_row_and_column_sums() {
        let matrix = InteractionMatrix::build(&sample_log());
        assert_eq!(matrix.interaction_count(1), Some(2));
        assert_eq!(matrix.interaction_count(4), Some(1));
        assert_eq!(matrix.unique_users(101), Some(2));
        assert_eq!(matrix.unique_users(104), Some(1));
        assert_eq!(matrix.unique_users(999), None);
    }

    #[test]
    fn test_articles_of_in_column_order() {
        let matrix = InteractionMatrix::build(&sample_log());
        assert_eq!(matrix.articles_of(1), Some(vec![101, 102]));
        assert_eq!(matrix.articles_of(2), Some(vec![101, 103]));
        assert_eq!(matrix.articles_of(42), None);
    }

    #[test]
    fn test_user_similarities() {
        let matrix = InteractionMatrix::build(&sample_log());
        let sims = matrix.user_similarities(1).unwrap();

        // user 1: {101, 102}, user 2: {101, 103}, user 3: {102}, user 4: {104}
        assert!((sims[0] - 1.0).abs() < 1e-9);
        assert!((sims[1] - 0.5).abs() < 1e-9);
        assert!((sims[2] - 1.0 / 2.0_f64.sqrt()).abs() < 1e-9);
        assert!(sims[3].abs() < 1e-9);
    }

    #[test]
    fn test_build_is_deterministic() {
        let log = sample_log();
        assert_eq!(InteractionMatrix::build(&log), InteractionMatrix::build(&log));
    }
}
