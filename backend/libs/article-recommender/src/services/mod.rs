pub mod collaborative;
pub mod content;

pub use collaborative::CollaborativeEngine;
pub use content::ContentEngine;

use crate::ids::ArticleId;
use crate::matrix::InteractionMatrix;
use crate::models::ArticleCount;

/// Rank articles by distinct-user count, descending.
///
/// Ids missing from the matrix are skipped. Equal counts keep their input order.
pub(crate) fn rank_by_unique_users(
    matrix: &InteractionMatrix,
    article_ids: &[ArticleId],
) -> Vec<ArticleCount> {
    let mut counts: Vec<ArticleCount> = article_ids
        .iter()
        .filter_map(|aid| {
            matrix.unique_users(*aid).map(|unique_users| ArticleCount {
                article_id: *aid,
                unique_users,
            })
        })
        .collect();

    counts.sort_by(|a, b| b.unique_users.cmp(&a.unique_users));
    counts
}
