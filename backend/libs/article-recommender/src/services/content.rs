use super::rank_by_unique_users;
use crate::context::RecommenderContext;
use crate::error::{RecommenderError, Result};
use crate::ids::{normalize_ids, ArticleId, RawId};
use crate::models::{ArticleCount, Recommendations, ScoredArticle};
use crate::utils::{cosine_similarity, desc};
use tracing::{debug, info};

/// Content-based recommendations
///
/// Two independent signals:
/// - Cluster membership: other articles sharing the target's cluster label,
///   ranked by how many distinct users read them
/// - Latent space: nearest articles by cosine similarity of externally supplied
///   latent factors
pub struct ContentEngine<'a> {
    ctx: &'a RecommenderContext,
}

impl<'a> ContentEngine<'a> {
    pub fn new(ctx: &'a RecommenderContext) -> Self {
        Self { ctx }
    }

    pub fn names_for<I, T>(&self, article_ids: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: Into<RawId>,
    {
        self.ctx.names_for(article_ids)
    }

    /// Other articles in the same cluster, in first-occurrence order.
    ///
    /// An unknown article yields an empty list; a log without a cluster column is
    /// a configuration error.
    pub fn similar_by_cluster(&self, article_id: ArticleId) -> Result<Vec<ArticleId>> {
        let catalog = self.ctx.catalog();
        if !catalog.has_cluster_column() {
            return Err(RecommenderError::Configuration(
                "interaction log has no cluster label column".to_string(),
            ));
        }

        let label = match catalog.cluster_label(article_id) {
            Some(label) => label,
            None => {
                debug!("Cluster lookup: article {} has no cluster label", article_id);
                return Ok(Vec::new());
            }
        };

        let similar: Vec<ArticleId> = catalog
            .cluster_members(label)
            .iter()
            .copied()
            .filter(|aid| *aid != article_id)
            .collect();

        debug!(
            "Cluster lookup: article_id={}, cluster={}, members={}",
            article_id,
            label,
            similar.len()
        );

        Ok(similar)
    }

    /// Candidates present in the matrix, ranked by distinct-user count descending
    pub fn rank_by_popularity<I, T>(&self, article_ids: I) -> Result<Vec<ArticleCount>>
    where
        I: IntoIterator<Item = T>,
        T: Into<RawId>,
    {
        let ids = normalize_ids(article_ids)?;
        Ok(rank_by_unique_users(self.ctx.matrix(), &ids))
    }

    /// Most popular other articles from the same cluster
    pub fn recommend_by_cluster(
        &self,
        article_id: ArticleId,
        n: Option<usize>,
    ) -> Result<Recommendations> {
        let config = self.ctx.config();
        let n = config.resolve_limit(n, config.default_content_recommendations);

        let similar = self.similar_by_cluster(article_id)?;
        let ids: Vec<ArticleId> = rank_by_unique_users(self.ctx.matrix(), &similar)
            .into_iter()
            .take(n)
            .map(|c| c.article_id)
            .collect();
        let titles = self.ctx.catalog().aligned_titles(&ids);

        info!(
            "Content recommendations: article_id={}, candidates={}, returned={}",
            article_id,
            similar.len(),
            ids.len()
        );

        Ok(Recommendations { ids, titles })
    }

    /// Nearest articles in latent space, most similar first
    pub fn similar_by_latent(
        &self,
        article_id: ArticleId,
        top_n: Option<usize>,
    ) -> Result<Vec<ArticleId>> {
        Ok(self
            .similar_by_latent_with_scores(article_id, top_n)?
            .into_iter()
            .map(|s| s.article_id)
            .collect())
    }

    /// Same ordering as [`similar_by_latent`](Self::similar_by_latent), with scores.
    /// Equal similarities keep matrix column order.
    pub fn similar_by_latent_with_scores(
        &self,
        article_id: ArticleId,
        top_n: Option<usize>,
    ) -> Result<Vec<ScoredArticle>> {
        let latent = self.ctx.latent().ok_or_else(|| {
            RecommenderError::Configuration("latent factor matrix not provided".to_string())
        })?;

        let matrix = self.ctx.matrix();
        let idx = matrix
            .article_index(article_id)
            .ok_or_else(|| RecommenderError::article_not_found(article_id))?;

        let target = latent.article_vector(idx).ok_or_else(|| {
            RecommenderError::Configuration(format!(
                "latent factors have no column for article {}",
                article_id
            ))
        })?;

        let config = self.ctx.config();
        let top_n = config.resolve_limit(top_n, config.default_latent_top_n);

        let mut scored: Vec<ScoredArticle> = matrix
            .article_ids()
            .iter()
            .enumerate()
            .filter(|(col, _)| *col != idx)
            .filter_map(|(col, aid)| {
                latent.article_vector(col).map(|v| ScoredArticle {
                    article_id: *aid,
                    similarity: cosine_similarity(target, v),
                })
            })
            .collect();

        scored.sort_by(|a, b| desc(a.similarity, b.similarity));
        scored.truncate(top_n);

        debug!(
            "Latent neighbors: article_id={}, returned={}",
            article_id,
            scored.len()
        );

        Ok(scored)
    }
}
