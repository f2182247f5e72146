use super::rank_by_unique_users;
use crate::context::RecommenderContext;
use crate::error::{RecommenderError, Result};
use crate::ids::{ArticleId, RawId, UserId};
use crate::models::{Neighbor, Recommendations, ScoredUser};
use crate::utils::desc;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// User-based Collaborative Filtering
///
/// Algorithm:
/// 1. Cosine similarity between the target user's row and every other row
/// 2. Walk neighbors from most to least similar
/// 3. Collect articles the target has not seen, in neighbor order, until `m` are found
///
/// The ranked variant breaks similarity ties by neighbor activity (row sum), so
/// broadly active neighbors are consulted before sparse ones.
pub struct CollaborativeEngine<'a> {
    ctx: &'a RecommenderContext,
}

impl<'a> CollaborativeEngine<'a> {
    pub fn new(ctx: &'a RecommenderContext) -> Self {
        Self { ctx }
    }

    /// Articles the user interacted with, in matrix column order, with titles
    pub fn articles_for(&self, user_id: UserId) -> Result<(Vec<ArticleId>, Vec<String>)> {
        let ids = self.seen_articles(user_id)?;
        let titles = self.ctx.catalog().aligned_titles(&ids);
        Ok((ids, titles))
    }

    pub fn names_for<I, T>(&self, article_ids: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: Into<RawId>,
    {
        self.ctx.names_for(article_ids)
    }

    /// Most frequently occurring article ids in the raw log.
    /// Equal counts are ordered by ascending article id.
    pub fn top_article_ids(&self, n: Option<usize>) -> Vec<ArticleId> {
        let config = self.ctx.config();
        let n = config.resolve_limit(n, config.default_top_articles);

        self.ctx
            .catalog()
            .by_occurrence()
            .into_iter()
            .take(n)
            .map(|(aid, _)| aid)
            .collect()
    }

    /// Titles of the most frequently occurring articles, in rank order, without
    /// repeated titles
    pub fn top_articles(&self, n: Option<usize>) -> Vec<String> {
        let ids = self.top_article_ids(n);
        let mut seen_titles: HashSet<String> = HashSet::new();

        self.ctx
            .catalog()
            .titles_of(&ids)
            .into_iter()
            .filter(|title| seen_titles.insert(title.clone()))
            .collect()
    }

    /// Other users ordered by cosine similarity, most similar first
    pub fn similar_users(&self, user_id: UserId) -> Result<Vec<UserId>> {
        Ok(self
            .similar_users_with_scores(user_id)?
            .into_iter()
            .map(|s| s.user_id)
            .collect())
    }

    /// Same ordering as [`similar_users`](Self::similar_users), with scores.
    /// Equal similarities keep ascending user id order.
    pub fn similar_users_with_scores(&self, user_id: UserId) -> Result<Vec<ScoredUser>> {
        let matrix = self.ctx.matrix();
        let sims = matrix
            .user_similarities(user_id)
            .ok_or_else(|| RecommenderError::user_not_found(user_id))?;

        let mut scored: Vec<ScoredUser> = matrix
            .user_ids()
            .iter()
            .zip(sims.iter())
            .filter(|(uid, _)| **uid != user_id)
            .map(|(uid, sim)| ScoredUser {
                user_id: *uid,
                similarity: *sim,
            })
            .collect();

        scored.sort_by(|a, b| desc(a.similarity, b.similarity));

        debug!(
            "Similar users: user_id={}, neighbors={}",
            user_id,
            scored.len()
        );

        Ok(scored)
    }

    /// Neighbors sorted by (similarity desc, interaction count desc), then user id
    pub fn ranked_neighbors(&self, user_id: UserId) -> Result<Vec<Neighbor>> {
        let matrix = self.ctx.matrix();
        let sims = matrix
            .user_similarities(user_id)
            .ok_or_else(|| RecommenderError::user_not_found(user_id))?;
        let counts = matrix.interaction_counts();

        let mut neighbors: Vec<Neighbor> = matrix
            .user_ids()
            .iter()
            .enumerate()
            .filter(|(_, uid)| **uid != user_id)
            .map(|(idx, uid)| Neighbor {
                neighbor_id: *uid,
                similarity: sims[idx],
                num_interactions: counts[idx] as u64,
            })
            .collect();

        neighbors.sort_by(|a, b| {
            desc(a.similarity, b.similarity)
                .then(b.num_interactions.cmp(&a.num_interactions))
                .then(a.neighbor_id.cmp(&b.neighbor_id))
        });

        Ok(neighbors)
    }

    /// Up to `m` unseen articles gathered from neighbors in similarity order
    pub fn recommend(&self, user_id: UserId, m: Option<usize>) -> Result<Vec<ArticleId>> {
        let config = self.ctx.config();
        let m = config.resolve_limit(m, config.default_recommendations);

        let seen = self.seen_set(user_id)?;
        let neighbors = self.similar_users(user_id)?;
        let recs = self.collect_from_neighbors(&seen, &neighbors, m);

        info!(
            "User-user recommendations: user_id={}, requested={}, returned={}",
            user_id,
            m,
            recs.len()
        );

        Ok(recs)
    }

    /// Like [`recommend`](Self::recommend), walking neighbors in
    /// [`ranked_neighbors`](Self::ranked_neighbors) order, with titles
    pub fn recommend_ranked(&self, user_id: UserId, m: Option<usize>) -> Result<Recommendations> {
        let config = self.ctx.config();
        let m = config.resolve_limit(m, config.default_recommendations);

        let seen = self.seen_set(user_id)?;
        let neighbors: Vec<UserId> = self
            .ranked_neighbors(user_id)?
            .into_iter()
            .map(|n| n.neighbor_id)
            .collect();

        let mut recs = self.collect_from_neighbors(&seen, &neighbors, m);

        if recs.len() > m {
            warn!(
                "Ranked recommendations overflowed: user_id={}, collected={}, m={}; re-ranking by popularity",
                user_id,
                recs.len(),
                m
            );
            recs = rank_by_unique_users(self.ctx.matrix(), &recs)
                .into_iter()
                .take(m)
                .map(|c| c.article_id)
                .collect();
        }

        let titles = self.ctx.catalog().aligned_titles(&recs);

        info!(
            "Ranked user-user recommendations: user_id={}, requested={}, returned={}",
            user_id,
            m,
            recs.len()
        );

        Ok(Recommendations { ids: recs, titles })
    }

    fn seen_articles(&self, user_id: UserId) -> Result<Vec<ArticleId>> {
        self.ctx
            .matrix()
            .articles_of(user_id)
            .ok_or_else(|| RecommenderError::user_not_found(user_id))
    }

    fn seen_set(&self, user_id: UserId) -> Result<HashSet<ArticleId>> {
        Ok(self.seen_articles(user_id)?.into_iter().collect())
    }

    /// Stops the moment `m` articles are collected, mid-neighbor included
    fn collect_from_neighbors(
        &self,
        seen: &HashSet<ArticleId>,
        neighbors: &[UserId],
        m: usize,
    ) -> Vec<ArticleId> {
        let mut recs: Vec<ArticleId> = Vec::new();
        if m == 0 {
            return recs;
        }

        let mut collected: HashSet<ArticleId> = HashSet::new();

        for neighbor in neighbors {
            let articles = match self.ctx.matrix().articles_of(*neighbor) {
                Some(articles) => articles,
                None => continue,
            };

            for aid in articles {
                if seen.contains(&aid) || !collected.insert(aid) {
                    continue;
                }
                recs.push(aid);
                if recs.len() >= m {
                    return recs;
                }
            }
        }

        recs
    }
}
