//! Immutable recommender context
//!
//! Holds everything both engines read: the interaction matrix, the article
//! catalog, optional latent factors and the query defaults. Constructed once,
//! never mutated, borrowed by [`CollaborativeEngine`] and [`ContentEngine`].

use crate::catalog::ArticleCatalog;
use crate::config::RecommenderConfig;
use crate::error::{RecommenderError, Result};
use crate::ids::RawId;
use crate::latent::LatentFactors;
use crate::matrix::InteractionMatrix;
use crate::models::InteractionLog;
use crate::services::{CollaborativeEngine, ContentEngine};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RecommenderContext {
    matrix: InteractionMatrix,
    catalog: ArticleCatalog,
    latent: Option<LatentFactors>,
    config: RecommenderConfig,
}

impl RecommenderContext {
    /// Build with default configuration and no latent factors
    pub fn new(log: &InteractionLog) -> Self {
        Self {
            matrix: InteractionMatrix::build(log),
            catalog: ArticleCatalog::build(log),
            latent: None,
            config: RecommenderConfig::default(),
        }
    }

    pub fn builder(log: &InteractionLog) -> RecommenderContextBuilder<'_> {
        RecommenderContextBuilder {
            log,
            latent: None,
            config: None,
        }
    }

    pub fn collaborative(&self) -> CollaborativeEngine<'_> {
        CollaborativeEngine::new(self)
    }

    pub fn content(&self) -> ContentEngine<'_> {
        ContentEngine::new(self)
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn catalog(&self) -> &ArticleCatalog {
        &self.catalog
    }

    pub fn latent(&self) -> Option<&LatentFactors> {
        self.latent.as_ref()
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Titles for the given article ids; unknown ids are dropped
    pub fn names_for<I, T>(&self, article_ids: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: Into<RawId>,
    {
        self.catalog.names_for(article_ids)
    }
}

pub struct RecommenderContextBuilder<'a> {
    log: &'a InteractionLog,
    latent: Option<LatentFactors>,
    config: Option<RecommenderConfig>,
}

impl<'a> RecommenderContextBuilder<'a> {
    pub fn latent_factors(mut self, latent: LatentFactors) -> Self {
        self.latent = Some(latent);
        self
    }

    pub fn config(mut self, config: RecommenderConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<RecommenderContext> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| RecommenderError::Configuration(e.to_string()))?;

        let matrix = InteractionMatrix::build(self.log);
        let catalog = ArticleCatalog::build(self.log);

        if let Some(latent) = &self.latent {
            latent.ensure_aligned(matrix.article_ids().len())?;
        }

        let (users, articles) = matrix.shape();
        info!(
            "Recommender context ready: users={}, articles={}, cataloged={}, clusters={}, latent_features={}",
            users,
            articles,
            catalog.len(),
            catalog.has_cluster_column(),
            self.latent.as_ref().map(|l| l.num_features()).unwrap_or(0)
        );

        Ok(RecommenderContext {
            matrix,
            catalog,
            latent: self.latent,
            config,
        })
    }
}
