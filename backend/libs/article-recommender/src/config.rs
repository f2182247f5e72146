use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::warn;

/// Default result sizes for queries that do not specify one.
///
/// Loaded from `RECOMMENDER__*` environment variables, e.g.
/// `RECOMMENDER__DEFAULT_RECOMMENDATIONS=20`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommenderConfig {
    /// `m` for user-user recommendations
    pub default_recommendations: usize,
    /// `n` for same-cluster recommendations
    pub default_content_recommendations: usize,
    /// `top_n` for latent-space neighbors
    pub default_latent_top_n: usize,
    /// `n` for most-popular article queries
    pub default_top_articles: usize,
    /// Optional upper bound on result sizes; unbounded when unset
    pub max_recommendations: Option<usize>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_recommendations: 10,
            default_content_recommendations: 5,
            default_latent_top_n: 10,
            default_top_articles: 10,
            max_recommendations: None,
        }
    }
}

impl RecommenderConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = config::Config::builder()
            .set_default(
                "default_recommendations",
                defaults.default_recommendations as i64,
            )?
            .set_default(
                "default_content_recommendations",
                defaults.default_content_recommendations as i64,
            )?
            .set_default("default_latent_top_n", defaults.default_latent_top_n as i64)?
            .set_default("default_top_articles", defaults.default_top_articles as i64)?
            .add_source(
                config::Environment::with_prefix("RECOMMENDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_recommendations == Some(0) {
            return Err(anyhow!("max_recommendations must be greater than 0"));
        }

        let defaults = [
            ("default_recommendations", self.default_recommendations),
            (
                "default_content_recommendations",
                self.default_content_recommendations,
            ),
            ("default_latent_top_n", self.default_latent_top_n),
            ("default_top_articles", self.default_top_articles),
        ];

        for (name, value) in defaults {
            if value == 0 {
                return Err(anyhow!("{} must be greater than 0", name));
            }
            if let Some(max) = self.max_recommendations {
                if value > max {
                    return Err(anyhow!(
                        "{} ({}) exceeds max_recommendations ({})",
                        name,
                        value,
                        max
                    ));
                }
            }
        }

        Ok(())
    }

    /// Resolve a requested result size: fall back to `default`, then apply
    /// `max_recommendations` only when one is configured
    pub fn resolve_limit(&self, requested: Option<usize>, default: usize) -> usize {
        let limit = requested.unwrap_or(default);
        match self.max_recommendations {
            Some(max) if limit > max => {
                warn!(
                    "Requested {} results, clamping to max_recommendations={}",
                    limit, max
                );
                max
            }
            _ => limit,
        }
    }
}
