//! Article recommendations from historical interaction logs
//!
//! Combines two families of recommenders over one immutable context:
//! - **Collaborative**: user-user cosine similarity over a binary user × article matrix,
//!   aggregating unseen articles from the most similar neighbors
//! - **Content-based**: same-cluster articles ranked by popularity, and nearest
//!   neighbors in an externally supplied latent factor space
//!
//! # Example
//!
//! ```rust
//! use article_recommender::{Interaction, InteractionLog, RecommenderContext};
//!
//! let log = InteractionLog::from_records(vec![
//!     Interaction::new(1, 101, "A").with_cluster(0),
//!     Interaction::new(2, 101, "A").with_cluster(0),
//!     Interaction::new(1, 102, "B").with_cluster(1),
//!     Interaction::new(3, 102, "B").with_cluster(1),
//!     Interaction::new(2, 103, "C").with_cluster(1),
//!     Interaction::new(4, 104, "D").with_cluster(2),
//! ]);
//!
//! let ctx = RecommenderContext::new(&log);
//!
//! let recs = ctx.collaborative().recommend(1, Some(3)).unwrap();
//! assert_eq!(recs, vec![103, 104]);
//!
//! let same_topic = ctx.content().similar_by_cluster(102).unwrap();
//! assert_eq!(same_topic, vec![103]);
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod latent;
pub mod matrix;
pub mod models;
pub mod services;
pub mod utils;

// Re-export main types for convenience
pub use catalog::ArticleCatalog;
pub use crate::config::RecommenderConfig;
pub use context::{RecommenderContext, RecommenderContextBuilder};
pub use error::{RecommenderError, Result};
pub use ids::{normalize_id, normalize_ids, ArticleId, RawId, UserId};
pub use latent::LatentFactors;
pub use matrix::InteractionMatrix;
pub use models::{
    ArticleCount, Interaction, InteractionLog, Neighbor, Recommendations, ScoredArticle,
    ScoredUser,
};
pub use services::{CollaborativeEngine, ContentEngine};
