use crate::error::{RecommenderError, Result};
use ndarray::{Array2, ArrayView1};

/// Externally computed latent factors (e.g. the V^T of a truncated SVD).
///
/// Stored as (k latent dimensions × articles); column `j` belongs to the `j`-th
/// article of the interaction matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentFactors {
    vt: Array2<f64>,
}

impl LatentFactors {
    pub fn new(vt: Array2<f64>) -> Self {
        Self { vt }
    }

    /// Accept the (articles × k) layout produced by transforming the item matrix
    pub fn from_article_rows(item_factors: Array2<f64>) -> Self {
        Self {
            vt: item_factors.reversed_axes(),
        }
    }

    pub fn num_features(&self) -> usize {
        self.vt.nrows()
    }

    pub fn num_articles(&self) -> usize {
        self.vt.ncols()
    }

    pub fn article_vector(&self, column: usize) -> Option<ArrayView1<'_, f64>> {
        (column < self.num_articles()).then(|| self.vt.column(column))
    }

    /// Reject factors whose article axis does not line up with the matrix columns
    pub fn ensure_aligned(&self, num_articles: usize) -> Result<()> {
        if self.num_articles() != num_articles {
            return Err(RecommenderError::Configuration(format!(
                "latent factors cover {} articles but the interaction matrix has {}",
                self.num_articles(),
                num_articles
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_layouts_agree() {
        let vt = LatentFactors::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let rows = LatentFactors::from_article_rows(array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);

        assert_eq!(vt.num_features(), 2);
        assert_eq!(vt.num_articles(), 3);
        assert_eq!(vt, rows);
        assert_eq!(vt.article_vector(1).unwrap().to_vec(), vec![2.0, 5.0]);
        assert!(vt.article_vector(3).is_none());
    }

    #[test]
    fn test_alignment_check() {
        let factors = LatentFactors::new(Array2::zeros((2, 4)));
        assert!(factors.ensure_aligned(4).is_ok());
        assert!(matches!(
            factors.ensure_aligned(5),
            Err(RecommenderError::Configuration(_))
        ));
    }
}
