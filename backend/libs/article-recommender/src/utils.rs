// Vector helpers shared by the collaborative and content engines

use ndarray::ArrayView1;
use std::cmp::Ordering;

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Descending comparison for scores. NaN sorts after every number, and equal
/// numbers (including `0.0` and `-0.0`) compare equal so stable sorts keep input order.
pub fn desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_cosine_similarity() {
        let a = Array1::from_vec(vec![1.0, 0.0, 0.0]);
        let b = Array1::from_vec(vec![1.0, 0.0, 0.0]);
        assert!((cosine_similarity(a.view(), b.view()) - 1.0).abs() < 1e-6);

        let c = Array1::from_vec(vec![1.0, 0.0, 0.0]);
        let d = Array1::from_vec(vec![0.0, 1.0, 0.0]);
        assert!((cosine_similarity(c.view(), d.view())).abs() < 1e-6);

        let e = Array1::from_vec(vec![1.0, 1.0]);
        let f = Array1::from_vec(vec![-1.0, -1.0]);
        assert!((cosine_similarity(e.view(), f.view()) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = Array1::from_vec(vec![0.0, 0.0]);
        let b = Array1::from_vec(vec![1.0, 2.0]);
        assert_eq!(cosine_similarity(a.view(), b.view()), 0.0);
    }

    #[test]
    fn test_desc_ordering() {
        let mut scores = vec![0.2, 0.9, 0.5];
        scores.sort_by(|a, b| desc(*a, *b));
        assert_eq!(scores, vec![0.9, 0.5, 0.2]);
    }

    #[test]
    fn test_desc_puts_nan_last() {
        let mut scores = vec![0.3, f64::NAN, 0.8, f64::NAN, -0.1, 0.5, f64::NAN];
        scores.sort_by(|a, b| desc(*a, *b));

        assert_eq!(&scores[..4], &[0.8, 0.5, 0.3, -0.1]);
        assert!(scores[4..].iter().all(|s| s.is_nan()));
    }

    #[test]
    fn test_desc_keeps_signed_zero_ties_stable() {
        let mut pairs = vec![(1, -0.0), (2, 0.0), (3, 1.0)];
        pairs.sort_by(|a, b| desc(a.1, b.1));
        assert_eq!(pairs.iter().map(|p| p.0).collect::<Vec<_>>(), vec![3, 1, 2]);
    }
}
