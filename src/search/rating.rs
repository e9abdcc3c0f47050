use serde::{Deserialize, Serialize};

/// Arithmetic mean of the ratings; 0 when there are none.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    sum as f64 / ratings.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[i32]) -> Self {
        Self {
            average: average_rating(ratings),
            count: ratings.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reviews_averages_to_zero() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(RatingSummary::from_ratings(&[]).count, 0);
    }

    #[test]
    fn plain_mean() {
        assert_eq!(average_rating(&[5]), 5.0);
        assert_eq!(average_rating(&[4, 5]), 4.5);
        assert!((average_rating(&[1, 2, 2]) - 5.0 / 3.0).abs() < 1e-12);
    }
}
