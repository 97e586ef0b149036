use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

/// Review joined with the reviewer's public identity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewResponse {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

/// Average rating rounded to one decimal place, 0.0 when there are no
/// ratings.
pub fn average_rating(ratings: &[i32]) -> f32 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i32 = ratings.iter().sum();
    let avg = sum as f64 / ratings.len() as f64;
    ((avg * 10.0).round() / 10.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ratings_average_to_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        // 4 + 5 + 5 = 14 / 3 = 4.666... -> 4.7
        assert_eq!(average_rating(&[4, 5, 5]), 4.7);
        // 1 + 2 = 3 / 2 = 1.5
        assert_eq!(average_rating(&[1, 2]), 1.5);
    }

    #[test]
    fn single_rating_is_itself() {
        assert_eq!(average_rating(&[3]), 3.0);
    }
}
