use sqlx::PgPool;

use crate::{
    error::{AppError, Result},
    models::{average_rating, Review, ReviewResponse},
};

// Postgres SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(code: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION)
}

/// Inserts a review and recomputes the product's rating aggregate in the same
/// transaction. One review per (product, user); a second attempt conflicts.
pub async fn add_review(
    pool: &PgPool,
    product_id: i32,
    user_id: i32,
    rating: i32,
    comment: Option<&str>,
) -> Result<Review> {
    let mut tx = pool.begin().await?;

    let already_reviewed: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM reviews WHERE product_id = $1 AND user_id = $2)",
    )
    .bind(product_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    if already_reviewed {
        return Err(AppError::Conflict(
            "You have already reviewed this product".to_string(),
        ));
    }

    // A concurrent duplicate can slip past the pre-check and land on the
    // (product_id, user_id) unique constraint instead.
    let review = sqlx::query_as::<_, Review>(
        "INSERT INTO reviews (product_id, user_id, rating, comment)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(product_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if is_unique_violation(db.code().as_deref()) => {
            AppError::Conflict("You have already reviewed this product".to_string())
        }
        _ => AppError::from(e),
    })?;

    let ratings: Vec<i32> =
        sqlx::query_scalar("SELECT rating FROM reviews WHERE product_id = $1")
            .bind(product_id)
            .fetch_all(&mut *tx)
            .await?;

    sqlx::query(
        "UPDATE products SET average_rating = $2, total_reviews = $3 WHERE id = $1",
    )
    .bind(product_id)
    .bind(average_rating(&ratings))
    .bind(ratings.len() as i32)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(review)
}

pub async fn reviews_for_product(pool: &PgPool, product_id: i32) -> Result<Vec<ReviewResponse>> {
    let reviews = sqlx::query_as::<_, ReviewResponse>(
        "SELECT r.id, r.product_id, r.user_id, r.rating, r.comment, r.created_at,
                u.first_name, u.last_name, u.avatar
         FROM reviews r
         JOIN users u ON u.id = r.user_id
         WHERE r.product_id = $1
         ORDER BY r.created_at DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use super::is_unique_violation;

    #[test]
    fn only_the_duplicate_key_sqlstate_counts_as_a_conflict() {
        assert!(is_unique_violation(Some("23505")));
        assert!(!is_unique_violation(Some("23503")));
        assert!(!is_unique_violation(None));
    }
}
