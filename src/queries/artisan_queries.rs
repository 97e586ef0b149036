use std::collections::HashMap;

use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{
        Artisan, ArtisanListQuery, MonthlyStats, Pagination, Product, PublicUserSummary,
        UpdateArtisanRequest,
    },
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Artisan>> {
    let artisan = sqlx::query_as::<_, Artisan>("SELECT * FROM artisans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(artisan)
}

pub async fn find_by_user_id(pool: &PgPool, user_id: i32) -> Result<Option<Artisan>> {
    let artisan = sqlx::query_as::<_, Artisan>("SELECT * FROM artisans WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(artisan)
}

/// Default profile created alongside an artisan registration.
pub async fn create_default(pool: &PgPool, user_id: i32, business_name: &str) -> Result<Artisan> {
    let artisan = sqlx::query_as::<_, Artisan>(
        "INSERT INTO artisans (user_id, business_name) VALUES ($1, $2) RETURNING *",
    )
    .bind(user_id)
    .bind(business_name)
    .fetch_one(pool)
    .await?;

    Ok(artisan)
}

fn push_list_filters(query: &mut QueryBuilder<'_, Postgres>, params: &ArtisanListQuery) {
    query.push(" WHERE is_active = TRUE");

    if let Some(ref specialization) = params.specialization {
        query.push(" AND ");
        query.push_bind(specialization.clone());
        query.push(" = ANY(specializations)");
    }

    if let Some(ref city) = params.city {
        query.push(" AND city ILIKE ");
        query.push_bind(format!("%{}%", city));
    }

    if let Some(ref state) = params.state {
        query.push(" AND state ILIKE ");
        query.push_bind(format!("%{}%", state));
    }

    if params.verified == Some(true) {
        query.push(" AND is_verified = TRUE");
    }
}

pub async fn list_artisans(
    pool: &PgPool,
    params: &ArtisanListQuery,
    pagination: Pagination,
) -> Result<(Vec<Artisan>, i64)> {
    let mut count_query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM artisans");
    push_list_filters(&mut count_query, params);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM artisans");
    push_list_filters(&mut query, params);

    let sort_column = match params.sort.as_deref() {
        Some("createdAt") => "created_at",
        Some("totalProducts") => "total_products",
        _ => "rating",
    };
    let direction = match params.order.as_deref() {
        Some("asc") => "ASC",
        _ => "DESC",
    };

    query.push(format!(" ORDER BY {} {}", sort_column, direction));
    query.push(" LIMIT ");
    query.push_bind(pagination.limit);
    query.push(" OFFSET ");
    query.push_bind(pagination.offset());

    let artisans = query.build_query_as::<Artisan>().fetch_all(pool).await?;

    Ok((artisans, total))
}

/// Fetches a profile and counts the view in the same statement.
pub async fn fetch_and_count_view(pool: &PgPool, id: i32) -> Result<Option<Artisan>> {
    let artisan = sqlx::query_as::<_, Artisan>(
        "UPDATE artisans SET profile_views = profile_views + 1 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(artisan)
}

/// Batch form of [`user_summary`] for list and search responses.
pub async fn user_summaries(
    pool: &PgPool,
    user_ids: &[i32],
) -> Result<HashMap<i32, PublicUserSummary>> {
    let users = sqlx::query_as::<_, PublicUserSummary>(
        "SELECT id, first_name, last_name, avatar FROM users WHERE id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn user_summary(pool: &PgPool, user_id: i32) -> Result<Option<PublicUserSummary>> {
    let user = sqlx::query_as::<_, PublicUserSummary>(
        "SELECT id, first_name, last_name, avatar FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Merges submitted fields into the profile. Certificate, award, and workshop
/// image sequences are appended to, never replaced.
pub async fn update_profile(
    pool: &PgPool,
    id: i32,
    mut req: UpdateArtisanRequest,
) -> Result<Artisan> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE artisans SET updated_at = NOW()");

    if let Some(business_name) = req.business_name {
        query.push(", business_name = ");
        query.push_bind(business_name);
    }
    if let Some(bio) = req.bio {
        query.push(", bio = ");
        query.push_bind(bio);
    }
    if let Some(specializations) = req.specializations {
        query.push(", specializations = ");
        query.push_bind(specializations);
    }
    if let Some(experience_years) = req.experience_years {
        query.push(", experience_years = ");
        query.push_bind(experience_years);
    }
    if let Some(city) = req.city {
        query.push(", city = ");
        query.push_bind(city);
    }
    if let Some(state) = req.state {
        query.push(", state = ");
        query.push_bind(state);
    }
    if let Some(country) = req.country {
        query.push(", country = ");
        query.push_bind(country);
    }
    if let Some(craft_tradition) = req.craft_tradition {
        query.push(", craft_tradition = ");
        query.push_bind(Json(craft_tradition));
    }
    if let Some(social_media) = req.social_media {
        query.push(", social_media = ");
        query.push_bind(Json(social_media));
    }
    if let Some(is_active) = req.is_active {
        query.push(", is_active = ");
        query.push_bind(is_active);
    }

    // A column may be assigned only once per statement, so when a full
    // workshop replacement arrives together with new images, the images are
    // folded into it before binding.
    if let Some(mut workshop) = req.workshop {
        workshop.images.append(&mut req.new_workshop_images);
        query.push(", workshop = ");
        query.push_bind(Json(workshop));
    } else if !req.new_workshop_images.is_empty() {
        query.push(
            ", workshop = jsonb_set(workshop, '{images}', \
             COALESCE(workshop->'images', '[]'::jsonb) || ",
        );
        query.push_bind(Json(req.new_workshop_images));
        query.push(")");
    }

    if !req.new_certifications.is_empty() {
        query.push(", certifications = certifications || ");
        query.push_bind(Json(req.new_certifications));
    }
    if !req.new_awards.is_empty() {
        query.push(", awards = awards || ");
        query.push_bind(Json(req.new_awards));
    }

    query.push(" WHERE id = ");
    query.push_bind(id);
    query.push(" RETURNING *");

    let artisan = query.build_query_as::<Artisan>().fetch_one(pool).await?;

    Ok(artisan)
}

pub async fn search_artisans(pool: &PgPool, term: &str, limit: i64) -> Result<Vec<Artisan>> {
    let pattern = format!("%{}%", term);

    let artisans = sqlx::query_as::<_, Artisan>(
        "SELECT * FROM artisans
         WHERE is_active = TRUE
           AND (business_name ILIKE $1
                OR city ILIKE $1
                OR state ILIKE $1
                OR EXISTS (SELECT 1 FROM unnest(specializations) AS s WHERE s ILIKE $1))
         ORDER BY rating DESC
         LIMIT $2",
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(artisans)
}

pub async fn recent_products(pool: &PgPool, artisan_id: i32, limit: i64) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE artisan_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(artisan_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Rollup over products created in the trailing 30 days.
pub async fn monthly_stats(pool: &PgPool, artisan_id: i32) -> Result<MonthlyStats> {
    let stats = sqlx::query_as::<_, MonthlyStats>(
        "SELECT
            COALESCE(SUM(views), 0)::BIGINT AS total_views,
            COALESCE(SUM(likes), 0)::BIGINT AS total_likes,
            COALESCE(AVG(average_rating), 0)::FLOAT8 AS average_rating
         FROM products
         WHERE artisan_id = $1 AND created_at >= NOW() - INTERVAL '30 days'",
    )
    .bind(artisan_id)
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

pub async fn increment_product_count(pool: &PgPool, id: i32) -> Result<()> {
    sqlx::query("UPDATE artisans SET total_products = total_products + 1 WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Floored at zero so repeated deletes can never drive the counter negative.
pub async fn decrement_product_count(pool: &PgPool, id: i32) -> Result<()> {
    sqlx::query("UPDATE artisans SET total_products = GREATEST(total_products - 1, 0) WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
