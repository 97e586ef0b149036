use std::collections::HashMap;

use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{
        ArtisanSummary, CreateProductRequest, NewImage, Pagination, Product, ProductImage,
        ProductListQuery, UpdateProductRequest,
    },
    utils::slug::product_slug,
};

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Inserts a product and its images in one transaction. The id is drawn from
/// the sequence up front so the slug can be computed before the row exists.
pub async fn create_product(
    pool: &PgPool,
    artisan_id: i32,
    req: &CreateProductRequest,
) -> Result<Product> {
    let mut tx = pool.begin().await?;

    let id: i64 =
        sqlx::query_scalar("SELECT nextval(pg_get_serial_sequence('products', 'id'))")
            .fetch_one(&mut *tx)
            .await?;
    let id = id as i32;

    let slug = product_slug(&req.title, id);

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, artisan_id, title, description, short_description, story,
         category, tags, base_price, discounted_price, currency, stock, is_unlimited,
         specifications, slug)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING *",
    )
    .bind(id)
    .bind(artisan_id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.short_description)
    .bind(&req.story)
    .bind(&req.category)
    .bind(&req.tags)
    .bind(req.base_price)
    .bind(req.discounted_price)
    .bind(req.currency.as_deref().unwrap_or("INR"))
    .bind(req.stock.unwrap_or(1))
    .bind(req.is_unlimited.unwrap_or(false))
    .bind(Json(
        req.specifications
            .clone()
            .unwrap_or_else(|| serde_json::json!({})),
    ))
    .bind(&slug)
    .fetch_one(&mut *tx)
    .await?;

    insert_images(&mut tx, id, &req.images, 0).await?;

    tx.commit().await?;

    Ok(product)
}

/// Position and primary flag for the image at `index` of a batch appended
/// after `existing_count` prior images. Appends continue the position
/// sequence, and only the very first image a product ever gets is primary, so
/// prior images keep their order and primary flag untouched.
fn image_slot(existing_count: i64, index: usize) -> (i32, bool) {
    let position = existing_count + index as i64;
    (position as i32, position == 0)
}

/// Appends image rows starting after `existing_count`.
async fn insert_images(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    product_id: i32,
    images: &[NewImage],
    existing_count: i64,
) -> Result<()> {
    for (index, image) in images.iter().enumerate() {
        let (position, is_primary) = image_slot(existing_count, index);

        sqlx::query(
            "INSERT INTO product_images (product_id, url, alt, is_primary, position)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product_id)
        .bind(&image.url)
        .bind(&image.alt)
        .bind(is_primary)
        .bind(position)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

pub async fn images_for_product(pool: &PgPool, product_id: i32) -> Result<Vec<ProductImage>> {
    let images = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = $1 ORDER BY position ASC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

pub async fn images_for_products(
    pool: &PgPool,
    product_ids: &[i32],
) -> Result<HashMap<i32, Vec<ProductImage>>> {
    let all_images = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_images WHERE product_id = ANY($1)
         ORDER BY product_id, position ASC",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    let mut images_map: HashMap<i32, Vec<ProductImage>> = HashMap::new();
    for image in all_images {
        images_map.entry(image.product_id).or_default().push(image);
    }

    Ok(images_map)
}

pub async fn artisan_summary(pool: &PgPool, artisan_id: i32) -> Result<Option<ArtisanSummary>> {
    let summary = sqlx::query_as::<_, ArtisanSummary>(
        "SELECT id, business_name, city, state, rating, is_verified
         FROM artisans WHERE id = $1",
    )
    .bind(artisan_id)
    .fetch_optional(pool)
    .await?;

    Ok(summary)
}

pub async fn artisan_summaries(
    pool: &PgPool,
    artisan_ids: &[i32],
) -> Result<HashMap<i32, ArtisanSummary>> {
    let summaries = sqlx::query_as::<_, ArtisanSummary>(
        "SELECT id, business_name, city, state, rating, is_verified
         FROM artisans WHERE id = ANY($1)",
    )
    .bind(artisan_ids)
    .fetch_all(pool)
    .await?;

    Ok(summaries.into_iter().map(|s| (s.id, s)).collect())
}

fn push_list_filters(query: &mut QueryBuilder<'_, Postgres>, params: &ProductListQuery) {
    query.push(" WHERE status = ");
    query.push_bind(params.status.clone().unwrap_or_else(|| "active".to_string()));

    if let Some(ref category) = params.category {
        query.push(" AND category = ");
        query.push_bind(category.clone());
    }

    if let Some(min_price) = params.min_price {
        query.push(" AND base_price >= ");
        query.push_bind(min_price);
    }

    if let Some(max_price) = params.max_price {
        query.push(" AND base_price <= ");
        query.push_bind(max_price);
    }

    if params.featured == Some(true) {
        query.push(" AND is_featured = TRUE");
    }

    if let Some(artisan_id) = params.artisan {
        query.push(" AND artisan_id = ");
        query.push_bind(artisan_id);
    }

    if let Some(ref search) = params.search {
        let pattern = format!("%{}%", search);
        query.push(" AND (title ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR description ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE t ILIKE ");
        query.push_bind(pattern);
        query.push("))");
    }
}

pub async fn list_products(
    pool: &PgPool,
    params: &ProductListQuery,
    pagination: Pagination,
) -> Result<(Vec<Product>, i64)> {
    let mut count_query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM products");
    push_list_filters(&mut count_query, params);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM products");
    push_list_filters(&mut query, params);

    // Unrecognized sort keys fall back to insertion order.
    let sort_column = match params.sort.as_deref() {
        Some("price") => "base_price",
        Some("rating") => "average_rating",
        Some("views") => "views",
        _ => "created_at",
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

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok((products, total))
}

/// Fetches a product, counting the view in the same statement.
pub async fn fetch_and_count_view(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET views = views + 1 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Merges submitted fields. New images are appended after the existing ones
/// inside the same transaction; the slug is recomputed when the title changes.
pub async fn update_product(
    pool: &PgPool,
    product: &Product,
    req: UpdateProductRequest,
) -> Result<Product> {
    let mut tx = pool.begin().await?;

    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE products SET updated_at = NOW()");

    if let Some(ref title) = req.title {
        if *title != product.title {
            query.push(", slug = ");
            query.push_bind(product_slug(title, product.id));
        }
        query.push(", title = ");
        query.push_bind(title.clone());
    }
    if let Some(description) = req.description {
        query.push(", description = ");
        query.push_bind(description);
    }
    if let Some(short_description) = req.short_description {
        query.push(", short_description = ");
        query.push_bind(short_description);
    }
    if let Some(story) = req.story {
        query.push(", story = ");
        query.push_bind(story);
    }
    if let Some(category) = req.category {
        query.push(", category = ");
        query.push_bind(category);
    }
    if let Some(tags) = req.tags {
        query.push(", tags = ");
        query.push_bind(tags);
    }
    if let Some(base_price) = req.base_price {
        if base_price != product.base_price {
            // Price changes are logged before the new value lands.
            query.push(
                ", price_history = price_history || jsonb_build_array(jsonb_build_object(\
                 'price', base_price, 'date', NOW(), 'reason', 'update'))",
            );
        }
        query.push(", base_price = ");
        query.push_bind(base_price);
    }
    if let Some(discounted_price) = req.discounted_price {
        query.push(", discounted_price = ");
        query.push_bind(discounted_price);
    }
    if let Some(stock) = req.stock {
        query.push(", stock = ");
        query.push_bind(stock);
    }
    if let Some(is_unlimited) = req.is_unlimited {
        query.push(", is_unlimited = ");
        query.push_bind(is_unlimited);
    }
    if let Some(specifications) = req.specifications {
        query.push(", specifications = ");
        query.push_bind(Json(specifications));
    }
    if let Some(status) = req.status {
        query.push(", status = ");
        query.push_bind(status);
    }

    query.push(" WHERE id = ");
    query.push_bind(product.id);
    query.push(" RETURNING *");

    let updated = query
        .build_query_as::<Product>()
        .fetch_one(&mut *tx)
        .await?;

    if !req.new_images.is_empty() {
        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_images WHERE product_id = $1")
                .bind(product.id)
                .fetch_one(&mut *tx)
                .await?;

        insert_images(&mut tx, product.id, &req.new_images, existing).await?;
    }

    tx.commit().await?;

    Ok(updated)
}

/// Images and reviews go with the row via ON DELETE CASCADE.
pub async fn delete_product(pool: &PgPool, id: i32) -> Result<()> {
    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn image_urls(pool: &PgPool, product_id: i32) -> Result<Vec<String>> {
    let urls: Vec<String> =
        sqlx::query_scalar("SELECT url FROM product_images WHERE product_id = $1")
            .bind(product_id)
            .fetch_all(pool)
            .await?;

    Ok(urls)
}

pub async fn featured_products(pool: &PgPool, limit: i64) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products
         WHERE is_featured = TRUE AND featured_until > NOW() AND status = 'active'
         ORDER BY average_rating DESC, views DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn category_counts(pool: &PgPool) -> Result<Vec<crate::models::CategoryCount>> {
    let counts = sqlx::query_as::<_, crate::models::CategoryCount>(
        "SELECT category, COUNT(*) AS count FROM products
         WHERE status = 'active'
         GROUP BY category
         ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

pub async fn my_products(
    pool: &PgPool,
    artisan_id: i32,
    status: Option<&str>,
    pagination: Pagination,
) -> Result<(Vec<Product>, i64)> {
    let mut count_query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM products WHERE artisan_id = ");
    count_query.push_bind(artisan_id);
    if let Some(status) = status {
        count_query.push(" AND status = ");
        count_query.push_bind(status.to_string());
    }
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM products WHERE artisan_id = ");
    query.push_bind(artisan_id);
    if let Some(status) = status {
        query.push(" AND status = ");
        query.push_bind(status.to_string());
    }
    query.push(" ORDER BY created_at DESC LIMIT ");
    query.push_bind(pagination.limit);
    query.push(" OFFSET ");
    query.push_bind(pagination.offset());

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok((products, total))
}

#[cfg(test)]
mod tests {
    use super::image_slot;

    #[test]
    fn first_image_of_an_empty_product_is_primary() {
        assert_eq!(image_slot(0, 0), (0, true));
        assert_eq!(image_slot(0, 1), (1, false));
    }

    #[test]
    fn appends_continue_positions_without_touching_prior_images() {
        // Three images exist at positions 0..=2; a two-image append lands at
        // 3 and 4, neither primary, so the earlier slots are never re-derived.
        let appended: Vec<_> = (0..2).map(|i| image_slot(3, i)).collect();
        assert_eq!(appended, vec![(3, false), (4, false)]);

        let existing: Vec<_> = (0..3).map(|i| image_slot(0, i)).collect();
        assert_eq!(existing, vec![(0, true), (1, false), (2, false)]);
    }
}
