use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
    error::{AppError, Result},
    models::{
        is_valid_category, Artisan, CategoryCount, CreateProductRequest, CreateReviewRequest,
        Page, Pagination, Product, ProductDetailResponse, ProductListQuery, ProductResponse,
        Review, UpdateProductRequest,
    },
    queries::{artisan_queries, product_queries, review_queries},
    services::upload_service,
    utils::{extractors::extract_user_id, jwt::Claims},
    AppState,
};

/// Joins image and artisan lookups onto a page of product rows.
async fn build_responses(
    state: &AppState,
    products: Vec<Product>,
) -> Result<Vec<ProductResponse>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let artisan_ids: Vec<i32> = products.iter().map(|p| p.artisan_id).collect();

    let mut images_map = product_queries::images_for_products(&state.db, &product_ids).await?;
    let artisans_map = product_queries::artisan_summaries(&state.db, &artisan_ids).await?;

    Ok(products
        .into_iter()
        .map(|product| {
            let images = images_map.remove(&product.id).unwrap_or_default();
            let artisan = artisans_map.get(&product.artisan_id).cloned();
            ProductResponse::new(product, images, artisan)
        })
        .collect())
}

async fn owned_product(state: &AppState, claims: &Claims, id: i32) -> Result<(Product, Artisan)> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let user_id = extract_user_id(claims)?;
    let artisan = artisan_queries::find_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Artisan profile not found".to_string()))?;

    if product.artisan_id != artisan.id {
        return Err(AppError::Forbidden(
            "Not authorized to modify this product".to_string(),
        ));
    }

    Ok((product, artisan))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    validate_create(&payload)?;

    let user_id = extract_user_id(&claims)?;
    let artisan = artisan_queries::find_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Artisan profile not found".to_string()))?;

    let product = product_queries::create_product(&state.db, artisan.id, &payload).await?;

    // Counter lives on a different row; drift under a crash between these two
    // writes is accepted.
    artisan_queries::increment_product_count(&state.db, artisan.id).await?;

    let images = product_queries::images_for_product(&state.db, product.id).await?;
    let summary = product_queries::artisan_summary(&state.db, artisan.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::new(product, images, summary)),
    ))
}

fn validate_create(payload: &CreateProductRequest) -> Result<()> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if payload.description.trim().is_empty() {
        return Err(AppError::BadRequest("Description is required".to_string()));
    }
    if !is_valid_category(&payload.category) {
        return Err(AppError::BadRequest(format!(
            "Unrecognized category: {}",
            payload.category
        )));
    }
    if payload.base_price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Base price cannot be negative".to_string(),
        ));
    }
    if payload.stock.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
    }

    Ok(())
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Page<ProductResponse>>> {
    let pagination = Pagination::new(params.page, params.limit);
    let (products, total) = product_queries::list_products(&state.db, &params, pagination).await?;
    let items = build_responses(&state, products).await?;

    Ok(Json(Page::new(items, total, pagination)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDetailResponse>> {
    let product = product_queries::fetch_and_count_view(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let artisan = product_queries::artisan_summary(&state.db, product.artisan_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Owning artisan missing".to_string()))?;
    let images = product_queries::images_for_product(&state.db, id).await?;
    let reviews = review_queries::reviews_for_product(&state.db, id).await?;

    Ok(Json(ProductDetailResponse {
        is_in_stock: product.is_in_stock(),
        product,
        images,
        artisan,
        reviews,
    }))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    if let Some(ref category) = payload.category {
        if !is_valid_category(category) {
            return Err(AppError::BadRequest(format!(
                "Unrecognized category: {}",
                category
            )));
        }
    }
    if payload.base_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::BadRequest(
            "Base price cannot be negative".to_string(),
        ));
    }

    let (product, artisan) = owned_product(&state, &claims, id).await?;

    let updated = product_queries::update_product(&state.db, &product, payload).await?;
    let images = product_queries::images_for_product(&state.db, id).await?;
    let summary = product_queries::artisan_summary(&state.db, artisan.id).await?;

    Ok(Json(ProductResponse::new(updated, images, summary)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let (product, artisan) = owned_product(&state, &claims, id).await?;

    // Asset removal is best-effort; a missing file never blocks the delete.
    let urls = product_queries::image_urls(&state.db, product.id).await?;
    upload_service::remove_assets(&state.uploads_dir, &urls).await;

    product_queries::delete_product(&state.db, product.id).await?;
    artisan_queries::decrement_product_count(&state.db, artisan.id).await?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

pub async fn add_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let user_id = extract_user_id(&claims)?;

    product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let review = review_queries::add_review(
        &state.db,
        id,
        user_id,
        payload.rating,
        payload.comment.as_deref().map(str::trim),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

const FEATURED_LIMIT: i64 = 12;

pub async fn featured_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = product_queries::featured_products(&state.db, FEATURED_LIMIT).await?;
    let items = build_responses(&state, products).await?;

    Ok(Json(items))
}

pub async fn category_counts(State(state): State<AppState>) -> Result<Json<Vec<CategoryCount>>> {
    let counts = product_queries::category_counts(&state.db).await?;

    Ok(Json(counts))
}
