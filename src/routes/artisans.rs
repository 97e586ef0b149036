use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use crate::{
    error::{AppError, Result},
    models::{
        attach_users, is_valid_specialization, Artisan, ArtisanListQuery, ArtisanResponse,
        ArtisanSearchQuery, ArtisanWithUser, DashboardResponse, MyProductsQuery, OverallStats,
        Page, Pagination, ProductResponse, UpdateArtisanRequest,
    },
    queries::{artisan_queries, product_queries},
    utils::{extractors::extract_user_id, jwt::Claims},
    AppState,
};

pub async fn list_artisans(
    State(state): State<AppState>,
    Query(params): Query<ArtisanListQuery>,
) -> Result<Json<Page<ArtisanWithUser>>> {
    let pagination = Pagination::new(params.page, params.limit);
    let (artisans, total) = artisan_queries::list_artisans(&state.db, &params, pagination).await?;
    let items = with_owner_summaries(&state, artisans).await?;

    Ok(Json(Page::new(items, total, pagination)))
}

/// Attaches each owning user's public identity, matching the single-profile
/// response shape.
async fn with_owner_summaries(
    state: &AppState,
    artisans: Vec<Artisan>,
) -> Result<Vec<ArtisanWithUser>> {
    if artisans.is_empty() {
        return Ok(Vec::new());
    }

    let user_ids: Vec<i32> = artisans.iter().map(|a| a.user_id).collect();
    let users = artisan_queries::user_summaries(&state.db, &user_ids).await?;

    Ok(attach_users(artisans, &users))
}

const PROFILE_PRODUCT_LIMIT: i64 = 50;

pub async fn get_artisan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ArtisanResponse>> {
    let artisan = artisan_queries::fetch_and_count_view(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Artisan not found".to_string()))?;

    let user = artisan_queries::user_summary(&state.db, artisan.user_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Owning user missing".to_string()))?;

    let (products, _) = product_queries::my_products(
        &state.db,
        artisan.id,
        Some("active"),
        Pagination::new(Some(1), Some(PROFILE_PRODUCT_LIMIT)),
    )
    .await?;

    let mut responses = Vec::with_capacity(products.len());
    if !products.is_empty() {
        let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        let mut images_map =
            product_queries::images_for_products(&state.db, &product_ids).await?;

        for product in products {
            let images = images_map.remove(&product.id).unwrap_or_default();
            responses.push(ProductResponse::new(product, images, None));
        }
    }

    Ok(Json(ArtisanResponse {
        artisan,
        user,
        products: responses,
    }))
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateArtisanRequest>,
) -> Result<Json<Artisan>> {
    if let Some(ref specializations) = payload.specializations {
        for s in specializations {
            if !is_valid_specialization(s) {
                return Err(AppError::BadRequest(format!(
                    "Unrecognized specialization: {}",
                    s
                )));
            }
        }
    }

    let user_id = extract_user_id(&claims)?;
    let artisan = artisan_queries::find_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Artisan profile not found".to_string()))?;

    let updated = artisan_queries::update_profile(&state.db, artisan.id, payload).await?;

    Ok(Json(updated))
}

pub async fn my_products(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<MyProductsQuery>,
) -> Result<Json<Page<ProductResponse>>> {
    let user_id = extract_user_id(&claims)?;
    let artisan = artisan_queries::find_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Artisan profile not found".to_string()))?;

    let pagination = Pagination::new(params.page, params.limit);
    let (products, total) = product_queries::my_products(
        &state.db,
        artisan.id,
        params.status.as_deref(),
        pagination,
    )
    .await?;

    let mut items = Vec::with_capacity(products.len());
    if !products.is_empty() {
        let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        let mut images_map =
            product_queries::images_for_products(&state.db, &product_ids).await?;

        for product in products {
            let images = images_map.remove(&product.id).unwrap_or_default();
            items.push(ProductResponse::new(product, images, None));
        }
    }

    Ok(Json(Page::new(items, total, pagination)))
}

const RECENT_PRODUCT_LIMIT: i64 = 5;

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DashboardResponse>> {
    let user_id = extract_user_id(&claims)?;
    let artisan = artisan_queries::find_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Artisan profile not found".to_string()))?;

    let recent_products =
        artisan_queries::recent_products(&state.db, artisan.id, RECENT_PRODUCT_LIMIT).await?;
    let monthly_stats = artisan_queries::monthly_stats(&state.db, artisan.id).await?;

    let overall_stats = OverallStats {
        total_products: artisan.total_products,
        total_sales: artisan.total_sales,
        rating: artisan.rating,
        profile_views: artisan.profile_views,
        followers: artisan.followers,
    };

    Ok(Json(DashboardResponse {
        artisan,
        recent_products,
        monthly_stats,
        overall_stats,
    }))
}

const DEFAULT_SEARCH_LIMIT: i64 = 10;
const MAX_SEARCH_LIMIT: i64 = 50;

pub async fn search_artisans(
    State(state): State<AppState>,
    Path(term): Path<String>,
    Query(params): Query<ArtisanSearchQuery>,
) -> Result<Json<Vec<ArtisanWithUser>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);

    let artisans = artisan_queries::search_artisans(&state.db, &term, limit).await?;
    let items = with_owner_summaries(&state, artisans).await?;

    Ok(Json(items))
}
