use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, Result},
    services::content_service::{self, ContentAnalysis, StoryInput},
};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct StoryRequest {
    pub product_title: String,
    pub category: Option<String>,
    pub materials: Option<String>,
    pub technique: Option<String>,
    pub region: Option<String>,
    pub artisan_background: Option<String>,
}

pub async fn analyze_product(Json(payload): Json<AnalyzeRequest>) -> Result<Json<ContentAnalysis>> {
    let analysis = content_service::analyze(&payload.description, &payload.category)?;

    Ok(Json(analysis))
}

pub async fn generate_story(Json(payload): Json<StoryRequest>) -> Result<Json<serde_json::Value>> {
    if payload.product_title.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Product title is required".to_string(),
        ));
    }

    let story = content_service::generate_story(&StoryInput {
        title: payload.product_title.trim(),
        category: payload.category.as_deref(),
        materials: payload.materials.as_deref(),
        technique: payload.technique.as_deref(),
        region: payload.region.as_deref(),
        artisan_background: payload.artisan_background.as_deref(),
    });

    Ok(Json(json!({ "story": story })))
}
