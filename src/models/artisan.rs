use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Recognized craft specializations. Membership is validated on registration
/// and profile update.
pub const SPECIALIZATIONS: &[&str] = &[
    "Pottery",
    "Textiles",
    "Jewelry",
    "Woodwork",
    "Metalwork",
    "Leather",
    "Painting",
    "Sculpture",
    "Weaving",
    "Embroidery",
    "Glass Work",
    "Stone Carving",
    "Basketry",
    "Calligraphy",
    "Traditional Instruments",
    "Other",
];

pub fn is_valid_specialization(value: &str) -> bool {
    SPECIALIZATIONS.contains(&value)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Workshop {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visiting_hours: Option<String>,
    #[serde(default)]
    pub can_visit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    #[serde(default)]
    pub issued_by: Option<String>,
    #[serde(default)]
    pub issued_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Award {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artisan {
    pub id: i32,
    pub user_id: i32,
    pub business_name: String,
    pub bio: Option<String>,
    pub specializations: Vec<String>,
    pub experience_years: i32,
    pub city: String,
    pub state: String,
    pub country: String,
    pub workshop: Json<Workshop>,
    pub craft_tradition: Json<serde_json::Value>,
    pub social_media: Json<serde_json::Value>,
    pub certifications: Json<Vec<Certification>>,
    pub awards: Json<Vec<Award>>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub total_products: i32,
    pub total_sales: i32,
    pub rating: f32,
    pub review_count: i32,
    pub followers: i32,
    pub profile_views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact artisan fields joined onto product responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ArtisanSummary {
    pub id: i32,
    pub business_name: String,
    pub city: String,
    pub state: String,
    pub rating: f32,
    pub is_verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct ArtisanListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub specialization: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub verified: Option<bool>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArtisanSearchQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArtisanRequest {
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub specializations: Option<Vec<String>>,
    pub experience_years: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub workshop: Option<Workshop>,
    pub craft_tradition: Option<serde_json::Value>,
    pub social_media: Option<serde_json::Value>,
    pub is_active: Option<bool>,
    /// Appended to the existing sequences, never replacing them.
    #[serde(default)]
    pub new_certifications: Vec<Certification>,
    #[serde(default)]
    pub new_awards: Vec<Award>,
    #[serde(default)]
    pub new_workshop_images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtisanResponse {
    #[serde(flatten)]
    pub artisan: Artisan,
    pub user: PublicUserSummary,
    pub products: Vec<crate::models::ProductResponse>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PublicUserSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

/// List and search rows carry the owning user's public identity alongside
/// the profile, same shape as the full artisan response.
#[derive(Debug, Serialize)]
pub struct ArtisanWithUser {
    #[serde(flatten)]
    pub artisan: Artisan,
    pub user: Option<PublicUserSummary>,
}

/// Pairs each artisan with its owning user's summary. An artisan whose user
/// row is missing still serializes, with a null user.
pub fn attach_users(
    artisans: Vec<Artisan>,
    users: &std::collections::HashMap<i32, PublicUserSummary>,
) -> Vec<ArtisanWithUser> {
    artisans
        .into_iter()
        .map(|artisan| {
            let user = users.get(&artisan.user_id).cloned();
            ArtisanWithUser { artisan, user }
        })
        .collect()
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MonthlyStats {
    pub total_views: i64,
    pub total_likes: i64,
    pub average_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct OverallStats {
    pub total_products: i32,
    pub total_sales: i32,
    pub rating: f32,
    pub profile_views: i32,
    pub followers: i32,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub artisan: Artisan,
    pub recent_products: Vec<crate::models::Product>,
    pub monthly_stats: MonthlyStats,
    pub overall_stats: OverallStats,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;

    use super::*;

    fn sample_artisan(id: i32, user_id: i32) -> Artisan {
        Artisan {
            id,
            user_id,
            business_name: format!("Workshop {}", id),
            bio: None,
            specializations: vec![],
            experience_years: 0,
            city: "Jaipur".to_string(),
            state: "Rajasthan".to_string(),
            country: "India".to_string(),
            workshop: Json(Workshop::default()),
            craft_tradition: Json(serde_json::Value::Null),
            social_media: Json(serde_json::Value::Null),
            certifications: Json(vec![]),
            awards: Json(vec![]),
            is_verified: false,
            verified_at: None,
            is_active: true,
            total_products: 0,
            total_sales: 0,
            rating: 0.0,
            review_count: 0,
            followers: 0,
            profile_views: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn attach_users_pairs_each_artisan_with_its_owner() {
        let mut users = HashMap::new();
        users.insert(
            7,
            PublicUserSummary {
                id: 7,
                first_name: "Meera".to_string(),
                last_name: "Sharma".to_string(),
                avatar: None,
            },
        );

        let rows = attach_users(vec![sample_artisan(1, 7), sample_artisan(2, 8)], &users);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user.as_ref().map(|u| u.id), Some(7));
        assert!(rows[1].user.is_none());
    }

    #[test]
    fn artisan_with_user_serializes_flat_with_embedded_user() {
        let users = HashMap::from([(
            7,
            PublicUserSummary {
                id: 7,
                first_name: "Meera".to_string(),
                last_name: "Sharma".to_string(),
                avatar: None,
            },
        )]);
        let rows = attach_users(vec![sample_artisan(1, 7)], &users);

        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["business_name"], "Workshop 1");
        assert_eq!(json["user"]["first_name"], "Meera");
    }
}
