use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Primary product categories. A product carries exactly one, validated on
/// create and update.
pub const CATEGORIES: &[&str] = &[
    "Pottery & Ceramics",
    "Textiles & Fabrics",
    "Jewelry & Accessories",
    "Woodwork & Furniture",
    "Metalwork",
    "Leather Goods",
    "Art & Paintings",
    "Sculptures",
    "Home Decor",
    "Traditional Instruments",
    "Toys & Games",
    "Bags & Purses",
    "Clothing & Apparel",
    "Kitchen & Dining",
    "Religious Items",
];

pub fn is_valid_category(value: &str) -> bool {
    CATEGORIES.contains(&value)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChange {
    pub price: Decimal,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub artisan_id: i32,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub story: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub base_price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub currency: String,
    pub price_history: Json<Vec<PriceChange>>,
    pub stock: i32,
    pub reserved: i32,
    pub sold: i32,
    pub is_unlimited: bool,
    pub specifications: Json<serde_json::Value>,
    pub status: String,
    pub is_featured: bool,
    pub featured_until: Option<DateTime<Utc>>,
    pub views: i32,
    pub likes: i32,
    pub average_rating: f32,
    pub total_reviews: i32,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// In stock when inventory is unlimited or unreserved stock remains.
    pub fn is_in_stock(&self) -> bool {
        self.is_unlimited || self.stock - self.reserved > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub url: String,
    pub alt: Option<String>,
    pub is_primary: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Image descriptor submitted by clients; positions and primary flags are
/// assigned server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewImage {
    pub url: String,
    pub alt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub story: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub base_price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub currency: Option<String>,
    pub stock: Option<i32>,
    pub is_unlimited: Option<bool>,
    pub specifications: Option<serde_json::Value>,
    #[serde(default)]
    pub images: Vec<NewImage>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub story: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub base_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_unlimited: Option<bool>,
    pub specifications: Option<serde_json::Value>,
    pub status: Option<String>,
    #[serde(default)]
    pub new_images: Vec<NewImage>,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub artisan: Option<i32>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MyProductsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub is_in_stock: bool,
    pub images: Vec<ProductImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artisan: Option<crate::models::ArtisanSummary>,
}

impl ProductResponse {
    pub fn new(
        product: Product,
        images: Vec<ProductImage>,
        artisan: Option<crate::models::ArtisanSummary>,
    ) -> Self {
        Self {
            is_in_stock: product.is_in_stock(),
            product,
            images,
            artisan,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: Product,
    pub is_in_stock: bool,
    pub images: Vec<ProductImage>,
    pub artisan: crate::models::ArtisanSummary,
    pub reviews: Vec<crate::models::ReviewResponse>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sqlx::types::Json;

    fn sample_product(stock: i32, reserved: i32, unlimited: bool) -> Product {
        Product {
            id: 1,
            artisan_id: 1,
            title: "Clay Pot".to_string(),
            description: "Hand thrown".to_string(),
            short_description: None,
            story: None,
            category: "Pottery & Ceramics".to_string(),
            tags: vec![],
            base_price: dec!(750),
            discounted_price: None,
            currency: "INR".to_string(),
            price_history: Json(vec![]),
            stock,
            reserved,
            sold: 0,
            is_unlimited: unlimited,
            specifications: Json(serde_json::json!({})),
            status: "active".to_string(),
            is_featured: false,
            featured_until: None,
            views: 0,
            likes: 0,
            average_rating: 0.0,
            total_reviews: 0,
            slug: "clay-pot-000001".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn fully_reserved_stock_is_not_in_stock() {
        assert!(!sample_product(5, 5, false).is_in_stock());
    }

    #[test]
    fn partially_reserved_stock_is_in_stock() {
        assert!(sample_product(5, 4, false).is_in_stock());
    }

    #[test]
    fn unlimited_ignores_stock_counts() {
        assert!(sample_product(0, 0, true).is_in_stock());
    }

    #[test]
    fn category_membership() {
        assert!(is_valid_category("Pottery & Ceramics"));
        assert!(!is_valid_category("pottery & ceramics"));
        assert!(!is_valid_category("Spaceships"));
    }
}
