mod ai;
mod artisans;
mod health;
mod login;
mod products;
mod profile;
mod register;

use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};

use crate::{
    middleware::{artisan_middleware, auth_middleware},
    AppState,
};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        // auth
        .route("/api/auth/register", post(register::register_user))
        .route("/api/auth/login", post(login::login_user))
        .route(
            "/api/auth/profile",
            get(profile::get_profile)
                .put(profile::update_profile)
                .route_layer(from_fn(auth_middleware)),
        )
        .route(
            "/api/auth/change-password",
            put(profile::change_password).route_layer(from_fn(auth_middleware)),
        )
        .route(
            "/api/auth/logout",
            post(profile::logout).route_layer(from_fn(auth_middleware)),
        )
        .route(
            "/api/auth/verify",
            get(profile::verify_token).route_layer(from_fn(auth_middleware)),
        )
        // product catalog
        .route("/api/products", get(products::list_products))
        .route(
            "/api/products",
            post(products::create_product).route_layer(from_fn(artisan_middleware)),
        )
        .route("/api/products/featured/list", get(products::featured_products))
        .route("/api/products/categories/list", get(products::category_counts))
        .route("/api/products/{id}", get(products::get_product))
        .route(
            "/api/products/{id}",
            put(products::update_product)
                .delete(products::delete_product)
                .route_layer(from_fn(artisan_middleware)),
        )
        .route(
            "/api/products/{id}/reviews",
            post(products::add_review).route_layer(from_fn(auth_middleware)),
        )
        // artisan directory
        .route("/api/artisans", get(artisans::list_artisans))
        .route("/api/artisans/search/{query}", get(artisans::search_artisans))
        .route(
            "/api/artisans/profile",
            put(artisans::update_my_profile).route_layer(from_fn(artisan_middleware)),
        )
        .route(
            "/api/artisans/my/products",
            get(artisans::my_products).route_layer(from_fn(artisan_middleware)),
        )
        .route(
            "/api/artisans/my/dashboard",
            get(artisans::dashboard).route_layer(from_fn(artisan_middleware)),
        )
        .route("/api/artisans/{id}", get(artisans::get_artisan))
        // content assist
        .route(
            "/api/ai/analyze-product",
            post(ai::analyze_product).route_layer(from_fn(artisan_middleware)),
        )
        .route(
            "/api/ai/generate-story",
            post(ai::generate_story).route_layer(from_fn(artisan_middleware)),
        )
}
