pub mod artisan_queries;
pub mod product_queries;
pub mod review_queries;
pub mod user_queries;
