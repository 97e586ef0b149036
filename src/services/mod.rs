pub mod content_service;
pub mod upload_service;
