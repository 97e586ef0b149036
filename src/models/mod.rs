mod artisan;
mod pagination;
mod product;
mod review;
mod user;

pub use artisan::*;
pub use pagination::*;
pub use product::*;
pub use review::*;
pub use user::*;
