pub mod category;
pub mod product;
pub mod review;
pub mod user;

pub use category::{Category, CategoryWithCount};
pub use product::{BulkChanges, Product, ProductListing, ProductValues};
pub use review::ReviewListing;
pub use user::User;
