pub mod format;

pub use format::{DashboardProduct, DashboardReview, MediaUrls};
