pub mod categories;
pub mod products;
pub mod reviews;
pub mod stats;

pub use stats::get as stats_get;
