pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod product;
pub mod review;
pub mod types;

pub use error::FilterError;
pub use filter::Filter;
pub use product::{ProductFilterSpec, ProductListParams, ProductSort, StockStatus};
pub use review::{ReviewFilterSpec, ReviewListParams};
pub use types::*;

/// Treat absent and blank query parameters the same way.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
