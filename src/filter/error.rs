use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid category ID: {0}")]
    InvalidCategoryId(String),

    #[error("Invalid {param}: {value}")]
    InvalidPrice { param: &'static str, value: String },

    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("Invalid product ID: {0}")]
    InvalidProductId(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),
}
