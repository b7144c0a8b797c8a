use serde::Deserialize;

use super::error::FilterError;
use super::filter::Filter;
use super::non_empty;
use super::types::{FilterOp, FilterOrderInfo, Predicate, QuerySource, SqlParam};

/// Reviews joined with their (optional) author and product.
pub const REVIEW_SOURCE: QuerySource = QuerySource {
    select: "r.id, r.title, r.content, r.rating, r.created_at, r.user_id, \
             u.email AS user_email, u.first_name AS user_first_name, u.last_name AS user_last_name, \
             r.product_id, p.title AS product_title",
    from: "reviews r \
           LEFT JOIN users u ON u.id = r.user_id \
           JOIN products p ON p.id = r.product_id",
    key: "r.id",
    group_by: None,
};

/// Raw query string of `GET /dashboard/reviews`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReviewListParams {
    pub rating: Option<String>,
    pub product: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilterSpec {
    pub rating: Option<i64>,
    pub product_id: Option<i64>,
    pub search: Option<String>,
}

impl ReviewFilterSpec {
    /// Ratings outside 1..=5 are dropped; non-integers are rejected.
    pub fn from_params(params: &ReviewListParams) -> Result<Self, FilterError> {
        let rating = non_empty(params.rating.as_deref())
            .map(|raw| raw.parse::<i64>().map_err(|_| FilterError::InvalidRating(raw.to_string())))
            .transpose()?
            .filter(|r| (1..=5).contains(r));

        let product_id = non_empty(params.product.as_deref())
            .map(|raw| raw.parse::<i64>().map_err(|_| FilterError::InvalidProductId(raw.to_string())))
            .transpose()?;

        Ok(Self {
            rating,
            product_id,
            search: non_empty(params.search.as_deref()).map(str::to_string),
        })
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(rating) = self.rating {
            predicates.push(Predicate::field("r.rating", FilterOp::Eq, SqlParam::Int(rating)));
        }
        if let Some(product_id) = self.product_id {
            predicates.push(Predicate::field("r.product_id", FilterOp::Eq, SqlParam::Int(product_id)));
        }
        if let Some(search) = &self.search {
            predicates.push(Predicate::contains_any(&["r.title", "r.content"], search));
        }
        predicates
    }

    /// Most recent reviews first.
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new(REVIEW_SOURCE);
        filter
            .predicates(self.predicates())
            .order(vec![FilterOrderInfo::desc("r.created_at"), FilterOrderInfo::desc("r.id")]);
        filter
    }
}
