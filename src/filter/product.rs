use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::FilterError;
use super::filter::Filter;
use super::non_empty;
use super::types::{FilterOp, FilterOrderInfo, Predicate, QuerySource, SortDirection, SqlParam};

/// Products joined with category name and review aggregates.
pub const PRODUCT_SOURCE: QuerySource = QuerySource {
    select: "p.id, p.title, p.description, p.unit_price, p.image, p.stock, p.date_added, \
             p.category_id, c.name AS category_name, \
             AVG(r.rating)::float8 AS average_rating, COUNT(r.id) AS review_count",
    from: "products p \
           LEFT JOIN categories c ON c.id = p.category_id \
           LEFT JOIN reviews r ON r.product_id = p.id",
    key: "p.id",
    group_by: Some("p.id, c.name"),
};

/// Upper bound of the "low stock" band.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Raw query string of `GET /dashboard/products`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub stock: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    OutOfStock,
    LowStock,
}

impl StockStatus {
    /// Unknown values yield `None` so the filter is simply not applied.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "in_stock" => Some(StockStatus::InStock),
            "out_of_stock" => Some(StockStatus::OutOfStock),
            "low_stock" => Some(StockStatus::LowStock),
            _ => None,
        }
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        match self {
            StockStatus::InStock => vec![Predicate::field("p.stock", FilterOp::Gt, SqlParam::Int(0))],
            StockStatus::OutOfStock => {
                vec![Predicate::field("p.stock", FilterOp::Eq, SqlParam::Int(0))]
            }
            StockStatus::LowStock => vec![
                Predicate::field("p.stock", FilterOp::Gt, SqlParam::Int(0)),
                Predicate::field("p.stock", FilterOp::Lte, SqlParam::Int(LOW_STOCK_THRESHOLD)),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortField {
    Title,
    UnitPrice,
    Stock,
    DateAdded,
}

impl ProductSortField {
    fn column(&self) -> &'static str {
        match self {
            ProductSortField::Title => "p.title",
            ProductSortField::UnitPrice => "p.unit_price",
            ProductSortField::Stock => "p.stock",
            ProductSortField::DateAdded => "p.date_added",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    pub field: ProductSortField,
    pub direction: SortDirection,
}

impl Default for ProductSort {
    fn default() -> Self {
        Self {
            field: ProductSortField::DateAdded,
            direction: SortDirection::Desc,
        }
    }
}

impl ProductSort {
    /// Parse `field` or `-field`; anything outside the known keys falls back to `-date_added`.
    pub fn from_param(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        let (direction, key) = match value.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, value),
        };
        let field = match key {
            "title" => ProductSortField::Title,
            "unit_price" => ProductSortField::UnitPrice,
            "stock" => ProductSortField::Stock,
            "date_added" => ProductSortField::DateAdded,
            _ => return Self::default(),
        };
        Self { field, direction }
    }

    /// Requested ordering plus an id tie-breaker so pages are stable.
    pub fn order(&self) -> Vec<FilterOrderInfo> {
        vec![
            FilterOrderInfo { column: self.field.column(), sort: self.direction },
            FilterOrderInfo { column: "p.id", sort: self.direction },
        ]
    }
}

/// Validated product list filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilterSpec {
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub stock: Option<StockStatus>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: ProductSort,
}

impl ProductFilterSpec {
    pub fn from_params(params: &ProductListParams) -> Result<Self, FilterError> {
        let category_id = non_empty(params.category.as_deref())
            .map(|raw| raw.parse::<i64>().map_err(|_| FilterError::InvalidCategoryId(raw.to_string())))
            .transpose()?;

        Ok(Self {
            search: non_empty(params.search.as_deref()).map(str::to_string),
            category_id,
            stock: non_empty(params.stock.as_deref()).and_then(StockStatus::from_param),
            min_price: parse_price("min_price", params.min_price.as_deref())?,
            max_price: parse_price("max_price", params.max_price.as_deref())?,
            sort: ProductSort::from_param(non_empty(params.sort.as_deref())),
        })
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(search) = &self.search {
            predicates.push(Predicate::contains_any(&["p.title", "p.description", "c.name"], search));
        }
        if let Some(category_id) = self.category_id {
            predicates.push(Predicate::field("p.category_id", FilterOp::Eq, SqlParam::Int(category_id)));
        }
        if let Some(stock) = self.stock {
            predicates.extend(stock.predicates());
        }
        if let Some(min) = self.min_price {
            predicates.push(Predicate::field("p.unit_price", FilterOp::Gte, SqlParam::Decimal(min)));
        }
        if let Some(max) = self.max_price {
            predicates.push(Predicate::field("p.unit_price", FilterOp::Lte, SqlParam::Decimal(max)));
        }
        predicates
    }

    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new(PRODUCT_SOURCE);
        filter.predicates(self.predicates()).order(self.sort.order());
        filter
    }
}

fn parse_price(param: &'static str, raw: Option<&str>) -> Result<Option<Decimal>, FilterError> {
    non_empty(raw)
        .map(|value| {
            value
                .parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(value))
                .map_err(|_| FilterError::InvalidPrice { param, value: value.to_string() })
        })
        .transpose()
}
