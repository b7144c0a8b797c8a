use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lte,
    ILike,
}

impl FilterOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
            FilterOp::ILike => "ILIKE",
        }
    }
}

/// A typed bind parameter produced while generating SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// One column comparison. Columns are always compile-time constants, never client input.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: &'static str,
    pub operator: FilterOp,
    pub data: SqlParam,
}

/// Predicates are AND-ed together; an `AnyOf` group is OR-ed internally.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Field(FilterWhereInfo),
    AnyOf(Vec<FilterWhereInfo>),
}

impl Predicate {
    pub fn field(column: &'static str, operator: FilterOp, data: SqlParam) -> Self {
        Predicate::Field(FilterWhereInfo { column, operator, data })
    }

    /// Case-insensitive substring match against any of `columns`.
    pub fn contains_any(columns: &[&'static str], text: &str) -> Self {
        let pattern = format!("%{}%", escape_like(text));
        Predicate::AnyOf(
            columns
                .iter()
                .map(|&column| FilterWhereInfo {
                    column,
                    operator: FilterOp::ILike,
                    data: SqlParam::Text(pattern.clone()),
                })
                .collect(),
        )
    }
}

/// Escape LIKE wildcards so user text matches literally.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: &'static str,
    pub sort: SortDirection,
}

impl FilterOrderInfo {
    pub fn asc(column: &'static str) -> Self {
        Self { column, sort: SortDirection::Asc }
    }

    pub fn desc(column: &'static str) -> Self {
        Self { column, sort: SortDirection::Desc }
    }
}

/// The relation a filter is applied to.
#[derive(Debug, Clone, Copy)]
pub struct QuerySource {
    pub select: &'static str,
    pub from: &'static str,
    /// Distinct row identity, used for counting across joins.
    pub key: &'static str,
    pub group_by: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
