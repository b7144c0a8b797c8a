use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, Predicate, QuerySource, SqlResult};

/// A fully described list query: source relation, predicates, ordering and window.
/// Nothing touches the store until the filter is handed to the query builder.
#[derive(Debug, Clone)]
pub struct Filter {
    source: QuerySource,
    predicates: Vec<Predicate>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(source: QuerySource) -> Self {
        Self {
            source,
            predicates: vec![],
            order_data: vec![],
            limit: None,
            offset: None,
        }
    }

    pub fn predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&mut self, predicates: impl IntoIterator<Item = Predicate>) -> &mut Self {
        self.predicates.extend(predicates);
        self
    }

    pub fn order(&mut self, order: Vec<FilterOrderInfo>) -> &mut Self {
        self.order_data = order;
        self
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        if let Some(off) = offset {
            if off < 0 {
                return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
            }
        }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.predicates, 0);
        let group_clause = self
            .source
            .group_by
            .map(|g| format!("GROUP BY {}", g))
            .unwrap_or_default();

        let query = [
            format!("SELECT {}", self.source.select),
            format!("FROM {}", self.source.from),
            Self::where_keyword(&where_clause),
            group_clause,
            FilterOrder::generate(&self.order_data),
            self.build_limit_clause(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.predicates, 0);
        let query = [
            format!("SELECT COUNT(DISTINCT {}) AS count", self.source.key),
            format!("FROM {}", self.source.from),
            Self::where_keyword(&where_clause),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    fn where_keyword(where_clause: &str) -> String {
        if where_clause.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", where_clause)
        }
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            _ => String::new(),
        }
    }
}
