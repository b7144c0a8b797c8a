use super::types::{FilterWhereInfo, Predicate, SqlParam};

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render predicates as a WHERE body (without the keyword) and its bind values.
    /// Returns an empty string when there is nothing to filter on.
    pub fn generate(predicates: &[Predicate], starting_param_index: usize) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(predicates)
    }

    fn build(&mut self, predicates: &[Predicate]) -> (String, Vec<SqlParam>) {
        let mut sql_conditions = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            match predicate {
                Predicate::Field(info) => sql_conditions.push(self.build_sql_condition(info)),
                Predicate::AnyOf(infos) if infos.is_empty() => {}
                Predicate::AnyOf(infos) => {
                    let parts: Vec<String> =
                        infos.iter().map(|info| self.build_sql_condition(info)).collect();
                    sql_conditions.push(format!("({})", parts.join(" OR ")));
                }
            }
        }
        (sql_conditions.join(" AND "), std::mem::take(&mut self.param_values))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        let placeholder = self.param(condition.data.clone());
        format!("{} {} {}", condition.column, condition.operator.to_sql(), placeholder)
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
