//! SQL construction for dynamic record filters.
//!
//! Filters arrive as an arbitrary subset of record fields; the WHERE clause
//! and its ordered bind list are built here as plain data so the
//! construction stays unit-testable without a database.

use chainwatch_types::TxFilter;

/// One positional bind value, in clause order.
#[derive(Clone, Debug, PartialEq)]
pub enum Bind {
    Text(String),
    Bool(bool),
    Int(i64),
}

/// Build the WHERE clause (without the `WHERE` keyword) and bind list for
/// `filter`, with placeholders starting at `$1`. An empty filter yields an
/// empty clause.
pub fn filter_clause(filter: &TxFilter) -> (String, Vec<Bind>) {
    let mut parts: Vec<String> = Vec::new();
    let mut binds: Vec<Bind> = Vec::new();

    let mut push = |parts: &mut Vec<String>, binds: &mut Vec<Bind>, column: &str, bind: Bind| {
        binds.push(bind);
        parts.push(format!("{column} = ${}", binds.len()));
    };

    if let Some(id) = &filter.id {
        push(&mut parts, &mut binds, "id", Bind::Text(id.clone()));
    }
    if let Some(chain) = &filter.chain {
        push(&mut parts, &mut binds, "chain", Bind::Text(chain.clone()));
    }
    if let Some(monitoring) = filter.monitoring {
        push(&mut parts, &mut binds, "monitoring", Bind::Bool(monitoring));
    }
    if let Some(pending) = filter.pending {
        push(&mut parts, &mut binds, "pending", Bind::Bool(pending));
    }
    if let Some(checks) = filter.checks {
        push(&mut parts, &mut binds, "checks", Bind::Int(checks));
    }
    if let Some(success) = filter.success {
        push(&mut parts, &mut binds, "success", Bind::Bool(success));
    }
    if let Some(reviewed) = filter.reviewed {
        push(&mut parts, &mut binds, "reviewed", Bind::Bool(reviewed));
    }
    if let Some(error) = &filter.error {
        push(&mut parts, &mut binds, "error", Bind::Text(error.clone()));
    }

    (parts.join(" AND "), binds)
}

/// Full SELECT for a filtered, paged listing. `limit` and `offset` are
/// appended as the last two placeholders.
pub fn select_query(filter: &TxFilter) -> (String, Vec<Bind>) {
    let (clause, binds) = filter_clause(filter);
    let where_sql = if clause.is_empty() {
        String::new()
    } else {
        format!(" WHERE {clause}")
    };
    let sql = format!(
        "SELECT id, chain, metadata, monitoring, pending, checks, success, reviewed, error \
         FROM transactions{where_sql} ORDER BY created_at, id LIMIT ${} OFFSET ${}",
        binds.len() + 1,
        binds.len() + 2,
    );
    (sql, binds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_yields_empty_clause() {
        let (clause, binds) = filter_clause(&TxFilter::default());
        assert_eq!(clause, "");
        assert!(binds.is_empty());
    }

    #[test]
    fn single_field_clause() {
        let filter = TxFilter {
            chain: Some("mainnet".to_string()),
            ..TxFilter::default()
        };
        let (clause, binds) = filter_clause(&filter);
        assert_eq!(clause, "chain = $1");
        assert_eq!(binds, vec![Bind::Text("mainnet".to_string())]);
    }

    #[test]
    fn placeholders_follow_bind_order() {
        let filter = TxFilter {
            chain: Some("mainnet".to_string()),
            monitoring: Some(true),
            checks: Some(3),
            reviewed: Some(false),
            ..TxFilter::default()
        };
        let (clause, binds) = filter_clause(&filter);
        assert_eq!(
            clause,
            "chain = $1 AND monitoring = $2 AND checks = $3 AND reviewed = $4"
        );
        assert_eq!(
            binds,
            vec![
                Bind::Text("mainnet".to_string()),
                Bind::Bool(true),
                Bind::Int(3),
                Bind::Bool(false),
            ]
        );
    }

    #[test]
    fn explicit_false_and_empty_string_are_constraints() {
        let filter = TxFilter {
            success: Some(false),
            error: Some(String::new()),
            ..TxFilter::default()
        };
        let (clause, binds) = filter_clause(&filter);
        assert_eq!(clause, "success = $1 AND error = $2");
        assert_eq!(binds, vec![Bind::Bool(false), Bind::Text(String::new())]);
    }

    #[test]
    fn select_appends_order_and_page_placeholders() {
        let filter = TxFilter {
            monitoring: Some(true),
            ..TxFilter::default()
        };
        let (sql, binds) = select_query(&filter);
        assert_eq!(binds.len(), 1);
        assert!(sql.contains("WHERE monitoring = $1"));
        assert!(sql.ends_with("ORDER BY created_at, id LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn unfiltered_select_has_no_where() {
        let (sql, binds) = select_query(&TxFilter::default());
        assert!(binds.is_empty());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
    }
}
