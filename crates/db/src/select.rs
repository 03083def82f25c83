//! Translation of a [`QuerySpec`] into executable SQL.
//!
//! Each entity declares an [`EntityFields`] whitelist: the request-facing
//! field names clients may filter and sort by, each mapped to a concrete
//! column expression and type. Anything outside the whitelist is rejected
//! with a validation error before any SQL is assembled, and every value is
//! bound as a typed parameter, so raw request strings never end up inside a
//! statement.

use trailhead_core::error::CoreError;
use trailhead_core::query::{Filter, FilterOp, QuerySpec, SortDir};
use trailhead_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Whitelist types
// ---------------------------------------------------------------------------

/// SQL type a filter value is parsed into before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Int,
    Float,
    Bool,
    Timestamp,
}

/// One whitelisted field: request name, column expression, value type.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: ColumnKind,
}

/// Per-entity query surface used by [`build_list_query`].
#[derive(Debug, Clone, Copy)]
pub struct EntityFields {
    /// FROM clause body: a table name, possibly with joins.
    pub from: &'static str,
    /// SELECT list matching the entity's `FromRow` struct.
    pub columns: &'static str,
    /// Fields clients may filter and sort by.
    pub fields: &'static [FieldDef],
    /// Ordering applied when the request specifies none (newest first).
    pub default_sort: &'static str,
    /// Predicate ANDed into every list query (e.g. hiding secret tours).
    pub base_where: Option<&'static str>,
}

/// Restriction to rows belonging to a parent entity, for nested routes.
#[derive(Debug, Clone, Copy)]
pub struct ScopeFilter {
    pub column: &'static str,
    pub id: DbId,
}

// ---------------------------------------------------------------------------
// Built query
// ---------------------------------------------------------------------------

/// A typed bind parameter, in statement order.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(Timestamp),
}

/// A complete list statement: SQL text with `$n` placeholders plus the bind
/// values in order.
#[derive(Debug)]
pub struct ListQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Build the list statement for `fields` refined by `spec`.
///
/// Clause order is fixed: base predicate, scope, filters, ordering,
/// pagination. Fails with a validation error on unknown filter/sort fields
/// or unparseable filter values.
pub fn build_list_query(
    fields: &EntityFields,
    spec: &QuerySpec,
    scope: Option<&ScopeFilter>,
) -> Result<ListQuery, CoreError> {
    let mut sql = format!("SELECT {} FROM {}", fields.columns, fields.from);
    let mut binds: Vec<BindValue> = Vec::new();
    let mut has_where = false;

    if let Some(pred) = fields.base_where {
        sql.push_str(clause_start(&mut has_where));
        sql.push_str(pred);
    }

    if let Some(scope) = scope {
        binds.push(BindValue::Int(scope.id));
        sql.push_str(clause_start(&mut has_where));
        sql.push_str(&format!("{} = ${}", scope.column, binds.len()));
    }

    for filter in &spec.filters {
        let def = lookup(fields, &filter.field).ok_or_else(|| {
            CoreError::Validation(format!("Cannot filter by '{}'", filter.field))
        })?;
        binds.push(parse_bind(def, filter)?);
        sql.push_str(clause_start(&mut has_where));
        sql.push_str(&format!(
            "{} {} ${}",
            def.column,
            sql_op(filter.op),
            binds.len()
        ));
    }

    sql.push_str(" ORDER BY ");
    if spec.sort.is_empty() {
        sql.push_str(fields.default_sort);
    } else {
        for (i, key) in spec.sort.iter().enumerate() {
            let def = lookup(fields, &key.field)
                .ok_or_else(|| CoreError::Validation(format!("Cannot sort by '{}'", key.field)))?;
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(def.column);
            sql.push_str(match key.dir {
                SortDir::Asc => " ASC",
                SortDir::Desc => " DESC",
            });
        }
    }

    binds.push(BindValue::Int(spec.limit as i64));
    sql.push_str(&format!(" LIMIT ${}", binds.len()));
    binds.push(BindValue::Int(spec.offset() as i64));
    sql.push_str(&format!(" OFFSET ${}", binds.len()));

    Ok(ListQuery { sql, binds })
}

/// Apply the collected bind values to a prepared `query_as` in order.
pub fn bind_all<'q, O>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    binds: &[BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for bind in binds {
        query = match bind {
            BindValue::Text(v) => query.bind(v.clone()),
            BindValue::Int(v) => query.bind(*v),
            BindValue::Float(v) => query.bind(*v),
            BindValue::Bool(v) => query.bind(*v),
            BindValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn clause_start(has_where: &mut bool) -> &'static str {
    if *has_where {
        " AND "
    } else {
        *has_where = true;
        " WHERE "
    }
}

fn lookup<'a>(fields: &'a EntityFields, name: &str) -> Option<&'a FieldDef> {
    fields.fields.iter().find(|def| def.name == name)
}

fn sql_op(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => "=",
        FilterOp::Gt => ">",
        FilterOp::Gte => ">=",
        FilterOp::Lt => "<",
        FilterOp::Lte => "<=",
    }
}

fn parse_bind(def: &FieldDef, filter: &Filter) -> Result<BindValue, CoreError> {
    let raw = filter.value.as_str();
    match def.kind {
        ColumnKind::Text => Ok(BindValue::Text(raw.to_string())),
        ColumnKind::Int => raw.parse::<i64>().map(BindValue::Int).map_err(|_| {
            CoreError::Validation(format!(
                "Filter value for '{}' must be an integer, got '{raw}'",
                def.name
            ))
        }),
        ColumnKind::Float => raw.parse::<f64>().map(BindValue::Float).map_err(|_| {
            CoreError::Validation(format!(
                "Filter value for '{}' must be a number, got '{raw}'",
                def.name
            ))
        }),
        ColumnKind::Bool => match raw {
            "true" | "1" => Ok(BindValue::Bool(true)),
            "false" | "0" => Ok(BindValue::Bool(false)),
            _ => Err(CoreError::Validation(format!(
                "Filter value for '{}' must be a boolean, got '{raw}'",
                def.name
            ))),
        },
        ColumnKind::Timestamp => parse_timestamp(raw).ok_or_else(|| {
            CoreError::Validation(format!(
                "Filter value for '{}' must be an RFC 3339 timestamp or YYYY-MM-DD date, got '{raw}'",
                def.name
            ))
        }),
    }
}

/// Accepts a full RFC 3339 timestamp or a plain date (taken as UTC midnight).
fn parse_timestamp(raw: &str) -> Option<BindValue> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(BindValue::Timestamp(dt.with_timezone(&chrono::Utc)));
    }
    raw.parse::<chrono::NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| BindValue::Timestamp(dt.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic whitelist shaped like the tours surface.
    const TEST_FIELDS: EntityFields = EntityFields {
        from: "things",
        columns: "id, name, price",
        fields: &[
            FieldDef {
                name: "name",
                column: "name",
                kind: ColumnKind::Text,
            },
            FieldDef {
                name: "price",
                column: "price",
                kind: ColumnKind::Float,
            },
            FieldDef {
                name: "size",
                column: "group_size",
                kind: ColumnKind::Int,
            },
            FieldDef {
                name: "open",
                column: "open",
                kind: ColumnKind::Bool,
            },
            FieldDef {
                name: "created_at",
                column: "created_at",
                kind: ColumnKind::Timestamp,
            },
        ],
        default_sort: "created_at DESC",
        base_where: Some("hidden = FALSE"),
    };

    fn spec_of(pairs: &[(&str, &str)]) -> QuerySpec {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        QuerySpec::parse(&owned).unwrap()
    }

    #[test]
    fn empty_spec_builds_defaults() {
        let q = build_list_query(&TEST_FIELDS, &QuerySpec::default(), None).unwrap();
        assert_eq!(
            q.sql,
            "SELECT id, name, price FROM things WHERE hidden = FALSE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        assert_eq!(q.binds, vec![BindValue::Int(100), BindValue::Int(0)]);
    }

    #[test]
    fn filters_sort_and_pagination_compose_in_order() {
        let spec = spec_of(&[
            ("price[gte]", "100"),
            ("sort", "-price,name"),
            ("page", "2"),
            ("limit", "5"),
        ]);
        let q = build_list_query(&TEST_FIELDS, &spec, None).unwrap();
        assert_eq!(
            q.sql,
            "SELECT id, name, price FROM things WHERE hidden = FALSE AND price >= $1 \
             ORDER BY price DESC, name ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            q.binds,
            vec![
                BindValue::Float(100.0),
                BindValue::Int(5),
                BindValue::Int(5),
            ]
        );
    }

    #[test]
    fn scope_filter_binds_before_request_filters() {
        let spec = spec_of(&[("price[lt]", "500")]);
        let scope = ScopeFilter {
            column: "parent_id",
            id: 42,
        };
        let q = build_list_query(&TEST_FIELDS, &spec, Some(&scope)).unwrap();
        assert_eq!(
            q.sql,
            "SELECT id, name, price FROM things WHERE hidden = FALSE AND parent_id = $1 \
             AND price < $2 ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        assert_eq!(q.binds[0], BindValue::Int(42));
        assert_eq!(q.binds[1], BindValue::Float(500.0));
    }

    #[test]
    fn field_names_map_to_column_expressions() {
        let spec = spec_of(&[("size", "10"), ("sort", "size")]);
        let q = build_list_query(&TEST_FIELDS, &spec, None).unwrap();
        assert!(q.sql.contains("group_size = $1"));
        assert!(q.sql.contains("ORDER BY group_size ASC"));
        assert_eq!(q.binds[0], BindValue::Int(10));
    }

    #[test]
    fn equality_comparison_uses_equals_sign() {
        let spec = spec_of(&[("name", "trek")]);
        let q = build_list_query(&TEST_FIELDS, &spec, None).unwrap();
        assert!(q.sql.contains("name = $1"));
        assert_eq!(q.binds[0], BindValue::Text("trek".to_string()));
    }

    #[test]
    fn unknown_filter_field_rejected() {
        let spec = spec_of(&[("password_hash", "x")]);
        let err = build_list_query(&TEST_FIELDS, &spec, None).unwrap_err();
        assert!(err.to_string().contains("Cannot filter by 'password_hash'"));
    }

    #[test]
    fn unknown_sort_field_rejected() {
        let spec = spec_of(&[("sort", "-secret")]);
        let err = build_list_query(&TEST_FIELDS, &spec, None).unwrap_err();
        assert!(err.to_string().contains("Cannot sort by 'secret'"));
    }

    #[test]
    fn typed_values_parse_or_reject() {
        let spec = spec_of(&[("size", "ten")]);
        assert!(build_list_query(&TEST_FIELDS, &spec, None).is_err());

        let spec = spec_of(&[("price", "not-a-number")]);
        assert!(build_list_query(&TEST_FIELDS, &spec, None).is_err());

        let spec = spec_of(&[("open", "true")]);
        let q = build_list_query(&TEST_FIELDS, &spec, None).unwrap();
        assert_eq!(q.binds[0], BindValue::Bool(true));

        let spec = spec_of(&[("open", "maybe")]);
        assert!(build_list_query(&TEST_FIELDS, &spec, None).is_err());
    }

    #[test]
    fn timestamp_values_accept_rfc3339_and_plain_dates() {
        let spec = spec_of(&[("created_at[gte]", "2026-03-01T12:30:00Z")]);
        let q = build_list_query(&TEST_FIELDS, &spec, None).unwrap();
        assert!(matches!(q.binds[0], BindValue::Timestamp(_)));

        let spec = spec_of(&[("created_at[gte]", "2026-03-01")]);
        let q = build_list_query(&TEST_FIELDS, &spec, None).unwrap();
        match &q.binds[0] {
            BindValue::Timestamp(ts) => {
                assert_eq!(ts.to_rfc3339(), "2026-03-01T00:00:00+00:00");
            }
            other => panic!("expected timestamp bind, got {other:?}"),
        }

        let spec = spec_of(&[("created_at[gte]", "March 1st")]);
        assert!(build_list_query(&TEST_FIELDS, &spec, None).is_err());
    }

    #[test]
    fn no_base_where_starts_clause_at_first_filter() {
        const OPEN_FIELDS: EntityFields = EntityFields {
            base_where: None,
            ..TEST_FIELDS
        };
        let spec = spec_of(&[("name", "trek")]);
        let q = build_list_query(&OPEN_FIELDS, &spec, None).unwrap();
        assert!(q.sql.contains("FROM things WHERE name = $1"));
    }

    #[test]
    fn repeated_field_produces_range_window() {
        let spec = spec_of(&[("price[gte]", "100"), ("price[lte]", "200")]);
        let q = build_list_query(&TEST_FIELDS, &spec, None).unwrap();
        assert!(q.sql.contains("price >= $1 AND price <= $2"));
        assert_eq!(q.binds[0], BindValue::Float(100.0));
        assert_eq!(q.binds[1], BindValue::Float(200.0));
    }
}
