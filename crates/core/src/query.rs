//! Typed grammar for list-endpoint query strings.
//!
//! List endpoints accept the flat shape
//! `?difficulty=easy&price[gte]=100&sort=-price,name&fields=name,price&page=2&limit=5`.
//! This module parses that shape into a [`QuerySpec`] and nothing more: no
//! execution, no SQL. The db crate owns the translation into SQL against a
//! per-entity column whitelist, so no raw request key ever reaches the
//! database layer unchecked.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Grammar constants
// ---------------------------------------------------------------------------

/// Keys consumed by the builder itself; never treated as filter fields.
pub const RESERVED_KEYS: &[&str] = &["page", "sort", "limit", "fields"];

/// Page number used when `page` is absent.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when `limit` is absent. No upper bound is enforced here;
/// callers that want a ceiling clamp before execution.
pub const DEFAULT_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Parsed query options
// ---------------------------------------------------------------------------

/// Comparison operator of a single filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    /// Parse the operator name found between brackets, e.g. the `gte` of
    /// `price[gte]`.
    fn from_suffix(name: &str) -> Option<Self> {
        match name {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            _ => None,
        }
    }
}

/// One filter condition: `field op value`. The value is kept as the raw
/// request string; the storage adapter parses it against the column's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// One component of a composite ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub dir: SortDir,
}

/// Structured form of a list request, parsed once per request.
///
/// An empty `sort` means the caller gave no ordering; the storage adapter
/// falls back to newest-first on the creation timestamp. An empty `fields`
/// means all attributes are returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub filters: Vec<Filter>,
    pub sort: Vec<SortKey>,
    pub fields: Vec<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for QuerySpec {
    fn default() -> Self {
        QuerySpec {
            filters: Vec::new(),
            sort: Vec::new(),
            fields: Vec::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QuerySpec {
    /// Parse raw query-string pairs into query options.
    ///
    /// Reserved keys (`page`, `sort`, `limit`, `fields`) drive paging, sort
    /// order, and projection;
    /// when one is repeated, the last occurrence wins. Every other key
    /// becomes a filter condition: a bare key is an equality test, and a
    /// `key[op]` form selects a comparison operator (`gt`, `gte`, `lt`,
    /// `lte`). Repeating a filter field ANDs the conditions together.
    ///
    /// # Examples
    ///
    /// ```
    /// use trailhead_core::query::{FilterOp, QuerySpec, SortDir};
    ///
    /// let pairs = vec![
    ///     ("price[gte]".to_string(), "100".to_string()),
    ///     ("sort".to_string(), "-price,name".to_string()),
    ///     ("page".to_string(), "2".to_string()),
    ///     ("limit".to_string(), "5".to_string()),
    /// ];
    /// let spec = QuerySpec::parse(&pairs).unwrap();
    /// assert_eq!(spec.filters[0].op, FilterOp::Gte);
    /// assert_eq!(spec.sort[0].dir, SortDir::Desc);
    /// assert_eq!(spec.offset(), 5);
    /// ```
    pub fn parse(pairs: &[(String, String)]) -> Result<Self, CoreError> {
        let mut spec = QuerySpec::default();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => spec.page = parse_positive(value, "page")?,
                "limit" => spec.limit = parse_positive(value, "limit")?,
                "sort" => spec.sort = parse_sort(value),
                "fields" => spec.fields = parse_fields(value),
                _ => spec.filters.push(parse_filter(key, value)?),
            }
        }

        Ok(spec)
    }

    /// Row offset implied by `page` and `limit`.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_positive(value: &str, key: &str) -> Result<u32, CoreError> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CoreError::Validation(format!(
            "{key} must be a positive integer, got '{value}'"
        ))),
    }
}

/// `-price,name` becomes price-descending then name-ascending. Empty tokens
/// (doubled or trailing commas) are skipped.
fn parse_sort(value: &str) -> Vec<SortKey> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && *token != "-")
        .map(|token| match token.strip_prefix('-') {
            Some(field) => SortKey {
                field: field.to_string(),
                dir: SortDir::Desc,
            },
            None => SortKey {
                field: token.to_string(),
                dir: SortDir::Asc,
            },
        })
        .collect()
}

fn parse_fields(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_filter(key: &str, value: &str) -> Result<Filter, CoreError> {
    let (field, op) = match key.find('[') {
        None => (key, FilterOp::Eq),
        Some(open) => {
            let field = &key[..open];
            let rest = &key[open + 1..];
            let Some(op_name) = rest.strip_suffix(']') else {
                return Err(CoreError::Validation(format!(
                    "Malformed filter key: '{key}'"
                )));
            };
            let Some(op) = FilterOp::from_suffix(op_name) else {
                return Err(CoreError::Validation(format!(
                    "Unsupported filter operator '{op_name}' on field '{field}'"
                )));
            };
            (field, op)
        }
    };

    if field.is_empty() {
        return Err(CoreError::Validation(format!(
            "Malformed filter key: '{key}'"
        )));
    }

    Ok(Filter {
        field: field.to_string(),
        op,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -- defaults -------------------------------------------------------------

    #[test]
    fn empty_input_yields_defaults() {
        let spec = QuerySpec::parse(&[]).unwrap();
        assert!(spec.filters.is_empty());
        assert!(spec.sort.is_empty());
        assert!(spec.fields.is_empty());
        assert_eq!(spec.page, DEFAULT_PAGE);
        assert_eq!(spec.limit, DEFAULT_LIMIT);
        assert_eq!(spec.offset(), 0);
    }

    // -- filters --------------------------------------------------------------

    #[test]
    fn bare_key_is_equality_filter() {
        let spec = QuerySpec::parse(&pairs(&[("difficulty", "easy")])).unwrap();
        assert_eq!(
            spec.filters,
            vec![Filter {
                field: "difficulty".to_string(),
                op: FilterOp::Eq,
                value: "easy".to_string(),
            }]
        );
    }

    #[test]
    fn bracket_suffix_selects_comparison_operator() {
        let spec = QuerySpec::parse(&pairs(&[
            ("price[gte]", "100"),
            ("price[lt]", "500"),
            ("duration[gt]", "3"),
            ("ratings_average[lte]", "4.8"),
        ]))
        .unwrap();
        let ops: Vec<FilterOp> = spec.filters.iter().map(|f| f.op).collect();
        assert_eq!(
            ops,
            vec![FilterOp::Gte, FilterOp::Lt, FilterOp::Gt, FilterOp::Lte]
        );
    }

    #[test]
    fn repeated_field_conditions_all_kept() {
        let spec =
            QuerySpec::parse(&pairs(&[("price[gte]", "100"), ("price[lte]", "200")])).unwrap();
        assert_eq!(spec.filters.len(), 2);
        assert!(spec.filters.iter().all(|f| f.field == "price"));
    }

    #[test]
    fn unknown_operator_rejected() {
        let err = QuerySpec::parse(&pairs(&[("price[between]", "1,9")])).unwrap_err();
        assert!(err.to_string().contains("between"));
    }

    #[test]
    fn unclosed_bracket_rejected() {
        assert!(QuerySpec::parse(&pairs(&[("price[gte", "100")])).is_err());
    }

    #[test]
    fn trailing_text_after_bracket_rejected() {
        assert!(QuerySpec::parse(&pairs(&[("price[gte]x", "100")])).is_err());
    }

    #[test]
    fn empty_field_name_rejected() {
        assert!(QuerySpec::parse(&pairs(&[("[gte]", "100")])).is_err());
    }

    #[test]
    fn reserved_keys_never_become_filters() {
        let spec = QuerySpec::parse(&pairs(&[
            ("page", "1"),
            ("limit", "10"),
            ("sort", "name"),
            ("fields", "name"),
        ]))
        .unwrap();
        assert!(spec.filters.is_empty());
    }

    // -- sort -----------------------------------------------------------------

    #[test]
    fn sort_parses_directions_in_order() {
        let spec = QuerySpec::parse(&pairs(&[("sort", "-price,name")])).unwrap();
        assert_eq!(
            spec.sort,
            vec![
                SortKey {
                    field: "price".to_string(),
                    dir: SortDir::Desc,
                },
                SortKey {
                    field: "name".to_string(),
                    dir: SortDir::Asc,
                },
            ]
        );
    }

    #[test]
    fn sort_skips_empty_tokens() {
        let spec = QuerySpec::parse(&pairs(&[("sort", "-price,,name,")])).unwrap();
        assert_eq!(spec.sort.len(), 2);
        let spec = QuerySpec::parse(&pairs(&[("sort", "-,")])).unwrap();
        assert!(spec.sort.is_empty());
    }

    // -- fields ---------------------------------------------------------------

    #[test]
    fn fields_splits_and_skips_empty_entries() {
        let spec = QuerySpec::parse(&pairs(&[("fields", "name,,price, duration")])).unwrap();
        assert_eq!(spec.fields, vec!["name", "price", "duration"]);
    }

    // -- pagination -----------------------------------------------------------

    #[test]
    fn pagination_computes_offset() {
        let spec = QuerySpec::parse(&pairs(&[("page", "2"), ("limit", "5")])).unwrap();
        assert_eq!(spec.offset(), 5);
        assert_eq!(spec.limit, 5);
    }

    #[test]
    fn page_and_limit_must_be_positive() {
        assert!(QuerySpec::parse(&pairs(&[("page", "0")])).is_err());
        assert!(QuerySpec::parse(&pairs(&[("limit", "0")])).is_err());
        assert!(QuerySpec::parse(&pairs(&[("page", "two")])).is_err());
        assert!(QuerySpec::parse(&pairs(&[("limit", "-3")])).is_err());
    }

    #[test]
    fn last_reserved_key_occurrence_wins() {
        let spec = QuerySpec::parse(&pairs(&[("page", "2"), ("page", "3")])).unwrap();
        assert_eq!(spec.page, 3);
    }

    // -- combined -------------------------------------------------------------

    #[test]
    fn full_query_string_parses_every_stage() {
        // ?price[gte]=100&sort=-price,name&fields=name,price&page=2&limit=5
        let spec = QuerySpec::parse(&pairs(&[
            ("price[gte]", "100"),
            ("sort", "-price,name"),
            ("fields", "name,price"),
            ("page", "2"),
            ("limit", "5"),
        ]))
        .unwrap();

        assert_eq!(spec.filters.len(), 1);
        assert_eq!(spec.filters[0].field, "price");
        assert_eq!(spec.filters[0].op, FilterOp::Gte);
        assert_eq!(spec.filters[0].value, "100");
        assert_eq!(spec.sort.len(), 2);
        assert_eq!(spec.fields, vec!["name", "price"]);
        assert_eq!(spec.page, 2);
        assert_eq!(spec.limit, 5);
        assert_eq!(spec.offset(), 5);
    }
}
