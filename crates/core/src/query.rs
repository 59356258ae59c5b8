//! Query grammar for list endpoints.
//!
//! Translates the raw query pairs of an HTTP request into a structured
//! [`QuerySpec`]: field filters, projection, sort keys, and pagination.
//! The grammar is storage-agnostic; SQL generation and execution live in
//! the db crate.
//!
//! Clients express range filters with bracket syntax
//! (`average_cost[gte]=5000`, `careers[in]=Business,UI/UX`). Only the five
//! operator keywords `gt`, `gte`, `lt`, `lte`, `in` are rewritten into
//! comparison predicates; any other bracketed keyword passes through as a
//! literal field name with an equality predicate.

use serde::Serialize;

use crate::error::CoreError;

/// Default page number when `page` is absent or unusable.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when `limit` is absent or unusable.
pub const DEFAULT_LIMIT: i64 = 25;

/// A single field-level comparison condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals(String),
    GreaterThan(String),
    GreaterOrEqual(String),
    LessThan(String),
    LessOrEqual(String),
    OneOf(Vec<String>),
}

/// One filter entry: a field name and the predicate applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub predicate: Predicate,
}

/// Sort direction for a single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// An ordered sort key. A leading `-` on the incoming field name means
/// descending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

/// The parsed, structured representation of one request's
/// filter/sort/pagination/selection intent.
///
/// Constructed fresh per request, used for exactly one read, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Field filters, AND-ed together at execution.
    pub filters: Vec<Filter>,
    /// Fields to project into the response; `None` means all fields.
    pub select: Option<Vec<String>>,
    /// Ordered sort keys; defaults to `created_at` descending.
    pub sort: Vec<SortKey>,
    /// 1-based page number, always positive.
    pub page: i64,
    /// Page size, always positive.
    pub limit: i64,
}

impl QuerySpec {
    /// Parse raw, ordered query pairs into a spec.
    ///
    /// Pagination input never fails: absence, a non-numeric value, or a
    /// non-positive value all fall back to the defaults. Malformed bracket
    /// syntax in a filter key is a [`CoreError::MalformedQuery`].
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, CoreError> {
        let mut select = None;
        let mut sort = None;
        let mut page = None;
        let mut limit = None;
        let mut filters = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "select" => select = Some(value.clone()),
                "sort" => sort = Some(value.clone()),
                "page" => page = Some(value.clone()),
                "limit" => limit = Some(value.clone()),
                _ => filters.push(parse_filter(key, value)?),
            }
        }

        Ok(Self {
            filters,
            select: select.map(|s| split_csv(&s)),
            sort: sort.map(|s| parse_sort(&s)).unwrap_or_else(default_sort),
            page: parse_positive(page.as_deref(), DEFAULT_PAGE),
            limit: parse_positive(limit.as_deref(), DEFAULT_LIMIT),
        })
    }

    /// Zero-based index of the first record on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Adjacent-page navigation descriptor. A side is present only when a
/// further page exists in that direction; absent sides are omitted from
/// the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

/// A `{page, limit}` pair a client can echo back to fetch that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: i64,
    pub limit: i64,
}

impl PaginationDescriptor {
    /// Compute the descriptor for a page against the collection total.
    ///
    /// `next` is present iff `page * limit < total`; `prev` is present iff
    /// the page starts past the first record.
    pub fn build(page: i64, limit: i64, total: i64) -> Self {
        let start = (page - 1) * limit;
        let end = page * limit;
        Self {
            next: (end < total).then_some(PageRef {
                page: page + 1,
                limit,
            }),
            prev: (start > 0).then_some(PageRef {
                page: page - 1,
                limit,
            }),
        }
    }
}

/// Restrict a serialized record to the selected fields.
///
/// The `id` key is always retained, matching the storage layer's behaviour
/// of always returning identifiers. Selecting a field the record does not
/// have is harmless. Non-object values are left untouched.
pub fn project_fields(record: &mut serde_json::Value, fields: &[String]) {
    if let serde_json::Value::Object(map) = record {
        map.retain(|key, _| key == "id" || fields.iter().any(|f| f == key));
    }
}

/// Parse one residual (non-reserved) query pair into a filter.
fn parse_filter(key: &str, value: &str) -> Result<Filter, CoreError> {
    let Some(open) = key.find('[') else {
        if key.is_empty() || key.contains(']') {
            return Err(CoreError::MalformedQuery(format!(
                "malformed filter key `{key}`"
            )));
        }
        return Ok(Filter {
            field: key.to_string(),
            predicate: Predicate::Equals(value.to_string()),
        });
    };

    let field = &key[..open];
    let rest = &key[open + 1..];
    let Some(close) = rest.find(']') else {
        return Err(CoreError::MalformedQuery(format!(
            "unterminated bracket in `{key}`"
        )));
    };
    let op = &rest[..close];
    let trailing = &rest[close + 1..];

    if field.is_empty() || op.is_empty() || !trailing.is_empty() {
        return Err(CoreError::MalformedQuery(format!(
            "malformed filter key `{key}`"
        )));
    }

    let predicate = match op {
        "gt" => Predicate::GreaterThan(value.to_string()),
        "gte" => Predicate::GreaterOrEqual(value.to_string()),
        "lt" => Predicate::LessThan(value.to_string()),
        "lte" => Predicate::LessOrEqual(value.to_string()),
        "in" => Predicate::OneOf(split_csv(value)),
        // Not one of the five operator keywords: the key is left
        // untranslated and becomes a literal equality filter.
        _ => {
            return Ok(Filter {
                field: key.to_string(),
                predicate: Predicate::Equals(value.to_string()),
            })
        }
    };

    Ok(Filter {
        field: field.to_string(),
        predicate,
    })
}

fn parse_sort(raw: &str) -> Vec<SortKey> {
    let keys: Vec<SortKey> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "-")
        .map(|s| match s.strip_prefix('-') {
            Some(field) => SortKey {
                field: field.to_string(),
                direction: Direction::Desc,
            },
            None => SortKey {
                field: s.to_string(),
                direction: Direction::Asc,
            },
        })
        .collect();

    if keys.is_empty() {
        default_sort()
    } else {
        keys
    }
}

fn default_sort() -> Vec<SortKey> {
    vec![SortKey {
        field: "created_at".to_string(),
        direction: Direction::Desc,
    }]
}

/// Parse a base-10 positive integer, falling back to `default` on absence,
/// parse failure, or a non-positive value.
fn parse_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
