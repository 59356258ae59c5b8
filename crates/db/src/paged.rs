//! Generic paged-query engine for list endpoints.
//!
//! Turns the raw query pairs of an HTTP request into one filtered, sorted,
//! paginated SELECT against a collection, plus a pagination descriptor the
//! client can use to walk adjacent pages. Collections opt in by implementing
//! [`PagedCollection`]: a table name, a column list, filter/sort whitelists,
//! and a populate hook for embedding related records.
//!
//! The whitelists are the structured-filter grammar: a filter naming a
//! column outside `filter_fields`, an operand that does not parse for its
//! column kind, or a sort key outside `sortable_fields` is rejected as a
//! [`CoreError::MalformedQuery`] before any SQL reaches the database.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use campdex_core::error::CoreError;
use campdex_core::query::{
    Direction, PaginationDescriptor, Predicate, QuerySpec,
};

/// Scalar kind of a filterable column, used to parse and bind operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
    Bool,
    /// A `text[]` column. Equality means membership; `in` means overlap.
    TextArray,
}

/// A column that may appear in a filter expression.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// The capability contract a collection exposes to be queried generically:
/// filter-by-predicate, sort, skip/limit, an unfiltered count, and optional
/// related-record population.
#[async_trait]
pub trait PagedCollection:
    for<'r> FromRow<'r, PgRow> + Unpin + Send + Sync + Sized
{
    /// Related-record specification accepted by [`PagedCollection::populate`].
    type Populate: Sync;

    const TABLE: &'static str;
    const COLUMNS: &'static str;

    /// Columns that may appear in filter expressions.
    fn filter_fields() -> &'static [FilterField];

    /// Columns that may appear in `sort`.
    fn sortable_fields() -> &'static [&'static str];

    /// Attach related records to a fetched page.
    async fn populate(
        pool: &PgPool,
        records: &mut [Self],
        spec: &Self::Populate,
    ) -> Result<(), sqlx::Error>;
}

/// One fetched page: the records, the navigation descriptor, the aggregate
/// count, and the request's field selection (carried through so the response
/// layer can project records).
#[derive(Debug)]
pub struct Paged<C> {
    pub records: Vec<C>,
    pub pagination: PaginationDescriptor,
    pub total: i64,
    pub select: Option<Vec<String>>,
}

/// Errors from the paged-query engine: either the client's query fails the
/// filter grammar, or the underlying storage call fails. Storage errors
/// propagate unchanged; there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum PagedQueryError {
    #[error(transparent)]
    Query(#[from] CoreError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Run one paged read against a collection.
///
/// Performs exactly two storage reads: the aggregate count, then the
/// filtered/sorted/paginated fetch (plus whatever the populate hook issues).
/// The count is unfiltered: pagination boundaries reflect the whole
/// collection even when filters are active.
pub async fn fetch_paged<C: PagedCollection>(
    pool: &PgPool,
    raw: &[(String, String)],
    populate: Option<&C::Populate>,
) -> Result<Paged<C>, PagedQueryError> {
    let spec = QuerySpec::from_pairs(raw)?;

    let count_sql = format!("SELECT COUNT(*) FROM {}", C::TABLE);
    let total: i64 = sqlx::query_scalar(&count_sql).fetch_one(pool).await?;

    let mut builder = build_select::<C>(&spec)?;
    let mut records: Vec<C> = builder.build_query_as().fetch_all(pool).await?;

    if let Some(populate_spec) = populate {
        C::populate(pool, &mut records, populate_spec).await?;
    }

    tracing::debug!(
        table = C::TABLE,
        page = spec.page,
        limit = spec.limit,
        total,
        fetched = records.len(),
        "Paged query executed"
    );

    Ok(Paged {
        pagination: PaginationDescriptor::build(spec.page, spec.limit, total),
        records,
        total,
        select: spec.select,
    })
}

/// Build the SELECT for a query spec against a collection's whitelists.
fn build_select<C: PagedCollection>(
    spec: &QuerySpec,
) -> Result<QueryBuilder<'static, Postgres>, CoreError> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", C::COLUMNS, C::TABLE));

    for (i, filter) in spec.filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        let field = lookup_field(C::filter_fields(), &filter.field)?;
        push_predicate(&mut qb, field, &filter.predicate)?;
    }

    qb.push(" ORDER BY ");
    for key in &spec.sort {
        if !C::sortable_fields().contains(&key.field.as_str()) {
            return Err(CoreError::MalformedQuery(format!(
                "cannot sort by `{}`",
                key.field
            )));
        }
        // Whitelisted above, so the identifier is safe to splice.
        qb.push(key.field.as_str());
        qb.push(match key.direction {
            Direction::Asc => " ASC, ",
            Direction::Desc => " DESC, ",
        });
    }
    // Trailing id key keeps the order stable across identical requests.
    qb.push("id ASC");

    qb.push(" LIMIT ");
    qb.push_bind(spec.limit);
    qb.push(" OFFSET ");
    qb.push_bind(spec.offset());

    Ok(qb)
}

fn lookup_field(
    fields: &'static [FilterField],
    name: &str,
) -> Result<FilterField, CoreError> {
    fields
        .iter()
        .copied()
        .find(|f| f.name == name)
        .ok_or_else(|| CoreError::MalformedQuery(format!("cannot filter by `{name}`")))
}

fn push_predicate(
    qb: &mut QueryBuilder<'static, Postgres>,
    field: FilterField,
    predicate: &Predicate,
) -> Result<(), CoreError> {
    match predicate {
        Predicate::OneOf(values) => match field.kind {
            FieldKind::TextArray => {
                qb.push(field.name);
                qb.push(" && ");
                qb.push_bind(values.clone());
            }
            FieldKind::Text => {
                qb.push(field.name);
                qb.push(" = ANY(");
                qb.push_bind(values.clone());
                qb.push(")");
            }
            FieldKind::Int => {
                qb.push(field.name);
                qb.push(" = ANY(");
                qb.push_bind(parse_operands::<i64>(field, values)?);
                qb.push(")");
            }
            FieldKind::Float => {
                qb.push(field.name);
                qb.push(" = ANY(");
                qb.push_bind(parse_operands::<f64>(field, values)?);
                qb.push(")");
            }
            FieldKind::Bool => {
                qb.push(field.name);
                qb.push(" = ANY(");
                qb.push_bind(parse_operands::<bool>(field, values)?);
                qb.push(")");
            }
        },

        // Membership test on a text[] column.
        Predicate::Equals(value) if field.kind == FieldKind::TextArray => {
            qb.push_bind(value.clone());
            qb.push(" = ANY(");
            qb.push(field.name);
            qb.push(")");
        }

        Predicate::Equals(value)
        | Predicate::GreaterThan(value)
        | Predicate::GreaterOrEqual(value)
        | Predicate::LessThan(value)
        | Predicate::LessOrEqual(value) => {
            if field.kind == FieldKind::TextArray {
                return Err(CoreError::MalformedQuery(format!(
                    "range operators do not apply to `{}`",
                    field.name
                )));
            }
            qb.push(field.name);
            qb.push(sql_comparison(predicate));
            match field.kind {
                FieldKind::Text => {
                    qb.push_bind(value.clone());
                }
                FieldKind::Int => {
                    qb.push_bind(parse_operand::<i64>(field, value)?);
                }
                FieldKind::Float => {
                    qb.push_bind(parse_operand::<f64>(field, value)?);
                }
                FieldKind::Bool => {
                    qb.push_bind(parse_operand::<bool>(field, value)?);
                }
                FieldKind::TextArray => {}
            }
        }
    }
    Ok(())
}

fn sql_comparison(predicate: &Predicate) -> &'static str {
    match predicate {
        Predicate::GreaterThan(_) => " > ",
        Predicate::GreaterOrEqual(_) => " >= ",
        Predicate::LessThan(_) => " < ",
        Predicate::LessOrEqual(_) => " <= ",
        _ => " = ",
    }
}

fn parse_operand<T: std::str::FromStr>(
    field: FilterField,
    raw: &str,
) -> Result<T, CoreError> {
    raw.trim().parse().map_err(|_| {
        CoreError::MalformedQuery(format!(
            "invalid value `{raw}` for `{}`",
            field.name
        ))
    })
}

fn parse_operands<T: std::str::FromStr>(
    field: FilterField,
    raw: &[String],
) -> Result<Vec<T>, CoreError> {
    raw.iter().map(|v| parse_operand(field, v)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
