//! Lazy query construction over stored log records.
//!
//! A [`Query`] is a pure description: building one performs no I/O. Backends
//! translate it with a [`QueryVisitor`] and only execute it when the caller
//! consumes the results.
//!
//! # Filter Expression API
//!
//! [`Filter`] provides static constructors for the expressions a log store
//! needs:
//!
//! - Comparison: `eq`, `ne`, `gt`, `gte`, `lt`, `lte`
//! - Membership and text: `any_of`, `contains`
//! - Existence: `exists`, `not_exists`
//! - Logical: `and`, `or`
//! - Log-domain shorthands: `level`, `at_least`, `since`, `until`
//!
//! ```ignore
//! use loghub_core::query::{Filter, Query};
//!
//! let query = Query::builder()
//!     .filter(Filter::at_least(LogLevel::Warning).and(Filter::since(an_hour_ago)))
//!     .sort(record::TIMESTAMP_FIELD, SortDirection::Desc)
//!     .limit(50)
//!     .build();
//! ```

use bson::Bson;
use chrono::{DateTime as ChronoDateTime, Utc};

use crate::error::LogError;
use crate::level::LogLevel;
use crate::record::{LEVEL_FIELD, TIMESTAMP_FIELD};

/// Sort direction for query results.
#[derive(Debug, Clone)]
pub enum SortDirection {
    /// Ascending order (earliest to latest).
    Asc,
    /// Descending order (latest to earliest).
    Desc,
}

/// Sort specification for query results.
#[derive(Debug, Clone)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// String or array contains the value.
    Contains,
    /// Field equals any of the listed values.
    In,
}

/// A filter expression over persisted records.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Logical NOT of an expression.
    Not(Box<Expr>),
    /// Checks whether a field exists.
    Exists(String, bool),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }

    /// Negates this expression.
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

/// A structured query over a log collection.
///
/// `filter == None` means match everything. Use [`Query::builder`] for
/// fluent construction.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match records.
    pub filter: Option<Expr>,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
    /// Number of records to skip.
    pub offset: Option<usize>,
    /// Sort specification for results.
    pub sort: Option<Sort>,
}

impl Query {
    /// Creates an empty query matching every record.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Static constructors for filter expressions.
pub struct Filter;

impl Filter {
    /// Matches records where the field equals the value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Matches records where the field does not equal the value.
    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Ne, value.into())
    }

    /// Matches records where the field is greater than the value.
    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gt, value.into())
    }

    /// Matches records where the field is greater than or equal to the value.
    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gte, value.into())
    }

    /// Matches records where the field is less than the value.
    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lt, value.into())
    }

    /// Matches records where the field is less than or equal to the value.
    pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lte, value.into())
    }

    /// Matches records where the string or array field contains the value.
    pub fn contains(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Contains, value.into())
    }

    /// Matches records where the field is present.
    pub fn exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), true)
    }

    /// Matches records where the field is absent.
    pub fn not_exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), false)
    }

    /// Matches records where the field equals any of the listed values.
    pub fn any_of(field: impl Into<String>, values: impl IntoIterator<Item = impl Into<Bson>>) -> Expr {
        Expr::field(
            field.into(),
            FieldOp::In,
            Bson::Array(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Logical AND of multiple expressions.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Logical OR of multiple expressions.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }

    /// Matches records written at exactly the given level.
    ///
    /// Accounts for the persisted form omitting the level field at its zero
    /// value: filtering for [`LogLevel::Trace`] also matches records without
    /// a level field.
    pub fn level(level: LogLevel) -> Expr {
        let exact = Filter::eq(LEVEL_FIELD, level.as_str());
        if level.is_default() {
            exact.or(Filter::not_exists(LEVEL_FIELD))
        } else {
            exact
        }
    }

    /// Matches records written at the given level or above.
    ///
    /// Levels persist as string names, so the comparison is expressed as
    /// membership in the set of admitted names rather than a lexical range.
    pub fn at_least(level: LogLevel) -> Expr {
        let admitted = Filter::any_of(
            LEVEL_FIELD,
            LogLevel::ALL
                .iter()
                .filter(|candidate| **candidate >= level)
                .map(|candidate| candidate.as_str()),
        );
        if level.is_default() {
            admitted.or(Filter::not_exists(LEVEL_FIELD))
        } else {
            admitted
        }
    }

    /// Matches records written at or after the given moment.
    pub fn since(moment: ChronoDateTime<Utc>) -> Expr {
        Filter::gte(TIMESTAMP_FIELD, bson::DateTime::from_chrono(moment))
    }

    /// Matches records written at or before the given moment.
    pub fn until(moment: ChronoDateTime<Utc>) -> Expr {
        Filter::lte(TIMESTAMP_FIELD, bson::DateTime::from_chrono(moment))
    }
}

/// Fluent builder for [`Query`] values.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        QueryBuilder::default()
    }

    /// Sets the filter expression.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the maximum number of records to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the number of records to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Sets the sort specification.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Builds the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// Translates filter expressions into a backend's native representation.
pub trait QueryVisitor {
    type Output;
    type Error: Into<LogError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(expr) => self.visit_not(expr),
            Expr::Exists(field, should_exist) => self.visit_exists(field, *should_exist),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}
