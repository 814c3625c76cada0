//! Filter evaluation over in-memory log documents.

use bson::datetime::DateTime;
use bson::{Bson, Document};
use std::cmp::Ordering;
use std::collections::HashMap;

use loghub_core::error::{LogError, LogResult};
use loghub_core::query::{Expr, FieldOp, QueryVisitor};

/// Type-erased, comparable representation of BSON values.
///
/// Normalizes all numeric types to f64 so filters compare across integer
/// widths the way the persistent backends do.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect(),
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Evaluates a filter expression against one stored document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> LogResult<bool> {
        self.visit_expr(expr)
    }

    /// Keeps the documents matching `expr`, preserving their order.
    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Document>,
        expr: &Expr,
    ) -> LogResult<Vec<Document>> {
        Ok(documents
            .into_iter()
            .filter(|doc| {
                DocumentEvaluator::new(doc)
                    .evaluate(expr)
                    .unwrap_or(false)
            })
            .cloned()
            .collect::<Vec<_>>())
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = LogError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(self.document.get(field).is_some() == should_exist)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        match self.document.get(field) {
            Some(field_value) => match op {
                FieldOp::Eq => Ok(Comparable::from(field_value) == Comparable::from(value)),
                FieldOp::Ne => Ok(Comparable::from(field_value) != Comparable::from(value)),
                FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
                    match Comparable::from(field_value).partial_cmp(&Comparable::from(value)) {
                        Some(ordering) => Ok(match op {
                            FieldOp::Gt => ordering == Ordering::Greater,
                            FieldOp::Gte => ordering != Ordering::Less,
                            FieldOp::Lt => ordering == Ordering::Less,
                            FieldOp::Lte => ordering != Ordering::Greater,
                            _ => unreachable!(),
                        }),
                        None => Ok(false),
                    }
                }
                FieldOp::Contains => match Comparable::from(field_value) {
                    Comparable::Array(array) => {
                        Ok(array.iter().any(|item| item == &Comparable::from(value)))
                    }
                    Comparable::String(left) => match Comparable::from(value) {
                        Comparable::String(right) => Ok(left.contains(right)),
                        _ => Ok(false),
                    },
                    _ => Ok(false),
                },
                FieldOp::In => match (Comparable::from(field_value), Comparable::from(value)) {
                    (Comparable::Array(array), Comparable::Array(values)) => {
                        Ok(values.iter().any(|val| array.iter().any(|item| item == val)))
                    }
                    (single, Comparable::Array(values)) => {
                        Ok(values.iter().any(|val| *val == single))
                    }
                    (Comparable::Array(array), single) => {
                        Ok(array.iter().any(|item| *item == single))
                    }
                    _ => Ok(false),
                },
            },
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use loghub_core::query::Filter;

    fn entry() -> Document {
        doc! { "level": "Warning", "data": "disk pressure", "count": 3_i64 }
    }

    #[test]
    fn equality_and_comparison() {
        let entry = entry();
        let mut eq = DocumentEvaluator::new(&entry);
        assert!(eq.evaluate(&Filter::eq("level", "Warning")).unwrap());
        assert!(eq.evaluate(&Filter::gt("count", 2)).unwrap());
        assert!(!eq.evaluate(&Filter::lt("count", 3)).unwrap());
    }

    #[test]
    fn integers_compare_across_widths() {
        let entry = entry();
        // Stored as Int64, filtered with an Int32 literal.
        assert!(DocumentEvaluator::new(&entry)
            .evaluate(&Filter::eq("count", 3_i32))
            .unwrap());
    }

    #[test]
    fn membership_over_scalar_field() {
        let entry = entry();
        let admitted = Filter::any_of("level", ["Warning", "Error", "Critical"]);
        assert!(DocumentEvaluator::new(&entry).evaluate(&admitted).unwrap());

        let excluded = Filter::any_of("level", ["Error", "Critical"]);
        assert!(!DocumentEvaluator::new(&entry).evaluate(&excluded).unwrap());
    }

    #[test]
    fn missing_fields_never_match_comparisons() {
        let entry = entry();
        let mut eval = DocumentEvaluator::new(&entry);
        assert!(!eval.evaluate(&Filter::eq("missing", 1)).unwrap());
        assert!(eval.evaluate(&Filter::not_exists("missing")).unwrap());
    }

    #[test]
    fn substring_containment() {
        let entry = entry();
        assert!(DocumentEvaluator::new(&entry)
            .evaluate(&Filter::contains("data", "pressure"))
            .unwrap());
    }
}
