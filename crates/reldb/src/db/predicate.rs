use crate::{db::entity::Entity, value::Value};
use std::cmp::Ordering;

///
/// Predicate AST
///
/// Pure representation of row filters. No schema validation or execution
/// semantics live here; the executors validate field names against the
/// registry and evaluate rows through `eval`.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

///
/// Predicate
///
/// Conjunction is the only combinator: queries accumulate an AND list and
/// scopes are AND-ed in by the executor.
///

#[derive(Clone, Debug)]
pub enum Predicate {
    Compare {
        field: &'static str,
        op: CompareOp,
        value: Value,
    },
    /// Matches rows where the attribute is absent or explicitly `Null`.
    /// An empty string is a present value and never matches.
    IsNull { field: &'static str },
    And(Vec<Self>),
}

impl Predicate {
    #[must_use]
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Compare {
            field,
            op: CompareOp::Eq,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn ne(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Compare {
            field,
            op: CompareOp::Ne,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn lt(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Compare {
            field,
            op: CompareOp::Lt,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn lte(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Compare {
            field,
            op: CompareOp::Lte,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn gt(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Compare {
            field,
            op: CompareOp::Gt,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn gte(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Compare {
            field,
            op: CompareOp::Gte,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn in_(field: &'static str, values: Vec<Value>) -> Self {
        Self::Compare {
            field,
            op: CompareOp::In,
            value: Value::List(values),
        }
    }

    #[must_use]
    pub const fn is_null(field: &'static str) -> Self {
        Self::IsNull { field }
    }

    #[must_use]
    pub const fn and(preds: Vec<Self>) -> Self {
        Self::And(preds)
    }

    /// Collect every field name referenced by this predicate tree.
    pub fn collect_fields(&self, out: &mut Vec<&'static str>) {
        match self {
            Self::Compare { field, .. } | Self::IsNull { field } => out.push(field),
            Self::And(preds) => {
                for pred in preds {
                    pred.collect_fields(out);
                }
            }
        }
    }
}

/// Evaluate one predicate against one row.
#[must_use]
pub(crate) fn eval(entity: &Entity, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Compare { field, op, value } => compare(entity.get(field), *op, value),
        Predicate::IsNull { field } => entity.is_null(*field),
        Predicate::And(preds) => preds.iter().all(|pred| eval(entity, pred)),
    }
}

// Absent and Null attributes never satisfy comparison operators; they are
// only reachable through `IsNull`.
fn compare(lhs: Option<&Value>, op: CompareOp, rhs: &Value) -> bool {
    let Some(lhs) = lhs else {
        return false;
    };
    if lhs.is_null() {
        return false;
    }

    match op {
        CompareOp::Eq => lhs == rhs,
        CompareOp::Ne => lhs.rank() == rhs.rank() && lhs != rhs,
        CompareOp::Lt => matches!(lhs.compare_same_rank(rhs), Some(Ordering::Less)),
        CompareOp::Lte => matches!(
            lhs.compare_same_rank(rhs),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => matches!(lhs.compare_same_rank(rhs), Some(Ordering::Greater)),
        CompareOp::Gte => matches!(
            lhs.compare_same_rank(rhs),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::In => match rhs {
            Value::List(items) => items.contains(lhs),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entity::Entity;

    fn row() -> Entity {
        Entity::new("category")
            .with("id", "FOOD")
            .with("price", 100)
            .with("note", Value::Null)
            .with("name", "")
    }

    #[test]
    fn eq_and_ordering_match_same_rank_only() {
        let row = row();

        assert!(eval(&row, &Predicate::eq("id", "FOOD")));
        assert!(eval(&row, &Predicate::lt("price", 200)));
        assert!(eval(&row, &Predicate::gte("price", 100)));

        // cross-rank comparisons never match
        assert!(!eval(&row, &Predicate::eq("price", "100")));
        assert!(!eval(&row, &Predicate::lt("id", 5)));
    }

    #[test]
    fn is_null_matches_absent_and_explicit_null_but_not_empty_string() {
        let row = row();

        assert!(eval(&row, &Predicate::is_null("description")));
        assert!(eval(&row, &Predicate::is_null("note")));
        assert!(!eval(&row, &Predicate::is_null("name")));
    }

    #[test]
    fn null_attributes_never_satisfy_comparisons() {
        let row = row();

        assert!(!eval(&row, &Predicate::eq("note", Value::Null)));
        assert!(!eval(&row, &Predicate::ne("note", 1)));
        assert!(!eval(&row, &Predicate::eq("missing", "x")));
    }

    #[test]
    fn in_matches_membership() {
        let row = row();
        let pred = Predicate::in_("id", vec!["DRINK".into(), "FOOD".into()]);

        assert!(eval(&row, &pred));
        assert!(!eval(
            &row,
            &Predicate::in_("id", vec!["DRINK".into(), "GADGET".into()])
        ));
    }

    #[test]
    fn and_requires_every_branch() {
        let row = row();
        let both = Predicate::and(vec![Predicate::eq("id", "FOOD"), Predicate::lt("price", 200)]);
        let one = Predicate::and(vec![Predicate::eq("id", "FOOD"), Predicate::gt("price", 200)]);

        assert!(eval(&row, &both));
        assert!(!eval(&row, &one));
    }
}
