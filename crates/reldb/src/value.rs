use serde::Serialize;
use std::{cmp::Ordering, fmt};

///
/// Value
///
/// Closed scalar set usable as entity attributes and predicate operands.
///
/// Null → the attribute is absent or explicitly unset (SQL NULL).
/// List → right-hand side of `In` predicates only; never stored in a row.
///
/// Values carry a total, deterministic order (type rank, then value) so
/// sorting and one-of-many aggregation never depend on insertion accidents.
/// Predicate comparison is stricter: values of different ranks never match.
///

// untagged: snapshots render attribute values as plain JSON scalars
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Timestamp(u64),
    Text(String),
    List(Vec<Self>),
}

impl Value {
    /// Stable type rank used for the total order.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Timestamp(_) => 3,
            Self::Text(_) => 4,
            Self::List(_) => 5,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<u64> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Compare two values of the same rank.
    ///
    /// Returns `None` across ranks; ordering predicates (`Lt`, `Gte`, …)
    /// treat that as "no match" rather than coercing.
    #[must_use]
    pub fn compare_same_rank(&self, other: &Self) -> Option<Ordering> {
        if self.rank() != other.rank() {
            return None;
        }

        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::List(a), Self::List(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.compare_same_rank(other).unwrap_or(Ordering::Equal))
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Timestamp(t) => write!(f, "@{t}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order_ranks_before_values() {
        let mut values = vec![
            Value::Text("a".into()),
            Value::Int(7),
            Value::Null,
            Value::Bool(true),
            Value::Int(-3),
        ];
        values.sort();

        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(-3),
                Value::Int(7),
                Value::Text("a".into()),
            ]
        );
    }

    #[test]
    fn cross_rank_comparison_never_matches() {
        assert_eq!(Value::Int(0).compare_same_rank(&Value::Text("0".into())), None);
        assert_eq!(Value::Null.compare_same_rank(&Value::Null), None);
    }

    #[test]
    fn same_rank_comparison_is_natural() {
        assert_eq!(
            Value::Int(100).compare_same_rank(&Value::Int(200)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Text("b".into()).compare_same_rank(&Value::Text("a".into())),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn null_is_distinct_from_empty_string() {
        assert_ne!(Value::Null, Value::Text(String::new()));
        assert!(!Value::Text(String::new()).is_null());
    }
}
