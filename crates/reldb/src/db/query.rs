use crate::{
    db::predicate::{CompareOp, Predicate},
    value::Value,
};

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

///
/// Query
///
/// Declarative query intent for one entity kind.
///
/// The builder:
/// - Collects an AND-conjunctive predicate list, ordering, and limit
/// - Records scope suppressions and eager-load requests
/// - Is purely declarative: no registry access or execution happens here
///
/// Field names are accepted as strings; validity is checked by the
/// executors where the registry is in scope. Every refinement consumes and
/// returns the builder, so intermediate states are never shared.
///

#[derive(Clone, Debug)]
pub struct Query {
    pub(crate) kind: &'static str,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) order: Vec<(&'static str, OrderDirection)>,
    pub(crate) limit: Option<usize>,
    pub(crate) without_scopes: Vec<&'static str>,
    pub(crate) eager: Vec<&'static str>,
}

impl Query {
    #[must_use]
    pub const fn new(kind: &'static str) -> Self {
        Self {
            kind,
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
            without_scopes: Vec::new(),
            eager: Vec::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Add a comparison filter, AND-ed with any existing predicate.
    #[must_use]
    pub fn filter(mut self, field: &'static str, op: CompareOp, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Compare {
            field,
            op,
            value: value.into(),
        });
        self
    }

    /// Add a null filter: matches absent or explicitly null attributes,
    /// never empty strings.
    #[must_use]
    pub fn filter_null(mut self, field: &'static str) -> Self {
        self.predicates.push(Predicate::is_null(field));
        self
    }

    /// Add a membership filter.
    #[must_use]
    pub fn filter_in(mut self, field: &'static str, values: Vec<Value>) -> Self {
        self.predicates.push(Predicate::in_(field, values));
        self
    }

    /// Add an arbitrary predicate tree, AND-ed with any existing predicate.
    #[must_use]
    pub fn filter_pred(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append an ascending sort key.
    #[must_use]
    pub fn order_by(mut self, field: &'static str) -> Self {
        self.order.push((field, OrderDirection::Asc));
        self
    }

    /// Append a descending sort key.
    #[must_use]
    pub fn order_by_desc(mut self, field: &'static str) -> Self {
        self.order.push((field, OrderDirection::Desc));
        self
    }

    /// Set or replace the result limit.
    #[must_use]
    pub const fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Suppress one global scope by name for this query.
    #[must_use]
    pub fn without_scope(mut self, name: &'static str) -> Self {
        self.without_scopes.push(name);
        self
    }

    /// Suppress several global scopes by name.
    #[must_use]
    pub fn without_scopes(mut self, names: &[&'static str]) -> Self {
        self.without_scopes.extend_from_slice(names);
        self
    }

    /// Request eager loading of a declared relation for every result row.
    #[must_use]
    pub fn with(mut self, relation: &'static str) -> Self {
        self.eager.push(relation);
        self
    }

    /// Request eager loading of several relations.
    #[must_use]
    pub fn with_all(mut self, relations: &[&'static str]) -> Self {
        self.eager.extend_from_slice(relations);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_conjunctive_state() {
        let query = Query::new("product")
            .filter("category_id", CompareOp::Eq, "FOOD")
            .filter_null("deleted_at")
            .order_by_desc("price")
            .limit(10)
            .without_scope("is_active")
            .with("category");

        assert_eq!(query.kind(), "product");
        assert_eq!(query.predicates.len(), 2);
        assert_eq!(query.order, vec![("price", OrderDirection::Desc)]);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.without_scopes, vec!["is_active"]);
        assert_eq!(query.eager, vec!["category"]);
    }
}
