//! Dynamic WHERE/ORDER/LIMIT construction for list endpoints.
//!
//! Every predicate is a sea-query expression that owns its bound values, so
//! user input only ever reaches the database as parameters.

use common::pagination::Pagination;
use sea_orm::sea_query::{
    Alias, Asterisk, Condition, ConditionExpression, Expr, IntoColumnRef, Order, Query,
    SelectStatement, SimpleExpr,
};
use sea_orm::{EntityTrait, FromQueryResult, Value};

/// Ordered, AND-combined list of predicates. Absent filters add nothing.
#[derive(Clone, Debug, Default)]
pub struct FilterSet {
    predicates: Vec<ConditionExpression>,
}

impl FilterSet {
    pub fn new() -> Self { Self::default() }

    /// Unconditional predicate.
    pub fn always(&mut self, expr: SimpleExpr) -> &mut Self {
        self.predicates.push(expr.into());
        self
    }

    pub fn eq<C, V>(&mut self, col: C, value: Option<V>) -> &mut Self
    where
        C: IntoColumnRef,
        V: Into<Value>,
    {
        if let Some(v) = value {
            self.predicates.push(Expr::col(col).eq(v).into());
        }
        self
    }

    pub fn gte<C, V>(&mut self, col: C, value: Option<V>) -> &mut Self
    where
        C: IntoColumnRef,
        V: Into<Value>,
    {
        if let Some(v) = value {
            self.predicates.push(Expr::col(col).gte(v).into());
        }
        self
    }

    pub fn lte<C, V>(&mut self, col: C, value: Option<V>) -> &mut Self
    where
        C: IntoColumnRef,
        V: Into<Value>,
    {
        if let Some(v) = value {
            self.predicates.push(Expr::col(col).lte(v).into());
        }
        self
    }

    /// `(c1 LIKE %term% OR c2 LIKE %term% ...)`. Case sensitivity follows the
    /// column collation. Blank terms are ignored.
    pub fn contains_any<C, I>(&mut self, cols: I, term: Option<&str>) -> &mut Self
    where
        C: IntoColumnRef,
        I: IntoIterator<Item = C>,
    {
        let Some(term) = term.filter(|t| !t.is_empty()) else { return self };
        let pattern = format!("%{term}%");
        let any = cols
            .into_iter()
            .fold(Condition::any(), |acc, c| acc.add(Expr::col(c).like(pattern.as_str())));
        if !any.is_empty() {
            self.predicates.push(any.into());
        }
        self
    }

    pub fn len(&self) -> usize { self.predicates.len() }

    pub fn is_empty(&self) -> bool { self.predicates.is_empty() }

    pub fn condition(&self) -> Condition {
        self.predicates
            .iter()
            .cloned()
            .fold(Condition::all(), |acc, p| acc.add(p))
    }

    fn apply(&self, stmt: &mut SelectStatement) {
        if !self.is_empty() {
            stmt.cond_where(self.condition());
        }
    }
}

/// The two statements behind every list endpoint.
#[derive(Clone, Debug)]
pub struct PagedSelect {
    pub count: SelectStatement,
    pub page: SelectStatement,
}

#[derive(Debug, FromQueryResult)]
pub struct CountRow {
    pub total: i64,
}

#[derive(Debug, FromQueryResult)]
pub struct DistinctValue {
    pub value: String,
}

/// `SELECT COUNT(*) AS total` plus `SELECT * ... ORDER BY ... LIMIT ? OFFSET ?`
/// over the same predicates.
pub fn paged_select<E>(filters: &FilterSet, order: &[(E::Column, Order)], pagination: Pagination) -> PagedSelect
where
    E: EntityTrait,
{
    let mut count = Query::select();
    count
        .expr_as(Expr::cust("COUNT(*)"), Alias::new("total"))
        .from(E::default());
    filters.apply(&mut count);

    let mut page = Query::select();
    page.column(Asterisk).from(E::default());
    filters.apply(&mut page);
    for (col, dir) in order {
        page.order_by(*col, dir.clone());
    }
    page.limit(pagination.limit).offset(pagination.offset());

    PagedSelect { count, page }
}

/// `SELECT DISTINCT col AS value ... ORDER BY value`.
pub fn distinct_values<E>(col: E::Column, skip_nulls: bool) -> SelectStatement
where
    E: EntityTrait,
{
    let mut stmt = Query::select();
    stmt.distinct()
        .expr_as(Expr::col(col), Alias::new("value"))
        .from(E::default());
    if skip_nulls {
        stmt.and_where(Expr::col(col).is_not_null());
    }
    stmt.order_by(Alias::new("value"), Order::Asc);
    stmt
}
