//! Dynamic filter assembly for `find_all`.
//!
//! # Responsibility
//! - Normalize `ItemSearchCond` into one predicate shared by all backends.
//! - Render that predicate as an in-process matcher or an SQL `WHERE` clause.
//!
//! # Invariants
//! - A blank name (empty or Unicode `White_Space` only, NBSP included) applies
//!   no name filter.
//! - Name matching is an ASCII case-insensitive literal substring match.
//! - Name and price predicates combine with AND.

use crate::model::item::{Item, ItemSearchCond};
use rusqlite::types::{ToSql, Value};

const LIKE_ESCAPE: char = '\\';

/// Placeholder syntax used when rendering the SQL clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStyle {
    /// Bare `?` placeholders bound in clause order.
    Positional,
    /// `:item_name` / `:max_price` placeholders bound by name.
    Named,
}

/// One bound value of a rendered filter clause.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBind {
    /// Named placeholder including its `:` prefix.
    pub name: &'static str,
    pub value: Value,
}

/// Rendered SQL filter. `clause` is empty or starts with ` WHERE`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSql {
    pub clause: String,
    pub binds: Vec<FilterBind>,
}

impl FilterSql {
    /// Bound values in clause order, for positional statements.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.binds.iter().map(|bind| &bind.value)
    }

    /// Bound values keyed by placeholder, for named statements.
    pub fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
        self.binds
            .iter()
            .map(|bind| (bind.name, &bind.value as &dyn ToSql))
            .collect()
    }
}

/// Normalized filter predicate for item search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    name_contains: Option<String>,
    max_price: Option<i32>,
}

impl ItemFilter {
    pub fn from_cond(cond: &ItemSearchCond) -> Self {
        let name_contains = cond
            .item_name
            .as_deref()
            .filter(|name| has_text(name))
            .map(str::to_string);

        Self {
            name_contains,
            max_price: cond.max_price,
        }
    }

    /// Returns `true` when no predicate applies and every row matches.
    pub fn is_unfiltered(&self) -> bool {
        self.name_contains.is_none() && self.max_price.is_none()
    }

    /// Applies the predicate to one in-process item.
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(needle) = self.name_contains.as_deref() {
            if !contains_ignore_ascii_case(&item.item_name, needle) {
                return false;
            }
        }

        if let Some(max_price) = self.max_price {
            if item.price > max_price {
                return false;
            }
        }

        true
    }

    /// Renders the predicate over the `item_name` and `price` columns.
    pub fn to_sql(&self, style: BindStyle) -> FilterSql {
        let mut conditions: Vec<String> = Vec::new();
        let mut binds = Vec::new();

        if let Some(needle) = self.name_contains.as_deref() {
            let placeholder = placeholder(style, ":item_name");
            conditions.push(format!(
                "item_name LIKE {placeholder} ESCAPE '{LIKE_ESCAPE}'"
            ));
            binds.push(FilterBind {
                name: ":item_name",
                value: Value::Text(format!("%{}%", escape_like(needle))),
            });
        }

        if let Some(max_price) = self.max_price {
            let placeholder = placeholder(style, ":max_price");
            conditions.push(format!("price <= {placeholder}"));
            binds.push(FilterBind {
                name: ":max_price",
                value: Value::Integer(i64::from(max_price)),
            });
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        FilterSql { clause, binds }
    }
}

fn placeholder(style: BindStyle, name: &'static str) -> &'static str {
    match style {
        BindStyle::Positional => "?",
        BindStyle::Named => name,
    }
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
