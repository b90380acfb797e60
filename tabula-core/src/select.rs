use crate::{Error, Result, Value};
use std::str::FromStr;

/// Comparison operators accepted in a dynamic query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Like,
    NotLike,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
        }
    }
}

impl FromStr for Operator {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "=" => Operator::Equal,
            "<>" | "!=" => Operator::NotEqual,
            "<" => Operator::Less,
            "<=" => Operator::LessEqual,
            ">" => Operator::Greater,
            ">=" => Operator::GreaterEqual,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            _ => return Err(Error::msg(format!("Unknown operator `{s}`"))),
        })
    }
}

/// Logical connector joining a predicate to the next one.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl FromStr for Connector {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Connector::And),
            "OR" => Ok(Connector::Or),
            _ => Err(Error::msg(format!("Unknown connector `{s}`"))),
        }
    }
}

/// `field op value`, optionally joined to the following predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Declared or storage name of the field.
    pub field: String,
    pub operator: Operator,
    pub value: Value,
    /// How this predicate connects to the next, `AND` when missing.
    pub connector: Option<Connector>,
}

impl Predicate {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            connector: None,
        }
    }
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Equal, value)
    }
    pub fn and(mut self) -> Self {
        self.connector = Some(Connector::And);
        self
    }
    pub fn or(mut self) -> Self {
        self.connector = Some(Connector::Or);
        self
    }
}

/// Ordering, paging and counting directives of a dynamic query.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Directives {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Field to order by, the primary key when missing.
    pub order_by: Option<String>,
    pub descending: bool,
    /// Return the number of matching rows, ordering and paging are ignored.
    pub count: bool,
}

impl Directives {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }
    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Build from textual key/value pairs: `limit`, `offset`, `orderby`,
    /// `asc`, `desc` and `count` (keys are case-insensitive).
    pub fn parse<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut result = Self::default();
        for (key, value) in pairs {
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "limit" => {
                    result.limit = Some(value.parse().map_err(|_| {
                        Error::msg(format!("Invalid limit `{value}`, expected a positive integer"))
                    })?)
                }
                "offset" => {
                    result.offset = Some(value.parse().map_err(|_| {
                        Error::msg(format!("Invalid offset `{value}`, expected a positive integer"))
                    })?)
                }
                "orderby" | "order_by" => result.order_by = Some(value.to_string()),
                "asc" => result.descending = !parse_flag(value)?,
                "desc" => result.descending = parse_flag(value)?,
                "count" => result.count = parse_flag(value)?,
                other => return Err(Error::msg(format!("Unknown query directive `{other}`"))),
            }
        }
        Ok(result)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::msg(format!("Invalid flag `{value}`"))),
    }
}

/// Outcome of a dynamic query.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<E> {
    Entities(Vec<E>),
    Count(u64),
}

impl<E> Selection<E> {
    pub fn entities(self) -> Option<Vec<E>> {
        match self {
            Selection::Entities(v) => Some(v),
            Selection::Count(..) => None,
        }
    }
    pub fn count(&self) -> Option<u64> {
        match self {
            Selection::Entities(..) => None,
            Selection::Count(v) => Some(*v),
        }
    }
}
