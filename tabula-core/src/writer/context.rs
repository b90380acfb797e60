use crate::{Query, Value};

/// State carried while writing one statement: the parameters bound so far.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Context {
    /// Number of placeholders written.
    pub counter: u32,
    pub params: Vec<Value>,
}

impl Context {
    pub fn new() -> Self {
        Default::default()
    }

    /// Register a parameter and return its 1-based position.
    pub fn bind(&mut self, value: Value) -> u32 {
        self.params.push(value);
        self.counter += 1;
        self.counter
    }

    pub fn into_query(self, sql: String) -> Query {
        Query {
            sql,
            params: self.params,
        }
    }
}
