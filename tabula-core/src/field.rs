use crate::{Value, parse_foreign_key_target};

/// Normalized description of one entity field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Name as declared in the entity.
    pub name: &'static str,
    /// Column name, see [`storage_name`](crate::storage_name).
    pub storage_name: &'static str,
    /// Declared type, as written in the source.
    pub declared_type: &'static str,
    /// Type prototype with any `Option` wrapper removed.
    pub value: Value,
    /// Declared as `Option<T>`.
    pub nullable_type: bool,
    pub persisted: bool,
    /// Attribute pairs, in annotation order.
    pub attributes: Vec<(&'static str, &'static str)>,
}

impl FieldDef {
    pub fn attribute(&self, name: &str) -> Option<&'static str> {
        self.attributes
            .iter()
            .find_map(|(k, v)| if *k == name { Some(*v) } else { None })
    }
    pub fn is_primary_key(&self) -> bool {
        self.persisted && self.attribute("primary_key").is_some()
    }
    pub fn is_increment(&self) -> bool {
        self.persisted && self.attribute("primary_key") == Some("inc")
    }
    pub fn default(&self) -> Option<&'static str> {
        self.attribute("default")
    }
    /// `nullable:false` was declared.
    pub fn is_not_null(&self) -> bool {
        self.attribute("nullable") == Some("false")
    }
    pub fn start(&self) -> Option<i64> {
        self.attribute("start").and_then(|v| v.parse().ok())
    }
    pub fn foreign_key(&self) -> Option<(&'static str, &'static str)> {
        self.attribute("fkey").and_then(parse_foreign_key_target)
    }
}

/// Table name and field list of an entity, the unit the schema operations work on.
#[derive(Debug, Clone, Copy)]
pub struct TableRef {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

impl TableRef {
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields
            .iter()
            .filter(|f| f.persisted)
            .find(|f| f.name == name || f.storage_name == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .filter(|f| f.persisted)
                    .find(|f| f.storage_name.eq_ignore_ascii_case(name))
            })
    }
    pub fn primary_key(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter().filter(|f| f.is_primary_key())
    }
    pub fn persisted(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter().filter(|f| f.persisted)
    }
}
