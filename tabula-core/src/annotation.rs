use crate::{Error, Result};

/// Marks a field as not persisted.
pub const NOT_PERSISTED: &str = "-";

/// Attribute names understood by the schema builder.
pub const ATTRIBUTES: &[&str] = &[
    "primary_key",
    "start",
    "default",
    "nullable",
    "constraint",
    "index",
    "fkey",
];

/// Parsed form of a field annotation such as `primary_key:inc;start:90000000`.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub persisted: bool,
    /// Attribute pairs in declaration order.
    pub attributes: Vec<(String, String)>,
}

/// Split the annotation on `;`, then every clause once on `:`.
///
/// A clause made of the sentinel `-` alone marks the field as not persisted and
/// stops the parsing, any other lone word becomes a pair with an empty value.
pub fn parse_annotation(annotation: &str) -> Annotation {
    let mut result = Annotation {
        persisted: true,
        attributes: Vec::new(),
    };
    for clause in annotation.split(';') {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }
        match clause.split_once(':') {
            Some((name, value)) => result
                .attributes
                .push((name.trim().to_string(), value.trim().to_string())),
            None if clause == NOT_PERSISTED => {
                result.persisted = false;
                result.attributes.clear();
                break;
            }
            None => result.attributes.push((clause.to_string(), String::new())),
        }
    }
    result
}

/// Check every attribute pair is one the schema builder knows how to apply.
pub fn validate_attributes<'a>(
    attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<()> {
    for (name, value) in attributes {
        let valid = match name {
            "primary_key" => value.is_empty() || value == "inc",
            "start" => value.parse::<i64>().is_ok(),
            "default" => !value.is_empty(),
            "nullable" => value == "true" || value == "false",
            "constraint" => value == "unique",
            "index" => !value.is_empty(),
            "fkey" => parse_foreign_key_target(value).is_some(),
            _ => {
                return Err(Error::msg(format!(
                    "Unknown attribute `{name}`, expected one of: {}",
                    ATTRIBUTES.join(", ")
                )));
            }
        };
        if !valid {
            return Err(Error::msg(format!(
                "Invalid value `{value}` for attribute `{name}`"
            )));
        }
    }
    Ok(())
}

/// `table(column)` into its two parts.
pub fn parse_foreign_key_target(value: &str) -> Option<(&str, &str)> {
    let (table, rest) = value.split_once('(')?;
    let column = rest.strip_suffix(')')?;
    let (table, column) = (table.trim(), column.trim());
    if table.is_empty() || column.is_empty() {
        return None;
    }
    Some((table, column))
}
