//! Generic row → entity mapping.
//!
//! # Responsibility
//! - Turn the current row of a query into any `Deserialize` struct.
//! - Resolve struct fields to columns by name, not by position.
//!
//! # Invariants
//! - Column lookup ignores ASCII case and underscores, so `project_id`,
//!   `PROJECT_ID` and `projectId` all feed field `project_id`.
//! - A missing non-optional column or an uncoercible value is a
//!   `MappingError`; nothing is silently defaulted except `Option` fields and
//!   fields marked `#[serde(default)]`.
//! - The row cursor is never advanced here.

use rusqlite::types::ValueRef;
use rusqlite::{Row, Statement};
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A result row could not be converted to the requested entity shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingError {
    target: Option<&'static str>,
    message: String,
}

impl MappingError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            target: None,
            message: message.into(),
        }
    }

    fn for_target(mut self, target: &'static str) -> Self {
        self.target.get_or_insert(target);
        self
    }

    /// Entity the row was mapped into, when known.
    pub fn target(&self) -> Option<&'static str> {
        self.target
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.target {
            Some(target) => write!(f, "cannot map row into {target}: {}", self.message),
            None => write!(f, "cannot map row: {}", self.message),
        }
    }
}

impl Error for MappingError {}

impl de::Error for MappingError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::new(msg.to_string())
    }
}

/// Maps the row the cursor currently points at into `T`.
pub fn extract<T: DeserializeOwned>(row: &Row<'_>) -> Result<T, MappingError> {
    T::deserialize(RowDeserializer { row }).map_err(|err| err.for_target(short_type_name::<T>()))
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|ch| *ch != '_')
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

struct RowDeserializer<'a, 'stmt> {
    row: &'a Row<'stmt>,
}

impl RowDeserializer<'_, '_> {
    /// Pairs each requested field with the index of its column.
    fn resolve_columns(&self, fields: &'static [&'static str]) -> Vec<(&'static str, usize)> {
        let statement: &Statement<'_> = self.row.as_ref();
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(normalize_name)
            .collect();

        fields
            .iter()
            .filter_map(|field| {
                let wanted = normalize_name(field);
                columns
                    .iter()
                    .position(|column| *column == wanted)
                    .map(|index| (*field, index))
            })
            .collect()
    }
}

impl<'de> de::Deserializer<'de> for RowDeserializer<'_, '_> {
    type Error = MappingError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(MappingError::new(
            "rows can only be mapped into structs with named fields",
        ))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let columns = self.resolve_columns(fields);
        visitor.visit_map(RowFields {
            row: self.row,
            columns,
            next: 0,
        })
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

struct RowFields<'a, 'stmt> {
    row: &'a Row<'stmt>,
    columns: Vec<(&'static str, usize)>,
    next: usize,
}

impl<'de> MapAccess<'de> for RowFields<'_, '_> {
    type Error = MappingError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        let Some((field, _)) = self.columns.get(self.next) else {
            return Ok(None);
        };
        seed.deserialize((*field).into_deserializer()).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Self::Error> {
        let (field, index) = self.columns[self.next];
        self.next += 1;

        let value = self
            .row
            .get_ref(index)
            .map_err(|err| MappingError::new(format!("column for `{field}`: {err}")))?;
        seed.deserialize(ValueDeserializer { field, value })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.columns.len() - self.next)
    }
}

struct ValueDeserializer<'a> {
    field: &'static str,
    value: ValueRef<'a>,
}

impl ValueDeserializer<'_> {
    fn text(&self, bytes: &[u8]) -> Result<String, MappingError> {
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            MappingError::new(format!("`{}` holds text that is not valid UTF-8", self.field))
        })
    }

    fn with_field(&self, err: MappingError) -> MappingError {
        MappingError::new(format!("`{}`: {}", self.field, err.message))
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'_> {
    type Error = MappingError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let result = match self.value {
            ValueRef::Null => visitor.visit_unit(),
            ValueRef::Integer(value) => visitor.visit_i64(value),
            ValueRef::Real(value) => visitor.visit_f64(value),
            ValueRef::Text(bytes) => {
                let text = self.text(bytes)?;
                visitor.visit_string(text)
            }
            ValueRef::Blob(bytes) => visitor.visit_byte_buf(bytes.to_vec()),
        };
        result.map_err(|err| self.with_field(err))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            ValueRef::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            ValueRef::Integer(0) => visitor.visit_bool(false),
            ValueRef::Integer(1) => visitor.visit_bool(true),
            other => Err(MappingError::new(format!(
                "`{}` expected 0 or 1 for a boolean, got {:?}",
                self.field,
                other.data_type()
            ))),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::extract;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        sample_id: i64,
        label: String,
        amount: Decimal,
        note: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
    }

    fn map_query(sql: &str) -> Result<Sample, super::MappingError> {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare(sql).unwrap();
        let mut rows = stmt.query([]).unwrap();
        let row = rows.next().unwrap().expect("query should return one row");
        extract::<Sample>(row)
    }

    #[test]
    fn maps_columns_by_name_regardless_of_order_and_case() {
        let sample = map_query(
            "SELECT 'x' AS NOTE, '12.25' AS amount, 'plank' AS Label, 7 AS sampleId;",
        )
        .unwrap();

        assert_eq!(
            sample,
            Sample {
                sample_id: 7,
                label: "plank".to_string(),
                amount: Decimal::new(1225, 2),
                note: Some("x".to_string()),
                tags: Vec::new(),
            }
        );
    }

    #[test]
    fn null_and_absent_optional_columns_become_none() {
        let with_null =
            map_query("SELECT 1 AS sample_id, 'a' AS label, 3 AS amount, NULL AS note;").unwrap();
        assert_eq!(with_null.note, None);
        assert_eq!(with_null.amount, Decimal::new(3, 0));

        let without_column = map_query("SELECT 1 AS sample_id, 'a' AS label, 3 AS amount;").unwrap();
        assert_eq!(without_column.note, None);
    }

    #[test]
    fn missing_required_column_fails_with_target_name() {
        let err = map_query("SELECT 1 AS sample_id, 3 AS amount;").unwrap_err();
        assert_eq!(err.target(), Some("Sample"));
        assert!(err.message().contains("label"));
    }

    #[test]
    fn non_numeric_text_cannot_become_decimal() {
        let err = map_query("SELECT 1 AS sample_id, 'a' AS label, 'lots' AS amount;").unwrap_err();
        assert!(err.message().contains("amount"));
    }

    #[test]
    fn text_cannot_become_integer() {
        let err = map_query("SELECT 'one' AS sample_id, 'a' AS label, 1 AS amount;").unwrap_err();
        assert!(err.message().contains("sample_id"));
    }
}
