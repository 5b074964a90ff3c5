//! Schema-driven, lazily materialized entities.
//!
//! An [`Entity`] keeps the raw JSON object it was built from and a pointer to
//! its static [`Schema`]. Declared fields are coerced on first read and the
//! result is memoized per instance; fields never read are never converted.
//!
//! ```rust,ignore
//! use ferrogram_core::{Entity, types::MESSAGE};
//!
//! let message = Entity::from_value(&MESSAGE, payload)?;
//! let from = message.entity("from")?;          // nested User, cached
//! let id = message.int("message_id");          // Option<i64>
//! ```

pub mod coerce;
pub mod schema;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{MappingError, MappingResult};
pub use schema::{FieldType, GENERIC, Schema};

/// A coerced field value.
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Declared string.
    String(String),
    /// Declared integer.
    Int(i64),
    /// Declared float.
    Float(f64),
    /// Declared boolean.
    Bool(bool),
    /// Declared nested entity.
    Entity(Arc<Entity>),
    /// Declared array of entities.
    Array(Vec<Arc<Entity>>),
    /// Declared array of arrays of entities.
    Matrix(Vec<Vec<Arc<Entity>>>),
    /// Undeclared or untyped field.
    Raw(Value),
}

impl FieldValue {
    /// Reads the value as a string.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Raw(v) => Some(coerce::to_string(v)),
            _ => None,
        }
    }

    /// Reads the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        self.scalar().map(|v| coerce::to_int(&v))
    }

    /// Reads the value as a float.
    pub fn as_float(&self) -> Option<f64> {
        self.scalar().map(|v| coerce::to_float(&v))
    }

    /// Reads the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        self.scalar().map(|v| coerce::to_bool(&v))
    }

    /// Scalar variants as JSON, for the shared casts in [`coerce`].
    fn scalar(&self) -> Option<Value> {
        match self {
            Self::String(s) => Some(Value::String(s.clone())),
            Self::Int(i) => Some(Value::from(*i)),
            Self::Float(f) => Some(Value::from(*f)),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Raw(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Reads the value as a nested entity.
    pub fn as_entity(&self) -> Option<Arc<Entity>> {
        match self {
            Self::Entity(e) => Some(e.clone()),
            _ => None,
        }
    }
}

/// A schema-backed view over a raw JSON object.
///
/// Equality compares the raw maps only, so two entities built from the same
/// payload are equal regardless of which fields have been read.
pub struct Entity {
    schema: &'static Schema,
    raw: Map<String, Value>,
    cache: Mutex<HashMap<String, FieldValue>>,
}

impl Entity {
    /// Wraps a raw object with `schema`. Nothing is converted yet.
    pub fn new(schema: &'static Schema, raw: Map<String, Value>) -> Self {
        Self {
            schema,
            raw,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Wraps a raw object without declared fields.
    pub fn generic(raw: Map<String, Value>) -> Self {
        Self::new(&GENERIC, raw)
    }

    /// Creates an empty entity, typically to build an outbound payload.
    pub fn empty(schema: &'static Schema) -> Self {
        Self::new(schema, Map::new())
    }

    /// Materializes `value`, which must be a JSON object.
    pub fn from_value(schema: &'static Schema, value: Value) -> MappingResult<Self> {
        match value {
            Value::Object(raw) => Ok(Self::new(schema, raw)),
            other => Err(MappingError::NotAnObject {
                entity: schema.name,
                found: coerce::kind_of(&other),
            }),
        }
    }

    /// Returns the schema.
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Returns the entity type name.
    pub fn name(&self) -> &'static str {
        self.schema.name
    }

    /// Returns `true` if this entity was materialized with `schema`.
    pub fn is(&self, schema: &'static Schema) -> bool {
        self.schema == schema
    }

    /// Returns the raw backing map.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Consumes the entity, returning the raw backing map.
    pub fn into_raw(self) -> Map<String, Value> {
        self.raw
    }

    /// Returns the raw map as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.raw.clone())
    }

    /// Returns `true` if `field` is present in the raw map.
    pub fn isset(&self, field: &str) -> bool {
        self.raw.contains_key(field)
    }

    /// Reads `field`, coercing and caching it on first access.
    ///
    /// Returns `Ok(None)` for absent or `null` fields. Fails only when a nested
    /// entity field holds the wrong JSON shape.
    pub fn get(&self, field: &str) -> MappingResult<Option<FieldValue>> {
        if let Some(hit) = self.cache.lock().get(field) {
            return Ok(Some(hit.clone()));
        }

        let Some(raw) = self.raw.get(field).filter(|v| !v.is_null()) else {
            return Ok(None);
        };

        let value = match self.schema.field(field) {
            Some(ty) => self.coerce(field, ty, raw)?,
            None => FieldValue::Raw(raw.clone()),
        };

        self.cache.lock().insert(field.to_string(), value.clone());
        Ok(Some(value))
    }

    fn coerce(&self, field: &str, ty: FieldType, raw: &Value) -> MappingResult<FieldValue> {
        Ok(match ty {
            FieldType::String => FieldValue::String(coerce::to_string(raw)),
            FieldType::Int => FieldValue::Int(coerce::to_int(raw)),
            FieldType::Float => FieldValue::Float(coerce::to_float(raw)),
            FieldType::Bool => FieldValue::Bool(coerce::to_bool(raw)),
            FieldType::Raw => FieldValue::Raw(raw.clone()),
            FieldType::Entity(schema) => {
                FieldValue::Entity(Arc::new(self.nested(field, ty, schema, raw)?))
            }
            FieldType::Array(schema) => {
                let items = self.items(field, ty, raw)?;
                FieldValue::Array(
                    items
                        .iter()
                        .map(|item| self.nested(field, ty, schema, item).map(Arc::new))
                        .collect::<MappingResult<_>>()?,
                )
            }
            FieldType::Matrix(schema) => {
                let rows = self.items(field, ty, raw)?;
                let mut matrix = Vec::with_capacity(rows.len());
                for row in rows {
                    matrix.push(
                        self.items(field, ty, row)?
                            .iter()
                            .map(|item| self.nested(field, ty, schema, item).map(Arc::new))
                            .collect::<MappingResult<Vec<_>>>()?,
                    );
                }
                FieldValue::Matrix(matrix)
            }
        })
    }

    fn nested(
        &self,
        field: &str,
        ty: FieldType,
        schema: &'static Schema,
        raw: &Value,
    ) -> MappingResult<Entity> {
        match raw {
            Value::Object(map) => Ok(Entity::new(schema, map.clone())),
            other => Err(self.mismatch(field, ty, other)),
        }
    }

    fn items<'v>(&self, field: &str, ty: FieldType, raw: &'v Value) -> MappingResult<&'v [Value]> {
        match raw {
            Value::Array(items) => Ok(items.as_slice()),
            other => Err(self.mismatch(field, ty, other)),
        }
    }

    fn mismatch(&self, field: &str, ty: FieldType, found: &Value) -> MappingError {
        MappingError::Mismatch {
            entity: self.schema.name,
            field: field.to_string(),
            expected: ty.describe(),
            found: coerce::kind_of(found),
        }
    }

    /// Reads `field` as a string.
    pub fn string(&self, field: &str) -> Option<String> {
        self.get(field).ok().flatten()?.as_string()
    }

    /// Reads `field` as an integer.
    pub fn int(&self, field: &str) -> Option<i64> {
        self.get(field).ok().flatten()?.as_int()
    }

    /// Reads `field` as a float.
    pub fn float(&self, field: &str) -> Option<f64> {
        self.get(field).ok().flatten()?.as_float()
    }

    /// Reads `field` as a boolean.
    pub fn bool(&self, field: &str) -> Option<bool> {
        self.get(field).ok().flatten()?.as_bool()
    }

    /// Reads a nested entity field.
    ///
    /// Undeclared object fields are materialized as generic entities.
    pub fn entity(&self, field: &str) -> MappingResult<Option<Arc<Entity>>> {
        match self.get(field)? {
            None => Ok(None),
            Some(FieldValue::Entity(e)) => Ok(Some(e)),
            Some(FieldValue::Raw(Value::Object(map))) => Ok(Some(Arc::new(Entity::generic(map)))),
            Some(FieldValue::Raw(other)) => Err(MappingError::Mismatch {
                entity: self.schema.name,
                field: field.to_string(),
                expected: "object",
                found: coerce::kind_of(&other),
            }),
            Some(_) => Err(MappingError::Mismatch {
                entity: self.schema.name,
                field: field.to_string(),
                expected: "object",
                found: "scalar",
            }),
        }
    }

    /// Reads an array-of-entity field. Absent fields read as empty.
    pub fn entities(&self, field: &str) -> MappingResult<Vec<Arc<Entity>>> {
        match self.get(field)? {
            None => Ok(Vec::new()),
            Some(FieldValue::Array(items)) => Ok(items),
            Some(FieldValue::Matrix(rows)) => Ok(rows.into_iter().flatten().collect()),
            Some(_) => Err(MappingError::Mismatch {
                entity: self.schema.name,
                field: field.to_string(),
                expected: "array of objects",
                found: "other",
            }),
        }
    }

    /// Stores a raw value, invalidating the cached coercion of `field`.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let field = field.into();
        self.cache.get_mut().remove(&field);
        self.raw.insert(field, value.into());
        self
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Removes `field` from the raw map, returning its previous raw value.
    pub fn unset(&mut self, field: &str) -> Option<Value> {
        self.cache.get_mut().remove(field);
        self.raw.remove(field)
    }
}

impl Clone for Entity {
    fn clone(&self) -> Self {
        Self::new(self.schema, self.raw.clone())
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.schema.name)
            .field("raw", &self.raw)
            .finish()
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Entity::generic)
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        Value::Object(entity.raw)
    }
}
