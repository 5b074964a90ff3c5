//! Static entity schemas.
//!
//! A [`Schema`] names an entity and declares the type of each known field.
//! Schemas are `static` items, so nested references (including self
//! references such as `Message.reply_to_message`) are resolved at compile time.
//!
//! ```rust,ignore
//! pub static USER: Schema = Schema {
//!     name: "User",
//!     fields: &[("id", FieldType::Int), ("first_name", FieldType::String)],
//! };
//! ```

use std::fmt;

/// Declared type of a schema field.
#[derive(Clone, Copy)]
pub enum FieldType {
    /// UTF-8 string.
    String,
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// Boolean.
    Bool,
    /// Nested entity.
    Entity(&'static Schema),
    /// Array of entities.
    Array(&'static Schema),
    /// Array of arrays of entities (photo sizes, keyboards).
    Matrix(&'static Schema),
    /// Kept as raw JSON.
    Raw,
}

impl FieldType {
    /// Short human-readable name used in mapping errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Entity(_) => "object",
            Self::Array(_) => "array of objects",
            Self::Matrix(_) => "array of arrays of objects",
            Self::Raw => "any",
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(s) => write!(f, "Entity({})", s.name),
            Self::Array(s) => write!(f, "Array({})", s.name),
            Self::Matrix(s) => write!(f, "Matrix({})", s.name),
            other => f.write_str(other.describe()),
        }
    }
}

/// Field table of one entity type.
pub struct Schema {
    /// Entity type name, e.g. `"Message"`.
    pub name: &'static str,
    /// Declared fields in platform order.
    pub fields: &'static [(&'static str, FieldType)],
}

impl Schema {
    /// Looks up the declared type of `field`.
    pub fn field(&self, field: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, ty)| *ty)
    }

    /// Returns `true` if `field` is declared.
    pub fn declares(&self, field: &str) -> bool {
        self.field(field).is_some()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Schema {}

// Printing the field table would recurse through self-referential schemas.
impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Schema with no declared fields; every field reads as raw JSON.
pub static GENERIC: Schema = Schema {
    name: "Entity",
    fields: &[],
};
