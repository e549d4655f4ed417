//! Attribute reflection for nodes and components
//!
//! Components expose their editable state as a flat list of named attributes.
//! The editor and scene persistence only ever go through this interface, so a
//! component type needs nothing beyond `#[derive(Reflect)]` to be inspectable
//! and saveable.

use glam::{IVec2, Quat, Vec2, Vec3, Vec4};
use std::any::Any;
use std::fmt;
use thiserror::Error;

use crate::core::math::Aabb;
use crate::variant::{Color, ResourceRef, ResourceRefList, ValueKind, Variant};

/// Whether an attribute may be written from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    Default,
    ReadOnly,
}

/// Static description of one reflected attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: &'static str,
    pub kind: ValueKind,
    pub mode: AttributeMode,
}

impl AttributeInfo {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            mode: AttributeMode::Default,
        }
    }

    pub const fn read_only(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            mode: AttributeMode::ReadOnly,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == AttributeMode::ReadOnly
    }
}

/// Errors raised when writing attributes by name
#[derive(Debug, Error, PartialEq)]
pub enum ReflectError {
    #[error("{type_name} has no attribute named '{attribute}'")]
    UnknownAttribute { type_name: String, attribute: String },

    #[error("attribute '{attribute}' expects {expected}, got {found}")]
    KindMismatch {
        attribute: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("attribute '{0}' is read-only")]
    ReadOnly(String),
}

/// Name-based access to an object's attributes
pub trait Reflect: Any + fmt::Debug {
    /// Registered type name, e.g. `"StaticModel"`
    fn type_name(&self) -> &'static str;

    fn attributes(&self) -> &'static [AttributeInfo];

    fn attribute(&self, name: &str) -> Option<Variant>;

    fn set_attribute(&mut self, name: &str, value: Variant) -> Result<(), ReflectError>;

    /// Local-space bounds for objects that can be hit by picking rays
    fn drawable_bounds(&self) -> Option<Aabb> {
        None
    }

    fn clone_boxed(&self) -> Box<dyn Reflect>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Look up the static description of an attribute
    fn attribute_info(&self, name: &str) -> Option<AttributeInfo> {
        self.attributes().iter().find(|a| a.name == name).copied()
    }
}

impl Clone for Box<dyn Reflect> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl dyn Reflect {
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Compile-time identity of a reflected component type
pub trait TypeInfo {
    const TYPE_NAME: &'static str;
    /// Factory category; `None` lands in the "None" bucket
    const CATEGORY: Option<&'static str>;
}

/// Conversion between a field type and [`Variant`]
pub trait ReflectValue: Sized {
    const KIND: ValueKind;

    fn to_variant(&self) -> Variant;

    fn from_variant(value: Variant) -> Option<Self>;
}

macro_rules! reflect_value {
    ($ty:ty, $kind:ident) => {
        impl ReflectValue for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn to_variant(&self) -> Variant {
                Variant::$kind(self.clone())
            }

            fn from_variant(value: Variant) -> Option<Self> {
                match value {
                    Variant::$kind(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

reflect_value!(bool, Bool);
reflect_value!(i32, Int);
reflect_value!(Vec2, Vector2);
reflect_value!(Vec3, Vector3);
reflect_value!(Vec4, Vector4);
reflect_value!(Quat, Quaternion);
reflect_value!(IVec2, IntVector2);
reflect_value!(Color, Color);
reflect_value!(String, String);
reflect_value!(Vec<String>, StringVector);
reflect_value!(ResourceRef, ResourceRef);
reflect_value!(ResourceRefList, ResourceRefList);

impl ReflectValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_variant(&self) -> Variant {
        Variant::Float(*self)
    }

    fn from_variant(value: Variant) -> Option<Self> {
        value.as_float()
    }
}

/// Write a converted value into a field, reporting a kind mismatch
pub fn assign<T: ReflectValue>(
    field: &mut T,
    attribute: &str,
    value: Variant,
) -> Result<(), ReflectError> {
    let found = value.kind();
    match T::from_variant(value) {
        Some(v) => {
            *field = v;
            Ok(())
        }
        None => Err(ReflectError::KindMismatch {
            attribute: attribute.to_string(),
            expected: T::KIND,
            found,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_accepts_matching_kind() {
        let mut field = Vec3::ZERO;
        assign(&mut field, "Position", Variant::Vector3(Vec3::ONE)).unwrap();
        assert_eq!(field, Vec3::ONE);
    }

    #[test]
    fn test_assign_rejects_mismatch() {
        let mut field = false;
        let err = assign(&mut field, "Is Enabled", Variant::Int(1)).unwrap_err();
        assert_eq!(
            err,
            ReflectError::KindMismatch {
                attribute: "Is Enabled".to_string(),
                expected: ValueKind::Bool,
                found: ValueKind::Int,
            }
        );
        assert!(!field);
    }

    #[test]
    fn test_float_accepts_int() {
        let mut field = 0.0_f32;
        assign(&mut field, "Range", Variant::Int(3)).unwrap();
        assert_eq!(field, 3.0);
    }
}
