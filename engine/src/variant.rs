//! Dynamically typed attribute values
//!
//! [`Variant`] is the value carried by reflected attributes and by node and
//! scene variables. Every variant can be rendered as editable text and parsed
//! back from text given the expected [`ValueKind`].

use glam::{IVec2, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Named variables attached to a node or a scene
pub type VarMap = BTreeMap<String, Variant>;

/// RGBA color with float channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Typed reference to a named resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_type: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

/// Typed list of resource names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRefList {
    pub resource_type: String,
    pub names: Vec<String>,
}

impl ResourceRefList {
    pub fn new(resource_type: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            names,
        }
    }
}

/// Tag of a [`Variant`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    Vector2,
    Vector3,
    Vector4,
    Quaternion,
    IntVector2,
    Color,
    String,
    StringVector,
    ResourceRef,
    ResourceRefList,
    VariantMap,
}

impl ValueKind {
    /// Human readable type name shown by the inspector
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::None => "None",
            ValueKind::Bool => "Bool",
            ValueKind::Int => "Int",
            ValueKind::Float => "Float",
            ValueKind::Vector2 => "Vector2",
            ValueKind::Vector3 => "Vector3",
            ValueKind::Vector4 => "Vector4",
            ValueKind::Quaternion => "Quaternion",
            ValueKind::IntVector2 => "IntVector2",
            ValueKind::Color => "Color",
            ValueKind::String => "String",
            ValueKind::StringVector => "StringVector",
            ValueKind::ResourceRef => "ResourceRef",
            ValueKind::ResourceRefList => "ResourceRefList",
            ValueKind::VariantMap => "VariantMap",
        }
    }

    /// Number of float components edited one field at a time
    pub fn component_count(self) -> usize {
        match self {
            ValueKind::Vector2 => 2,
            ValueKind::Vector3 => 3,
            ValueKind::Vector4 | ValueKind::Quaternion => 4,
            _ => 0,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One float component of a vector-like value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::W];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::W => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::W => "W",
        }
    }
}

/// Errors produced when converting text into a value
#[derive(Debug, Error, PartialEq)]
pub enum VariantParseError {
    #[error("'{text}' is not a valid {kind}")]
    Invalid { kind: ValueKind, text: String },

    #[error("{kind} values cannot be edited as text")]
    Unsupported { kind: ValueKind },
}

/// Tagged union over every attribute value type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Variant {
    #[default]
    None,
    Bool(bool),
    Int(i32),
    Float(f32),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector4(Vec4),
    Quaternion(Quat),
    IntVector2(IVec2),
    Color(Color),
    String(String),
    StringVector(Vec<String>),
    ResourceRef(ResourceRef),
    ResourceRefList(ResourceRefList),
    VariantMap(VarMap),
}

impl Variant {
    pub fn kind(&self) -> ValueKind {
        match self {
            Variant::None => ValueKind::None,
            Variant::Bool(_) => ValueKind::Bool,
            Variant::Int(_) => ValueKind::Int,
            Variant::Float(_) => ValueKind::Float,
            Variant::Vector2(_) => ValueKind::Vector2,
            Variant::Vector3(_) => ValueKind::Vector3,
            Variant::Vector4(_) => ValueKind::Vector4,
            Variant::Quaternion(_) => ValueKind::Quaternion,
            Variant::IntVector2(_) => ValueKind::IntVector2,
            Variant::Color(_) => ValueKind::Color,
            Variant::String(_) => ValueKind::String,
            Variant::StringVector(_) => ValueKind::StringVector,
            Variant::ResourceRef(_) => ValueKind::ResourceRef,
            Variant::ResourceRefList(_) => ValueKind::ResourceRefList,
            Variant::VariantMap(_) => ValueKind::VariantMap,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Variant::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Variant::Float(v) => Some(*v),
            Variant::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(v) => Some(v),
            _ => None,
        }
    }

    /// Render the value as editable text
    ///
    /// Floats use the shortest representation that parses back to the same
    /// value; vector components are separated by single spaces.
    pub fn to_text(&self) -> String {
        match self {
            Variant::None => String::new(),
            Variant::Bool(v) => v.to_string(),
            Variant::Int(v) => v.to_string(),
            Variant::Float(v) => v.to_string(),
            Variant::Vector2(v) => join_floats(&v.to_array()),
            Variant::Vector3(v) => join_floats(&v.to_array()),
            Variant::Vector4(v) => join_floats(&v.to_array()),
            Variant::Quaternion(q) => join_floats(&q.to_array()),
            Variant::IntVector2(v) => format!("{} {}", v.x, v.y),
            Variant::Color(c) => join_floats(&[c.r, c.g, c.b, c.a]),
            Variant::String(v) => v.clone(),
            Variant::StringVector(v) => v.join(";"),
            Variant::ResourceRef(r) => format!("{};{}", r.resource_type, r.name),
            Variant::ResourceRefList(r) => {
                let mut parts = vec![r.resource_type.clone()];
                parts.extend(r.names.iter().cloned());
                parts.join(";")
            }
            Variant::VariantMap(map) => format!("{} variables", map.len()),
        }
    }

    /// Parse text as a value of the given kind
    pub fn parse(kind: ValueKind, text: &str) -> Result<Variant, VariantParseError> {
        let invalid = || VariantParseError::Invalid {
            kind,
            text: text.to_string(),
        };
        let trimmed = text.trim();

        let value = match kind {
            ValueKind::None => Variant::None,
            ValueKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Variant::Bool(true),
                "false" | "0" | "no" | "off" => Variant::Bool(false),
                _ => return Err(invalid()),
            },
            ValueKind::Int => Variant::Int(trimmed.parse().map_err(|_| invalid())?),
            ValueKind::Float => Variant::Float(parse_float(trimmed).ok_or_else(invalid)?),
            ValueKind::Vector2 => Variant::Vector2(Vec2::from_array(parse_floats(trimmed).ok_or_else(invalid)?)),
            ValueKind::Vector3 => Variant::Vector3(Vec3::from_array(parse_floats(trimmed).ok_or_else(invalid)?)),
            ValueKind::Vector4 => Variant::Vector4(Vec4::from_array(parse_floats(trimmed).ok_or_else(invalid)?)),
            ValueKind::Quaternion => {
                Variant::Quaternion(Quat::from_array(parse_floats(trimmed).ok_or_else(invalid)?))
            }
            ValueKind::Color => {
                let [r, g, b, a] = parse_floats(trimmed).ok_or_else(invalid)?;
                Variant::Color(Color::rgba(r, g, b, a))
            }
            ValueKind::IntVector2 => {
                let parts: Vec<i32> = trimmed
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<_, _>>()
                    .map_err(|_| invalid())?;
                match parts.as_slice() {
                    [x, y] => Variant::IntVector2(IVec2::new(*x, *y)),
                    _ => return Err(invalid()),
                }
            }
            ValueKind::String => Variant::String(text.to_string()),
            ValueKind::StringVector => Variant::StringVector(if text.is_empty() {
                Vec::new()
            } else {
                text.split(';').map(str::to_string).collect()
            }),
            ValueKind::ResourceRef => {
                let (resource_type, name) = text.split_once(';').ok_or_else(invalid)?;
                Variant::ResourceRef(ResourceRef::new(resource_type, name))
            }
            ValueKind::ResourceRefList => {
                let mut parts = text.split(';');
                let resource_type = parts.next().unwrap_or_default();
                Variant::ResourceRefList(ResourceRefList::new(
                    resource_type,
                    parts.filter(|p| !p.is_empty()).map(str::to_string).collect(),
                ))
            }
            ValueKind::VariantMap => return Err(VariantParseError::Unsupported { kind }),
        };
        Ok(value)
    }

    /// Float component of a vector-like value
    pub fn component(&self, axis: Axis) -> Option<f32> {
        let values: Vec<f32> = match self {
            Variant::Vector2(v) => v.to_array().to_vec(),
            Variant::Vector3(v) => v.to_array().to_vec(),
            Variant::Vector4(v) => v.to_array().to_vec(),
            Variant::Quaternion(q) => q.to_array().to_vec(),
            _ => return None,
        };
        values.get(axis.index()).copied()
    }

    /// Copy of a vector-like value with one component replaced
    pub fn with_component(&self, axis: Axis, value: f32) -> Option<Variant> {
        let i = axis.index();
        match self {
            Variant::Vector2(v) if i < 2 => {
                let mut a = v.to_array();
                a[i] = value;
                Some(Variant::Vector2(Vec2::from_array(a)))
            }
            Variant::Vector3(v) if i < 3 => {
                let mut a = v.to_array();
                a[i] = value;
                Some(Variant::Vector3(Vec3::from_array(a)))
            }
            Variant::Vector4(v) => {
                let mut a = v.to_array();
                a[i] = value;
                Some(Variant::Vector4(Vec4::from_array(a)))
            }
            Variant::Quaternion(q) => {
                let mut a = q.to_array();
                a[i] = value;
                Some(Variant::Quaternion(Quat::from_array(a)))
            }
            _ => None,
        }
    }
}

/// Parse a single float, accepting the textual forms `to_text` produces
pub fn parse_float(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok()
}

fn parse_floats<const N: usize>(text: &str) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    let mut parts = text.split_whitespace();
    for slot in out.iter_mut() {
        *slot = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

fn join_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_text_round_trip() {
        for value in [0.1_f32, -3.75, 1.0e-7, 123456.78, f32::MAX, f32::MIN_POSITIVE] {
            let text = Variant::Float(value).to_text();
            assert_eq!(Variant::parse(ValueKind::Float, &text), Ok(Variant::Float(value)));
        }
    }

    #[test]
    fn test_vector_text_format() {
        let value = Variant::Vector3(Vec3::new(1.0, -2.5, 0.0));
        assert_eq!(value.to_text(), "1 -2.5 0");
        assert_eq!(Variant::parse(ValueKind::Vector3, "1 -2.5 0"), Ok(value));
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(Variant::parse(ValueKind::Vector3, "1 2").is_err());
        assert!(Variant::parse(ValueKind::Vector2, "1 2 3").is_err());
        assert!(Variant::parse(ValueKind::Float, "abc").is_err());
    }

    #[test]
    fn test_bool_parsing() {
        assert_eq!(Variant::parse(ValueKind::Bool, "True"), Ok(Variant::Bool(true)));
        assert_eq!(Variant::parse(ValueKind::Bool, "0"), Ok(Variant::Bool(false)));
        assert!(Variant::parse(ValueKind::Bool, "maybe").is_err());
    }

    #[test]
    fn test_with_component() {
        let value = Variant::Quaternion(Quat::IDENTITY);
        let edited = value.with_component(Axis::Y, 0.5).unwrap();
        assert_eq!(edited.component(Axis::Y), Some(0.5));
        assert_eq!(edited.component(Axis::W), Some(1.0));

        let vec2 = Variant::Vector2(Vec2::ZERO);
        assert!(vec2.with_component(Axis::Z, 1.0).is_none());
        assert!(Variant::Float(1.0).with_component(Axis::X, 2.0).is_none());
    }

    #[test]
    fn test_variant_map_is_not_editable() {
        assert_eq!(
            Variant::parse(ValueKind::VariantMap, ""),
            Err(VariantParseError::Unsupported {
                kind: ValueKind::VariantMap
            })
        );
    }

    #[test]
    fn test_variant_json_round_trip() {
        let mut map = VarMap::new();
        map.insert("Character Node".to_string(), Variant::Int(7));
        map.insert(
            "Tags".to_string(),
            Variant::StringVector(vec!["a".to_string(), "b".to_string()]),
        );
        let json = serde_json::to_string(&map).unwrap();
        let back: VarMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
