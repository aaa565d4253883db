//! Uniform and varying declaration synthesis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value carried by a uniform input.
///
/// Untagged for document loading: scalars, booleans, and fixed-size arrays map
/// directly to JSON numbers, bools, and arrays (length picks the variant).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat3([f32; 9]),
    Mat4([f32; 16]),
}

impl UniformValue {
    /// The GLSL type token a value of this shape declares as by default.
    pub fn glsl_type(&self) -> &'static str {
        match self {
            UniformValue::Bool(_) => "bool",
            UniformValue::Int(_) => "int",
            UniformValue::Float(_) => "float",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Mat3(_) => "mat3",
            UniformValue::Mat4(_) => "mat4",
        }
    }
}

/// A declared uniform: semantic type token plus initial value.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformInput {
    pub glsl_type: String,
    pub value: UniformValue,
}

impl UniformInput {
    /// Uniform whose type token is inferred from the value shape.
    pub fn new(value: UniformValue) -> Self {
        Self {
            glsl_type: value.glsl_type().to_string(),
            value,
        }
    }

    /// Uniform with an explicit type token (e.g. a vec3 declared as `color`
    /// type aliases, or precision-qualified tokens).
    pub fn typed(glsl_type: impl Into<String>, value: UniformValue) -> Self {
        Self {
            glsl_type: glsl_type.into(),
            value,
        }
    }
}

/// A declared varying: type token only, no initializer concept.
#[derive(Clone, Debug, PartialEq)]
pub struct VaryingInput {
    pub glsl_type: String,
}

impl VaryingInput {
    pub fn new(glsl_type: impl Into<String>) -> Self {
        Self {
            glsl_type: glsl_type.into(),
        }
    }
}

/// Name-keyed uniform set. `BTreeMap` keeps declaration order byte-stable.
pub type Uniforms = BTreeMap<String, UniformInput>;

/// Name-keyed varying set.
pub type Varyings = BTreeMap<String, VaryingInput>;

/// Emit one `uniform <type> <name>;` line per input, in map iteration order.
///
/// Idempotent by construction: both stages call this with the same set and
/// must receive byte-identical text.
pub fn declare_uniforms(uniforms: &Uniforms) -> String {
    let mut out = String::new();
    for (name, input) in uniforms {
        out.push_str(&format!("uniform {} {};\n", input.glsl_type, name));
    }
    out
}

/// Emit one `varying <type> <name>;` line per input, in map iteration order.
pub fn declare_varyings(varyings: &Varyings) -> String {
    let mut out = String::new();
    for (name, input) in varyings {
        out.push_str(&format!("varying {} {};\n", input.glsl_type, name));
    }
    out
}
