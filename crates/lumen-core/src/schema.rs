// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Declarative field tables.
//!
//! A variant describes its wire schema once, as a static table of [`Field`]s in
//! canonical write order. Decoding, default filling, default elision and field
//! ordering are all driven by that table; no variant carries its own
//! property-matching code.

use crate::error::TokenError;
use crate::math::{self, LinearRgba};
use crate::token::{Scalar, Token, TokenSpan, TokenWriter};
use std::any::Any;
use std::fmt::Debug;

/// The in-memory value of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// A single-precision number.
    Float(f32),
    /// A color; how many channels reach the wire depends on the [`FieldType`].
    Color(LinearRgba),
}

impl FieldValue {
    /// Returns the number, if this is a float value.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            FieldValue::Float(value) => Some(*value),
            FieldValue::Color(_) => None,
        }
    }

    /// Returns the color, if this is a color value.
    pub fn as_color(&self) -> Option<LinearRgba> {
        match self {
            FieldValue::Color(color) => Some(*color),
            FieldValue::Float(_) => None,
        }
    }
}

/// The wire type of a field, with its accepted range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    /// A number within `min..=max`.
    Float {
        /// Smallest accepted value.
        min: f32,
        /// Largest accepted value.
        max: f32,
    },
    /// A color written as `[r, g, b]`. Alpha stays in memory and is never written.
    Rgb,
    /// A color written as `[r, g, b, a]`.
    Rgba,
}

impl FieldType {
    /// Any finite number.
    pub const FLOAT: FieldType = FieldType::Float {
        min: f32::MIN,
        max: f32::MAX,
    };

    /// Any finite number that is zero or positive.
    pub const NON_NEGATIVE: FieldType = FieldType::Float {
        min: 0.0,
        max: f32::MAX,
    };

    /// Returns how many color channels this type writes, or `None` for numbers.
    pub fn channels(&self) -> Option<usize> {
        match self {
            FieldType::Float { .. } => None,
            FieldType::Rgb => Some(3),
            FieldType::Rgba => Some(4),
        }
    }

    /// Parses a captured value.
    ///
    /// The error is a human-readable reason, turned into
    /// [`DecodeError::InvalidFieldValue`](crate::DecodeError::InvalidFieldValue) by the caller.
    pub fn parse(&self, span: &TokenSpan) -> Result<FieldValue, String> {
        match *self {
            FieldType::Float { min, max } => {
                let value = match span.as_scalar() {
                    Some(Scalar::Number(n)) => math::narrow(*n).map_err(str::to_string)?,
                    _ => return Err(format!("expected a number, found {}", span.describe())),
                };
                if value < min || value > max {
                    return Err(format!("{value} is outside {min}..={max}"));
                }
                Ok(FieldValue::Float(value))
            }
            FieldType::Rgb | FieldType::Rgba => parse_color(span).map(FieldValue::Color),
        }
    }

    /// Writes `value` in this type's wire form.
    pub fn write<W: TokenWriter + ?Sized>(
        &self,
        value: &FieldValue,
        writer: &mut W,
    ) -> Result<(), TokenError> {
        match (self, value) {
            (FieldType::Float { .. }, FieldValue::Float(v)) => writer.number(math::widen(*v)),
            (FieldType::Rgb | FieldType::Rgba, FieldValue::Color(color)) => {
                let channels = self.channels().unwrap_or(4);
                writer.begin_array()?;
                for channel in &color.to_array()[..channels] {
                    writer.number(math::widen(*channel))?;
                }
                writer.end_array()
            }
            _ => Err(TokenError::InvalidState("value does not match its field type")),
        }
    }

    /// Returns `true` if `a` and `b` would be written identically.
    ///
    /// This is the comparison used for default elision: an `Rgb` color that
    /// differs from its default only in alpha still counts as the default.
    pub fn wire_eq(&self, a: &FieldValue, b: &FieldValue) -> bool {
        match (self, a, b) {
            (FieldType::Rgb, FieldValue::Color(x), FieldValue::Color(y)) => x.rgb_eq(y),
            _ => a == b,
        }
    }

    /// Returns the first component that would be written but that [`parse`](Self::parse)
    /// would refuse: a non-finite number, a number outside `min..=max`, or a color
    /// channel outside `0..=1`.
    pub fn unencodable(&self, value: &FieldValue) -> Option<f32> {
        match (self, value) {
            (FieldType::Float { min, max }, FieldValue::Float(v)) => {
                (!v.is_finite() || *v < *min || *v > *max).then_some(*v)
            }
            (_, FieldValue::Float(v)) => (!v.is_finite()).then_some(*v),
            (_, FieldValue::Color(color)) => {
                let channels = self.channels().unwrap_or(4);
                color.to_array()[..channels]
                    .iter()
                    .copied()
                    .find(|c| !(0.0..=1.0).contains(c))
            }
        }
    }
}

/// Accepts `[r, g, b]` or `[r, g, b, a]` with every channel in `0..=1`.
fn parse_color(span: &TokenSpan) -> Result<LinearRgba, String> {
    let tokens = span.tokens();
    let inner = match tokens {
        [Token::BeginArray, inner @ .., Token::EndArray] => inner,
        _ => return Err(format!("expected a color array, found {}", span.describe())),
    };
    if inner.len() != 3 && inner.len() != 4 {
        return Err(format!("expected 3 or 4 color channels, found {}", inner.len()));
    }

    let mut channels = [1.0_f32; 4];
    for (slot, token) in channels.iter_mut().zip(inner) {
        let value = match token {
            Token::Scalar(Scalar::Number(n)) => math::narrow(*n).map_err(str::to_string)?,
            other => return Err(format!("expected a color channel, found {other}")),
        };
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("color channel {value} is outside 0..=1"));
        }
        *slot = value;
    }
    Ok(LinearRgba::from_array(channels))
}

/// One row of a variant's field table.
pub struct Field<V> {
    /// Property name on the wire.
    pub name: &'static str,
    /// Wire type and accepted range.
    pub ty: FieldType,
    /// Documented default, or `None` for a required field.
    pub default: Option<FieldValue>,
    /// Reads the field from a variant.
    pub get: fn(&V) -> FieldValue,
    /// Stores an already validated value into a variant.
    pub set: fn(&mut V, FieldValue),
}

impl<V> Field<V> {
    /// Returns `true` if the field has no default and is always written.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl<V> Debug for Field<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("default", &self.default)
            .finish()
    }
}

/// The capability set every node variant implements.
///
/// `KIND` is the discriminant, `fields()` is the schema. A `Default` value must
/// hold every documented default; required fields keep whatever `Default` gives
/// them until decoded.
///
/// # Example
///
/// ```
/// use lumen_core::{Field, FieldType, FieldValue, Variant};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Halo {
///     radius: f32,
/// }
///
/// impl Variant for Halo {
///     const KIND: &'static str = "halo";
///
///     fn fields() -> &'static [Field<Self>] {
///         static FIELDS: [Field<Halo>; 1] = [Field {
///             name: "radius",
///             ty: FieldType::NON_NEGATIVE,
///             default: None,
///             get: |p| FieldValue::Float(p.radius),
///             set: |p, v| p.radius = v.as_float().unwrap_or(p.radius),
///         }];
///         &FIELDS
///     }
/// }
///
/// assert!(Halo::field("radius").is_some());
/// ```
pub trait Variant: Any + Clone + Debug + Default + PartialEq + Send + Sync {
    /// The discriminant written in the `type` property.
    const KIND: &'static str;

    /// The field table, in canonical write order.
    fn fields() -> &'static [Field<Self>];

    /// Looks up a field by its wire name.
    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::fields().iter().find(|field| field.name == name)
    }
}
