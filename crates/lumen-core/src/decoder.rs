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

//! Table-driven variant decoders.
//!
//! A [`VariantDecoder`] receives `(property, value span)` pairs for one object and
//! produces the variant body once the object ends. [`decoder_for`] builds one from
//! any [`Variant`]'s field table, which is what registries store as a [`DecodeFn`].

use crate::error::DecodeError;
use crate::node::VariantBody;
use crate::schema::Variant;
use crate::token::TokenSpan;

/// What a decoder did with a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    /// The property is in the variant's table and its value was stored.
    Field,
    /// The property is not part of this variant and was discarded.
    Ignored,
}

/// Incrementally populates one variant body.
pub trait VariantDecoder {
    /// Offers one property of the object being decoded.
    ///
    /// The span has already been consumed from the stream, so a rejected value
    /// never leaves the stream mid-value.
    fn accept(&mut self, property: &str, value: &TokenSpan) -> Result<Accepted, DecodeError>;

    /// Finalizes the body, filling in defaults for fields never supplied.
    ///
    /// With `strict` set, a required field that was never supplied is an error.
    fn finish(self: Box<Self>, strict: bool) -> Result<Box<dyn VariantBody>, DecodeError>;
}

/// Creates a fresh decoder for an object with the given discriminant.
pub type DecodeFn = fn(kind: &str) -> Box<dyn VariantDecoder>;

/// Returns a [`DecodeFn`]-compatible decoder for variant `V`.
pub fn decoder_for<V: Variant>(kind: &str) -> Box<dyn VariantDecoder> {
    Box::new(TableDecoder::<V>::new(kind))
}

struct TableDecoder<V> {
    kind: String,
    value: V,
    seen: Vec<bool>,
}

impl<V: Variant> TableDecoder<V> {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            value: V::default(),
            seen: vec![false; V::fields().len()],
        }
    }
}

impl<V: Variant> VariantDecoder for TableDecoder<V> {
    fn accept(&mut self, property: &str, value: &TokenSpan) -> Result<Accepted, DecodeError> {
        let Some(index) = V::fields().iter().position(|f| f.name == property) else {
            return Ok(Accepted::Ignored);
        };
        let field = &V::fields()[index];
        let parsed = field
            .ty
            .parse(value)
            .map_err(|reason| DecodeError::InvalidFieldValue {
                kind: self.kind.clone(),
                field: field.name.to_string(),
                reason,
            })?;
        (field.set)(&mut self.value, parsed);
        self.seen[index] = true;
        Ok(Accepted::Field)
    }

    fn finish(mut self: Box<Self>, strict: bool) -> Result<Box<dyn VariantBody>, DecodeError> {
        let seen = std::mem::take(&mut self.seen);
        for (field, seen) in V::fields().iter().zip(seen) {
            if seen {
                continue;
            }
            match field.default {
                Some(default) => (field.set)(&mut self.value, default),
                None if strict => {
                    return Err(DecodeError::MissingField {
                        kind: self.kind.clone(),
                        field: field.name,
                    })
                }
                None => log::warn!(
                    "`{}` has no `{}`; keeping {:?}",
                    self.kind,
                    field.name,
                    (field.get)(&self.value)
                ),
            }
        }
        Ok(Box::new(self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, FieldValue};
    use crate::token::tests::VecReader;
    use crate::token::{Scalar, Token};

    #[derive(Debug, Clone, PartialEq)]
    struct Panel {
        gain: f32,
        span: f32,
    }

    impl Default for Panel {
        fn default() -> Self {
            Self {
                gain: 1.0,
                span: 0.0,
            }
        }
    }

    impl Variant for Panel {
        const KIND: &'static str = "panel";

        fn fields() -> &'static [Field<Self>] {
            static FIELDS: [Field<Panel>; 2] = [
                Field {
                    name: "gain",
                    ty: FieldType::NON_NEGATIVE,
                    default: Some(FieldValue::Float(1.0)),
                    get: |p| FieldValue::Float(p.gain),
                    set: |p, v| p.gain = v.as_float().unwrap_or(p.gain),
                },
                Field {
                    name: "span",
                    ty: FieldType::NON_NEGATIVE,
                    default: None,
                    get: |p| FieldValue::Float(p.span),
                    set: |p, v| p.span = v.as_float().unwrap_or(p.span),
                },
            ];
            &FIELDS
        }
    }

    fn value(token: Token) -> TokenSpan {
        TokenSpan::capture(&mut VecReader::new(vec![token])).unwrap()
    }

    fn number(n: f64) -> TokenSpan {
        value(Token::Scalar(Scalar::Number(n)))
    }

    fn finish_panel(decoder: Box<dyn VariantDecoder>, strict: bool) -> Result<Panel, DecodeError> {
        decoder.finish(strict).map(|body| {
            body.as_any()
                .downcast_ref::<Panel>()
                .cloned()
                .expect("decoder produced a Panel")
        })
    }

    #[test]
    fn accepts_known_fields_and_ignores_the_rest() {
        let mut decoder = decoder_for::<Panel>("panel");
        assert_eq!(decoder.accept("gain", &number(3.0)), Ok(Accepted::Field));
        assert_eq!(decoder.accept("span", &number(2.0)), Ok(Accepted::Field));
        assert_eq!(decoder.accept("glow", &number(9.0)), Ok(Accepted::Ignored));

        let panel = finish_panel(decoder, true).unwrap();
        assert_eq!(panel, Panel { gain: 3.0, span: 2.0 });
    }

    #[test]
    fn rejected_value_keeps_the_default() {
        let mut decoder = decoder_for::<Panel>("panel");
        let err = decoder
            .accept("gain", &value(Token::Scalar(Scalar::Bool(true))))
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFieldValue { ref field, .. } if field == "gain"));
        decoder.accept("span", &number(1.0)).unwrap();

        let panel = finish_panel(decoder, false).unwrap();
        assert_eq!(panel.gain, 1.0);
    }

    #[test]
    fn missing_required_field_depends_on_strictness() {
        let lenient = finish_panel(decoder_for::<Panel>("panel"), false).unwrap();
        assert_eq!(lenient, Panel::default());

        let strict = finish_panel(decoder_for::<Panel>("panel"), true);
        assert_eq!(
            strict,
            Err(DecodeError::MissingField {
                kind: "panel".to_string(),
                field: "span",
            })
        );
    }
}
