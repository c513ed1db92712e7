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

//! Implements the default-eliding encode lane.

use crate::decode_lane::NAME_PROPERTY;
use lumen_core::{CodecConfig, EncodeError, FieldSlot, Lane, LaneKind, Node, TokenWriter};

/// Writes nodes in canonical form.
///
/// The discriminant comes first, then each field in its table order when it
/// differs from its documented default (required fields always), then the name
/// when there is one.
#[derive(Debug, Clone, Copy)]
pub struct SelectiveEncoder<'c> {
    config: &'c CodecConfig,
}

impl<'c> SelectiveEncoder<'c> {
    /// Creates an encoder writing the discriminant under `config.write_key()`.
    pub fn new(config: &'c CodecConfig) -> Self {
        Self { config }
    }

    /// Encodes one node.
    ///
    /// Every value is checked against the same bounds the decoder enforces
    /// before the first token goes out. A node holding NaN, infinity or an
    /// out-of-range value fails with [`EncodeError::UnencodableValue`] and leaves
    /// the writer untouched.
    pub fn encode<W: TokenWriter + ?Sized>(
        &self,
        node: &Node,
        writer: &mut W,
    ) -> Result<(), EncodeError> {
        let slots = node.body().field_slots();
        for slot in &slots {
            if let Some(value) = slot.ty.unencodable(&slot.value) {
                return Err(EncodeError::UnencodableValue {
                    kind: node.kind().to_string(),
                    field: slot.name,
                    value,
                });
            }
        }

        writer.begin_object()?;
        writer.property(self.config.write_key())?;
        writer.string(node.kind())?;
        for slot in slots.iter().filter(|slot| is_written(slot)) {
            writer.property(slot.name)?;
            slot.ty.write(&slot.value, writer)?;
        }
        if let Some(name) = node.name() {
            writer.property(NAME_PROPERTY)?;
            writer.string(name)?;
        }
        writer.end_object()?;
        Ok(())
    }

    /// Lists the fields [`encode`](Self::encode) would write for `node`, in order.
    pub fn written_fields(&self, node: &Node) -> Vec<&'static str> {
        node.body()
            .field_slots()
            .iter()
            .filter(|slot| is_written(slot))
            .map(|slot| slot.name)
            .collect()
    }
}

fn is_written(slot: &FieldSlot) -> bool {
    match &slot.default {
        None => true,
        Some(default) => !slot.ty.wire_eq(&slot.value, default),
    }
}

impl Lane for SelectiveEncoder<'_> {
    fn strategy_name(&self) -> &'static str {
        "LUMEN_SELECTIVE_ENCODE"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Encode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Field, FieldType, FieldValue, Scalar, Token, TokenError, Variant};

    #[derive(Default)]
    struct Recorder(Vec<Token>);

    impl TokenWriter for Recorder {
        fn begin_object(&mut self) -> Result<(), TokenError> {
            self.0.push(Token::BeginObject);
            Ok(())
        }
        fn end_object(&mut self) -> Result<(), TokenError> {
            self.0.push(Token::EndObject);
            Ok(())
        }
        fn begin_array(&mut self) -> Result<(), TokenError> {
            self.0.push(Token::BeginArray);
            Ok(())
        }
        fn end_array(&mut self) -> Result<(), TokenError> {
            self.0.push(Token::EndArray);
            Ok(())
        }
        fn property(&mut self, name: &str) -> Result<(), TokenError> {
            self.0.push(Token::Property(name.to_string()));
            Ok(())
        }
        fn scalar(&mut self, value: &Scalar) -> Result<(), TokenError> {
            self.0.push(Token::Scalar(value.clone()));
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Slab {
        depth: f32,
        gain: f32,
    }

    impl Default for Slab {
        fn default() -> Self {
            Self {
                depth: 0.0,
                gain: 1.0,
            }
        }
    }

    impl Variant for Slab {
        const KIND: &'static str = "slab";

        fn fields() -> &'static [Field<Self>] {
            static FIELDS: [Field<Slab>; 2] = [
                Field {
                    name: "depth",
                    ty: FieldType::NON_NEGATIVE,
                    default: None,
                    get: |s| FieldValue::Float(s.depth),
                    set: |s, v| s.depth = v.as_float().unwrap_or(s.depth),
                },
                Field {
                    name: "gain",
                    ty: FieldType::FLOAT,
                    default: Some(FieldValue::Float(1.0)),
                    get: |s| FieldValue::Float(s.gain),
                    set: |s, v| s.gain = v.as_float().unwrap_or(s.gain),
                },
            ];
            &FIELDS
        }
    }

    #[test]
    fn test_required_written_default_elided_name_last() {
        let config = CodecConfig::default();
        let encoder = SelectiveEncoder::new(&config);
        let node = Node::new(Slab::default()).named("floor");

        let mut out = Recorder::default();
        encoder.encode(&node, &mut out).unwrap();
        assert_eq!(
            out.0,
            vec![
                Token::BeginObject,
                Token::Property("type".into()),
                Token::Scalar(Scalar::String("slab".into())),
                Token::Property("depth".into()),
                Token::Scalar(Scalar::Number(0.0)),
                Token::Property("name".into()),
                Token::Scalar(Scalar::String("floor".into())),
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn test_configured_write_key() {
        let config = CodecConfig {
            discriminant_keys: vec!["kind".into()],
            ..CodecConfig::default()
        };
        let mut out = Recorder::default();
        SelectiveEncoder::new(&config)
            .encode(&Node::new(Slab::default()), &mut out)
            .unwrap();
        assert_eq!(out.0[1], Token::Property("kind".into()));
    }

    #[test]
    fn test_non_finite_writes_nothing() {
        let config = CodecConfig::default();
        let node = Node::new(Slab {
            depth: 1.0,
            gain: f32::INFINITY,
        });
        let mut out = Recorder::default();
        let err = SelectiveEncoder::new(&config)
            .encode(&node, &mut out)
            .unwrap_err();
        assert!(matches!(err, EncodeError::UnencodableValue { field: "gain", .. }));
        assert!(out.0.is_empty());
    }

    #[test]
    fn test_written_fields() {
        let config = CodecConfig::default();
        let encoder = SelectiveEncoder::new(&config);
        let node = Node::new(Slab {
            depth: 2.0,
            gain: 3.0,
        });
        assert_eq!(encoder.written_fields(&node), ["depth", "gain"]);
        assert_eq!(encoder.lane_kind(), LaneKind::Encode);
    }
}
