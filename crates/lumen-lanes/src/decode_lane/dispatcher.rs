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

//! Implements the streaming, discriminant-driven decode lane.

use lumen_core::{
    Accepted, CodecConfig, DecodeError, Lane, LaneKind, Node, Scalar, Token, TokenError,
    TokenReader, TokenSpan, UnknownPolicy, VariantDecoder, VariantEntry, VariantRegistry,
};

/// The property holding the node's user label.
pub const NAME_PROPERTY: &str = "name";

/// Decodes one node object at a time, routing it to the registered variant.
///
/// The core table is consulted before the extension registry. Properties that
/// arrive before the discriminant are buffered as token spans and replayed once
/// the variant is known, so at most one object's worth of tokens is held.
#[derive(Debug, Clone, Copy)]
pub struct DecodeDispatcher<'r> {
    core: &'r VariantRegistry,
    extensions: &'r VariantRegistry,
    config: &'r CodecConfig,
}

/// Per-object bookkeeping while its properties stream past.
struct ObjectState {
    kind: Option<String>,
    decoder: Option<Box<dyn VariantDecoder>>,
    name: Option<String>,
    pending: Vec<(String, TokenSpan)>,
    /// The discriminant did not resolve and the policy is to skip.
    skipped: bool,
    /// The first error; everything after it is only drained.
    failure: Option<DecodeError>,
}

impl ObjectState {
    fn new() -> Self {
        Self {
            kind: None,
            decoder: None,
            name: None,
            pending: Vec::new(),
            skipped: false,
            failure: None,
        }
    }

    fn kind_or_unknown(&self) -> String {
        self.kind.clone().unwrap_or_else(|| "?".to_string())
    }

    fn draining(&self) -> bool {
        self.skipped || self.failure.is_some()
    }
}

impl<'r> DecodeDispatcher<'r> {
    /// Creates a dispatcher over a core table and an extension registry.
    pub fn new(
        core: &'r VariantRegistry,
        extensions: &'r VariantRegistry,
        config: &'r CodecConfig,
    ) -> Self {
        Self {
            core,
            extensions,
            config,
        }
    }

    /// Resolves a discriminant, core variants first.
    pub fn resolve(&self, kind: &str) -> Option<VariantEntry> {
        self.core
            .resolve(kind)
            .or_else(|| self.extensions.resolve(kind))
    }

    /// Decodes the next object from `reader`.
    ///
    /// Returns `Ok(None)` when the object was skipped under
    /// [`UnknownPolicy::Skip`]. On any error other than
    /// [`DecodeError::MalformedDocument`] the whole object has been consumed.
    pub fn decode<R: TokenReader + ?Sized>(
        &self,
        reader: &mut R,
    ) -> Result<Option<Node>, DecodeError> {
        match reader.expect_token()? {
            Token::BeginObject => self.decode_started(reader),
            other => Err(TokenError::Unexpected {
                expected: "object start",
                found: other.to_string(),
            }
            .into()),
        }
    }

    /// Decodes an object whose start token the caller already consumed.
    pub fn decode_started<R: TokenReader + ?Sized>(
        &self,
        reader: &mut R,
    ) -> Result<Option<Node>, DecodeError> {
        let mut state = ObjectState::new();

        loop {
            let property = match reader.expect_token()? {
                Token::EndObject => break,
                Token::Property(property) => property,
                other => {
                    return Err(TokenError::Unexpected {
                        expected: "property name or object end",
                        found: other.to_string(),
                    }
                    .into())
                }
            };

            if state.draining() {
                TokenSpan::skip(reader)?;
                continue;
            }

            let span = TokenSpan::capture(reader)?;
            if self.config.is_discriminant(&property) {
                self.on_discriminant(&mut state, property, &span);
            } else if property == NAME_PROPERTY {
                self.on_name(&mut state, &span);
            } else if let Some(decoder) = state.decoder.as_mut() {
                let kind = state.kind.as_deref().unwrap_or("?");
                if let Err(err) = self.offer(decoder.as_mut(), kind, &property, &span) {
                    state.failure = Some(err);
                }
            } else {
                state.pending.push((property, span));
            }
        }

        self.finish(state)
    }

    fn on_discriminant(&self, state: &mut ObjectState, property: String, span: &TokenSpan) {
        let value = match span.as_scalar() {
            Some(Scalar::String(value)) => value.clone(),
            _ => {
                let err = DecodeError::InvalidFieldValue {
                    kind: state.kind_or_unknown(),
                    field: property,
                    reason: format!("expected a string, found {}", span.describe()),
                };
                self.field_error(state, err);
                return;
            }
        };

        if let Some(existing) = &state.kind {
            if *existing != value {
                state.failure = Some(DecodeError::InvalidFieldValue {
                    kind: existing.clone(),
                    field: property,
                    reason: format!("conflicting discriminant `{value}`"),
                });
            }
            return;
        }

        let Some(entry) = self.resolve(&value) else {
            match self.config.unknown_discriminant {
                UnknownPolicy::Skip => {
                    log::debug!("Skipping object with unregistered discriminant `{value}`");
                    state.skipped = true;
                }
                UnknownPolicy::Fail => {
                    state.failure = Some(DecodeError::UnknownDiscriminant(value.clone()));
                }
            }
            state.kind = Some(value);
            return;
        };

        let mut decoder = (entry.decode)(&value);
        for (pending, buffered) in std::mem::take(&mut state.pending) {
            if let Err(err) = self.offer(decoder.as_mut(), &value, &pending, &buffered) {
                state.failure = Some(err);
                break;
            }
        }
        state.decoder = Some(decoder);
        state.kind = Some(value);
    }

    fn on_name(&self, state: &mut ObjectState, span: &TokenSpan) {
        match span.as_scalar() {
            Some(Scalar::String(name)) => state.name = Some(name.clone()),
            Some(Scalar::Null) => state.name = None,
            _ => {
                let err = DecodeError::InvalidFieldValue {
                    kind: state.kind_or_unknown(),
                    field: NAME_PROPERTY.to_string(),
                    reason: format!("expected a string, found {}", span.describe()),
                };
                self.field_error(state, err);
            }
        }
    }

    /// Forwards one property to the variant decoder.
    ///
    /// Returns an error only when it should fail the node.
    fn offer(
        &self,
        decoder: &mut dyn VariantDecoder,
        kind: &str,
        property: &str,
        span: &TokenSpan,
    ) -> Result<(), DecodeError> {
        match decoder.accept(property, span) {
            Ok(Accepted::Field) => Ok(()),
            Ok(Accepted::Ignored) => {
                log::debug!("Ignoring property `{property}` not defined for `{kind}`");
                Ok(())
            }
            Err(err) if self.config.strict_fields => Err(err),
            Err(err) => {
                log::warn!("{err}; keeping the default");
                Ok(())
            }
        }
    }

    fn field_error(&self, state: &mut ObjectState, err: DecodeError) {
        if self.config.strict_fields {
            state.failure = Some(err);
        } else {
            log::warn!("{err}; ignoring it");
        }
    }

    fn finish(&self, state: ObjectState) -> Result<Option<Node>, DecodeError> {
        if let Some(err) = state.failure {
            return Err(err);
        }
        if state.skipped {
            return Ok(None);
        }
        let (Some(kind), Some(decoder)) = (state.kind, state.decoder) else {
            return match self.config.unknown_discriminant {
                UnknownPolicy::Skip => {
                    log::debug!("Skipping object without a discriminant");
                    Ok(None)
                }
                UnknownPolicy::Fail => Err(DecodeError::MissingDiscriminant),
            };
        };
        let body = decoder.finish(self.config.strict_fields)?;
        Ok(Some(Node::from_decoded(kind, state.name, body)))
    }
}

impl Lane for DecodeDispatcher<'_> {
    fn strategy_name(&self) -> &'static str {
        "LUMEN_DISPATCH_DECODE"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Decode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Field, FieldType, FieldValue, RegistryBuilder, Variant};
    use std::collections::VecDeque;

    struct Tokens(VecDeque<Token>);

    impl TokenReader for Tokens {
        fn next_token(&mut self) -> Result<Option<Token>, TokenError> {
            Ok(self.0.pop_front())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Lamp {
        power: f32,
    }

    impl Default for Lamp {
        fn default() -> Self {
            Self { power: 1.0 }
        }
    }

    impl Variant for Lamp {
        const KIND: &'static str = "lamp";

        fn fields() -> &'static [Field<Self>] {
            static FIELDS: [Field<Lamp>; 1] = [Field {
                name: "power",
                ty: FieldType::NON_NEGATIVE,
                default: Some(FieldValue::Float(1.0)),
                get: |l| FieldValue::Float(l.power),
                set: |l, v| l.power = v.as_float().unwrap_or(l.power),
            }];
            &FIELDS
        }
    }

    fn object(entries: Vec<(&str, Token)>) -> Tokens {
        let mut tokens = vec![Token::BeginObject];
        for (property, value) in entries {
            tokens.push(Token::Property(property.to_string()));
            tokens.push(value);
        }
        tokens.push(Token::EndObject);
        Tokens(tokens.into())
    }

    fn string(s: &str) -> Token {
        Token::Scalar(Scalar::String(s.to_string()))
    }

    fn number(n: f64) -> Token {
        Token::Scalar(Scalar::Number(n))
    }

    fn registries() -> (VariantRegistry, VariantRegistry) {
        let mut core = RegistryBuilder::new();
        core.register::<Lamp>();
        (core.build(), VariantRegistry::empty())
    }

    #[test]
    fn test_buffered_properties_are_replayed() {
        let (core, ext) = registries();
        let config = CodecConfig::default();
        let dispatcher = DecodeDispatcher::new(&core, &ext, &config);

        let mut reader = object(vec![
            ("power", number(4.0)),
            ("name", string("desk")),
            ("type", string("lamp")),
        ]);
        let node = dispatcher.decode(&mut reader).unwrap().unwrap();
        assert_eq!(node.name(), Some("desk"));
        assert_eq!(node.variant::<Lamp>(), Some(&Lamp { power: 4.0 }));
    }

    #[test]
    fn test_second_discriminant_key_is_recognized() {
        let (core, ext) = registries();
        let config = CodecConfig::default();
        let dispatcher = DecodeDispatcher::new(&core, &ext, &config);

        let mut reader = object(vec![("kind", string("lamp"))]);
        let node = dispatcher.decode(&mut reader).unwrap().unwrap();
        assert_eq!(node.kind(), "lamp");
    }

    #[test]
    fn test_conflicting_discriminants_fail_after_draining() {
        let (core, ext) = registries();
        let config = CodecConfig::default();
        let dispatcher = DecodeDispatcher::new(&core, &ext, &config);

        let mut reader = object(vec![
            ("type", string("lamp")),
            ("kind", string("torch")),
            ("power", number(2.0)),
        ]);
        reader.0.push_back(number(9.0));
        let err = dispatcher.decode(&mut reader).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFieldValue { ref field, .. } if field == "kind"));
        assert_eq!(reader.0.front(), Some(&number(9.0)));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let (core, ext) = registries();
        let config = CodecConfig::default();
        let dispatcher = DecodeDispatcher::new(&core, &ext, &config);

        let mut reader = Tokens(vec![number(1.0)].into());
        let err = dispatcher.decode(&mut reader).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_lane_identity() {
        let (core, ext) = registries();
        let config = CodecConfig::default();
        let dispatcher = DecodeDispatcher::new(&core, &ext, &config);
        assert_eq!(dispatcher.lane_kind(), LaneKind::Decode);
    }
}
