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

//! The CodecAgent is responsible for decoding and encoding light documents.

use super::block::{BlockError, LightsBlock, LIGHTS_PROPERTY};
use lumen_core::{
    CodecConfig, DecodeError, EncodeError, Lane, Node, RegistryBuilder, Token, TokenError,
    TokenReader, TokenSpan, TokenWriter, VariantRegistry,
};
use lumen_data::{core_light_variants, register_area_light};
use lumen_io::{JsonTokenReader, JsonTokenWriter};
use lumen_lanes::{DecodeDispatcher, SelectiveEncoder};
use std::io::BufRead;
use thiserror::Error;

/// Indent width of pretty-printed blocks.
const PRETTY_INDENT: usize = 2;

/// An error that can occur within the `CodecAgent`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    /// Decoding failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl From<TokenError> for AgentError {
    fn from(err: TokenError) -> Self {
        AgentError::Decode(DecodeError::MalformedDocument(err))
    }
}

/// Owns the frozen registries and configuration, and drives the codec lanes.
///
/// The agent is immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct CodecAgent {
    core: VariantRegistry,
    extensions: VariantRegistry,
    config: CodecConfig,
}

impl CodecAgent {
    /// Creates an agent with the built-in lights and the area light extension.
    pub fn new(config: CodecConfig) -> Self {
        let mut builder = RegistryBuilder::new();
        register_area_light(&mut builder);
        Self::with_extensions(config, builder.build())
    }

    /// Creates an agent with the built-in lights and a caller-built extension
    /// registry. Nothing is added to `extensions`.
    pub fn with_extensions(config: CodecConfig, extensions: VariantRegistry) -> Self {
        let agent = Self {
            core: core_light_variants(),
            extensions,
            config,
        };
        log::debug!(
            "CodecAgent ready: {} core kinds, {} extension kinds, lanes {} / {}",
            agent.core.len(),
            agent.extensions.len(),
            agent.dispatcher().strategy_name(),
            agent.encoder().strategy_name(),
        );
        agent
    }

    /// The active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The extension registry.
    pub fn extensions(&self) -> &VariantRegistry {
        &self.extensions
    }

    /// A decode lane borrowing this agent's registries.
    pub fn dispatcher(&self) -> DecodeDispatcher<'_> {
        DecodeDispatcher::new(&self.core, &self.extensions, &self.config)
    }

    /// An encode lane using this agent's configuration.
    pub fn encoder(&self) -> SelectiveEncoder<'_> {
        SelectiveEncoder::new(&self.config)
    }

    /// Decodes a JSON document holding a single light object.
    pub fn decode_light(&self, json: &str) -> Result<Option<Node>, AgentError> {
        let mut reader = JsonTokenReader::new(json);
        let node = self.dispatcher().decode(&mut reader)?;
        reader.finish()?;
        Ok(node)
    }

    /// Encodes a single light as compact JSON.
    pub fn encode_light(&self, node: &Node) -> Result<String, AgentError> {
        let mut writer = JsonTokenWriter::new();
        self.encoder().encode(node, &mut writer)?;
        Ok(writer.into_string().map_err(EncodeError::from)?)
    }

    /// Decodes a `{"lights": [...]}` document.
    ///
    /// Other top-level properties are skipped. Lights that fail to decode are
    /// collected in [`LightsBlock::errors`] and decoding continues with the next
    /// one; only a malformed document aborts.
    pub fn decode_block(&self, json: &str) -> Result<LightsBlock, AgentError> {
        self.decode_block_from(json.as_bytes())
    }

    /// Decodes a `{"lights": [...]}` document pulled from `input`.
    ///
    /// Only one light's tokens are held at a time.
    pub fn decode_block_from<R: BufRead>(&self, input: R) -> Result<LightsBlock, AgentError> {
        let mut reader = JsonTokenReader::from_reader(input);
        let mut block = LightsBlock::default();

        match reader.expect_token()? {
            Token::BeginObject => {}
            other => return Err(unexpected("object start", &other).into()),
        }
        loop {
            match reader.expect_token()? {
                Token::EndObject => break,
                Token::Property(property) if property == LIGHTS_PROPERTY => {
                    self.decode_lights(&mut reader, &mut block)?;
                }
                Token::Property(property) => {
                    log::debug!("Skipping top-level property `{property}`");
                    TokenSpan::skip(&mut reader)?;
                }
                other => return Err(unexpected("property name", &other).into()),
            }
        }
        reader.finish()?;

        log::debug!(
            "Decoded {} lights ({} skipped, {} failed)",
            block.lights.len(),
            block.skipped,
            block.errors.len()
        );
        Ok(block)
    }

    fn decode_lights<R: BufRead>(
        &self,
        reader: &mut JsonTokenReader<R>,
        block: &mut LightsBlock,
    ) -> Result<(), AgentError> {
        match reader.expect_token()? {
            Token::BeginArray => {}
            other => return Err(unexpected("array start", &other).into()),
        }

        let dispatcher = self.dispatcher();
        loop {
            // Positions continue across repeated `lights` properties.
            let index = block.len();
            let result = match reader.expect_token()? {
                Token::EndArray => return Ok(()),
                Token::BeginObject => dispatcher.decode_started(reader),
                other => {
                    let found = TokenSpan::capture_from(other, reader)?.describe();
                    Err(DecodeError::InvalidFieldValue {
                        kind: "?".to_string(),
                        field: LIGHTS_PROPERTY.to_string(),
                        reason: format!("expected a light object, found {found}"),
                    })
                }
            };
            match result {
                Ok(Some(node)) => block.lights.push(node),
                Ok(None) => block.skipped += 1,
                Err(error) if error.is_structural() => return Err(error.into()),
                Err(error) => {
                    log::warn!("Light {index} failed to decode: {error}");
                    block.errors.push(BlockError { index, error });
                }
            }
        }
    }

    /// Encodes lights as a `{"lights": [...]}` document.
    ///
    /// Nothing is returned if any light fails; the error names its kind and field.
    pub fn encode_block(&self, lights: &[Node], pretty: bool) -> Result<String, AgentError> {
        let mut writer = if pretty {
            JsonTokenWriter::pretty(PRETTY_INDENT)
        } else {
            JsonTokenWriter::new()
        };
        let encoder = self.encoder();

        writer.begin_object().map_err(EncodeError::from)?;
        writer.property(LIGHTS_PROPERTY).map_err(EncodeError::from)?;
        writer.begin_array().map_err(EncodeError::from)?;
        for light in lights {
            encoder.encode(light, &mut writer)?;
        }
        writer.end_array().map_err(EncodeError::from)?;
        writer.end_object().map_err(EncodeError::from)?;
        Ok(writer.into_string().map_err(EncodeError::from)?)
    }
}

impl Default for CodecAgent {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

fn unexpected(expected: &'static str, found: &Token) -> DecodeError {
    TokenError::Unexpected {
        expected,
        found: found.to_string(),
    }
    .into()
}
