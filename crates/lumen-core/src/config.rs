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

//! Codec configuration.
//!
//! [`CodecConfig`] is plain data: it deserializes from any serde format (the CLI
//! reads it from TOML) and every missing key falls back to its default.

use serde::{Deserialize, Serialize};

/// The discriminant key used when no keys are configured.
pub const DEFAULT_DISCRIMINANT_KEY: &str = "type";

/// What the dispatcher does with an object whose discriminant it cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Consume the object and yield no node. Keeps older readers working on
    /// documents that use newer extensions.
    #[default]
    Skip,
    /// Return [`DecodeError::UnknownDiscriminant`](crate::DecodeError::UnknownDiscriminant).
    Fail,
}

/// Decode and encode behavior shared by the dispatcher and the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Policy for unresolved or missing discriminants.
    pub unknown_discriminant: UnknownPolicy,
    /// When set, invalid field values and missing required fields fail the node
    /// instead of falling back to defaults.
    pub strict_fields: bool,
    /// Property names recognized as the discriminant, in order of preference.
    /// The first one is the name the encoder writes.
    pub discriminant_keys: Vec<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            unknown_discriminant: UnknownPolicy::Skip,
            strict_fields: false,
            discriminant_keys: vec![DEFAULT_DISCRIMINANT_KEY.to_string(), "kind".to_string()],
        }
    }
}

impl CodecConfig {
    /// A configuration that fails on anything it would otherwise tolerate.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            unknown_discriminant: UnknownPolicy::Fail,
            strict_fields: true,
            ..Self::default()
        }
    }

    /// Returns `true` if `property` is one of the discriminant keys.
    pub fn is_discriminant(&self, property: &str) -> bool {
        self.discriminant_keys.iter().any(|key| key == property)
    }

    /// The property name the encoder writes the discriminant under.
    pub fn write_key(&self) -> &str {
        self.discriminant_keys
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_DISCRIMINANT_KEY)
    }
}
