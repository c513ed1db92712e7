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

use anyhow::{Context, Result};
use lumen_core::{CodecConfig, UnknownPolicy};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The configuration file looked up in the working directory.
pub const DEFAULT_MANIFEST: &str = "Lumen.toml";

/// Layout of `Lumen.toml`.
///
/// ```toml
/// [codec]
/// unknown_discriminant = "fail"
/// strict_fields = true
/// discriminant_keys = ["type", "kind"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LumenManifest {
    codec: CodecConfig,
}

/// Loads the codec configuration.
///
/// An explicit path must exist. Without one, `Lumen.toml` is used when present
/// and the defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<CodecConfig> {
    let (path, required) = match explicit {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_MANIFEST), false),
    };

    if !required && !path.exists() {
        log::info!("No '{}' found. Using default configuration.", path.display());
        return Ok(CodecConfig::default());
    }

    log::info!("Loading configuration from '{}'", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file at '{}'", path.display()))?;
    parse_config(&text)
        .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))
}

fn parse_config(text: &str) -> Result<CodecConfig> {
    let manifest: LumenManifest = toml::from_str(text)?;
    Ok(manifest.codec)
}

/// Turns on both strict switches.
pub fn force_strict(config: &mut CodecConfig) {
    config.unknown_discriminant = UnknownPolicy::Fail;
    config.strict_fields = true;
}
