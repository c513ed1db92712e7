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

use super::{open_input, report_failures};
use anyhow::{Context, Result};
use lumen_agents::{CodecAgent, LightsBlock};
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// Reads a lights block, re-encodes it canonically and writes it out.
pub fn normalize(
    agent: &CodecAgent,
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let (normalized, block) = normalize_from(agent, open_input(input)?, pretty)
        .with_context(|| format!("Failed to normalize '{}'", input.display()))?;
    report_failures(&block);

    match output {
        Some(path) => {
            fs::write(path, format!("{normalized}\n"))
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            log::info!(
                "Wrote {} lights to '{}' ({} skipped, {} failed)",
                block.lights.len(),
                path.display(),
                block.skipped,
                block.errors.len()
            );
        }
        None => println!("{normalized}"),
    }
    Ok(())
}

fn normalize_from(
    agent: &CodecAgent,
    input: impl BufRead,
    pretty: bool,
) -> Result<(String, LightsBlock)> {
    let block = agent.decode_block_from(input)?;
    let normalized = agent.encode_block(&block.lights, pretty)?;
    Ok((normalized, block))
}
