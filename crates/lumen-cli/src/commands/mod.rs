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

mod inspect;
mod normalize;

pub use inspect::inspect;
pub use normalize::normalize;

use anyhow::{Context, Result};
use lumen_agents::LightsBlock;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open lights document at '{}'", path.display()))?;
    Ok(BufReader::new(file))
}

/// Prints each light that failed to decode on stderr.
fn report_failures(block: &LightsBlock) {
    for failure in &block.errors {
        eprintln!("light {}: {}", failure.index, failure.error);
    }
}
