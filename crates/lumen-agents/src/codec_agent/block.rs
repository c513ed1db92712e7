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

use lumen_core::{DecodeError, Node};

/// The property that holds the light array in a lights block.
pub const LIGHTS_PROPERTY: &str = "lights";

/// A light that failed to decode, by its position in the array.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockError {
    /// Zero-based position of the element among all `lights` elements of the
    /// document, in order.
    pub index: usize,
    /// Why it failed.
    pub error: DecodeError,
}

/// The outcome of decoding a `{"lights": [...]}` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightsBlock {
    /// Decoded lights, in document order.
    pub lights: Vec<Node>,
    /// Objects skipped because their discriminant did not resolve.
    pub skipped: usize,
    /// Lights that failed without corrupting the stream.
    pub errors: Vec<BlockError>,
}

impl LightsBlock {
    /// Returns how many `lights` elements were read, whatever their outcome.
    pub fn len(&self) -> usize {
        self.lights.len() + self.skipped + self.errors.len()
    }

    /// Returns `true` if no `lights` element was read.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if every element produced a light.
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.errors.is_empty()
    }
}
