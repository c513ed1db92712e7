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

//! Acts as the **[A]gent** for the light codec.
//!
//! [`CodecAgent`] is the public entry point: it builds the core light table and
//! the extension registry once, then hands out decode and encode lanes that
//! borrow them. Whole `lights` blocks are decoded light by light, so one bad
//! light is reported without losing its siblings.

mod agent;
mod block;

pub use agent::{AgentError, CodecAgent};
pub use block::{BlockError, LightsBlock, LIGHTS_PROPERTY};
