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

//! # Lumen Core
//!
//! Foundational crate containing the contracts every other Lumen crate builds on:
//! the pull-based token stream, the node model and its declarative field tables,
//! the init-then-freeze variant registry and the codec configuration.
//!
//! Nothing in here knows about a concrete node family or a concrete wire syntax.

#![warn(missing_docs)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod lane;
pub mod math;
pub mod node;
pub mod registry;
pub mod schema;
pub mod token;

pub use config::{CodecConfig, UnknownPolicy};
pub use decoder::{decoder_for, Accepted, DecodeFn, VariantDecoder};
pub use error::{DecodeError, EncodeError, TokenError};
pub use lane::{Lane, LaneKind};
pub use node::{FieldSlot, Node, Tag, VariantBody};
pub use registry::{RegistryBuilder, VariantEntry, VariantRegistry};
pub use schema::{Field, FieldType, FieldValue, Variant};
pub use token::{Scalar, Token, TokenReader, TokenSpan, TokenWriter};
