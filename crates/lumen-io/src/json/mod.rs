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

//! JSON text as a token stream.
//!
//! The reader tokenizes lazily, one token per call, and never builds a document
//! tree. String unescaping and number parsing are delegated to `serde_json` on
//! the exact literal slice, so both ends agree with it byte for byte.

mod reader;
mod writer;

pub use reader::JsonTokenReader;
pub use writer::JsonTokenWriter;
