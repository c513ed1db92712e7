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

//! # Lumen Lanes
//!
//! The hot-path codec pipelines. The decode lane routes each object to the
//! variant its discriminant names; the encode lane writes nodes back in
//! canonical, default-elided form. Neither one knows any variant by name.

#![warn(missing_docs)]

pub mod decode_lane;
pub mod encode_lane;

pub use decode_lane::DecodeDispatcher;
pub use encode_lane::SelectiveEncoder;
