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

//! # Lane Abstraction
//!
//! A **Lane** is one processing strategy an agent drives. The codec has two
//! kinds: decode lanes turn a token stream into nodes, encode lanes do the
//! reverse. Each domain trait adds its own execution methods on top of [`Lane`].

/// Classification of lane types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Token stream to nodes.
    Decode,
    /// Nodes to token stream.
    Encode,
}

/// The identity shared by every lane.
pub trait Lane: Send + Sync {
    /// A stable, human-readable name for the strategy, used in logs.
    fn strategy_name(&self) -> &'static str;

    /// What the lane does.
    fn lane_kind(&self) -> LaneKind;
}
