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

//! Defines the hierarchy of error types for the codec.
//!
//! [`TokenError`] is raised by token stream implementations. The decode side wraps
//! it into [`DecodeError::MalformedDocument`], the encode side into
//! [`EncodeError::Stream`]. Every other variant describes a single node and leaves
//! the stream positioned after that node, so callers may keep scanning siblings.

use thiserror::Error;

/// An error raised by a token reader or writer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    /// The stream ended in the middle of a value.
    #[error("unexpected end of token stream")]
    UnexpectedEnd,
    /// A token did not fit the object/array grammar at this position.
    #[error("expected {expected}, found {found}")]
    Unexpected {
        /// What the grammar allowed here.
        expected: &'static str,
        /// A short description of the token that was read.
        found: String,
    },
    /// The underlying text could not be tokenized.
    #[error("syntax error at byte {offset}: {message}")]
    Syntax {
        /// Byte offset of the offending input.
        offset: usize,
        /// Details from the tokenizer.
        message: String,
    },
    /// The underlying input could not be read.
    #[error("read failed at byte {offset}: {message}")]
    Io {
        /// Byte offset reached before the failure.
        offset: usize,
        /// The I/O error, rendered.
        message: String,
    },
    /// A writer was asked to emit a number the format cannot represent.
    #[error("cannot write non-finite number {0}")]
    NonFinite(f64),
    /// A writer call did not fit the current nesting state.
    #[error("invalid writer state: {0}")]
    InvalidState(&'static str),
}

/// An error that can occur while decoding a single node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The token stream violates the object/array grammar. Unrecoverable.
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] TokenError),
    /// A known field carries a value of the wrong type or out of range.
    #[error("invalid value for `{field}` on `{kind}`: {reason}")]
    InvalidFieldValue {
        /// Discriminant of the node being decoded (`?` if not known yet).
        kind: String,
        /// The offending property.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// The discriminant is neither a core variant nor a registered extension.
    #[error("unknown discriminant `{0}`")]
    UnknownDiscriminant(String),
    /// The object ended without any discriminant property.
    #[error("object has no discriminant property")]
    MissingDiscriminant,
    /// A field without a documented default was never supplied.
    #[error("required field `{field}` missing on `{kind}`")]
    MissingField {
        /// Discriminant of the node being decoded.
        kind: String,
        /// The missing property.
        field: &'static str,
    },
}

impl DecodeError {
    /// Returns `true` if the stream position can no longer be trusted.
    pub fn is_structural(&self) -> bool {
        matches!(self, DecodeError::MalformedDocument(_))
    }
}

/// An error that can occur while encoding a single node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A field holds a value the decoder would refuse: NaN, infinity or a
    /// value outside the field's range.
    #[error("`{field}` on `{kind}` cannot be encoded: {value}")]
    UnencodableValue {
        /// Discriminant of the node being encoded.
        kind: String,
        /// The offending field.
        field: &'static str,
        /// The first offending component.
        value: f32,
    },
    /// The token writer refused a write.
    #[error("token stream rejected the write: {0}")]
    Stream(#[from] TokenError),
}
