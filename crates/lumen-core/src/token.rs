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

//! Defines the pull-based token stream contract.
//!
//! The codec never sees text or bytes. It pulls [`Token`]s one at a time from a
//! [`TokenReader`] and pushes them into a [`TokenWriter`]; a concrete syntax (JSON
//! in `lumen-io`) lives entirely behind these two traits. No lookahead beyond the
//! current token is ever required.

use crate::error::TokenError;
use std::fmt;

/// A scalar value carried by the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A string value.
    String(String),
    /// A number, always in the format's native double precision.
    Number(f64),
    /// A boolean value.
    Bool(bool),
    /// The null value.
    Null,
}

/// One structural or scalar token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Start of an object.
    BeginObject,
    /// End of an object.
    EndObject,
    /// Start of an array.
    BeginArray,
    /// End of an array.
    EndArray,
    /// A property name inside an object. Always followed by exactly one value.
    Property(String),
    /// A scalar value.
    Scalar(Scalar),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "string {s:?}"),
            Scalar::Number(n) => write!(f, "number {n}"),
            Scalar::Bool(b) => write!(f, "bool {b}"),
            Scalar::Null => write!(f, "null"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::BeginObject => write!(f, "object start"),
            Token::EndObject => write!(f, "object end"),
            Token::BeginArray => write!(f, "array start"),
            Token::EndArray => write!(f, "array end"),
            Token::Property(name) => write!(f, "property {name:?}"),
            Token::Scalar(scalar) => scalar.fmt(f),
        }
    }
}

/// A sequential source of tokens.
pub trait TokenReader {
    /// Pulls the next token, or `Ok(None)` once the input is exhausted.
    fn next_token(&mut self) -> Result<Option<Token>, TokenError>;

    /// Pulls the next token, treating end of input as an error.
    fn expect_token(&mut self) -> Result<Token, TokenError> {
        self.next_token()?.ok_or(TokenError::UnexpectedEnd)
    }
}

impl<R: TokenReader + ?Sized> TokenReader for &mut R {
    fn next_token(&mut self) -> Result<Option<Token>, TokenError> {
        (**self).next_token()
    }
}

/// A sequential sink of tokens.
pub trait TokenWriter {
    /// Writes an object start.
    fn begin_object(&mut self) -> Result<(), TokenError>;
    /// Writes an object end.
    fn end_object(&mut self) -> Result<(), TokenError>;
    /// Writes an array start.
    fn begin_array(&mut self) -> Result<(), TokenError>;
    /// Writes an array end.
    fn end_array(&mut self) -> Result<(), TokenError>;
    /// Writes a property name; the next write must be its value.
    fn property(&mut self, name: &str) -> Result<(), TokenError>;
    /// Writes a scalar value.
    fn scalar(&mut self, value: &Scalar) -> Result<(), TokenError>;

    /// Writes a number value.
    fn number(&mut self, value: f64) -> Result<(), TokenError> {
        self.scalar(&Scalar::Number(value))
    }

    /// Writes a string value.
    fn string(&mut self, value: &str) -> Result<(), TokenError> {
        self.scalar(&Scalar::String(value.to_owned()))
    }
}

/// The complete token sequence of exactly one value.
///
/// A span is a scalar, or a balanced array or object with everything nested in
/// it. Spans let the dispatcher hold on to a property's value until it knows
/// which variant decoder should receive it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenSpan {
    tokens: Vec<Token>,
}

impl TokenSpan {
    /// Reads one complete value from `reader`.
    pub fn capture<R: TokenReader + ?Sized>(reader: &mut R) -> Result<Self, TokenError> {
        let first = reader.expect_token()?;
        Self::capture_from(first, reader)
    }

    /// Reads the rest of a value whose first token was already pulled.
    pub fn capture_from<R: TokenReader + ?Sized>(
        first: Token,
        reader: &mut R,
    ) -> Result<Self, TokenError> {
        let mut tokens = Vec::new();
        walk_value(first, reader, |token| tokens.push(token))?;
        Ok(Self { tokens })
    }

    /// Consumes one complete value from `reader` without keeping it.
    pub fn skip<R: TokenReader + ?Sized>(reader: &mut R) -> Result<(), TokenError> {
        let first = reader.expect_token()?;
        Self::skip_from(first, reader)
    }

    /// Consumes the rest of a value whose first token was already pulled.
    pub fn skip_from<R: TokenReader + ?Sized>(first: Token, reader: &mut R) -> Result<(), TokenError> {
        walk_value(first, reader, drop)
    }

    /// Returns the tokens of the value.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the scalar if the value is a single scalar.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self.tokens.as_slice() {
            [Token::Scalar(scalar)] => Some(scalar),
            _ => None,
        }
    }

    /// Returns a short description of the value for diagnostics.
    pub fn describe(&self) -> String {
        match self.tokens.first() {
            Some(Token::BeginObject) => "object".to_string(),
            Some(Token::BeginArray) => "array".to_string(),
            Some(token) => token.to_string(),
            None => "nothing".to_string(),
        }
    }
}

/// Walks one value, checking that every container is closed by its own kind.
fn walk_value<R, F>(first: Token, reader: &mut R, mut visit: F) -> Result<(), TokenError>
where
    R: TokenReader + ?Sized,
    F: FnMut(Token),
{
    // `true` for objects, `false` for arrays.
    let mut open: Vec<bool> = Vec::new();
    // Inside an object, a property name must come before each value.
    let mut expecting_value = false;
    let mut token = first;

    loop {
        let in_object = open.last().copied().unwrap_or(false);
        match &token {
            Token::BeginObject | Token::BeginArray | Token::Scalar(_) => {
                if in_object && !expecting_value {
                    return Err(unexpected("property name", &token));
                }
                if let Token::BeginObject = token {
                    open.push(true);
                } else if let Token::BeginArray = token {
                    open.push(false);
                }
                expecting_value = false;
            }
            Token::Property(_) => {
                if !in_object || expecting_value {
                    return Err(unexpected("value", &token));
                }
                expecting_value = true;
            }
            Token::EndObject => {
                if open.pop() != Some(true) || expecting_value {
                    return Err(unexpected("value", &token));
                }
            }
            Token::EndArray => {
                if open.pop() != Some(false) {
                    return Err(unexpected("value", &token));
                }
            }
        }
        visit(token);
        if open.is_empty() {
            return Ok(());
        }
        token = reader.expect_token()?;
    }
}

fn unexpected(expected: &'static str, found: &Token) -> TokenError {
    TokenError::Unexpected {
        expected,
        found: found.to_string(),
    }
}
