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

use lumen_core::{Scalar, Token, TokenError, TokenReader};
use std::io::{self, BufRead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

/// What the grammar allows at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the top-level value.
    Start,
    /// A value is required (after `:` or after `,` in an array).
    Value,
    /// Right after `[`: a value or `]`.
    ArrayFirst,
    /// Right after `{`: a property name or `}`.
    ObjectFirst,
    /// After `,` in an object: a property name.
    Key,
    /// After a complete value inside a container: `,` or the closing bracket.
    AfterValue,
    /// The top-level value is complete.
    Finished,
}

/// A pull-based JSON tokenizer over any buffered byte source.
///
/// Only the literal being scanned is held in memory, so a file can be decoded
/// through a [`BufReader`](std::io::BufReader) without reading it whole.
///
/// # Examples
///
/// ```
/// use lumen_core::{Scalar, Token, TokenReader};
/// use lumen_io::JsonTokenReader;
///
/// let mut reader = JsonTokenReader::new(r#"{"type": "point"}"#);
/// assert_eq!(reader.next_token().unwrap(), Some(Token::BeginObject));
/// assert_eq!(reader.next_token().unwrap(), Some(Token::Property("type".into())));
/// assert_eq!(
///     reader.next_token().unwrap(),
///     Some(Token::Scalar(Scalar::String("point".into())))
/// );
/// assert_eq!(reader.next_token().unwrap(), Some(Token::EndObject));
/// assert_eq!(reader.next_token().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct JsonTokenReader<R> {
    input: R,
    pos: usize,
    stack: Vec<Frame>,
    state: State,
    /// Bytes of the string or number literal being scanned.
    scratch: Vec<u8>,
}

impl<'a> JsonTokenReader<&'a [u8]> {
    /// Creates a reader over one JSON document held in memory.
    pub fn new(src: &'a str) -> Self {
        Self::from_reader(src.as_bytes())
    }
}

impl<R: BufRead> JsonTokenReader<R> {
    /// Creates a reader pulling one JSON document from `input`.
    pub fn from_reader(input: R) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
            state: State::Start,
            scratch: Vec::new(),
        }
    }

    /// Checks that nothing but whitespace follows the top-level value.
    pub fn finish(mut self) -> Result<(), TokenError> {
        if self.state != State::Finished {
            return Err(TokenError::UnexpectedEnd);
        }
        self.skip_ws()?;
        match self.peek()? {
            None => Ok(()),
            Some(_) => Err(self.syntax("trailing characters after the document")),
        }
    }

    fn peek(&mut self) -> Result<Option<u8>, TokenError> {
        loop {
            match self.input.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(TokenError::Io {
                        offset: self.pos,
                        message: e.to_string(),
                    })
                }
            }
        }
    }

    /// Consumes the byte last returned by `peek`.
    fn bump(&mut self) {
        self.input.consume(1);
        self.pos += 1;
    }

    fn skip_ws(&mut self) -> Result<(), TokenError> {
        while matches!(self.peek()?, Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.bump();
        }
        Ok(())
    }

    fn syntax(&self, message: impl Into<String>) -> TokenError {
        TokenError::Syntax {
            offset: self.pos,
            message: message.into(),
        }
    }

    /// The state once a value at the current depth is complete.
    fn value_done(&mut self) {
        self.state = if self.stack.is_empty() {
            State::Finished
        } else {
            State::AfterValue
        };
    }

    fn open(&mut self, frame: Frame) -> Token {
        self.bump();
        self.stack.push(frame);
        match frame {
            Frame::Object => {
                self.state = State::ObjectFirst;
                Token::BeginObject
            }
            Frame::Array => {
                self.state = State::ArrayFirst;
                Token::BeginArray
            }
        }
    }

    fn close(&mut self) -> Token {
        self.bump();
        let frame = self.stack.pop();
        self.value_done();
        match frame {
            Some(Frame::Array) => Token::EndArray,
            _ => Token::EndObject,
        }
    }

    fn value(&mut self) -> Result<Token, TokenError> {
        let token = match self.peek()? {
            None => return Err(TokenError::UnexpectedEnd),
            Some(b'{') => return Ok(self.open(Frame::Object)),
            Some(b'[') => return Ok(self.open(Frame::Array)),
            Some(b'"') => Token::Scalar(Scalar::String(self.string()?)),
            Some(b't') => self.literal("true", Scalar::Bool(true))?,
            Some(b'f') => self.literal("false", Scalar::Bool(false))?,
            Some(b'n') => self.literal("null", Scalar::Null)?,
            Some(b'-' | b'0'..=b'9') => Token::Scalar(Scalar::Number(self.number()?)),
            Some(other) => {
                return Err(self.syntax(format!("unexpected character '{}'", other as char)))
            }
        };
        self.value_done();
        Ok(token)
    }

    fn key(&mut self) -> Result<Token, TokenError> {
        if self.peek()? != Some(b'"') {
            return Err(self.syntax("expected a property name"));
        }
        let name = self.string()?;
        self.skip_ws()?;
        if self.peek()? != Some(b':') {
            return Err(self.syntax("expected ':' after property name"));
        }
        self.bump();
        self.state = State::Value;
        Ok(Token::Property(name))
    }

    fn literal(&mut self, word: &'static str, scalar: Scalar) -> Result<Token, TokenError> {
        for expected in word.bytes() {
            if self.peek()? != Some(expected) {
                return Err(self.syntax("invalid literal"));
            }
            self.bump();
        }
        Ok(Token::Scalar(scalar))
    }

    /// Scans a string literal and lets `serde_json` unescape it.
    fn string(&mut self) -> Result<String, TokenError> {
        let start = self.pos;
        self.scratch.clear();
        self.scratch.push(b'"');
        self.bump();
        loop {
            match self.peek()? {
                None => return Err(TokenError::UnexpectedEnd),
                Some(b'"') => {
                    self.scratch.push(b'"');
                    self.bump();
                    break;
                }
                Some(b'\\') => {
                    self.scratch.push(b'\\');
                    self.bump();
                    let escaped = self.peek()?.ok_or(TokenError::UnexpectedEnd)?;
                    self.scratch.push(escaped);
                    self.bump();
                }
                Some(byte) => {
                    self.scratch.push(byte);
                    self.bump();
                }
            }
        }
        let literal = std::str::from_utf8(&self.scratch).map_err(|e| TokenError::Syntax {
            offset: start,
            message: e.to_string(),
        })?;
        serde_json::from_str::<String>(literal).map_err(|e| TokenError::Syntax {
            offset: start,
            message: e.to_string(),
        })
    }

    /// Scans a number literal and lets `serde_json` parse it.
    ///
    /// A literal that is valid JSON but beyond `f64` range becomes an infinity
    /// of the same sign, leaving it to the field to reject the value.
    fn number(&mut self) -> Result<f64, TokenError> {
        let start = self.pos;
        self.scratch.clear();
        while let Some(byte @ (b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')) = self.peek()? {
            self.scratch.push(byte);
            self.bump();
        }
        if !is_number_literal(&self.scratch) {
            return Err(TokenError::Syntax {
                offset: start,
                message: "invalid number".to_string(),
            });
        }
        let literal = std::str::from_utf8(&self.scratch).map_err(|e| TokenError::Syntax {
            offset: start,
            message: e.to_string(),
        })?;
        Ok(match serde_json::from_str::<f64>(literal) {
            Ok(value) => value,
            Err(_) if literal.starts_with('-') => f64::NEG_INFINITY,
            Err(_) => f64::INFINITY,
        })
    }
}

/// Matches `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
fn is_number_literal(bytes: &[u8]) -> bool {
    fn digits(bytes: &[u8], i: &mut usize) -> usize {
        let start = *i;
        while bytes.get(*i).is_some_and(u8::is_ascii_digit) {
            *i += 1;
        }
        *i - start
    }

    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            digits(bytes, &mut i);
        }
        _ => return false,
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        if digits(bytes, &mut i) == 0 {
            return false;
        }
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(bytes, &mut i) == 0 {
            return false;
        }
    }
    i == bytes.len()
}

impl<R: BufRead> TokenReader for JsonTokenReader<R> {
    fn next_token(&mut self) -> Result<Option<Token>, TokenError> {
        loop {
            self.skip_ws()?;
            match self.state {
                State::Start => {
                    if self.peek()?.is_none() {
                        return Ok(None);
                    }
                    return self.value().map(Some);
                }
                State::Value => return self.value().map(Some),
                State::ArrayFirst => {
                    if self.peek()? == Some(b']') {
                        return Ok(Some(self.close()));
                    }
                    return self.value().map(Some);
                }
                State::ObjectFirst => {
                    if self.peek()? == Some(b'}') {
                        return Ok(Some(self.close()));
                    }
                    return self.key().map(Some);
                }
                State::Key => return self.key().map(Some),
                State::AfterValue => {
                    let frame = self.stack.last().copied();
                    match (frame, self.peek()?) {
                        (_, None) => return Err(TokenError::UnexpectedEnd),
                        (Some(Frame::Object), Some(b',')) => {
                            self.bump();
                            self.state = State::Key;
                        }
                        (Some(Frame::Array), Some(b',')) => {
                            self.bump();
                            self.state = State::Value;
                        }
                        (Some(Frame::Object), Some(b'}')) | (Some(Frame::Array), Some(b']')) => {
                            return Ok(Some(self.close()));
                        }
                        _ => return Err(self.syntax("expected ',' or a closing bracket")),
                    }
                }
                State::Finished => {
                    return match self.peek()? {
                        None => Ok(None),
                        Some(_) => Err(self.syntax("trailing characters after the document")),
                    };
                }
            }
        }
    }
}
