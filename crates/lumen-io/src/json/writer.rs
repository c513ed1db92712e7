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

use lumen_core::{Scalar, TokenError, TokenWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    /// Entries written so far, used for separators.
    len: usize,
}

/// A JSON text sink that checks every write against the grammar.
///
/// Output is compact unless an indent width is given with [`JsonTokenWriter::pretty`].
///
/// # Examples
///
/// ```
/// use lumen_core::TokenWriter;
/// use lumen_io::JsonTokenWriter;
///
/// let mut writer = JsonTokenWriter::new();
/// writer.begin_object().unwrap();
/// writer.property("width").unwrap();
/// writer.number(5.0).unwrap();
/// writer.end_object().unwrap();
/// assert_eq!(writer.into_string().unwrap(), r#"{"width":5.0}"#);
/// ```
#[derive(Debug, Default)]
pub struct JsonTokenWriter {
    out: String,
    stack: Vec<Frame>,
    /// A property name was written and its value has not been.
    pending_value: bool,
    complete: bool,
    indent: Option<usize>,
}

impl JsonTokenWriter {
    /// Creates a compact writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer that puts each entry on its own line.
    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            ..Self::default()
        }
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Returns the text once exactly one complete value has been written.
    pub fn into_string(self) -> Result<String, TokenError> {
        if !self.complete {
            return Err(TokenError::InvalidState("document is incomplete"));
        }
        Ok(self.out)
    }

    fn newline(&mut self) {
        if let Some(width) = self.indent {
            self.out.push('\n');
            let depth = self.stack.len();
            self.out.extend(std::iter::repeat(' ').take(width * depth));
        }
    }

    /// Writes the separator a new array element or object entry needs.
    fn separate(&mut self) {
        let first = self.stack.last().map_or(true, |frame| frame.len == 0);
        if !first {
            self.out.push(',');
        }
        self.newline();
        if let Some(frame) = self.stack.last_mut() {
            frame.len += 1;
        }
    }

    /// Checks that a value may start here and writes its separator.
    fn before_value(&mut self) -> Result<(), TokenError> {
        if self.complete {
            return Err(TokenError::InvalidState("document is already complete"));
        }
        match self.stack.last().map(|frame| frame.container) {
            Some(Container::Object) => {
                if !self.pending_value {
                    return Err(TokenError::InvalidState("object value without a property name"));
                }
                self.pending_value = false;
            }
            Some(Container::Array) => self.separate(),
            None => {}
        }
        Ok(())
    }

    fn after_value(&mut self) {
        if self.stack.is_empty() {
            self.complete = true;
        }
    }

    fn begin(&mut self, container: Container, open: char) -> Result<(), TokenError> {
        self.before_value()?;
        self.out.push(open);
        self.stack.push(Frame { container, len: 0 });
        Ok(())
    }

    fn end(&mut self, container: Container, close: char) -> Result<(), TokenError> {
        let open = self.stack.last().map(|frame| frame.container);
        if open != Some(container) || self.pending_value {
            return Err(TokenError::InvalidState("close does not match the open container"));
        }
        let had_entries = self.stack.pop().is_some_and(|frame| frame.len > 0);
        if had_entries {
            self.newline();
        }
        self.out.push(close);
        self.after_value();
        Ok(())
    }

    fn push_string(&mut self, value: &str) -> Result<(), TokenError> {
        let escaped = serde_json::to_string(value)
            .map_err(|_| TokenError::InvalidState("string could not be escaped"))?;
        self.out.push_str(&escaped);
        Ok(())
    }
}

impl TokenWriter for JsonTokenWriter {
    fn begin_object(&mut self) -> Result<(), TokenError> {
        self.begin(Container::Object, '{')
    }

    fn end_object(&mut self) -> Result<(), TokenError> {
        self.end(Container::Object, '}')
    }

    fn begin_array(&mut self) -> Result<(), TokenError> {
        self.begin(Container::Array, '[')
    }

    fn end_array(&mut self) -> Result<(), TokenError> {
        self.end(Container::Array, ']')
    }

    fn property(&mut self, name: &str) -> Result<(), TokenError> {
        let in_object = matches!(
            self.stack.last().map(|frame| frame.container),
            Some(Container::Object)
        );
        if !in_object || self.pending_value {
            return Err(TokenError::InvalidState("property name outside an object entry"));
        }
        self.separate();
        self.push_string(name)?;
        self.out.push(':');
        if self.indent.is_some() {
            self.out.push(' ');
        }
        self.pending_value = true;
        Ok(())
    }

    fn scalar(&mut self, value: &Scalar) -> Result<(), TokenError> {
        if let Scalar::Number(n) = value {
            if !n.is_finite() {
                return Err(TokenError::NonFinite(*n));
            }
        }
        self.before_value()?;
        match value {
            Scalar::String(s) => self.push_string(s)?,
            Scalar::Number(n) => {
                let text = serde_json::to_string(n)
                    .map_err(|_| TokenError::InvalidState("number could not be formatted"))?;
                self.out.push_str(&text);
            }
            Scalar::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Scalar::Null => self.out.push_str("null"),
        }
        self.after_value();
        Ok(())
    }
}
