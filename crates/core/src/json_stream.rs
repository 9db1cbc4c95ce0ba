//! Incremental scanner for a top-level JSON array.
//!
//! [`JsonArrayScanner`] walks a byte stream and hands out one raw array
//! element at a time, so an arbitrarily large `[...]` upload is processed
//! with only the current element buffered. Elements are located purely
//! structurally — the scanner tracks string/escape state and bracket depth,
//! never building a DOM — and each raw slice is decoded individually by the
//! caller (typically with `serde_json::from_slice`).
//!
//! The scanner does not validate element contents; a syntactically broken
//! element surfaces as an error from the caller's decode step, while broken
//! array framing (a missing comma, a truncated stream) surfaces here.

use std::io::Read;

use crate::error::{CoreError, CoreResult};

/// Streaming reader over the elements of one JSON array.
#[derive(Debug)]
pub struct JsonArrayScanner<R: Read> {
    reader: R,
    /// One byte of lookahead, for value terminators that belong to the
    /// enclosing array syntax.
    peeked: Option<u8>,
    /// Reused buffer holding the current element's raw bytes.
    buf: Vec<u8>,
    /// Set once the first element has been read: subsequent elements must
    /// be introduced by a `,` separator.
    expect_separator: bool,
    done: bool,
}

impl<R: Read> JsonArrayScanner<R> {
    /// Open a scanner, consuming leading whitespace and the `[` token.
    ///
    /// Fails with [`CoreError::MalformedInput`] if the first structural
    /// token is anything other than an array open.
    pub fn new(reader: R) -> CoreResult<Self> {
        let mut scanner = Self {
            reader,
            peeked: None,
            buf: Vec::new(),
            expect_separator: false,
            done: false,
        };

        match scanner.next_non_ws()? {
            Some(b'[') => Ok(scanner),
            _ => Err(CoreError::MalformedInput(
                "Expected JSON array at root level".to_string(),
            )),
        }
    }

    /// Advance to the next array element and return its raw bytes.
    ///
    /// Returns `None` once the closing `]` has been consumed. A framing
    /// error (unexpected byte, truncated input, I/O failure) is returned
    /// as `Some(Err(_))`; the scanner yields nothing further after that.
    pub fn next_element(&mut self) -> Option<CoreResult<&[u8]>> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(true) => Some(Ok(&self.buf)),
            Ok(false) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    /// Read one element into `buf`. Returns `Ok(false)` at the end of the
    /// array.
    ///
    /// The separator in front of an element is checked here, so a framing
    /// error between element N and N+1 surfaces when N+1 is requested —
    /// element N itself has already been handed out intact.
    fn advance(&mut self) -> CoreResult<bool> {
        let first = if self.expect_separator {
            match self.next_non_ws()? {
                Some(b',') => match self.next_non_ws()? {
                    Some(b']') => {
                        return Err(CoreError::MalformedInput(
                            "Trailing comma before end of JSON array".to_string(),
                        ))
                    }
                    Some(b) => b,
                    None => return Err(unexpected_eof()),
                },
                Some(b']') => {
                    self.done = true;
                    return Ok(false);
                }
                Some(b) => {
                    return Err(CoreError::MalformedInput(format!(
                        "Expected ',' or ']' after array element, found '{}'",
                        b as char
                    )))
                }
                None => return Err(unexpected_eof()),
            }
        } else {
            match self.next_non_ws()? {
                Some(b']') => {
                    self.done = true;
                    return Ok(false);
                }
                Some(b) => b,
                None => return Err(unexpected_eof()),
            }
        };

        self.read_value(first)?;
        self.expect_separator = true;
        Ok(true)
    }

    /// Accumulate one complete JSON value into `buf`, starting from its
    /// first byte.
    fn read_value(&mut self, first: u8) -> CoreResult<()> {
        self.buf.clear();
        self.buf.push(first);

        let mut depth: u32 = match first {
            b'{' | b'[' => 1,
            b'"' => return self.read_string_tail(),
            // Scalar (number / true / false / null): runs until a
            // delimiter, which is pushed back for the framing check.
            _ => {
                loop {
                    match self.next_byte()? {
                        Some(b) if matches!(b, b',' | b']' | b'}') || b.is_ascii_whitespace() => {
                            self.peeked = Some(b);
                            return Ok(());
                        }
                        Some(b) => self.buf.push(b),
                        None => return Ok(()),
                    }
                }
            }
        };

        let mut in_string = false;
        let mut escaped = false;

        while depth > 0 {
            let b = self.next_byte()?.ok_or_else(unexpected_eof)?;
            self.buf.push(b);

            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }

            match b {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => depth -= 1,
                _ => {}
            }
        }

        Ok(())
    }

    /// Finish reading a string value whose opening quote is already in
    /// `buf`.
    fn read_string_tail(&mut self) -> CoreResult<()> {
        let mut escaped = false;
        loop {
            let b = self.next_byte()?.ok_or_else(unexpected_eof)?;
            self.buf.push(b);
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                return Ok(());
            }
        }
    }

    /// Next byte that is not JSON whitespace.
    fn next_non_ws(&mut self) -> CoreResult<Option<u8>> {
        loop {
            match self.next_byte()? {
                Some(b) if b.is_ascii_whitespace() => continue,
                other => return Ok(other),
            }
        }
    }

    fn next_byte(&mut self) -> CoreResult<Option<u8>> {
        if let Some(b) = self.peeked.take() {
            return Ok(Some(b));
        }
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(CoreError::Internal(format!(
                        "I/O error while reading import stream: {e}"
                    )))
                }
            }
        }
    }
}

fn unexpected_eof() -> CoreError {
    CoreError::MalformedInput("Unexpected end of input inside JSON array".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
