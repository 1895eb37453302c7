//! Cursor over a separator-delimited token stream.
//!
//! The token protocol is a flat sequence of ASCII tokens with no escaping:
//! a separator character inside a value corrupts the frame. That fragility
//! is inherited from the producers and is not repaired here.

use crate::error::WireError;

/// A scanning cursor over the tokens of one serialized message.
///
/// Holds the split tokens and the current position; every consume method
/// advances the position and returns `Err(WireError::UnexpectedEnd)` once
/// the stream is exhausted. Failure never advances past the bad token, so
/// the reported position always names the culprit.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    position: usize,
}

impl<'a> TokenCursor<'a> {
    /// Split `message` on `separator` and place the cursor at the start.
    pub fn new(message: &'a str, separator: char) -> Result<Self, WireError> {
        if message.is_empty() {
            return Err(WireError::EmptyMessage);
        }
        Ok(Self {
            tokens: message.split(separator).collect(),
            position: 0,
        })
    }

    /// Current token index (the next token to be consumed).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of tokens not yet consumed.
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }

    /// True once every token has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Consume the next raw token.
    pub fn next_token(&mut self) -> Result<&'a str, WireError> {
        match self.tokens.get(self.position) {
            Some(tok) => {
                self.position += 1;
                Ok(tok)
            }
            None => Err(WireError::UnexpectedEnd {
                position: self.position,
            }),
        }
    }

    /// Consume the next token as an `i32`.
    pub fn next_i32(&mut self) -> Result<i32, WireError> {
        let position = self.position;
        let token = self.next_token()?;
        token.trim().parse().map_err(|_| {
            self.position = position;
            WireError::InvalidToken {
                position,
                token: token.to_string(),
                expected: "an integer",
            }
        })
    }

    /// Consume the next token as a non-negative count.
    pub fn next_count(&mut self) -> Result<usize, WireError> {
        let position = self.position;
        let value = self.next_i32()?;
        usize::try_from(value).map_err(|_| {
            self.position = position;
            WireError::InvalidToken {
                position,
                token: value.to_string(),
                expected: "a non-negative count",
            }
        })
    }

    /// Consume the next token as an `f64`.
    pub fn next_f64(&mut self) -> Result<f64, WireError> {
        let position = self.position;
        let token = self.next_token()?;
        token.trim().parse().map_err(|_| {
            self.position = position;
            WireError::InvalidToken {
                position,
                token: token.to_string(),
                expected: "a number",
            }
        })
    }

    /// Consume the next token as a boolean.
    ///
    /// Producers emit either the words `true`/`false` or the digits `1`/`0`.
    pub fn next_bool(&mut self) -> Result<bool, WireError> {
        let position = self.position;
        let token = self.next_token()?;
        match token.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => {
                self.position = position;
                Err(WireError::InvalidToken {
                    position,
                    token: token.to_string(),
                    expected: "a boolean",
                })
            }
        }
    }
}
