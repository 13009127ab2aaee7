//! Scanner implementation. Converts a stream of `char`s into a flat sequence of [PackedToken]s,
//! each of which pairs a terminal [Symbol] (plus any raw literal payload) with the [Span] it was
//! found at.
//!
//! Scanning is strictly left to right with a single character of lookahead. Once a token has
//! been produced the characters it consumed are never revisited.
use std::iter::Peekable;

use log::debug;

use crate::coords::{Coords, Span};
use crate::errors::*;
use crate::scanner_error;
use crate::symbols::Symbol;

/// Spelling of the `true` literal
const TRUE_LITERAL: &str = "true";
/// Spelling of the `false` literal
const FALSE_LITERAL: &str = "false";
/// Spelling of the `null` literal
const NULL_LITERAL: &str = "null";

/// A single token. The literal payload holds the exact source text for digit runs, string bodies,
/// signs and boolean spellings.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The terminal kind of the token
    pub kind: Symbol,
    /// Raw payload, if the kind carries one
    pub literal: Option<String>,
}

impl Token {
    /// A token with no payload
    pub fn new(kind: Symbol) -> Self {
        Token {
            kind,
            literal: None,
        }
    }

    /// A token carrying a raw literal payload
    pub fn with_literal(kind: Symbol, literal: impl Into<String>) -> Self {
        Token {
            kind,
            literal: Some(literal.into()),
        }
    }
}

/// A packed token consists of a [Token] and the [Span] associated with it
pub type PackedToken = (Token, Span);

/// Convenience macro for packing tokens along with their positional information
macro_rules! packed_token {
    ($t:expr, $s:expr, $e:expr) => {
        ($t, Span { start: $s, end: $e })
    };
    ($t:expr, $s:expr) => {
        ($t, Span { start: $s, end: $s })
    };
}

/// Whitespace which is skipped between tokens
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Scan a complete piece of text into a sequence of tokens
pub fn scan(text: &str) -> ParserResult<Vec<PackedToken>> {
    let mut chars = text.chars();
    Scanner::new(&mut chars).scan()
}

/// A scanner with a single character of lookahead
pub struct Scanner<'a> {
    /// The source of characters
    chars: Peekable<&'a mut dyn Iterator<Item = char>>,
    /// Coordinates of the next character to be consumed
    coords: Coords,
    /// Buffer used to hoover up digit runs and string bodies
    buffer: String,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner over a stream of chars
    pub fn new(chars: &'a mut dyn Iterator<Item = char>) -> Self {
        Scanner {
            chars: chars.peekable(),
            coords: Coords::default(),
            buffer: String::new(),
        }
    }

    /// Consume the whole input, producing every token in order. The first malformed token aborts
    /// the scan.
    pub fn scan(mut self) -> ParserResult<Vec<PackedToken>> {
        let mut tokens = vec![];
        while let Some(packed) = self.consume()? {
            tokens.push(packed);
        }
        debug!("scanned {} tokens", tokens.len());
        Ok(tokens)
    }

    /// Consume the next token from the input. Returns [None] at the end of the input.
    pub fn consume(&mut self) -> ParserResult<Option<PackedToken>> {
        self.skip_whitespace();
        let (c, start) = match self.advance() {
            Some(next) => next,
            None => return Ok(None),
        };
        let packed = match c {
            '{' => packed_token!(Token::new(Symbol::ObjectStart), start),
            '}' => packed_token!(Token::new(Symbol::ObjectEnd), start),
            '[' => packed_token!(Token::new(Symbol::ArrayStart), start),
            ']' => packed_token!(Token::new(Symbol::ArrayEnd), start),
            ',' => packed_token!(Token::new(Symbol::Comma), start),
            ':' => packed_token!(Token::new(Symbol::Colon), start),
            '.' => packed_token!(Token::new(Symbol::FractionDot), start),
            'e' | 'E' => packed_token!(Token::new(Symbol::ExponentMarker), start),
            '+' | '-' => packed_token!(Token::with_literal(Symbol::Sign, c), start),
            '"' => self.match_string(start)?,
            't' => self.match_literal(start, TRUE_LITERAL, Symbol::BooleanLiteral)?,
            'f' => self.match_literal(start, FALSE_LITERAL, Symbol::BooleanLiteral)?,
            'n' => self.match_literal(start, NULL_LITERAL, Symbol::NullLiteral)?,
            c if c.is_ascii_digit() => self.match_digits(c, start),
            c => return scanner_error!(Details::UnrecognisedToken(c), start),
        };
        Ok(Some(packed))
    }

    /// Take the next character along with its coordinates
    fn advance(&mut self) -> Option<(char, Coords)> {
        let c = self.chars.next()?;
        let coords = self.coords;
        self.coords = coords.advance(c);
        Some((c, coords))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.chars.peek() {
            if !is_whitespace(*c) {
                break;
            }
            self.advance();
        }
    }

    /// Match a run of ASCII digits, the first of which has already been consumed
    fn match_digits(&mut self, first: char, start: Coords) -> PackedToken {
        self.buffer.clear();
        self.buffer.push(first);
        let mut end = start;
        while let Some(c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            if let Some((c, coords)) = self.advance() {
                self.buffer.push(c);
                end = coords;
            }
        }
        packed_token!(
            Token::with_literal(Symbol::Digits, self.buffer.as_str()),
            start,
            end
        )
    }

    /// Match a string body up to the next double quote. The body is captured exactly as it
    /// appears in the input, escapes included.
    fn match_string(&mut self, start: Coords) -> ParserResult<PackedToken> {
        self.buffer.clear();
        loop {
            match self.advance() {
                Some(('"', end)) => {
                    return Ok(packed_token!(
                        Token::with_literal(Symbol::StringLiteral, self.buffer.as_str()),
                        start,
                        end
                    ))
                }
                Some((c, _)) => self.buffer.push(c),
                None => return scanner_error!(Details::UnterminatedString, self.coords),
            }
        }
    }

    /// Match the remainder of a keyword literal whose first character has already been consumed
    fn match_literal(
        &mut self,
        start: Coords,
        expected: &'static str,
        kind: Symbol,
    ) -> ParserResult<PackedToken> {
        let mut end = start;
        for e in expected.chars().skip(1) {
            match self.advance() {
                Some((c, coords)) if c == e => end = coords,
                _ => return scanner_error!(Details::InvalidLiteral(expected), start),
            }
        }
        let token = match kind {
            Symbol::NullLiteral => Token::new(kind),
            _ => Token::with_literal(kind, expected),
        };
        Ok(packed_token!(token, start, end))
    }
}
