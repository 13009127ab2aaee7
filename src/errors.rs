//! General error types for the parser

use std::fmt::{Display, Formatter};

use crate::coords::Coords;
use crate::symbols::Symbol;
use crate::ValueKind;

/// Global result type used throughout the parser stages
pub type ParserResult<T> = Result<T, Error>;

/// Enumeration of the various different stages that can produce an error
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Stage {
    /// The scanner (lexing) stage
    Scanner,
    /// The shift-reduce parsing stage
    Parser,
    /// Conversion of a parsed value into a native target
    Decoder,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Scanner => write!(f, "scanner"),
            Stage::Parser => write!(f, "parser"),
            Stage::Decoder => write!(f, "decoder"),
        }
    }
}

/// A global enumeration of error details
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    /// Input ended before a closing quote was found
    UnterminatedString,
    /// A character which cannot start any token
    UnrecognisedToken(char),
    /// A run starting with `t`, `f` or `n` which isn't the named keyword
    InvalidLiteral(&'static str),
    /// No production accepts the lookahead and the stack could not be reduced
    UnexpectedToken(Symbol),
    /// The stack did not collapse into a single top level value
    ParsingFailed,
    /// An assembled numeric literal which doesn't parse as an `f64`
    InvalidNumericRepresentation(String),
    /// A reduction function received a slice that contradicts its production
    MalformedReduction(Symbol),
    /// A grammar table which breaks a construction invariant
    MalformedGrammar(String),
    /// A file could not be opened for parsing
    InvalidFile,
    /// The tag of a value doesn't match the shape of the destination
    TypeMismatch { expected: String, found: ValueKind },
    /// An array whose elements don't all carry the same tag
    HeterogeneousArray,
}

impl Display for Details {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Details::UnterminatedString => write!(f, "string is not properly closed"),
            Details::UnrecognisedToken(c) => write!(f, "unrecognised token '{}'", c),
            Details::InvalidLiteral(expected) => {
                write!(f, "invalid literal, expected '{}'", expected)
            }
            Details::UnexpectedToken(symbol) => write!(f, "unexpected token: {}", symbol),
            Details::ParsingFailed => write!(f, "parsing failed"),
            Details::InvalidNumericRepresentation(literal) => {
                write!(f, "invalid numeric representation: '{}'", literal)
            }
            Details::MalformedReduction(symbol) => {
                write!(f, "malformed reduction whilst producing {}", symbol)
            }
            Details::MalformedGrammar(reason) => write!(f, "malformed grammar: {}", reason),
            Details::InvalidFile => write!(f, "invalid file"),
            Details::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Details::HeterogeneousArray => {
                write!(f, "array does not have elements of one type")
            }
        }
    }
}

/// The general error structure
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The originating stage for the error
    pub stage: Stage,
    /// The details of the error
    pub details: Details,
    /// Optional input coordinates
    pub coords: Option<Coords>,
    /// Optional JSON pointer locating a decode failure within a value tree
    pub pointer: Option<String>,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.stage, self.details)?;
        if let Some(coords) = &self.coords {
            write!(f, " at {}", coords)?;
        }
        if let Some(pointer) = &self.pointer {
            write!(f, " at pointer '{}'", pointer)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! scanner_error {
    ($details: expr, $coords: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Scanner,
            details: $details,
            coords: Some($coords),
            pointer: None,
        })
    };
}

#[macro_export]
macro_rules! parser_error {
    ($details: expr, $coords: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Parser,
            details: $details,
            coords: Some($coords),
            pointer: None,
        })
    };
    ($details: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Parser,
            details: $details,
            coords: None,
            pointer: None,
        })
    };
}

#[macro_export]
macro_rules! decoder_error {
    ($details: expr, $pointer: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Decoder,
            details: $details,
            coords: None,
            pointer: Some($pointer.to_string()),
        })
    };
}
