//! The symbol kinds shared by the scanner, the grammar table and the shift-reduce engine.
//!
//! Terminals are produced directly by the scanner, nonterminals only ever appear on the parse
//! stack as the result of a reduction. Symbols are compared strictly by equality.
use std::fmt::{Display, Formatter};

/// Enumeration of every terminal and nonterminal symbol kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `.` within a number
    FractionDot,
    /// `e` or `E` within a number
    ExponentMarker,
    /// `+` or `-`
    Sign,
    /// A run of ASCII digits
    Digits,
    /// A quoted string body
    StringLiteral,
    /// `true` or `false`
    BooleanLiteral,
    /// `null`
    NullLiteral,

    Value,
    Object,
    Members,
    Member,
    Array,
    Elements,
    Element,
    Number,
    Integer,
    Fraction,
    Exponent,
    Boolean,
}

impl Symbol {
    /// Checks whether this symbol is a terminal, i.e. a token kind the scanner may produce
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Symbol::ObjectStart
                | Symbol::ObjectEnd
                | Symbol::ArrayStart
                | Symbol::ArrayEnd
                | Symbol::Comma
                | Symbol::Colon
                | Symbol::FractionDot
                | Symbol::ExponentMarker
                | Symbol::Sign
                | Symbol::Digits
                | Symbol::StringLiteral
                | Symbol::BooleanLiteral
                | Symbol::NullLiteral
        )
    }

    /// Checks whether this symbol is a grammar category produced by reduction
    pub fn is_nonterminal(&self) -> bool {
        !self.is_terminal()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::ObjectStart => write!(f, "'{{'"),
            Symbol::ObjectEnd => write!(f, "'}}'"),
            Symbol::ArrayStart => write!(f, "'['"),
            Symbol::ArrayEnd => write!(f, "']'"),
            Symbol::Comma => write!(f, "','"),
            Symbol::Colon => write!(f, "':'"),
            Symbol::FractionDot => write!(f, "'.'"),
            Symbol::ExponentMarker => write!(f, "exponent marker"),
            Symbol::Sign => write!(f, "sign"),
            Symbol::Digits => write!(f, "digits"),
            Symbol::StringLiteral => write!(f, "string"),
            Symbol::BooleanLiteral => write!(f, "boolean literal"),
            Symbol::NullLiteral => write!(f, "null"),
            nonterminal => write!(f, "<{:?}>", nonterminal),
        }
    }
}
