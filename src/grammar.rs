//! The grammar table. A [Grammar] is an ordered list of [Production]s, each pairing a right-hand
//! side sequence of [Symbol]s with the nonterminal it reduces to and a reduction function which
//! synthesizes a value from the matched stack slice.
//!
//! The table is the single source of truth for the shift-reduce [Engine](crate::engine::Engine),
//! which contains no rule-specific logic of its own.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::engine::StackElement;
use crate::errors::{Details, ParserResult};
use crate::parser_error;
use crate::symbols::Symbol;
use crate::JsonValue;

/// The value synthesized by a reduction
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesized {
    /// A complete JSON value
    Value(JsonValue),
    /// A fragment of a numeric literal (integer, fraction or exponent part)
    Literal(String),
    /// A single key/value pair
    Member(String, JsonValue),
    /// The pairs of an object under construction
    Members(BTreeMap<String, JsonValue>),
    /// The values of an array under construction
    Elements(Vec<JsonValue>),
}

/// A reduction function. Receives the matched stack slice, bottom to top
pub type ReduceFn = fn(Vec<StackElement>) -> ParserResult<Synthesized>;

/// Converts the single element left on a fully reduced stack into the parse result
pub type AcceptFn = fn(StackElement) -> Option<JsonValue>;

/// A single production of the grammar
#[derive(Debug, Copy, Clone)]
pub struct Production {
    /// The nonterminal produced
    pub lhs: Symbol,
    /// The sequence of symbols matched, never empty
    pub rhs: &'static [Symbol],
    /// Builds the synthesized value for the `lhs`
    pub reduce: ReduceFn,
}

impl Production {
    /// Checks whether the right-hand side of this production matches the top of a stack of symbols
    pub fn matches_top(&self, stack: &[Symbol]) -> bool {
        let k = self.rhs.len();
        k <= stack.len() && stack[stack.len() - k..] == *self.rhs
    }

    /// Checks whether some candidate sequence is a (possibly complete) prefix of the right-hand side
    pub fn has_prefix(&self, candidates: &[Symbol]) -> bool {
        candidates.len() <= self.rhs.len() && self.rhs[..candidates.len()] == *candidates
    }
}

/// Classification of a window of symbols against the prefixes of every production
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PrefixMatch {
    /// No production starts with the window
    NoMatch,
    /// The longest production starting with the window needs more symbols
    Partial,
    /// The longest production starting with the window is exactly the window
    Full,
}

/// Convenience macro for declaring productions
macro_rules! production {
    ($lhs:ident => [$($rhs:ident),+] ; $reduce:expr) => {
        Production {
            lhs: Symbol::$lhs,
            rhs: &[$(Symbol::$rhs),+],
            reduce: $reduce,
        }
    };
}

/// The JSON grammar. Table order is significant only for the order in which productions are
/// examined; [Grammar::validate] guarantees no two productions can tie on a longest match.
static PRODUCTIONS: &[Production] = &[
    production!(Value => [Object]; pass_value),
    production!(Value => [Array]; pass_value),
    production!(Value => [Number]; pass_value),
    production!(Value => [Boolean]; pass_value),
    production!(Value => [StringLiteral]; string_value),
    production!(Value => [NullLiteral]; null_value),
    production!(Boolean => [BooleanLiteral]; boolean),
    production!(Object => [ObjectStart, ObjectEnd]; empty_object),
    production!(Object => [ObjectStart, Members, ObjectEnd]; object),
    production!(Members => [Member]; first_member),
    production!(Members => [Members, Comma, Member]; next_member),
    production!(Member => [StringLiteral, Colon, Value]; member),
    production!(Array => [ArrayStart, ArrayEnd]; empty_array),
    production!(Array => [ArrayStart, Elements, ArrayEnd]; array),
    production!(Elements => [Element]; first_element),
    production!(Elements => [Elements, Comma, Element]; next_element),
    production!(Element => [Value]; pass_value),
    production!(Number => [Integer]; number),
    production!(Number => [Integer, Fraction]; number),
    production!(Number => [Integer, Exponent]; number),
    production!(Number => [Integer, Fraction, Exponent]; number),
    production!(Integer => [Digits]; integer),
    production!(Integer => [Sign, Digits]; integer),
    production!(Fraction => [FractionDot, Digits]; fraction),
    production!(Exponent => [ExponentMarker, Integer]; exponent),
];

/// The process-wide JSON grammar, validated on first use
pub static JSON_GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    let grammar = Grammar::new(PRODUCTIONS.to_vec(), accept_json);
    if let Err(err) = grammar.validate() {
        panic!("the JSON grammar table is malformed: {}", err);
    }
    grammar
});

/// An immutable table of productions
#[derive(Debug, Clone)]
pub struct Grammar {
    /// Productions in table order
    productions: Vec<Production>,
    /// Length of the longest right-hand side in the table
    longest_rhs: usize,
    /// Extracts the result from a fully reduced stack
    accept: AcceptFn,
}

impl Grammar {
    /// Create a new grammar from a list of productions and an acceptance function
    pub fn new(productions: Vec<Production>, accept: AcceptFn) -> Self {
        let longest_rhs = productions.iter().map(|p| p.rhs.len()).max().unwrap_or(0);
        Grammar {
            productions,
            longest_rhs,
            accept,
        }
    }

    /// Check the construction invariants of the table: every production reduces to a nonterminal,
    /// no right-hand side is empty and no two productions share a right-hand side (which is the
    /// only way two productions could tie during longest-match reduction).
    pub fn validate(&self) -> ParserResult<()> {
        for (index, production) in self.productions.iter().enumerate() {
            if production.lhs.is_terminal() {
                return parser_error!(Details::MalformedGrammar(format!(
                    "production {} reduces to terminal {}",
                    index, production.lhs
                )));
            }
            if production.rhs.is_empty() {
                return parser_error!(Details::MalformedGrammar(format!(
                    "production {} for {} has an empty right-hand side",
                    index, production.lhs
                )));
            }
            if let Some(other) = self.productions[..index]
                .iter()
                .find(|other| other.rhs == production.rhs)
            {
                return parser_error!(Details::MalformedGrammar(format!(
                    "productions for {} and {} share the right-hand side {:?}",
                    other.lhs, production.lhs, production.rhs
                )));
            }
        }
        Ok(())
    }

    /// The productions of this grammar, in table order
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Length of the longest right-hand side in the table
    pub fn longest_rhs(&self) -> usize {
        self.longest_rhs
    }

    /// Classify a window of symbols against the prefixes of every production. The longest
    /// production that starts with the window decides between a full and a partial match.
    pub fn prefix_match(&self, candidates: &[Symbol]) -> PrefixMatch {
        self.productions
            .iter()
            .filter(|p| p.has_prefix(candidates))
            .max_by_key(|p| p.rhs.len())
            .map(|p| {
                if p.rhs.len() == candidates.len() {
                    PrefixMatch::Full
                } else {
                    PrefixMatch::Partial
                }
            })
            .unwrap_or(PrefixMatch::NoMatch)
    }

    /// Find the production with the longest right-hand side matching the top of the stack.
    /// On equal lengths the first in table order wins.
    pub fn longest_reduction(&self, stack: &[Symbol]) -> Option<&Production> {
        let mut selected: Option<&Production> = None;
        for production in self.productions.iter().filter(|p| p.matches_top(stack)) {
            match selected {
                Some(current) if current.rhs.len() >= production.rhs.len() => (),
                _ => selected = Some(production),
            }
        }
        selected
    }

    /// Extract the final result from the single element left on a fully reduced stack
    pub fn accept(&self, element: StackElement) -> Option<JsonValue> {
        (self.accept)(element)
    }
}

/// A JSON parse is complete when the stack holds a single value, either bare or after it has
/// been folded into a one element sequence
fn accept_json(element: StackElement) -> Option<JsonValue> {
    match element {
        StackElement::Reduced {
            kind: Symbol::Value | Symbol::Element,
            value: Synthesized::Value(value),
        } => Some(value),
        StackElement::Reduced {
            kind: Symbol::Elements,
            value: Synthesized::Elements(mut values),
        } if values.len() == 1 => values.pop(),
        _ => None,
    }
}

/// Convert a matched slice into a fixed size array of elements
fn unpack<const N: usize>(
    elements: Vec<StackElement>,
    lhs: Symbol,
) -> ParserResult<[StackElement; N]> {
    match elements.try_into() {
        Ok(unpacked) => Ok(unpacked),
        Err(_) => parser_error!(Details::MalformedReduction(lhs)),
    }
}

fn take_value(element: StackElement, lhs: Symbol) -> ParserResult<JsonValue> {
    match element {
        StackElement::Reduced {
            value: Synthesized::Value(value),
            ..
        } => Ok(value),
        _ => parser_error!(Details::MalformedReduction(lhs)),
    }
}

/// The raw text behind an element: a token payload or a numeric fragment
fn take_literal(element: StackElement, lhs: Symbol) -> ParserResult<String> {
    match element {
        StackElement::Shifted(token, _) => match token.literal {
            Some(literal) => Ok(literal),
            None => parser_error!(Details::MalformedReduction(lhs)),
        },
        StackElement::Reduced {
            value: Synthesized::Literal(literal),
            ..
        } => Ok(literal),
        _ => parser_error!(Details::MalformedReduction(lhs)),
    }
}

fn pass_value(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let [inner] = unpack::<1>(elements, Symbol::Value)?;
    Ok(Synthesized::Value(take_value(inner, Symbol::Value)?))
}

fn string_value(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let [string] = unpack::<1>(elements, Symbol::Value)?;
    Ok(Synthesized::Value(JsonValue::String(take_literal(
        string,
        Symbol::Value,
    )?)))
}

fn null_value(_: Vec<StackElement>) -> ParserResult<Synthesized> {
    Ok(Synthesized::Value(JsonValue::Null))
}

fn boolean(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let [literal] = unpack::<1>(elements, Symbol::Boolean)?;
    match take_literal(literal, Symbol::Boolean)?.as_str() {
        "true" => Ok(Synthesized::Value(JsonValue::Boolean(true))),
        "false" => Ok(Synthesized::Value(JsonValue::Boolean(false))),
        _ => parser_error!(Details::MalformedReduction(Symbol::Boolean)),
    }
}

fn empty_object(_: Vec<StackElement>) -> ParserResult<Synthesized> {
    Ok(Synthesized::Value(JsonValue::Object(BTreeMap::new())))
}

fn object(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    match unpack::<3>(elements, Symbol::Object)? {
        [_, StackElement::Reduced {
            value: Synthesized::Members(members),
            ..
        }, _] => Ok(Synthesized::Value(JsonValue::Object(members))),
        _ => parser_error!(Details::MalformedReduction(Symbol::Object)),
    }
}

fn first_member(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    match unpack::<1>(elements, Symbol::Members)? {
        [StackElement::Reduced {
            value: Synthesized::Member(key, value),
            ..
        }] => Ok(Synthesized::Members(BTreeMap::from([(key, value)]))),
        _ => parser_error!(Details::MalformedReduction(Symbol::Members)),
    }
}

fn next_member(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    match unpack::<3>(elements, Symbol::Members)? {
        [StackElement::Reduced {
            value: Synthesized::Members(mut members),
            ..
        }, _, StackElement::Reduced {
            value: Synthesized::Member(key, value),
            ..
        }] => {
            members.insert(key, value);
            Ok(Synthesized::Members(members))
        }
        _ => parser_error!(Details::MalformedReduction(Symbol::Members)),
    }
}

fn member(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let [key, _, value] = unpack::<3>(elements, Symbol::Member)?;
    Ok(Synthesized::Member(
        take_literal(key, Symbol::Member)?,
        take_value(value, Symbol::Member)?,
    ))
}

fn empty_array(_: Vec<StackElement>) -> ParserResult<Synthesized> {
    Ok(Synthesized::Value(JsonValue::Array(vec![])))
}

fn array(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    match unpack::<3>(elements, Symbol::Array)? {
        [_, StackElement::Reduced {
            value: Synthesized::Elements(values),
            ..
        }, _] => Ok(Synthesized::Value(JsonValue::Array(values))),
        _ => parser_error!(Details::MalformedReduction(Symbol::Array)),
    }
}

fn first_element(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let [element] = unpack::<1>(elements, Symbol::Elements)?;
    Ok(Synthesized::Elements(vec![take_value(
        element,
        Symbol::Elements,
    )?]))
}

fn next_element(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    match unpack::<3>(elements, Symbol::Elements)? {
        [StackElement::Reduced {
            value: Synthesized::Elements(mut values),
            ..
        }, _, element] => {
            values.push(take_value(element, Symbol::Elements)?);
            Ok(Synthesized::Elements(values))
        }
        _ => parser_error!(Details::MalformedReduction(Symbol::Elements)),
    }
}

/// Concatenate the integer, fraction and exponent fragments and parse the result as an `f64`.
/// Literals beyond the range of an `f64` are rejected rather than becoming infinite.
fn number(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let mut literal = String::new();
    for element in elements {
        literal.push_str(&take_literal(element, Symbol::Number)?);
    }
    match fast_float::parse::<f64, _>(&literal) {
        Ok(n) if n.is_finite() => Ok(Synthesized::Value(JsonValue::Number(n))),
        _ => parser_error!(Details::InvalidNumericRepresentation(literal)),
    }
}

fn integer(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let mut literal = String::new();
    for element in elements {
        literal.push_str(&take_literal(element, Symbol::Integer)?);
    }
    Ok(Synthesized::Literal(literal))
}

fn fraction(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let [_, digits] = unpack::<2>(elements, Symbol::Fraction)?;
    Ok(Synthesized::Literal(format!(
        ".{}",
        take_literal(digits, Symbol::Fraction)?
    )))
}

fn exponent(elements: Vec<StackElement>) -> ParserResult<Synthesized> {
    let [_, integer] = unpack::<2>(elements, Symbol::Exponent)?;
    Ok(Synthesized::Literal(format!(
        "e{}",
        take_literal(integer, Symbol::Exponent)?
    )))
}

#[cfg(test)]
mod tests {
    use crate::coords::Span;
    use crate::engine::StackElement;
    use crate::errors::{Details, Stage};
    use crate::grammar::{
        number, Grammar, PrefixMatch, Production, Synthesized, JSON_GRAMMAR, PRODUCTIONS,
    };
    use crate::scanner::Token;
    use crate::symbols::Symbol;
    use crate::JsonValue;

    fn literal(text: &str) -> StackElement {
        StackElement::Reduced {
            kind: Symbol::Integer,
            value: Synthesized::Literal(text.to_string()),
        }
    }

    #[test]
    fn shipped_grammar_should_validate() {
        assert!(JSON_GRAMMAR.validate().is_ok());
        assert_eq!(JSON_GRAMMAR.longest_rhs(), 3);
        assert_eq!(JSON_GRAMMAR.productions().len(), PRODUCTIONS.len());
    }

    #[test]
    fn should_reject_duplicate_right_hand_sides() {
        let mut productions = PRODUCTIONS.to_vec();
        productions.push(production!(Element => [Object]; super::pass_value));
        let grammar = Grammar::new(productions, |_| None);
        let err = grammar.validate().unwrap_err();
        assert!(matches!(err.details, Details::MalformedGrammar(_)));
    }

    #[test]
    fn should_reject_empty_right_hand_sides() {
        let productions = vec![Production {
            lhs: Symbol::Value,
            rhs: &[],
            reduce: super::null_value,
        }];
        let grammar = Grammar::new(productions, |_| None);
        assert!(grammar.validate().is_err());
    }

    #[test]
    fn should_classify_prefixes_by_longest_production() {
        let grammar = &*JSON_GRAMMAR;
        assert_eq!(grammar.prefix_match(&[Symbol::Digits]), PrefixMatch::Full);
        assert_eq!(
            grammar.prefix_match(&[Symbol::StringLiteral]),
            PrefixMatch::Partial
        );
        assert_eq!(
            grammar.prefix_match(&[Symbol::ObjectStart, Symbol::ObjectEnd]),
            PrefixMatch::Full
        );
        assert_eq!(
            grammar.prefix_match(&[Symbol::Members, Symbol::Comma]),
            PrefixMatch::Partial
        );
        assert_eq!(
            grammar.prefix_match(&[Symbol::Comma]),
            PrefixMatch::NoMatch
        );
        assert_eq!(
            grammar.prefix_match(&[Symbol::Integer, Symbol::FractionDot]),
            PrefixMatch::NoMatch
        );
    }

    #[test]
    fn should_prefer_longest_reductions() {
        let grammar = &*JSON_GRAMMAR;
        let production = grammar
            .longest_reduction(&[Symbol::StringLiteral, Symbol::Colon, Symbol::Value])
            .unwrap();
        assert_eq!(production.lhs, Symbol::Member);

        let production = grammar
            .longest_reduction(&[Symbol::Integer, Symbol::FractionDot, Symbol::Digits])
            .unwrap();
        assert_eq!(production.lhs, Symbol::Fraction);

        let production = grammar
            .longest_reduction(&[Symbol::Elements, Symbol::Comma, Symbol::Element])
            .unwrap();
        assert_eq!(production.rhs.len(), 3);

        assert!(grammar
            .longest_reduction(&[Symbol::ObjectStart, Symbol::Colon])
            .is_none());
    }

    #[test]
    fn should_assemble_numbers_from_fragments() {
        let synthesized = number(vec![literal("-3"), literal(".14"), literal("e-3")]).unwrap();
        assert_eq!(synthesized, Synthesized::Value(JsonValue::Number(-0.00314)));
    }

    #[test]
    fn should_surface_invalid_numeric_literals() {
        let err = number(vec![literal("-"), literal(".")]).unwrap_err();
        assert_eq!(
            err.details,
            Details::InvalidNumericRepresentation("-.".to_string())
        );
    }

    #[test]
    fn should_reject_numbers_out_of_range() {
        let err = crate::parse("[1e999]").unwrap_err();
        assert_eq!(err.stage, Stage::Parser);
        assert_eq!(
            err.details,
            Details::InvalidNumericRepresentation("1e999".to_string())
        );
        let err = crate::parse("-1e400").unwrap_err();
        assert_eq!(
            err.details,
            Details::InvalidNumericRepresentation("-1e400".to_string())
        );
    }

    #[test]
    fn should_merge_members_with_last_write_winning() {
        let members = super::first_member(vec![StackElement::Reduced {
            kind: Symbol::Member,
            value: Synthesized::Member("a".to_string(), JsonValue::Number(1.0)),
        }])
        .unwrap();
        let merged = super::next_member(vec![
            StackElement::Reduced {
                kind: Symbol::Members,
                value: members,
            },
            StackElement::Shifted(Token::new(Symbol::Comma), Span::default()),
            StackElement::Reduced {
                kind: Symbol::Member,
                value: Synthesized::Member("a".to_string(), JsonValue::Number(2.0)),
            },
        ])
        .unwrap();
        match merged {
            Synthesized::Members(members) => {
                assert_eq!(members.len(), 1);
                assert_eq!(members["a"], JsonValue::Number(2.0));
            }
            other => panic!("unexpected reduction {:?}", other),
        }
    }

    #[test]
    fn should_report_malformed_slices() {
        let err = super::member(vec![literal("1")]).unwrap_err();
        assert_eq!(err.details, Details::MalformedReduction(Symbol::Member));
    }
}
