//! The shift-reduce engine.
//!
//! The engine drives a single stack of [StackElement]s. For each lookahead token it asks the
//! [Grammar] whether the last couple of stack symbols followed by the lookahead could still be
//! the start of some production (the prefix test), and shifts the token if so. Independently, it
//! looks for the longest production matching the top of the stack and reduces it. A lookahead
//! which doesn't fit any production is held back while the stack is reduced underneath it; if the
//! stack can't be reduced either, the token is unexpected.
//!
//! At most one reduction is performed per step, so chains of single symbol reductions
//! (`integer` to `number` to `value`...) play out over successive steps. This keeps an `integer`
//! on the stack for as long as a following `.` or `e` may still extend it.
use log::{debug, trace};

use crate::coords::Span;
use crate::errors::{Details, ParserResult};
use crate::grammar::{Grammar, PrefixMatch, Synthesized, JSON_GRAMMAR};
use crate::parser_error;
use crate::scanner::{PackedToken, Token};
use crate::symbols::Symbol;
use crate::JsonValue;

/// Number of stack symbols placed in front of the lookahead during the prefix test
const PREFIX_CONTEXT: usize = 2;

/// An element of the parse stack
#[derive(Debug, Clone, PartialEq)]
pub enum StackElement {
    /// A token which has been shifted but not yet reduced
    Shifted(Token, Span),
    /// The result of a reduction, tagged with the nonterminal produced
    Reduced { kind: Symbol, value: Synthesized },
}

impl StackElement {
    /// The symbol kind this element presents to the grammar
    pub fn symbol(&self) -> Symbol {
        match self {
            StackElement::Shifted(token, _) => token.kind,
            StackElement::Reduced { kind, .. } => *kind,
        }
    }
}

/// Parse a sequence of tokens using the process-wide JSON grammar
pub fn parse_tokens(tokens: Vec<PackedToken>) -> ParserResult<JsonValue> {
    Engine::new(&JSON_GRAMMAR).parse(tokens)
}

/// A shift-reduce automaton over a given [Grammar]. Each engine is good for a single parse.
pub struct Engine<'g> {
    /// The grammar table consulted for every decision
    grammar: &'g Grammar,
    /// The parse stack, bottom to top
    stack: Vec<StackElement>,
}

impl<'g> Engine<'g> {
    /// Create a new engine with an empty stack
    pub fn new(grammar: &'g Grammar) -> Self {
        Engine {
            grammar,
            stack: vec![],
        }
    }

    /// Run the engine over a complete sequence of tokens, producing exactly one value or an error
    pub fn parse(mut self, tokens: Vec<PackedToken>) -> ParserResult<JsonValue> {
        debug!("parsing {} tokens", tokens.len());
        let mut tokens = tokens.into_iter().peekable();
        let mut reduced = true;

        while let Some((token, span)) = tokens.peek() {
            let (lookahead, start) = (token.kind, span.start);
            let matched = self.prefix_test(lookahead);
            match matched {
                PrefixMatch::NoMatch if !reduced => {
                    debug!(
                        "unexpected {} at {}, stack is {:?}",
                        lookahead,
                        start,
                        self.symbols()
                    );
                    return parser_error!(Details::UnexpectedToken(lookahead), start);
                }
                PrefixMatch::NoMatch => (),
                PrefixMatch::Partial | PrefixMatch::Full => {
                    if let Some(packed) = tokens.next() {
                        self.shift(packed);
                    }
                    if matched == PrefixMatch::Partial {
                        continue;
                    }
                }
            }
            reduced = self.reduce()?;
        }

        while self.reduce()? {}
        self.accept()
    }

    /// The symbol kinds of the current stack, bottom to top
    fn symbols(&self) -> Vec<Symbol> {
        self.stack.iter().map(StackElement::symbol).collect()
    }

    /// The symbol kinds of at most the top `count` stack elements
    fn top_symbols(&self, count: usize) -> Vec<Symbol> {
        let count = count.min(self.stack.len());
        self.stack[self.stack.len() - count..]
            .iter()
            .map(StackElement::symbol)
            .collect()
    }

    /// Form the window of the last stack symbols followed by the lookahead and test each suffix,
    /// longest first, against the prefixes of the grammar. The first suffix with any match
    /// decides.
    fn prefix_test(&self, lookahead: Symbol) -> PrefixMatch {
        let mut window = self.top_symbols(PREFIX_CONTEXT);
        window.push(lookahead);
        (0..window.len())
            .map(|start| self.grammar.prefix_match(&window[start..]))
            .find(|matched| *matched != PrefixMatch::NoMatch)
            .unwrap_or(PrefixMatch::NoMatch)
    }

    fn shift(&mut self, (token, span): PackedToken) {
        trace!("shift {} (depth {})", token.kind, self.stack.len());
        self.stack.push(StackElement::Shifted(token, span));
    }

    /// Reduce the top of the stack using the longest matching production. Returns whether a
    /// reduction took place.
    fn reduce(&mut self) -> ParserResult<bool> {
        let top = self.top_symbols(self.grammar.longest_rhs());
        let production = match self.grammar.longest_reduction(&top) {
            Some(production) => *production,
            None => return Ok(false),
        };
        let slice = self.stack.split_off(self.stack.len() - production.rhs.len());
        let value = (production.reduce)(slice)?;
        trace!(
            "reduce {:?} to {} (depth {})",
            production.rhs,
            production.lhs,
            self.stack.len()
        );
        self.stack.push(StackElement::Reduced {
            kind: production.lhs,
            value,
        });
        Ok(true)
    }

    /// Check the final stack holds exactly one acceptable element
    fn accept(mut self) -> ParserResult<JsonValue> {
        if self.stack.len() != 1 {
            debug!("stack failed to collapse: {:?}", self.symbols());
            return parser_error!(Details::ParsingFailed);
        }
        match self.stack.pop().and_then(|element| self.grammar.accept(element)) {
            Some(value) => Ok(value),
            None => parser_error!(Details::ParsingFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use test_log::test;

    use crate::engine::parse_tokens;
    use crate::errors::{Details, Stage};
    use crate::scanner::scan;
    use crate::symbols::Symbol;
    use crate::JsonValue;

    fn parse(text: &str) -> crate::errors::ParserResult<JsonValue> {
        parse_tokens(scan(text)?)
    }

    #[test]
    fn should_parse_empty_containers() {
        assert_eq!(parse("{}").unwrap(), JsonValue::Object(BTreeMap::new()));
        assert_eq!(parse("[]").unwrap(), JsonValue::Array(vec![]));
    }

    #[test]
    fn should_parse_scalars_at_the_top_level() {
        assert_eq!(parse("true").unwrap(), JsonValue::Boolean(true));
        assert_eq!(parse("null").unwrap(), JsonValue::Null);
        assert_eq!(
            parse("\"renault\"").unwrap(),
            JsonValue::String("renault".to_string())
        );
        assert_eq!(parse("12345").unwrap(), JsonValue::Number(12345.0));
    }

    #[test]
    fn should_parse_number_forms() {
        let cases = [
            ("0", 0.0),
            ("2500", 2500.0),
            ("-123", -123.0),
            ("3.14159", 3.14159),
            ("-0.005", -0.005),
            ("-0.000123", -0.000123),
            ("1.23456789012345", 1.23456789012345),
            ("1234567890123456", 1234567890123456.0),
            ("3.14e-3", 0.00314),
            ("3e+4", 30000.0),
            ("2E2", 200.0),
            ("-1.5e1", -15.0),
        ];
        for (text, expected) in cases {
            assert_eq!(parse(text).unwrap(), JsonValue::Number(expected), "{}", text);
        }
    }

    #[test]
    fn should_parse_nested_structures() {
        let value = parse(
            r#"{
    "value": [
        1239,
        123.45
    ],
    "name": "renault",
    "token": true,
    "hello": null
}"#,
        )
        .unwrap();
        let mut expected = BTreeMap::new();
        expected.insert(
            "value".to_string(),
            JsonValue::Array(vec![JsonValue::Number(1239.0), JsonValue::Number(123.45)]),
        );
        expected.insert("name".to_string(), JsonValue::String("renault".to_string()));
        expected.insert("token".to_string(), JsonValue::Boolean(true));
        expected.insert("hello".to_string(), JsonValue::Null);
        assert_eq!(value, JsonValue::Object(expected));
    }

    #[test]
    fn should_parse_deeply_nested_containers() {
        let value = parse(r#"[[1, [2.5, {}]], {"a": {"b": [true, false, null]}}, []]"#).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(
            array[0],
            JsonValue::Array(vec![
                JsonValue::Number(1.0),
                JsonValue::Array(vec![
                    JsonValue::Number(2.5),
                    JsonValue::Object(BTreeMap::new())
                ])
            ])
        );
        let inner = array[1].get("a").and_then(|a| a.get("b")).unwrap();
        assert_eq!(
            inner,
            &JsonValue::Array(vec![
                JsonValue::Boolean(true),
                JsonValue::Boolean(false),
                JsonValue::Null
            ])
        );
        assert_eq!(array[2], JsonValue::Array(vec![]));
    }

    #[test]
    fn later_duplicate_keys_should_win() {
        let value = parse(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        assert_eq!(value.get("a"), Some(&JsonValue::Number(3.0)));
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn should_fail_on_missing_closing_brackets() {
        let err = parse(
            r#"{
    "value": [
        1239,
        12345,
    "name": "renault",
    "token": true,
    "hello": null
}"#,
        )
        .unwrap_err();
        assert_eq!(err.stage, Stage::Parser);

        let err = parse("[1, 2").unwrap_err();
        assert_eq!(err.details, Details::ParsingFailed);
        let err = parse(r#"{"a": 1"#).unwrap_err();
        assert_eq!(err.details, Details::ParsingFailed);
    }

    #[test]
    fn should_fail_on_empty_input() {
        assert_eq!(parse("").unwrap_err().details, Details::ParsingFailed);
    }

    #[test]
    fn should_fail_on_multiple_top_level_values() {
        assert_eq!(parse("1, 2").unwrap_err().details, Details::ParsingFailed);
    }

    #[test]
    fn should_report_unexpected_tokens_with_position() {
        let err = parse("[1 : 2]").unwrap_err();
        assert_eq!(err.details, Details::UnexpectedToken(Symbol::Colon));
        assert_eq!(err.coords.unwrap().absolute, 3);
    }

    #[test]
    fn should_reject_misspelled_literals() {
        let err = parse(r#"{"hello": nill}"#).unwrap_err();
        assert_eq!(err.stage, Stage::Scanner);
    }
}
