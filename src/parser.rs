//! The parser front end. Selects a `char` source for the configured [Encoding], scans it into
//! tokens and then hands the tokens to a shift-reduce [Engine] over the shipped JSON grammar.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::encodings::{DecoderSelector, Encoding};
use crate::engine::Engine;
use crate::errors::{Details, ParserResult};
use crate::grammar::JSON_GRAMMAR;
use crate::parser_error;
use crate::scanner::Scanner;
use crate::JsonValue;

/// Main JSON parser struct
#[derive(Debug, Default)]
pub struct Parser {
    decoders: DecoderSelector,
    encoding: Encoding,
}

impl Parser {
    /// Create a new instance of the parser using a specific [Encoding]
    pub fn with_encoding(encoding: Encoding) -> Self {
        Self {
            decoders: Default::default(),
            encoding,
        }
    }

    /// Parse the contents of a file, decoded using the configured [Encoding]
    pub fn parse_file<PathLike: AsRef<Path>>(&self, path: PathLike) -> ParserResult<JsonValue> {
        match File::open(&path) {
            Ok(f) => {
                let mut reader = BufReader::new(f);
                let mut chars = self.decoders.new_decoder(&mut reader, self.encoding);
                self.parse(&mut chars)
            }
            Err(err) => {
                debug!("failed to open {:?}: {}", path.as_ref(), err);
                parser_error!(Details::InvalidFile)
            }
        }
    }

    /// Parse a slice of bytes, decoded using the configured [Encoding]
    pub fn parse_bytes(&self, bytes: &[u8]) -> ParserResult<JsonValue> {
        let mut reader = BufReader::new(bytes);
        let mut chars = self.decoders.new_decoder(&mut reader, self.encoding);
        self.parse(&mut chars)
    }

    /// Parse a string slice. No decoding is required here, the chars are taken directly
    pub fn parse_str(&self, str: &str) -> ParserResult<JsonValue> {
        let mut chars = str.chars();
        self.parse(&mut chars)
    }

    /// Parse an arbitrary stream of chars
    pub fn parse(&self, chars: &mut dyn Iterator<Item = char>) -> ParserResult<JsonValue> {
        let tokens = Scanner::new(chars).scan()?;
        let value = Engine::new(&JSON_GRAMMAR).parse(tokens)?;
        debug!("parsed a top level {}", value.kind());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    #![allow(unused_macros)]

    use std::fs;
    use std::path::PathBuf;
    use std::time::Instant;

    use bytesize::ByteSize;

    use crate::encodings::Encoding;
    use crate::errors::{Details, Stage};
    use crate::parser::Parser;
    use crate::relative_file;
    use crate::{JsonValue, ValueKind};

    #[test]
    fn should_parse_char_iterators_directly() {
        let source = r#"{
            "test" : 1232.0,
            "some other" : "thasdasd",
            "a bool" : true,
            "an array" : [1,2,3,4,5.8,6,7.2,7,8,10]
        }"#;
        let parser = Parser::default();
        let parsed = parser.parse(&mut source.chars()).unwrap();
        assert_eq!(parsed.get("test"), Some(&JsonValue::Number(1232.0)));
        assert_eq!(
            parsed.get("an array").and_then(|a| a.as_array()).map(|a| a.len()),
            Some(10)
        );
    }

    #[test]
    fn should_parse_bytes_in_either_encoding() {
        let source = r#"[1, "two", {"three" : 3}]"#;
        let utf8 = Parser::default().parse_bytes(source.as_bytes()).unwrap();
        let ascii = Parser::with_encoding(Encoding::Ascii)
            .parse_bytes(source.as_bytes())
            .unwrap();
        assert_eq!(utf8, ascii);
        assert_eq!(utf8.kind(), ValueKind::Array);
    }

    #[test]
    fn should_parse_multibyte_strings() {
        let parsed = Parser::default()
            .parse_bytes("{\"städte\" : [\"münchen\", \"köln\"]}".as_bytes())
            .unwrap();
        let cities = parsed.get("städte").and_then(|v| v.as_array()).unwrap();
        assert_eq!(cities[1].as_str(), Some("köln"));
    }

    #[test]
    fn should_parse_simple_structure() {
        let path = relative_file!("fixtures/json/valid/simple_structure.json");
        let parsed = Parser::default().parse_file(path).unwrap();
        assert_eq!(parsed.get("name").and_then(|v| v.as_str()), Some("renault"));
    }

    #[test]
    fn should_fail_on_missing_files() {
        let path = relative_file!("fixtures/json/valid/does_not_exist.json");
        let err = Parser::default().parse_file(path).unwrap_err();
        assert_eq!(err.details, Details::InvalidFile);
        assert_eq!(err.stage, Stage::Parser);
    }

    #[test]
    fn should_parse_basic_test_files() {
        for f in fs::read_dir(relative_file!("fixtures/json/valid")).unwrap() {
            let path = f.unwrap().path();
            if path.is_file() {
                let len = fs::metadata(&path).unwrap().len();
                let start = Instant::now();
                let parsed = Parser::default().parse_file(&path);
                if parsed.is_err() {
                    println!("Parse of {:?} failed with {:?}", &path, &parsed);
                }
                assert!(parsed.is_ok());
                println!(
                    "Parsed {} in {:?} [{:?}]",
                    ByteSize(len),
                    start.elapsed(),
                    path,
                );
            }
        }
    }

    #[test]
    fn should_successfully_bail() {
        for f in fs::read_dir(relative_file!("fixtures/json/invalid")).unwrap() {
            let path = f.unwrap().path();
            if path.is_file() {
                let parsed = Parser::default().parse_file(&path);
                println!("Parse result for {:?} = {:?}", &path, parsed);
                assert!(parsed.is_err());
            }
        }
    }
}
