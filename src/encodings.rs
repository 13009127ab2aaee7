//! The scanner operates over a stream of `char`s produced by some flavour of iterator. When parsing
//! bytes or files, this iterator is based on a decoder that takes a stream of bytes from an
//! underlying source and converts it into a stream of `char`s.
//!
//! The [DecoderSelector] implemented within this module is used to instantiate new `char`
//! iterators, based on different encodings. (Currently only ASCII and UTF-8 are supported).
use chisel_decoders::{ascii::AsciiDecoder, utf8::Utf8Decoder};
use std::io::BufRead;

/// Enumeration of different supported encoding types
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
}

/// A factory for new instances of [char] iterators over buffered byte input, based on a
/// specified encoding type
#[derive(Debug, Default)]
pub(crate) struct DecoderSelector {}

impl DecoderSelector {
    /// Create a `char` iterator over the supplied buffer using a given [Encoding]
    pub fn new_decoder<'a, Buffer: BufRead>(
        &'a self,
        buffer: &'a mut Buffer,
        encoding: Encoding,
    ) -> Box<dyn Iterator<Item = char> + 'a> {
        match encoding {
            Encoding::Ascii => Box::new(AsciiDecoder::new(buffer)),
            Encoding::Utf8 => Box::new(Utf8Decoder::new(buffer)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::encodings::{DecoderSelector, Encoding};
    use crate::reader_from_bytes;
    use std::io::BufReader;

    #[test]
    fn should_default_to_utf8() {
        assert_eq!(Encoding::default(), Encoding::Utf8);
    }

    #[test]
    fn should_decode_multibyte_utf8_input() {
        let mut reader = reader_from_bytes!("[\"ünïcödé\"]");
        let selector = DecoderSelector::default();
        let chars: String = selector
            .new_decoder(&mut reader, Encoding::Utf8)
            .collect();
        assert_eq!(chars, "[\"ünïcödé\"]");
    }

    #[test]
    fn should_decode_ascii_input() {
        let mut reader = reader_from_bytes!("{\"a\" : 1}");
        let selector = DecoderSelector::default();
        let chars: Vec<char> = selector
            .new_decoder(&mut reader, Encoding::Ascii)
            .collect();
        assert_eq!(chars.len(), 9);
        assert_eq!(chars[0], '{');
    }
}
