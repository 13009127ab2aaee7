//! A representation of a JSON Pointer with associated operations, as per RFC 6901. The decoder
//! maintains one of these as it walks a value tree, so that failures can be reported against the
//! node which caused them.
use std::fmt::Display;

/// Each pointer is a series of segments delineated by a separator char
const PATH_SEPARATOR: &str = "/";
/// As per the RFC, we need to encode any tilde characters as ~0
const ENCODED_TILDE: &str = "~0";
/// As per the RFC, we need to encode any slash characters as ~1
const ENCODED_SLASH: &str = "~1";

/// Each pointer is made of one of three different component types
#[derive(Debug, Clone, PartialEq)]
pub enum JsonPointerComponent {
    /// Root element of a pointer
    Root,
    /// A named element within a pointer
    Name(String),
    /// An indexed element within a pointer
    Index(usize),
}

impl Display for JsonPointerComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, ""),
            Self::Name(s) => write!(
                f,
                "{}",
                &s.replace('~', ENCODED_TILDE).replace('/', ENCODED_SLASH)
            ),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A structure representing a complete pointer, comprising multiple [JsonPointerComponent]s
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JsonPointer {
    /// The components that go together to make up the pointer
    components: Vec<JsonPointerComponent>,
}

impl JsonPointer {
    /// Returns the number of [JsonPointerComponent]s within the pointer
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Checks whether the pointer is the empty pointer
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Push a new [JsonPointerComponent::Name] onto the end of the pointer
    pub fn push_name(&mut self, name: String) {
        if self.is_empty() {
            self.components.push(JsonPointerComponent::Root)
        }
        self.components.push(JsonPointerComponent::Name(name))
    }

    /// Push a new [JsonPointerComponent::Index] onto the end of the pointer
    pub fn push_index(&mut self, index: usize) {
        if self.is_empty() {
            self.components.push(JsonPointerComponent::Root)
        }
        self.components.push(JsonPointerComponent::Index(index))
    }

    /// Pop the last component off the back of the pointer. Popping the last named or indexed
    /// component also drops the root.
    pub fn pop(&mut self) -> Option<JsonPointerComponent> {
        let popped = self.components.pop();
        if self.components == [JsonPointerComponent::Root] {
            self.components.clear();
        }
        popped
    }

    /// Serialise the pointer into a string representation that's compliant with RFC 6901
    pub fn as_str(&self) -> String {
        self.components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(PATH_SEPARATOR)
    }
}

impl Display for JsonPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
