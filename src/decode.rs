//! Projection of parsed [JsonValue] trees onto native Rust types.
//!
//! Every decodable destination describes itself through a [Shape], which the decoder checks
//! against the tag of the value before handing the value to the destination's
//! [Decodable::assign]. Struct-like destinations are declared through the [decodable!](crate::decodable)
//! macro, which generates both the shape (one [Field] per struct field) and the field-by-field
//! assignment.
//!
//! ```
//! use chisel_json_sr::{decodable, decode, parse};
//!
//! decodable! {
//!     #[derive(Debug, Default)]
//!     pub struct Car {
//!         pub name: String,
//!         pub value: Vec<f64>,
//!     }
//! }
//!
//! let value = parse(r#"{"name" : "renault", "value" : [1239, 123.45]}"#).unwrap();
//! let mut car = Car::default();
//! decode(&value, &mut car).unwrap();
//! assert_eq!(car.name, "renault");
//! assert_eq!(car.value, vec![1239.0, 123.45]);
//! ```
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};

use log::{debug, trace};

use crate::decoder_error;
use crate::errors::{Details, ParserResult};
use crate::pointer::JsonPointer;
use crate::{JsonValue, ValueKind};

/// A named field within a [Shape::Fields] descriptor. Decoding dispatches on the field name and
/// checks each member against the field type's own [Decodable::shape], so the descriptor is only
/// read when describing a destination, e.g. in a [Details::TypeMismatch] message.
#[derive(Debug, Clone)]
pub struct Field {
    /// The name of the field, matched exactly against object keys
    pub name: &'static str,
    /// The shape of the field's own type
    pub shape: fn() -> Shape,
}

/// Describes the shape of a decode destination. Nested shapes are held as constructor functions,
/// so a descriptor is only ever expanded as far as a decode actually reaches.
#[derive(Debug, Clone)]
pub enum Shape {
    Boolean,
    String,
    /// A numeric destination, along with the name of its native representation
    Number(&'static str),
    /// A homogeneous sequence of elements of the given shape
    Sequence(fn() -> Shape),
    /// A fixed set of named fields
    Fields(Vec<Field>),
    /// Dynamic string keys mapping to values of the given shape
    Map(fn() -> Shape),
    /// Either null or a value of the given shape
    Optional(fn() -> Shape),
    /// Any value at all
    Any,
}

impl Shape {
    /// Checks whether a value carrying a given tag may be decoded into this shape
    pub fn admits(&self, kind: ValueKind) -> bool {
        match self {
            Shape::Boolean => kind == ValueKind::Boolean,
            Shape::String => kind == ValueKind::String,
            Shape::Number(_) => kind == ValueKind::Number,
            Shape::Sequence(_) => kind == ValueKind::Array,
            Shape::Fields(_) | Shape::Map(_) => kind == ValueKind::Object,
            Shape::Optional(inner) => kind == ValueKind::Null || inner().admits(kind),
            Shape::Any => true,
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Boolean => write!(f, "boolean"),
            Shape::String => write!(f, "string"),
            Shape::Number(native) => write!(f, "number ({})", native),
            Shape::Sequence(inner) => write!(f, "array of {}", inner()),
            Shape::Fields(fields) => {
                let names: Vec<&str> = fields.iter().map(|field| field.name).collect();
                write!(f, "object {{{}}}", names.join(", "))
            }
            Shape::Map(inner) => write!(f, "object of {}", inner()),
            Shape::Optional(inner) => write!(f, "{} or null", inner()),
            Shape::Any => write!(f, "any value"),
        }
    }
}

/// A destination which a [JsonValue] may be decoded into
pub trait Decodable {
    /// The shape of this destination
    fn shape() -> Shape;

    /// Overwrite this destination with a value whose tag has already been checked against
    /// [Decodable::shape]. The pointer locates the value within the tree being decoded.
    fn assign(&mut self, value: &JsonValue, pointer: &mut JsonPointer) -> ParserResult<()>;
}

/// Decode a value into a caller-owned destination. On failure the destination may have been
/// partially written.
pub fn decode<T: Decodable>(value: &JsonValue, target: &mut T) -> ParserResult<()> {
    debug!("decoding {} into {}", value.kind(), T::shape());
    let mut pointer = JsonPointer::default();
    decode_at(value, target, &mut pointer)
}

/// Decode a value which sits at a given location within a larger tree
pub fn decode_at<T: Decodable>(
    value: &JsonValue,
    target: &mut T,
    pointer: &mut JsonPointer,
) -> ParserResult<()> {
    if !T::shape().admits(value.kind()) {
        return type_mismatch::<T>(value, pointer);
    }
    target.assign(value, pointer)
}

/// Build the error for a value whose tag doesn't fit the shape of `T`
pub fn type_mismatch<T: Decodable>(value: &JsonValue, pointer: &JsonPointer) -> ParserResult<()> {
    decoder_error!(
        Details::TypeMismatch {
            expected: T::shape().to_string(),
            found: value.kind(),
        },
        pointer
    )
}

/// Called for object keys which have no matching field in a [decodable!](crate::decodable) struct
#[doc(hidden)]
pub fn skip_key(key: &str) {
    trace!("skipping unknown key '{}'", key);
}

impl Decodable for bool {
    fn shape() -> Shape {
        Shape::Boolean
    }

    fn assign(&mut self, value: &JsonValue, pointer: &mut JsonPointer) -> ParserResult<()> {
        match value {
            JsonValue::Boolean(b) => {
                *self = *b;
                Ok(())
            }
            _ => type_mismatch::<Self>(value, pointer),
        }
    }
}

impl Decodable for String {
    fn shape() -> Shape {
        Shape::String
    }

    fn assign(&mut self, value: &JsonValue, pointer: &mut JsonPointer) -> ParserResult<()> {
        match value {
            JsonValue::String(s) => {
                self.clone_from(s);
                Ok(())
            }
            _ => type_mismatch::<Self>(value, pointer),
        }
    }
}

/// Numbers are narrowed from `f64` with a plain `as` cast: out of range values saturate and
/// fractional parts are truncated towards zero
macro_rules! decodable_number {
    ($($native:ty),+) => {
        $(
            impl Decodable for $native {
                fn shape() -> Shape {
                    Shape::Number(stringify!($native))
                }

                fn assign(&mut self, value: &JsonValue, pointer: &mut JsonPointer) -> ParserResult<()> {
                    match value {
                        JsonValue::Number(n) => {
                            *self = *n as $native;
                            Ok(())
                        }
                        _ => type_mismatch::<Self>(value, pointer),
                    }
                }
            }
        )+
    };
}

decodable_number!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl<T: Decodable + Default> Decodable for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(T::shape)
    }

    fn assign(&mut self, value: &JsonValue, pointer: &mut JsonPointer) -> ParserResult<()> {
        let values = match value {
            JsonValue::Array(values) => values,
            _ => return type_mismatch::<Self>(value, pointer),
        };
        if let Some(first) = values.first() {
            if values.iter().any(|v| v.kind() != first.kind()) {
                return decoder_error!(Details::HeterogeneousArray, pointer);
            }
        }
        let mut decoded = Vec::with_capacity(values.len());
        for (index, element) in values.iter().enumerate() {
            pointer.push_index(index);
            let mut slot = T::default();
            decode_at(element, &mut slot, pointer)?;
            pointer.pop();
            decoded.push(slot);
        }
        *self = decoded;
        Ok(())
    }
}

impl<T: Decodable + Default> Decodable for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(T::shape)
    }

    fn assign(&mut self, value: &JsonValue, pointer: &mut JsonPointer) -> ParserResult<()> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        decode_at(value, &mut inner, pointer)?;
        *self = Some(inner);
        Ok(())
    }
}

macro_rules! decodable_map {
    ($($map:ident),+) => {
        $(
            impl<T: Decodable + Default> Decodable for $map<String, T> {
                fn shape() -> Shape {
                    Shape::Map(T::shape)
                }

                fn assign(&mut self, value: &JsonValue, pointer: &mut JsonPointer) -> ParserResult<()> {
                    let members = match value {
                        JsonValue::Object(members) => members,
                        _ => return type_mismatch::<Self>(value, pointer),
                    };
                    self.clear();
                    for (key, member) in members {
                        pointer.push_name(key.clone());
                        let mut slot = T::default();
                        decode_at(member, &mut slot, pointer)?;
                        pointer.pop();
                        self.insert(key.clone(), slot);
                    }
                    Ok(())
                }
            }
        )+
    };
}

decodable_map!(BTreeMap, HashMap);

impl Decodable for JsonValue {
    fn shape() -> Shape {
        Shape::Any
    }

    fn assign(&mut self, value: &JsonValue, _: &mut JsonPointer) -> ParserResult<()> {
        self.clone_from(value);
        Ok(())
    }
}

/// Declare a struct along with an implementation of [Decodable] for it. Each field is matched
/// against the object key with the same name, and must itself be [Decodable]. Keys without a
/// matching field are skipped, and fields without a matching key keep their current value.
#[macro_export]
macro_rules! decodable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($(#[$field_meta])* $field_vis $field: $ty),*
        }

        impl $crate::decode::Decodable for $name {
            fn shape() -> $crate::decode::Shape {
                $crate::decode::Shape::Fields(vec![
                    $($crate::decode::Field {
                        name: stringify!($field),
                        shape: <$ty as $crate::decode::Decodable>::shape,
                    }),*
                ])
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                value: &$crate::JsonValue,
                pointer: &mut $crate::pointer::JsonPointer,
            ) -> $crate::errors::ParserResult<()> {
                let members = match value.as_object() {
                    Some(members) => members,
                    None => return $crate::decode::type_mismatch::<Self>(value, pointer),
                };
                for (key, member) in members {
                    match key.as_str() {
                        $(stringify!($field) => {
                            pointer.push_name(key.clone());
                            $crate::decode::decode_at(member, &mut self.$field, pointer)?;
                            pointer.pop();
                        })*
                        _ => $crate::decode::skip_key(key),
                    }
                }
                Ok(())
            }
        }
    };
}
