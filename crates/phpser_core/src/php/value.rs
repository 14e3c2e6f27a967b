use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::php::{PhpError, Record, Result};

/// In-memory value graph accepted by the encoder.
#[derive(Debug, Clone)]
pub enum Value {
	/// `N;`
	Null,
	/// `b:0;` or `b:1;`
	Bool(bool),
	/// Every integer width, widened to PHP's native 64-bit int.
	Int(i64),
	/// Single-precision float, rendered with `f32` round-trip digits.
	F32(f32),
	/// Double-precision float.
	F64(f64),
	/// UTF-8 text.
	String(Box<str>),
	/// Growable sequence; elements are keyed by their 0-based index.
	List(Vec<Value>),
	/// Keyed collection in the source's iteration order.
	Map(Vec<(Key, Value)>),
	/// Fixed-length block of values; encoded like `List`.
	Array(Box<[Value]>),
	/// Structured record whose fields come from a `FieldResolver`.
	Record(Arc<dyn Record>),
}

/// Map key. PHP array keys are either integers or strings.
///
/// Ordering puts every integer key before every string key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
	/// Integer key, written `i:N;`.
	Int(i64),
	/// Text key, written as a string token.
	String(Box<str>),
}

impl Value {
	/// Build a text value from raw bytes, rejecting anything that is not UTF-8.
	pub fn from_utf8(bytes: Vec<u8>) -> Result<Self> {
		String::from_utf8(bytes)
			.map(Value::from)
			.map_err(|err| PhpError::InvalidUtf8 {
				valid_up_to: err.utf8_error().valid_up_to(),
			})
	}

	/// Wrap a record instance.
	pub fn record<R: Record>(record: R) -> Self {
		Value::Record(Arc::new(record))
	}

	/// Build a keyed collection from pairs, keeping their order.
	pub fn map<K, V, I>(pairs: I) -> Self
	where
		K: Into<Key>,
		V: Into<Value>,
		I: IntoIterator<Item = (K, V)>,
	{
		Value::Map(pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}

	/// Short kind label used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "Null",
			Value::Bool(_) => "Bool",
			Value::Int(_) => "Int",
			Value::F32(_) => "F32",
			Value::F64(_) => "F64",
			Value::String(_) => "String",
			Value::List(_) => "List",
			Value::Map(_) => "Map",
			Value::Array(_) => "Array",
			Value::Record(_) => "Record",
		}
	}
}

macro_rules! lossless_int {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Value::Int(i64::from(value))
				}
			}

			impl From<$ty> for Key {
				fn from(value: $ty) -> Self {
					Key::Int(i64::from(value))
				}
			}
		)*
	};
}

lossless_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! checked_int {
	($($ty:ty),*) => {
		$(
			impl TryFrom<$ty> for Value {
				type Error = PhpError;

				fn try_from(value: $ty) -> Result<Self> {
					i64::try_from(value)
						.map(Value::Int)
						.map_err(|_| PhpError::IntegerOutOfRange { value: value.to_string() })
				}
			}

			impl TryFrom<$ty> for Key {
				type Error = PhpError;

				fn try_from(value: $ty) -> Result<Self> {
					i64::try_from(value)
						.map(Key::Int)
						.map_err(|_| PhpError::IntegerOutOfRange { value: value.to_string() })
				}
			}
		)*
	};
}

checked_int!(u64, usize, isize, i128, u128);

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::F32(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::F64(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.into())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value.into_boxed_str())
	}
}

impl From<Box<str>> for Value {
	fn from(value: Box<str>) -> Self {
		Value::String(value)
	}
}

impl From<char> for Value {
	fn from(value: char) -> Self {
		Value::String(value.to_string().into_boxed_str())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(value: Vec<T>) -> Self {
		Value::List(value.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
	fn from(value: [T; N]) -> Self {
		Value::Array(value.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
	fn from(value: &[T]) -> Self {
		Value::Array(value.iter().cloned().map(Into::into).collect())
	}
}

impl<K: Into<Key>, V: Into<Value>, S> From<HashMap<K, V, S>> for Value {
	fn from(value: HashMap<K, V, S>) -> Self {
		Value::map(value)
	}
}

impl<K: Into<Key>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
	fn from(value: BTreeMap<K, V>) -> Self {
		Value::map(value)
	}
}

impl From<&str> for Key {
	fn from(value: &str) -> Self {
		Key::String(value.into())
	}
}

impl From<String> for Key {
	fn from(value: String) -> Self {
		Key::String(value.into_boxed_str())
	}
}

impl From<Box<str>> for Key {
	fn from(value: Box<str>) -> Self {
		Key::String(value)
	}
}

impl From<Key> for Value {
	fn from(value: Key) -> Self {
		match value {
			Key::Int(item) => Value::Int(item),
			Key::String(item) => Value::String(item),
		}
	}
}
