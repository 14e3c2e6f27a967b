//! Bridge from `serde::Serialize` types to [`Value`].
//!
//! Structs become [`DynamicRecord`]s so they flow through record flattening
//! like any other record: declaration order is kept, `#[serde(rename)]`
//! supplies the natural name, and fields dropped by `skip_serializing_if`
//! are reported with the exclude hint.

use serde::Serialize;
use serde::ser::{self, Error as _};

use crate::php::{DynamicRecord, Encoder, FieldHint, Key, PhpError, RecordField, Result, Value};

/// Convert any `Serialize` value into a [`Value`] tree.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
	value.serialize(ValueSerializer)
}

/// Serialize any `Serialize` value straight to PHP serialize text.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
	Encoder::new().encode_serialize(value)
}

/// `serde` serializer producing [`Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
	type Ok = Value;
	type Error = PhpError;
	type SerializeSeq = SerializeList;
	type SerializeTuple = SerializeList;
	type SerializeTupleStruct = SerializeList;
	type SerializeTupleVariant = SerializeTupleVariant;
	type SerializeMap = SerializeMap;
	type SerializeStruct = SerializeRecord;
	type SerializeStructVariant = SerializeStructVariant;

	fn serialize_bool(self, v: bool) -> Result<Value> {
		Ok(Value::Bool(v))
	}

	fn serialize_i8(self, v: i8) -> Result<Value> {
		Ok(Value::from(v))
	}

	fn serialize_i16(self, v: i16) -> Result<Value> {
		Ok(Value::from(v))
	}

	fn serialize_i32(self, v: i32) -> Result<Value> {
		Ok(Value::from(v))
	}

	fn serialize_i64(self, v: i64) -> Result<Value> {
		Ok(Value::Int(v))
	}

	fn serialize_i128(self, v: i128) -> Result<Value> {
		Value::try_from(v)
	}

	fn serialize_u8(self, v: u8) -> Result<Value> {
		Ok(Value::from(v))
	}

	fn serialize_u16(self, v: u16) -> Result<Value> {
		Ok(Value::from(v))
	}

	fn serialize_u32(self, v: u32) -> Result<Value> {
		Ok(Value::from(v))
	}

	fn serialize_u64(self, v: u64) -> Result<Value> {
		Value::try_from(v)
	}

	fn serialize_u128(self, v: u128) -> Result<Value> {
		Value::try_from(v)
	}

	fn serialize_f32(self, v: f32) -> Result<Value> {
		Ok(Value::F32(v))
	}

	fn serialize_f64(self, v: f64) -> Result<Value> {
		Ok(Value::F64(v))
	}

	fn serialize_char(self, v: char) -> Result<Value> {
		Ok(Value::from(v))
	}

	fn serialize_str(self, v: &str) -> Result<Value> {
		Ok(Value::from(v))
	}

	fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
		Value::from_utf8(v.to_vec())
	}

	fn serialize_none(self) -> Result<Value> {
		Ok(Value::Null)
	}

	fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<Value> {
		Ok(Value::Null)
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
		Ok(Value::Null)
	}

	fn serialize_unit_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str) -> Result<Value> {
		Ok(Value::from(variant))
	}

	fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _name: &'static str, value: &T) -> Result<Value> {
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: Serialize + ?Sized>(self, _name: &'static str, _variant_index: u32, variant: &'static str, value: &T) -> Result<Value> {
		Ok(tagged(variant, to_value(value)?))
	}

	fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList> {
		Ok(SerializeList {
			items: Vec::with_capacity(len.unwrap_or(0)),
		})
	}

	fn serialize_tuple(self, len: usize) -> Result<SerializeList> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeList> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str, len: usize) -> Result<SerializeTupleVariant> {
		Ok(SerializeTupleVariant {
			variant,
			items: Vec::with_capacity(len),
		})
	}

	fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
		Ok(SerializeMap {
			pairs: Vec::with_capacity(len.unwrap_or(0)),
			pending_key: None,
		})
	}

	fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeRecord> {
		Ok(SerializeRecord {
			record: record_with_capacity(name, len),
		})
	}

	fn serialize_struct_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str, len: usize) -> Result<SerializeStructVariant> {
		Ok(SerializeStructVariant {
			variant,
			record: record_with_capacity(variant, len),
		})
	}
}

/// Sequence and tuple state.
#[derive(Debug)]
pub struct SerializeList {
	items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeList {
	type Ok = Value;
	type Error = PhpError;

	fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
		self.items.push(to_value(value)?);
		Ok(())
	}

	fn end(self) -> Result<Value> {
		Ok(Value::List(self.items))
	}
}

impl ser::SerializeTuple for SerializeList {
	type Ok = Value;
	type Error = PhpError;

	fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
		ser::SerializeSeq::serialize_element(self, value)
	}

	fn end(self) -> Result<Value> {
		ser::SerializeSeq::end(self)
	}
}

impl ser::SerializeTupleStruct for SerializeList {
	type Ok = Value;
	type Error = PhpError;

	fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
		ser::SerializeSeq::serialize_element(self, value)
	}

	fn end(self) -> Result<Value> {
		ser::SerializeSeq::end(self)
	}
}

/// Tuple variant state, emitted as `{variant: [..]}`.
#[derive(Debug)]
pub struct SerializeTupleVariant {
	variant: &'static str,
	items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
	type Ok = Value;
	type Error = PhpError;

	fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
		self.items.push(to_value(value)?);
		Ok(())
	}

	fn end(self) -> Result<Value> {
		Ok(tagged(self.variant, Value::List(self.items)))
	}
}

/// Map state. Keys must serialize to integers or strings.
#[derive(Debug)]
pub struct SerializeMap {
	pairs: Vec<(Key, Value)>,
	pending_key: Option<Key>,
}

impl ser::SerializeMap for SerializeMap {
	type Ok = Value;
	type Error = PhpError;

	fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
		self.pending_key = Some(to_key(to_value(key)?)?);
		Ok(())
	}

	fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
		let key = self
			.pending_key
			.take()
			.ok_or_else(|| PhpError::custom("map value serialized before its key"))?;
		self.pairs.push((key, to_value(value)?));
		Ok(())
	}

	fn end(self) -> Result<Value> {
		Ok(Value::Map(self.pairs))
	}
}

/// Struct state, collected into a [`DynamicRecord`].
#[derive(Debug)]
pub struct SerializeRecord {
	record: DynamicRecord,
}

impl ser::SerializeStruct for SerializeRecord {
	type Ok = Value;
	type Error = PhpError;

	fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
		self.record.push(RecordField::new(key, to_value(value)?));
		Ok(())
	}

	fn skip_field(&mut self, key: &'static str) -> Result<()> {
		self.record.push(RecordField::new(key, Value::Null).with_hint(FieldHint::exclude()));
		Ok(())
	}

	fn end(self) -> Result<Value> {
		Ok(Value::record(self.record))
	}
}

/// Struct variant state, emitted as `{variant: record}`.
#[derive(Debug)]
pub struct SerializeStructVariant {
	variant: &'static str,
	record: DynamicRecord,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
	type Ok = Value;
	type Error = PhpError;

	fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
		self.record.push(RecordField::new(key, to_value(value)?));
		Ok(())
	}

	fn skip_field(&mut self, key: &'static str) -> Result<()> {
		self.record.push(RecordField::new(key, Value::Null).with_hint(FieldHint::exclude()));
		Ok(())
	}

	fn end(self) -> Result<Value> {
		Ok(tagged(self.variant, Value::record(self.record)))
	}
}

fn tagged(variant: &'static str, payload: Value) -> Value {
	Value::Map(vec![(Key::from(variant), payload)])
}

fn record_with_capacity(type_name: &'static str, len: usize) -> DynamicRecord {
	let mut record = DynamicRecord::new(type_name);
	record.fields.reserve(len);
	record
}

fn to_key(value: Value) -> Result<Key> {
	match value {
		Value::Int(item) => Ok(Key::Int(item)),
		Value::String(item) => Ok(Key::String(item)),
		other => Err(PhpError::UnsupportedKey { kind: other.kind() }),
	}
}
