use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::php::number::{PhpFloat, write_float};
use crate::php::record::flatten_record;
use crate::php::{FieldResolver, FloatNotation, Key, PhpError, Result, SchemaResolver, Value, to_value};

/// Order in which keyed-collection pairs are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapOrder {
	/// Whatever order the source collection produced.
	#[default]
	Native,
	/// Integer keys ascending, then string keys in byte order.
	SortedKeys,
}

/// What to do when a record field cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFaultPolicy {
	/// Encode the field as `N;` and log a warning.
	#[default]
	SubstituteNull,
	/// Abort the whole encode call.
	Fail,
}

/// Runtime limits and behavior switches for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeOptions {
	/// Maximum nesting of arrays and records.
	pub max_depth: u32,
	/// Pair order for keyed collections.
	pub map_order: MapOrder,
	/// Handling of field read faults.
	pub field_faults: FieldFaultPolicy,
	/// Float rendering style.
	pub float_notation: FloatNotation,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 128,
			map_order: MapOrder::Native,
			field_faults: FieldFaultPolicy::SubstituteNull,
			float_notation: FloatNotation::Shortest,
		}
	}
}

impl EncodeOptions {
	/// Preset for reproducible output: sorted keys, field faults are errors.
	pub fn strict() -> Self {
		Self {
			map_order: MapOrder::SortedKeys,
			field_faults: FieldFaultPolicy::Fail,
			..Self::default()
		}
	}
}

/// Recursive PHP serialize encoder.
///
/// Holds only immutable configuration and a field resolver, so one instance
/// can serve any number of concurrent calls.
#[derive(Debug, Default)]
pub struct Encoder<R = SchemaResolver> {
	resolver: R,
	options: EncodeOptions,
}

impl Encoder<SchemaResolver> {
	/// Encoder with default options and an empty [`SchemaResolver`].
	pub fn new() -> Self {
		Self::default()
	}
}

impl<R: FieldResolver> Encoder<R> {
	/// Encoder using `resolver` for records.
	pub fn with_resolver(resolver: R) -> Self {
		Self {
			resolver,
			options: EncodeOptions::default(),
		}
	}

	/// Replace the options.
	pub fn with_options(mut self, options: EncodeOptions) -> Self {
		self.options = options;
		self
	}

	/// Active options.
	pub fn options(&self) -> &EncodeOptions {
		&self.options
	}

	/// Field resolver used for records.
	pub fn resolver(&self) -> &R {
		&self.resolver
	}

	/// Encode one value into a fresh string.
	pub fn encode(&self, value: &Value) -> Result<String> {
		let mut out = String::new();
		self.write_value(&mut out, value, 0)?;
		Ok(out)
	}

	/// Append the encoding of `value` to `out`.
	///
	/// On error `out` is restored to its previous length.
	pub fn encode_into(&self, value: &Value, out: &mut String) -> Result<()> {
		let start = out.len();
		let result = self.write_value(out, value, 0);
		if result.is_err() {
			out.truncate(start);
		}
		result
	}

	/// Convert a `Serialize` type with [`to_value`] and encode it.
	pub fn encode_serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
		self.encode(&to_value(value)?)
	}

	fn write_value(&self, out: &mut String, value: &Value, depth: u32) -> Result<()> {
		match value {
			Value::Null => out.push_str("N;"),
			Value::Bool(item) => out.push_str(if *item { "b:1;" } else { "b:0;" }),
			Value::Int(item) => write!(out, "i:{item};")?,
			Value::F32(item) => self.write_float_token(out, *item)?,
			Value::F64(item) => self.write_float_token(out, *item)?,
			Value::String(item) => write_str(out, item)?,
			Value::List(items) => self.write_indexed(out, items, depth)?,
			Value::Array(items) => self.write_indexed(out, items, depth)?,
			Value::Map(pairs) => self.write_map(out, pairs, depth)?,
			Value::Record(record) => {
				self.enter(depth)?;
				let fields = flatten_record(&self.resolver, record.as_ref(), self.options.field_faults)?;
				write!(out, "a:{}:{{", fields.len())?;
				for (name, item) in &fields {
					write_str(out, name)?;
					self.write_value(out, item, depth + 1)?;
				}
				out.push('}');
			}
		}
		Ok(())
	}

	fn write_float_token<F: PhpFloat>(&self, out: &mut String, value: F) -> Result<()> {
		out.push_str("d:");
		write_float(out, value, self.options.float_notation)?;
		out.push(';');
		Ok(())
	}

	fn write_indexed(&self, out: &mut String, items: &[Value], depth: u32) -> Result<()> {
		self.enter(depth)?;
		write!(out, "a:{}:{{", items.len())?;
		for (index, item) in items.iter().enumerate() {
			write!(out, "i:{index};")?;
			self.write_value(out, item, depth + 1)?;
		}
		out.push('}');
		Ok(())
	}

	fn write_map(&self, out: &mut String, pairs: &[(Key, Value)], depth: u32) -> Result<()> {
		self.enter(depth)?;
		let mut ordered: Vec<&(Key, Value)> = pairs.iter().collect();
		if self.options.map_order == MapOrder::SortedKeys {
			ordered.sort_by(|left, right| left.0.cmp(&right.0));
		}

		write!(out, "a:{}:{{", ordered.len())?;
		for (key, item) in ordered {
			match key {
				Key::Int(index) => write!(out, "i:{index};")?,
				Key::String(name) => write_str(out, name)?,
			}
			self.write_value(out, item, depth + 1)?;
		}
		out.push('}');
		Ok(())
	}

	fn enter(&self, depth: u32) -> Result<()> {
		if depth >= self.options.max_depth {
			return Err(PhpError::DepthExceeded {
				max_depth: self.options.max_depth,
			});
		}
		Ok(())
	}
}

/// Encode `value` with default options and the default resolver.
pub fn encode(value: &Value) -> Result<String> {
	Encoder::new().encode(value)
}

/// Text token framed by UTF-8 byte length, not character count.
fn write_str(out: &mut String, text: &str) -> Result<()> {
	write!(out, "s:{}:\"", text.len())?;
	out.push_str(text);
	out.push_str("\";");
	Ok(())
}

#[cfg(test)]
mod tests;
