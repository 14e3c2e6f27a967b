use std::any::Any;
use std::fmt;

use crate::php::{FieldFault, FieldFaultPolicy, PhpError, Result, Value};

/// Structured value whose fields are enumerated by a [`FieldResolver`].
///
/// Implementors only expose identity; field layout lives in the resolver so
/// the same type can be flattened differently by different encoders.
pub trait Record: Any + fmt::Debug + Send + Sync {
	/// Type label used in diagnostics and resolver lookups.
	fn type_name(&self) -> &str;

	/// Upcast for resolvers that downcast to the concrete type.
	fn as_any(&self) -> &dyn Any;
}

/// Capability that enumerates a record's readable fields.
pub trait FieldResolver {
	/// Return the record's fields in natural declaration order.
	fn resolve(&self, record: &dyn Record) -> Result<Vec<RecordField>>;
}

impl<R: FieldResolver + ?Sized> FieldResolver for &R {
	fn resolve(&self, record: &dyn Record) -> Result<Vec<RecordField>> {
		(**self).resolve(record)
	}
}

/// Per-field serialization hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldHint {
	/// Output name overriding the natural field name. Empty names are ignored.
	pub rename: Option<Box<str>>,
	/// Leave the field out of the encoded record.
	pub exclude: bool,
}

impl FieldHint {
	/// Hint that renames the field.
	pub fn rename(name: impl Into<Box<str>>) -> Self {
		Self {
			rename: Some(name.into()),
			exclude: false,
		}
	}

	/// Hint that excludes the field.
	pub fn exclude() -> Self {
		Self { rename: None, exclude: true }
	}
}

/// One field reported by a resolver.
#[derive(Debug, Clone)]
pub struct RecordField {
	/// Natural field name.
	pub name: Box<str>,
	/// Rename/exclude hints.
	pub hint: FieldHint,
	/// Field is defined only on the universal base shared by every record.
	pub base_only: bool,
	/// Current value, or the fault raised while reading it.
	pub value: std::result::Result<Value, FieldFault>,
}

impl RecordField {
	/// Plain field with no hints.
	pub fn new(name: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
		Self {
			name: name.into(),
			hint: FieldHint::default(),
			base_only: false,
			value: Ok(value.into()),
		}
	}

	/// Field whose read failed.
	pub fn faulted(name: impl Into<Box<str>>, fault: FieldFault) -> Self {
		Self {
			name: name.into(),
			hint: FieldHint::default(),
			base_only: false,
			value: Err(fault),
		}
	}

	/// Attach hints.
	pub fn with_hint(mut self, hint: FieldHint) -> Self {
		self.hint = hint;
		self
	}

	/// Mark as a base-level field.
	pub fn base_only(mut self) -> Self {
		self.base_only = true;
		self
	}

	/// Name written to the output.
	pub fn output_name(&self) -> &str {
		match self.hint.rename.as_deref() {
			Some(name) if !name.is_empty() => name,
			_ => &self.name,
		}
	}

	fn is_included(&self) -> bool {
		!self.base_only && !self.hint.exclude
	}
}

/// Record that carries its own field list.
///
/// Resolves without registration in [`SchemaResolver`](crate::php::SchemaResolver).
#[derive(Debug, Clone)]
pub struct DynamicRecord {
	/// Type label.
	pub type_name: Box<str>,
	/// Fields in declaration order.
	pub fields: Vec<RecordField>,
}

impl DynamicRecord {
	/// Empty record of the given type.
	pub fn new(type_name: impl Into<Box<str>>) -> Self {
		Self {
			type_name: type_name.into(),
			fields: Vec::new(),
		}
	}

	/// Append a plain field.
	pub fn field(mut self, name: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
		self.fields.push(RecordField::new(name, value));
		self
	}

	/// Append a prebuilt field.
	pub fn push(&mut self, field: RecordField) {
		self.fields.push(field);
	}
}

impl Record for DynamicRecord {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Resolve a record and reduce it to the (name, value) pairs that get encoded.
pub(crate) fn flatten_record<R: FieldResolver + ?Sized>(resolver: &R, record: &dyn Record, policy: FieldFaultPolicy) -> Result<Vec<(Box<str>, Value)>> {
	let fields = resolver.resolve(record)?;
	let mut out = Vec::with_capacity(fields.len());

	for field in fields {
		if !field.is_included() {
			tracing::trace!(record = record.type_name(), field = %field.name, "skipping field");
			continue;
		}

		let name: Box<str> = field.output_name().into();
		let value = match field.value {
			Ok(value) => value,
			Err(fault) => match policy {
				FieldFaultPolicy::SubstituteNull => {
					tracing::warn!(record = record.type_name(), field = %field.name, %fault, "field read failed, encoding null");
					Value::Null
				}
				FieldFaultPolicy::Fail => {
					return Err(PhpError::FieldRead {
						type_name: record.type_name().to_owned(),
						field: field.name.into_string(),
						fault,
					});
				}
			},
		};
		out.push((name, value));
	}

	Ok(out)
}
