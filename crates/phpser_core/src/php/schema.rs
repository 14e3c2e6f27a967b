use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::php::{DynamicRecord, FieldFault, FieldHint, FieldResolver, PhpError, Record, RecordField, Result, Value};

type Getter<T> = Box<dyn Fn(&T) -> std::result::Result<Value, FieldFault> + Send + Sync>;

fn infallible<T, V, F>(get: F) -> Getter<T>
where
	T: 'static,
	V: Into<Value> + 'static,
	F: Fn(&T) -> V + Send + Sync + 'static,
{
	Box::new(move |record: &T| -> std::result::Result<Value, FieldFault> { Ok(get(record).into()) })
}

struct FieldSpec<T> {
	name: Box<str>,
	hint: FieldHint,
	base_only: bool,
	get: Getter<T>,
}

/// Declared field layout for one record type.
///
/// Fields are reported in the order they are added.
pub struct RecordSchema<T> {
	fields: Vec<FieldSpec<T>>,
}

impl<T: Record> RecordSchema<T> {
	/// Schema with no fields.
	pub fn new() -> Self {
		Self { fields: Vec::new() }
	}

	/// Add an infallible field.
	pub fn field<V, F>(self, name: impl Into<Box<str>>, get: F) -> Self
	where
		V: Into<Value> + 'static,
		F: Fn(&T) -> V + Send + Sync + 'static,
	{
		self.push(name.into(), FieldHint::default(), false, infallible(get))
	}

	/// Add an infallible field with serialization hints.
	pub fn field_with<V, F>(self, name: impl Into<Box<str>>, hint: FieldHint, get: F) -> Self
	where
		V: Into<Value> + 'static,
		F: Fn(&T) -> V + Send + Sync + 'static,
	{
		self.push(name.into(), hint, false, infallible(get))
	}

	/// Add a field whose read may fail.
	pub fn try_field<F>(self, name: impl Into<Box<str>>, get: F) -> Self
	where
		F: Fn(&T) -> std::result::Result<Value, FieldFault> + Send + Sync + 'static,
	{
		self.push(name.into(), FieldHint::default(), false, Box::new(get))
	}

	/// Add a field inherited from the universal base. Never encoded.
	pub fn base_field<V, F>(self, name: impl Into<Box<str>>, get: F) -> Self
	where
		V: Into<Value> + 'static,
		F: Fn(&T) -> V + Send + Sync + 'static,
	{
		self.push(name.into(), FieldHint::default(), true, infallible(get))
	}

	fn push(mut self, name: Box<str>, hint: FieldHint, base_only: bool, get: Getter<T>) -> Self {
		self.fields.push(FieldSpec { name, hint, base_only, get });
		self
	}

	fn read_fields(&self, record: &T) -> Vec<RecordField> {
		self.fields
			.iter()
			.map(|declared| RecordField {
				name: declared.name.clone(),
				hint: declared.hint.clone(),
				base_only: declared.base_only,
				value: if declared.base_only || declared.hint.exclude {
					Ok(Value::Null)
				} else {
					(declared.get)(record)
				},
			})
			.collect()
	}
}

impl<T: Record> Default for RecordSchema<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for RecordSchema<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.fields.iter().map(|declared| &declared.name)).finish()
	}
}

trait ErasedSchema: Send + Sync {
	fn read(&self, record: &dyn Any) -> Option<Vec<RecordField>>;
}

impl<T: Record> ErasedSchema for RecordSchema<T> {
	fn read(&self, record: &dyn Any) -> Option<Vec<RecordField>> {
		record.downcast_ref::<T>().map(|item| self.read_fields(item))
	}
}

/// Field resolver backed by schemas registered per concrete type.
///
/// [`DynamicRecord`] values always resolve to their own field list.
#[derive(Default)]
pub struct SchemaResolver {
	schemas: HashMap<TypeId, Box<dyn ErasedSchema>>,
}

impl SchemaResolver {
	/// Resolver with no registered schemas.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register (or replace) the schema for `T`.
	pub fn register<T: Record>(&mut self, schema: RecordSchema<T>) -> &mut Self {
		self.schemas.insert(TypeId::of::<T>(), Box::new(schema));
		self
	}

	/// Builder form of [`SchemaResolver::register`].
	pub fn with<T: Record>(mut self, schema: RecordSchema<T>) -> Self {
		self.register(schema);
		self
	}

	/// Whether a schema for `T` is registered.
	pub fn contains<T: Record>(&self) -> bool {
		self.schemas.contains_key(&TypeId::of::<T>())
	}
}

impl fmt::Debug for SchemaResolver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SchemaResolver").field("schemas", &self.schemas.len()).finish()
	}
}

impl FieldResolver for SchemaResolver {
	fn resolve(&self, record: &dyn Record) -> Result<Vec<RecordField>> {
		let any = record.as_any();
		if let Some(dynamic) = any.downcast_ref::<DynamicRecord>() {
			return Ok(dynamic.fields.clone());
		}

		let fields = self.schemas.get(&(*any).type_id()).and_then(|schema| schema.read(any));
		fields.ok_or_else(|| {
			tracing::debug!(record = record.type_name(), "no schema registered");
			PhpError::UnresolvedRecord {
				type_name: record.type_name().to_owned(),
			}
		})
	}
}
