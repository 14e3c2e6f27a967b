mod encode;
mod error;
mod json;
mod number;
mod record;
mod schema;
mod ser;
mod value;

/// Encoder, options, and the default entry point.
pub use encode::{EncodeOptions, Encoder, FieldFaultPolicy, MapOrder, encode};
/// Error and result aliases.
pub use error::{FieldFault, PhpError, Result};
/// JSON input bridge.
pub use json::from_json;
/// Float rendering style.
pub use number::FloatNotation;
/// Record capability and field resolution types.
pub use record::{DynamicRecord, FieldHint, FieldResolver, Record, RecordField};
/// Registry-backed field resolver.
pub use schema::{RecordSchema, SchemaResolver};
/// `serde` bridge.
pub use ser::{ValueSerializer, to_string, to_value};
/// Value graph types.
pub use value::{Key, Value};
