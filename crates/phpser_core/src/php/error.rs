use std::fmt;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PhpError>;

/// Errors produced while building values and encoding them to PHP serialize text.
#[derive(Debug, Error)]
pub enum PhpError {
	/// No resolver could describe the fields of a record.
	#[error("unresolved record type {type_name}")]
	UnresolvedRecord {
		/// Type name reported by the record.
		type_name: String,
	},
	/// Integer source does not fit PHP's signed 64-bit integer.
	#[error("integer {value} out of range for i64")]
	IntegerOutOfRange {
		/// Offending value rendered as decimal text.
		value: String,
	},
	/// Map key was neither an integer nor text.
	#[error("unsupported map key kind: {kind}")]
	UnsupportedKey {
		/// Logical kind of the rejected key.
		kind: &'static str,
	},
	/// Byte input is not valid UTF-8 and cannot become a text value.
	#[error("text is not valid UTF-8 (valid up to byte {valid_up_to})")]
	InvalidUtf8 {
		/// Length of the longest valid UTF-8 prefix.
		valid_up_to: usize,
	},
	/// Field read failed while the encoder was configured to fail on faults.
	#[error("reading field {field} of {type_name} failed: {fault}")]
	FieldRead {
		/// Record type name.
		type_name: String,
		/// Natural name of the field.
		field: String,
		/// Fault reported by the resolver.
		fault: FieldFault,
	},
	/// Value nesting exceeded the configured limit.
	#[error("encode depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Writing into the output buffer failed.
	#[error("format: {0}")]
	Fmt(#[from] fmt::Error),
	/// Error raised through `serde::ser::Error::custom`.
	#[error("{0}")]
	Custom(String),
}

impl serde::ser::Error for PhpError {
	fn custom<T: fmt::Display>(msg: T) -> Self {
		PhpError::Custom(msg.to_string())
	}
}

/// Failure reported by a field resolver when a field value cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldFault {
	message: Box<str>,
}

impl FieldFault {
	/// Build a fault carrying a human-readable reason.
	pub fn new(message: impl Into<Box<str>>) -> Self {
		Self { message: message.into() }
	}

	/// Reason text.
	pub fn message(&self) -> &str {
		&self.message
	}
}
