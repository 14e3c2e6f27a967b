use std::io;
use std::path::PathBuf;

use phpser::php::PhpError;
use thiserror::Error;

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;

/// Failures surfaced by `phpser` subcommands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Encoding failed.
	#[error(transparent)]
	Php(#[from] PhpError),
	/// Reading input or writing output failed.
	#[error("{action} {target}: {source}")]
	Io {
		action: &'static str,
		target: String,
		#[source]
		source: io::Error,
	},
	/// Input was not valid JSON.
	#[error("invalid JSON input: {0}")]
	Json(#[source] serde_json::Error),
	/// Options file could not be parsed.
	#[error("invalid config {}: {source}", path.display())]
	Config {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
}

impl CliError {
	pub(crate) fn io(action: &'static str, target: impl Into<String>, source: io::Error) -> Self {
		Self::Io {
			action,
			target: target.into(),
			source,
		}
	}
}
