use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use phpser::php::{EncodeOptions, Encoder, FieldFaultPolicy, FloatNotation, MapOrder, from_json};

use crate::error::{CliError, Result};

/// Arguments for `phpser encode`.
#[derive(Debug, Default, Args)]
pub struct EncodeArgs {
	/// JSON input file; stdin when omitted.
	pub file: Option<PathBuf>,
	/// Write the encoded text here instead of stdout.
	#[arg(short, long)]
	pub output: Option<PathBuf>,
	/// Emit map entries in sorted key order.
	#[arg(long)]
	pub sort_keys: bool,
	/// Maximum nesting depth of composite values.
	#[arg(long)]
	pub max_depth: Option<u32>,
	/// Render floats the way PHP does, with `1.0E+25` style exponents.
	#[arg(long)]
	pub php_floats: bool,
	/// Sorted keys and fatal field faults.
	#[arg(long)]
	pub strict: bool,
	/// JSON file holding base encode options; flags override it.
	#[arg(long)]
	pub config: Option<PathBuf>,
}

/// Read JSON, encode it, and write the serialized text.
pub fn run(args: EncodeArgs) -> Result<()> {
	let options = build_options(&args)?;
	let input = read_input(args.file.as_deref())?;
	let json: serde_json::Value = serde_json::from_slice(&input).map_err(CliError::Json)?;

	let text = Encoder::new().with_options(options).encode(&from_json(&json))?;
	tracing::info!(bytes = text.len(), "encoded document");

	write_output(args.output.as_deref(), text.as_bytes())
}

/// Resolve the effective options: config file first, then flags.
pub(crate) fn build_options(args: &EncodeArgs) -> Result<EncodeOptions> {
	let mut options = match &args.config {
		Some(path) => load_config(path)?,
		None => EncodeOptions::default(),
	};

	if args.strict {
		options.map_order = MapOrder::SortedKeys;
		options.field_faults = FieldFaultPolicy::Fail;
	}
	if args.sort_keys {
		options.map_order = MapOrder::SortedKeys;
	}
	if let Some(max_depth) = args.max_depth {
		options.max_depth = max_depth;
	}
	if args.php_floats {
		options.float_notation = FloatNotation::Php;
	}

	tracing::debug!(?options, "resolved encode options");
	Ok(options)
}

fn load_config(path: &Path) -> Result<EncodeOptions> {
	let text = fs::read_to_string(path).map_err(|err| CliError::io("read", path.display().to_string(), err))?;
	serde_json::from_str(&text).map_err(|source| CliError::Config {
		path: path.to_path_buf(),
		source,
	})
}

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
	match file {
		Some(path) => {
			tracing::debug!(path = %path.display(), "reading input file");
			fs::read(path).map_err(|err| CliError::io("read", path.display().to_string(), err))
		}
		None => {
			let mut buf = Vec::new();
			io::stdin().lock().read_to_end(&mut buf).map_err(|err| CliError::io("read", "stdin", err))?;
			Ok(buf)
		}
	}
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
	match output {
		Some(path) => fs::write(path, bytes).map_err(|err| CliError::io("write", path.display().to_string(), err)),
		None => {
			let mut stdout = io::stdout().lock();
			stdout.write_all(bytes).map_err(|err| CliError::io("write", "stdout", err))?;
			stdout.flush().map_err(|err| CliError::io("write", "stdout", err))
		}
	}
}
