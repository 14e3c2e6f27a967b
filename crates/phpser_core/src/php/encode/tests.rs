use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use crate::php::{
	DynamicRecord, EncodeOptions, Encoder, FieldFault, FieldFaultPolicy, FieldHint, FloatNotation, Key, MapOrder, PhpError, Record, RecordField, RecordSchema,
	SchemaResolver, Value, encode,
};

fn enc(value: impl Into<Value>) -> String {
	encode(&value.into()).expect("encode succeeds")
}

/// Read the `s:N:"..."` token at the start of `text` and return its payload slice.
fn slice_text_token(text: &str) -> &str {
	let rest = text.strip_prefix("s:").expect("text token");
	let colon = rest.find(':').expect("length terminator");
	let len: usize = rest[..colon].parse().expect("decimal length");
	let body = &rest[colon + 2..];
	&body[..len]
}

#[test]
fn scalar_tokens() {
	assert_eq!(encode(&Value::Null).expect("encode succeeds"), "N;");
	assert_eq!(enc(true), "b:1;");
	assert_eq!(enc(false), "b:0;");
	assert_eq!(enc(28), "i:28;");
	assert_eq!(enc(-5_i64), "i:-5;");
	assert_eq!(enc("Yotama"), "s:6:\"Yotama\";");
	assert_eq!(enc(0.01_f64), "d:0.01;");
	assert_eq!(enc(0.1_f32), "d:0.1;");
	assert_eq!(enc(11.9_f64), "d:11.9;");
}

#[test]
fn integer_extremes_per_width() {
	assert_eq!(enc(i8::MAX), "i:127;");
	assert_eq!(enc(i8::MIN), "i:-128;");
	assert_eq!(enc(i16::MAX), "i:32767;");
	assert_eq!(enc(i16::MIN), "i:-32768;");
	assert_eq!(enc(i32::MAX), "i:2147483647;");
	assert_eq!(enc(i32::MIN), "i:-2147483648;");
	assert_eq!(enc(i64::MAX), "i:9223372036854775807;");
	assert_eq!(enc(i64::MIN), "i:-9223372036854775808;");
}

#[test]
fn text_length_counts_utf8_bytes() {
	let text = "与太組";
	assert_eq!(text.chars().count(), 3);
	assert_eq!(enc(text), "s:9:\"与太組\";");
	assert_eq!(enc(""), "s:0:\"\";");
	assert_eq!(enc("naïve"), "s:6:\"naïve\";");
}

#[test]
fn length_prefix_slices_back_to_original_bytes() {
	for text in ["Yotama", "与太組", "emoji 🎉 mix", "quote \" inside", ""] {
		let encoded = enc(text);
		assert_eq!(slice_text_token(&encoded), text);
	}
}

#[test]
fn sequences_are_index_keyed() {
	assert_eq!(enc(vec![10, 20]), "a:2:{i:0;i:10;i:1;i:20;}");
	assert_eq!(enc(vec!["Kagoshima", "Tokyo"]), "a:2:{i:0;s:9:\"Kagoshima\";i:1;s:5:\"Tokyo\";}");
	assert_eq!(enc(Vec::<i32>::new()), "a:0:{}");
}

#[test]
fn fixed_arrays_match_sequences() {
	assert_eq!(enc([10, 20]), "a:2:{i:0;i:10;i:1;i:20;}");
	assert_eq!(enc([11_i64, 22]), "a:2:{i:0;i:11;i:1;i:22;}");
	assert_eq!(enc([0_u8, 127]), "a:2:{i:0;i:0;i:1;i:127;}");
	assert_eq!(enc([0.01_f64, 2.1]), "a:2:{i:0;d:0.01;i:1;d:2.1;}");
	assert_eq!(enc([0.02_f32, 2.2]), "a:2:{i:0;d:0.02;i:1;d:2.2;}");
	assert_eq!(enc([Value::Bool(true), Value::from("Groovy")]), "a:2:{i:0;b:1;i:1;s:6:\"Groovy\";}");
	let empty: [i32; 0] = [];
	assert_eq!(enc(empty), "a:0:{}");
}

#[test]
fn keyed_collections_follow_iteration_order() {
	let map = Value::map([("name", Value::from("Yotama")), ("age", Value::from(28))]);
	assert_eq!(enc(map), "a:2:{s:4:\"name\";s:6:\"Yotama\";s:3:\"age\";i:28;}");

	let mixed = Value::map([(Key::Int(7), "seven"), (Key::from("k"), "kay")]);
	assert_eq!(enc(mixed), "a:2:{i:7;s:5:\"seven\";s:1:\"k\";s:3:\"kay\";}");

	assert_eq!(enc(HashMap::<String, i32>::new()), "a:0:{}");
}

#[test]
fn sorted_keys_mode_is_order_independent() {
	let encoder = Encoder::new().with_options(EncodeOptions {
		map_order: MapOrder::SortedKeys,
		..EncodeOptions::default()
	});

	let mut source = HashMap::new();
	for (index, name) in ["delta", "alpha", "charlie", "bravo"].iter().enumerate() {
		source.insert(name.to_string(), index as i32);
	}
	let first = encoder.encode(&Value::from(source.clone())).expect("encode succeeds");
	let second = encoder.encode(&Value::from(source)).expect("encode succeeds");

	assert_eq!(first, second);
	assert!(first.starts_with("a:4:{s:5:\"alpha\";"), "got {first}");

	let mixed = Value::map([(Key::from("b"), 1), (Key::Int(2), 2), (Key::from("a"), 3), (Key::Int(-1), 4)]);
	assert_eq!(
		encoder.encode(&mixed).expect("encode succeeds"),
		"a:4:{i:-1;i:4;i:2;i:2;s:1:\"a\";i:3;s:1:\"b\";i:1;}"
	);
}

#[test]
fn dynamic_record_flattens_to_named_pairs() {
	let record = DynamicRecord::new("Person").field("age", 28).field("name", "Yotama");
	assert_eq!(enc(Value::record(record)), "a:2:{s:3:\"age\";i:28;s:4:\"name\";s:6:\"Yotama\";}");
}

#[derive(Debug)]
struct Account {
	login: String,
	password: String,
	display: String,
}

impl Record for Account {
	fn type_name(&self) -> &str {
		"Account"
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

fn account_encoder(options: EncodeOptions) -> Encoder<SchemaResolver> {
	let schema = RecordSchema::new()
		.base_field("class", |_: &Account| "Account")
		.field("login", |account: &Account| account.login.clone())
		.field_with("password", FieldHint::exclude(), |account: &Account| account.password.clone())
		.field_with("display", FieldHint::rename("表示名"), |account: &Account| account.display.clone());
	Encoder::with_resolver(SchemaResolver::new().with(schema)).with_options(options)
}

#[test]
fn schema_record_applies_hints() {
	let account = Value::record(Account {
		login: "yotama".to_owned(),
		password: "hunter2".to_owned(),
		display: "与太".to_owned(),
	});

	let text = account_encoder(EncodeOptions::default()).encode(&account).expect("encode succeeds");
	assert_eq!(text, "a:2:{s:5:\"login\";s:6:\"yotama\";s:9:\"表示名\";s:6:\"与太\";}");
}

#[test]
fn record_without_resolver_schema_fails() {
	let account = Value::record(Account {
		login: String::new(),
		password: String::new(),
		display: String::new(),
	});
	let err = encode(&account).expect_err("no schema registered");
	assert!(matches!(err, PhpError::UnresolvedRecord { .. }));
}

#[test]
fn field_fault_policy_controls_outcome() {
	let mut record = DynamicRecord::new("Flaky");
	record.push(RecordField::faulted("value", FieldFault::new("timeout")));
	let value = Value::record(record);

	assert_eq!(enc(value.clone()), "a:1:{s:5:\"value\";N;}");

	let strict = Encoder::new().with_options(EncodeOptions::strict());
	let err = strict.encode(&value).expect_err("fault is fatal");
	assert!(matches!(err, PhpError::FieldRead { .. }));
}

#[test]
fn nested_composites() {
	let inner = DynamicRecord::new("Pref").field("tags", vec!["a", "b"]);
	let outer = Value::map([("prefs", Value::record(inner)), ("scores", Value::from([1.5_f64, 2.0]))]);
	assert_eq!(
		enc(outer),
		"a:2:{s:5:\"prefs\";a:1:{s:4:\"tags\";a:2:{i:0;s:1:\"a\";i:1;s:1:\"b\";}}s:6:\"scores\";a:2:{i:0;d:1.5;i:1;d:2;}}"
	);
}

#[test]
fn depth_guard_fails_fast() {
	let mut value = Value::from(1);
	for _ in 0..10 {
		value = Value::List(vec![value]);
	}

	let shallow = Encoder::new().with_options(EncodeOptions {
		max_depth: 5,
		..EncodeOptions::default()
	});
	let err = shallow.encode(&value).expect_err("too deep");
	assert!(matches!(err, PhpError::DepthExceeded { max_depth: 5 }));

	let deep_enough = Encoder::new().with_options(EncodeOptions {
		max_depth: 10,
		..EncodeOptions::default()
	});
	deep_enough.encode(&value).expect("ten levels fit");
}

/// Record holding a weak handle to itself, so its schema yields a cycle.
#[derive(Debug)]
struct Loop {
	this: OnceLock<Weak<Loop>>,
}

impl Record for Loop {
	fn type_name(&self) -> &str {
		"Loop"
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

#[test]
fn self_referential_record_hits_depth_guard() {
	let node = Arc::new(Loop { this: OnceLock::new() });
	node.this.set(Arc::downgrade(&node)).expect("handle set once");

	let schema = RecordSchema::new().field("next", |node: &Loop| match node.this.get().and_then(Weak::upgrade) {
		Some(strong) => Value::Record(strong),
		None => Value::Null,
	});
	let encoder = Encoder::with_resolver(SchemaResolver::new().with(schema));

	let err = encoder.encode(&Value::Record(node)).expect_err("cycle is cut off");
	assert!(matches!(err, PhpError::DepthExceeded { max_depth: 128 }), "got {err}");
}

#[test]
fn scalars_ignore_depth_limit() {
	let encoder = Encoder::new().with_options(EncodeOptions {
		max_depth: 0,
		..EncodeOptions::default()
	});
	assert_eq!(encoder.encode(&Value::from(3)).expect("scalar encodes"), "i:3;");
	assert!(encoder.encode(&Value::List(Vec::new())).is_err());
}

#[test]
fn encode_into_restores_buffer_on_error() {
	let mut record = DynamicRecord::new("Flaky");
	record.push(RecordField::new("ok", 1));
	record.push(RecordField::faulted("bad", FieldFault::new("boom")));
	let value = Value::List(vec![Value::from("prefix"), Value::record(record)]);

	let strict = Encoder::new().with_options(EncodeOptions {
		field_faults: FieldFaultPolicy::Fail,
		..EncodeOptions::default()
	});
	let mut out = String::from("keep:");
	strict.encode_into(&value, &mut out).expect_err("fault is fatal");
	assert_eq!(out, "keep:");

	strict.encode_into(&Value::Null, &mut out).expect("null encodes");
	assert_eq!(out, "keep:N;");
}

#[test]
fn encoding_is_idempotent() {
	let value = Value::List(vec![
		Value::from("与太組"),
		Value::from(0.3_f64),
		Value::map([("k", Value::Null)]),
		Value::record(DynamicRecord::new("R").field("x", 1)),
	]);
	let encoder = Encoder::new();
	assert_eq!(encoder.encode(&value).expect("first"), encoder.encode(&value).expect("second"));
}

#[test]
fn php_float_notation_option() {
	let encoder = Encoder::new().with_options(EncodeOptions {
		float_notation: FloatNotation::Php,
		..EncodeOptions::default()
	});
	assert_eq!(encoder.encode(&Value::from(1e25_f64)).expect("encode succeeds"), "d:1.0E+25;");
	assert_eq!(enc(1e25_f64), "d:10000000000000000000000000;");
	assert_eq!(enc(f64::NAN), "d:NAN;");
}

#[test]
fn options_deserialize_with_defaults() {
	let options: EncodeOptions = serde_json::from_str(r#"{"map_order":"sorted_keys","float_notation":"php"}"#).expect("options parse");
	assert_eq!(options.map_order, MapOrder::SortedKeys);
	assert_eq!(options.float_notation, FloatNotation::Php);
	assert_eq!(options.max_depth, EncodeOptions::default().max_depth);
	assert_eq!(options.field_faults, FieldFaultPolicy::SubstituteNull);
}

#[test]
fn encoder_is_shareable_across_threads() {
	fn assert_send_sync<T: Send + Sync>() {}
	assert_send_sync::<Encoder>();
	assert_send_sync::<Value>();
}

#[test]
fn options_reject_unknown_fields() {
	let err = serde_json::from_str::<EncodeOptions>(r#"{"max_dept":4}"#).expect_err("typo in field name");
	assert!(err.to_string().contains("max_dept"), "got {err}");
}
