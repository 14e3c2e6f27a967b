use std::fmt::{self, Write};
use std::ops::RangeInclusive;

use serde::Deserialize;

/// How finite floats are rendered inside `d:...;` tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatNotation {
	/// Shortest round-trip digits in positional notation, never an exponent.
	///
	/// Extreme magnitudes expand to every positional digit: `f64::MAX` takes
	/// 309 characters and `5e-324` takes 326. Use [`FloatNotation::Php`] when
	/// such values are expected.
	#[default]
	Shortest,
	/// Same digits, switching to PHP's `1.0E+25` form for very large or small magnitudes.
	Php,
}

// Decimal exponents rendered positionally under `Php`.
const PHP_PLAIN_EXP: RangeInclusive<i32> = -4..=16;

pub(crate) trait PhpFloat: Copy + fmt::Display + fmt::LowerExp {
	fn is_nan(self) -> bool;
	fn is_infinite(self) -> bool;
	fn is_sign_negative(self) -> bool;
}

macro_rules! php_float {
	($($ty:ty),*) => {
		$(
			impl PhpFloat for $ty {
				fn is_nan(self) -> bool {
					<$ty>::is_nan(self)
				}

				fn is_infinite(self) -> bool {
					<$ty>::is_infinite(self)
				}

				fn is_sign_negative(self) -> bool {
					<$ty>::is_sign_negative(self)
				}
			}
		)*
	};
}

php_float!(f32, f64);

/// Append the textual form of `value` (without the `d:` framing).
///
/// Digits are the shortest that round-trip at the value's own width, so an
/// `f32` holding `0.1` renders `0.1` rather than its widened `f64` expansion.
pub(crate) fn write_float<F: PhpFloat>(out: &mut String, value: F, notation: FloatNotation) -> fmt::Result {
	if value.is_nan() {
		out.push_str("NAN");
		return Ok(());
	}
	if value.is_infinite() {
		out.push_str(if value.is_sign_negative() { "-INF" } else { "INF" });
		return Ok(());
	}

	if notation == FloatNotation::Php {
		let sci = format!("{value:e}");
		if let Some((mantissa, exp)) = split_exponent(&sci) {
			if !PHP_PLAIN_EXP.contains(&exp) {
				out.push_str(mantissa);
				if !mantissa.contains('.') {
					out.push_str(".0");
				}
				let sign = if exp < 0 { '-' } else { '+' };
				return write!(out, "E{sign}{}", exp.unsigned_abs());
			}
		}
	}

	write!(out, "{value}")
}

fn split_exponent(sci: &str) -> Option<(&str, i32)> {
	let (mantissa, exp) = sci.split_once('e')?;
	Some((mantissa, exp.parse().ok()?))
}
