//! Encoder for PHP's native `serialize()` text format.
//!
//! ```
//! use phpser::php::{Value, encode};
//!
//! let text = encode(&Value::from(vec![10, 20])).expect("encodes");
//! assert_eq!(text, "a:2:{i:0;i:10;i:1;i:20;}");
//! ```

/// Value graph, record resolution, and the PHP serialize encoder.
pub mod php;
