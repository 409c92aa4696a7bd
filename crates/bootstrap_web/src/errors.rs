//! Turning JS exceptions into the text users see.
//!
//! Kept outside the wasm-only `web` module so it can be unit-tested on the host.

use std::fmt;

/// `String(e)` for a JS `Error` with the given `name` and `message`.
pub fn error_to_string(name: &str, message: &str) -> String {
    match (name.is_empty(), message.is_empty()) {
        (true, _) => message.to_string(),
        (false, true) => name.to_string(),
        (false, false) => format!("{name}: {message}"),
    }
}

/// A thrown or rejected JS value, reduced to what `String(value)` needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Thrown {
    Error { name: String, message: String },
    /// Strings, and objects already converted through their own `toString`.
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thrown::Error { name, message } => f.write_str(&error_to_string(name, message)),
            Thrown::Text(text) => f.write_str(text),
            Thrown::Number(n) => f.write_str(&number_to_string(*n)),
            Thrown::Bool(b) => write!(f, "{b}"),
            Thrown::Null => f.write_str("null"),
            Thrown::Undefined => f.write_str("undefined"),
        }
    }
}

/// `Number.prototype.toString()` for the values a rejection realistically carries.
fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 {
        format!("{n:e}").replacen('e', "e+", 1)
    } else if abs < 1e-6 {
        format!("{n:e}")
    } else {
        format!("{n}")
    }
}
