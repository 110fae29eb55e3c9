//! Canonical serialization, value equality and digests.
//!
//! Both the serializer and [`same_value`] walk values with an explicit
//! work stack, so arbitrarily deep input cannot overflow the call stack.

use crate::snapshot::value::{Fields, Snapshot, SnapshotValue};
use sha2::{Digest as _, Sha256};

/// Object key order used when writing compact JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Keys in the order they appear in the record
    Document,
    /// Keys sorted lexicographically (canonical form)
    Sorted,
}

enum Token<'a> {
    Value(&'a SnapshotValue),
    Object(&'a Fields),
    Key(&'a str),
    Punct(char),
}

/// Canonical compact JSON for a value: sorted keys, JS-style numbers.
pub fn canonical_string(value: &SnapshotValue) -> String {
    write_compact(Token::Value(value), KeyOrder::Sorted)
}

/// Compact JSON for a value with the given key order.
pub fn compact_string(value: &SnapshotValue, order: KeyOrder) -> String {
    write_compact(Token::Value(value), order)
}

/// SHA-256 hex digest of the snapshot's canonical serialization.
///
/// Key order inside the snapshot does not affect the digest.
pub fn canonical_digest(snapshot: &Snapshot) -> String {
    let canonical = write_compact(Token::Object(snapshot.fields()), KeyOrder::Sorted);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

fn write_compact(root: Token<'_>, order: KeyOrder) -> String {
    let mut out = String::new();
    let mut stack = vec![root];

    while let Some(token) = stack.pop() {
        match token {
            Token::Punct(c) => out.push(c),
            Token::Key(key) => {
                push_json_string(&mut out, key);
                out.push(':');
            }
            Token::Object(fields) => {
                let mut entries: Vec<(&str, &SnapshotValue)> = fields.iter().collect();
                if order == KeyOrder::Sorted {
                    entries.sort_by(|a, b| a.0.cmp(b.0));
                }
                out.push('{');
                stack.push(Token::Punct('}'));
                for (i, (key, value)) in entries.into_iter().enumerate().rev() {
                    stack.push(Token::Value(value));
                    stack.push(Token::Key(key));
                    if i > 0 {
                        stack.push(Token::Punct(','));
                    }
                }
            }
            Token::Value(SnapshotValue::Object(fields)) => stack.push(Token::Object(fields)),
            Token::Value(SnapshotValue::Array(items)) => {
                out.push('[');
                stack.push(Token::Punct(']'));
                for (i, item) in items.iter().enumerate().rev() {
                    stack.push(Token::Value(item));
                    if i > 0 {
                        stack.push(Token::Punct(','));
                    }
                }
            }
            Token::Value(SnapshotValue::String(s)) => push_json_string(&mut out, s),
            Token::Value(primitive) => out.push_str(&primitive_text(primitive)),
        }
    }

    out
}

fn push_json_string(out: &mut String, s: &str) {
    out.push_str(&serde_json::Value::String(s.to_string()).to_string());
}

/// Render a number the way a JavaScript runtime would.
///
/// Integral floats drop their fraction (`1.0` → `1`) so `Int(1)` and
/// `Float(1.0)` share one canonical form. Magnitudes of `1e21` and above,
/// or below `1e-6`, use exponent form (`1e+21`, `1.5e-7`).
pub fn number_text(f: f64) -> String {
    let magnitude = f.abs();
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
        let text = format!("{:e}", f);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        }
    } else if f.fract() == 0.0 && magnitude < 9_007_199_254_740_992.0 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

/// Text for a non-string primitive; containers and strings are handled by callers.
fn primitive_text(value: &SnapshotValue) -> String {
    match value {
        SnapshotValue::Null => "null".to_string(),
        SnapshotValue::Bool(b) => b.to_string(),
        SnapshotValue::Int(i) => i.to_string(),
        SnapshotValue::Float(f) => number_text(*f),
        SnapshotValue::String(s) => s.clone(),
        SnapshotValue::Object(_) | SnapshotValue::Array(_) => String::new(),
    }
}

/// Strict primitive equality after canonicalization.
///
/// `NaN` is never equal to anything, including another `NaN`.
fn same_primitive(a: &SnapshotValue, b: &SnapshotValue) -> bool {
    match (a, b) {
        (SnapshotValue::Null, SnapshotValue::Null) => true,
        (SnapshotValue::Bool(x), SnapshotValue::Bool(y)) => x == y,
        (SnapshotValue::String(x), SnapshotValue::String(y)) => x == y,
        (SnapshotValue::Int(x), SnapshotValue::Int(y)) => x == y,
        (SnapshotValue::Float(x), _) | (_, SnapshotValue::Float(x)) if x.is_nan() => false,
        (SnapshotValue::Float(x), SnapshotValue::Float(y)) => x == y,
        (SnapshotValue::Int(_), SnapshotValue::Float(_))
        | (SnapshotValue::Float(_), SnapshotValue::Int(_)) => {
            primitive_text(a) == primitive_text(b)
        }
        _ => false,
    }
}

/// Deep value equality.
///
/// Primitives compare strictly after canonicalization; objects and arrays
/// are equal iff their canonical serializations match (object key order is
/// ignored). The one exception is `NaN`, which stays unequal at any depth.
pub fn same_value(a: &SnapshotValue, b: &SnapshotValue) -> bool {
    let mut pending = vec![(a, b)];

    while let Some((left, right)) = pending.pop() {
        match (left, right) {
            (SnapshotValue::Object(l), SnapshotValue::Object(r)) => {
                if l.len() != r.len() {
                    return false;
                }
                for (key, lv) in l.iter() {
                    match r.get(key) {
                        Some(rv) => pending.push((lv, rv)),
                        None => return false,
                    }
                }
            }
            (SnapshotValue::Array(l), SnapshotValue::Array(r)) => {
                if l.len() != r.len() {
                    return false;
                }
                pending.extend(l.iter().zip(r.iter()));
            }
            (l, r) if l.kind().is_container() || r.kind().is_container() => return false,
            (l, r) => {
                if !same_primitive(l, r) {
                    return false;
                }
            }
        }
    }

    true
}
