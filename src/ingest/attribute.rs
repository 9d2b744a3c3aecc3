//! Typed-value decoding for change-stream images.
//!
//! Stream records carry every field as a tagged wire value. `decode`
//! converts one wire value into its native shape; it is total over the
//! tagged domain and never fails. The resulting `Scalar` union stops at
//! the flatteners, which convert it into strongly-typed flat records.

use std::collections::HashMap;

use serde::Deserialize;

/// Wire representation of one typed stream value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum AttributeValue {
    S(String),
    N(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    M(HashMap<String, AttributeValue>),
    L(Vec<AttributeValue>),
    SS(Vec<String>),
    NS(Vec<String>),
    /// Catch-all for tags this pipeline does not understand.
    #[serde(untagged)]
    Unrecognized(serde_json::Value),
}

/// Decoded native-shape value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Map(HashMap<String, Scalar>),
    List(Vec<Scalar>),
}

/// Convert a tagged wire value to its native shape.
///
/// Unrecognized tags decode to `Null` rather than failing; the rest of
/// the pipeline treats them as absent fields.
pub fn decode(value: &AttributeValue) -> Scalar {
    match value {
        AttributeValue::S(s) => Scalar::Str(s.clone()),
        AttributeValue::N(n) => decode_number(n),
        AttributeValue::Bool(b) => Scalar::Bool(*b),
        AttributeValue::Null(_) => Scalar::Null,
        AttributeValue::M(entries) => Scalar::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), decode(v)))
                .collect(),
        ),
        AttributeValue::L(items) => Scalar::List(items.iter().map(decode).collect()),
        AttributeValue::SS(items) => {
            Scalar::List(items.iter().cloned().map(Scalar::Str).collect())
        }
        AttributeValue::NS(items) => Scalar::List(
            items
                .iter()
                .map(|n| n.parse::<f64>().map(Scalar::Float).unwrap_or(Scalar::Null))
                .collect(),
        ),
        AttributeValue::Unrecognized(_) => Scalar::Null,
    }
}

/// Numbers arrive as string literals. A literal containing a decimal
/// point decodes as a float, anything else as an integer. This is an
/// approximation of the source's numeric types, kept for compatibility
/// with the existing analytical schema.
fn decode_number(literal: &str) -> Scalar {
    if literal.contains('.') {
        literal
            .parse::<f64>()
            .map(Scalar::Float)
            .unwrap_or(Scalar::Null)
    } else {
        literal
            .parse::<i64>()
            .map(Scalar::Int)
            .unwrap_or(Scalar::Null)
    }
}

/// String field of a decoded map, empty when absent or not a string.
pub fn str_field(map: &HashMap<String, Scalar>, key: &str) -> String {
    match map.get(key) {
        Some(Scalar::Str(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Integer field of a decoded map, zero when absent or not numeric.
pub fn int_field(map: &HashMap<String, Scalar>, key: &str) -> i64 {
    match map.get(key) {
        Some(Scalar::Int(v)) => *v,
        Some(Scalar::Float(v)) => *v as i64,
        _ => 0,
    }
}

/// Field coerced to its string rendering. Source records are not
/// consistent about whether identifiers arrive as strings or numbers.
pub fn coerced_str_field(map: &HashMap<String, Scalar>, key: &str) -> String {
    match map.get(key) {
        Some(Scalar::Str(s)) => s.clone(),
        Some(Scalar::Int(v)) => v.to_string(),
        Some(Scalar::Float(v)) => v.to_string(),
        _ => String::new(),
    }
}

/// Top-level string attribute of a raw image, empty when absent.
pub fn image_str(image: &HashMap<String, AttributeValue>, key: &str) -> String {
    match image.get(key) {
        Some(AttributeValue::S(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Top-level numeric attribute of a raw image, zero when absent or
/// unparseable.
pub fn image_num(image: &HashMap<String, AttributeValue>, key: &str) -> f64 {
    match image.get(key) {
        Some(AttributeValue::N(n)) => n.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> AttributeValue {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_decode_string() {
        assert_eq!(
            decode(&parse(r#"{"S": "hello"}"#)),
            Scalar::Str("hello".to_string())
        );
    }

    #[test]
    fn test_decode_number_int() {
        assert_eq!(decode(&parse(r#"{"N": "42"}"#)), Scalar::Int(42));
    }

    #[test]
    fn test_decode_number_float() {
        assert_eq!(decode(&parse(r#"{"N": "3.14"}"#)), Scalar::Float(3.14));
    }

    #[test]
    fn test_decode_number_garbage_is_null() {
        assert_eq!(decode(&parse(r#"{"N": "not-a-number"}"#)), Scalar::Null);
    }

    #[test]
    fn test_decode_bool() {
        assert_eq!(decode(&parse(r#"{"BOOL": true}"#)), Scalar::Bool(true));
    }

    #[test]
    fn test_decode_null() {
        assert_eq!(decode(&parse(r#"{"NULL": true}"#)), Scalar::Null);
    }

    #[test]
    fn test_decode_map() {
        let decoded = decode(&parse(r#"{"M": {"name": {"S": "Alice"}, "age": {"N": "30"}}}"#));
        let Scalar::Map(map) = decoded else {
            panic!("expected map");
        };
        assert_eq!(map.get("name"), Some(&Scalar::Str("Alice".to_string())));
        assert_eq!(map.get("age"), Some(&Scalar::Int(30)));
    }

    #[test]
    fn test_decode_list() {
        assert_eq!(
            decode(&parse(r#"{"L": [{"S": "a"}, {"N": "1"}]}"#)),
            Scalar::List(vec![Scalar::Str("a".to_string()), Scalar::Int(1)])
        );
    }

    #[test]
    fn test_decode_string_set() {
        assert_eq!(
            decode(&parse(r#"{"SS": ["a", "b"]}"#)),
            Scalar::List(vec![
                Scalar::Str("a".to_string()),
                Scalar::Str("b".to_string())
            ])
        );
    }

    #[test]
    fn test_decode_number_set() {
        assert_eq!(
            decode(&parse(r#"{"NS": ["1", "2.5"]}"#)),
            Scalar::List(vec![Scalar::Float(1.0), Scalar::Float(2.5)])
        );
    }

    #[test]
    fn test_decode_unrecognized_tag_is_null() {
        assert_eq!(
            decode(&parse(r#"{"B": "AAEC"}"#)),
            Scalar::Null,
            "unknown tags must decode to null, not fail"
        );
        assert_eq!(decode(&parse(r#"{}"#)), Scalar::Null);
    }

    #[test]
    fn test_coerced_str_field() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), Scalar::Int(7));
        map.insert("b".to_string(), Scalar::Str("x".to_string()));
        assert_eq!(coerced_str_field(&map, "a"), "7");
        assert_eq!(coerced_str_field(&map, "b"), "x");
        assert_eq!(coerced_str_field(&map, "missing"), "");
    }
}
