use std::fmt;

use serde::Serialize;

use crate::record::Record;

/// A leaf value in a configuration record.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

// NOTE: Integers and floats compare numerically, so `80` matches `80.0`.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b,
            (Scalar::Integer(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Integer(a)) => {
                integer_equals_float(*a, *b)
            }
            (Scalar::String(a), Scalar::String(b)) => a == b,
            _ => false,
        }
    }
}

// i64 spans [-2^63, 2^63); outside that range or with a fraction no float
// equals an integer.
fn integer_equals_float(i: i64, f: f64) -> bool {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) && f as i64 == i
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n}"),
            Scalar::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// An indirect pointer to another block's attribute.
///
/// `Attribute` holds a single traversal such as
/// `aws_instance.hextris-server.public_ip`, `Attributes` a list made
/// entirely of traversals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    Attribute(String),
    Attributes(Vec<String>),
}

impl Reference {
    pub fn attribute(path: impl Into<String>) -> Self {
        Reference::Attribute(path.into())
    }

    pub fn attributes<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Reference::Attributes(paths.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Attribute(path) => write!(f, "ref({path})"),
            Reference::Attributes(paths) => write!(f, "ref([{}])", paths.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Record(Record),
    Reference(Reference),
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Sequence(_) => "sequence",
            Value::Record(_) => "record",
            Value::Reference(_) => "reference",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Value::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            Value::Reference(reference) => fmt::Display::fmt(reference, f),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
            Value::Record(record) => fmt::Display::fmt(record, f),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Scalar(Scalar::Integer(i64::from(n)))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Integer(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(Scalar::Float(n))
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Reference> for Value {
    fn from(reference: Reference) -> Self {
        Value::Reference(reference)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_equals_float_numerically() {
        assert_eq!(Scalar::Integer(80), Scalar::Float(80.0));
        assert_eq!(Scalar::Float(22.0), Scalar::Integer(22));
        assert_ne!(Scalar::Integer(80), Scalar::Float(80.5));
    }

    #[test]
    fn test_large_integer_does_not_equal_rounded_float() {
        assert_ne!(
            Scalar::Integer(9_007_199_254_740_993),
            Scalar::Float(9_007_199_254_740_992.0)
        );
        assert_eq!(
            Scalar::Integer(9_007_199_254_740_992),
            Scalar::Float(9_007_199_254_740_992.0)
        );
        assert_ne!(Scalar::Integer(i64::MAX), Scalar::Float(9.3e18));
        assert_ne!(Scalar::Integer(0), Scalar::Float(f64::NAN));
    }

    #[test]
    fn test_string_does_not_equal_number() {
        assert_ne!(Value::from("80"), Value::from(80));
    }

    #[test]
    fn test_reference_never_equals_string() {
        let reference = Value::from(Reference::attribute("aws_security_group.hextris-server.name"));
        assert_ne!(reference, Value::from("hextris-server"));
        assert_ne!(
            reference,
            Value::from("aws_security_group.hextris-server.name")
        );
    }

    #[test]
    fn test_reference_equality_is_structural() {
        let a = Reference::attributes(["aws_security_group.hextris-server.name"]);
        let b = Reference::attributes(vec!["aws_security_group.hextris-server.name".to_string()]);
        assert_eq!(a, b);
        assert_ne!(a, Reference::attribute("aws_security_group.hextris-server.name"));
    }

    #[test]
    fn test_value_display() {
        let value = Value::from(vec![Value::from("0.0.0.0/0"), Value::from(22), Value::null()]);
        assert_eq!(value.to_string(), r#"["0.0.0.0/0", 22, null]"#);
        assert_eq!(
            Value::from(Reference::attribute("aws_instance.hextris-server.public_ip")).to_string(),
            "ref(aws_instance.hextris-server.public_ip)"
        );
    }

    #[test]
    fn test_reference_serializes_with_marker_key() {
        let json = serde_json::to_value(Value::from(Reference::attributes(["a.b.c"]))).unwrap();
        assert_eq!(json, serde_json::json!({"attributes": ["a.b.c"]}));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::from(1).kind(), "scalar");
        assert_eq!(Value::from(Vec::<Value>::new()).kind(), "sequence");
        assert_eq!(Value::from(Record::new()).kind(), "record");
        assert_eq!(Value::from(Reference::attribute("x")).kind(), "reference");
    }
}
