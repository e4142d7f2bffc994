use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A heterogeneous scalar as it arrives from the query service.
///
/// Group values, match fields and aggregation results all share this shape.
/// JSON integers that fit in an `i64` become `Int`, every other number becomes
/// `Float`. Anything that is neither a number nor a string is kept verbatim in
/// `Other` so it can still be printed.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Float(f64),
    Int(i64),
    String(String),
    Other(serde_json::Value),
}

impl Scalar {
    /// Numeric projection used by the graph builder. Non-numeric values
    /// become NaN so the chart leaves a gap.
    pub fn as_float_or_nan(&self) -> f64 {
        match self {
            Scalar::Float(v) => *v,
            Scalar::Int(v) => *v as f64,
            Scalar::String(_) | Scalar::Other(_) => f64::NAN,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Float(_) | Scalar::Int(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::String(s) => f.write_str(s),
            Scalar::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<serde_json::Value> for Scalar {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => n
                    .as_f64()
                    .map(Scalar::Float)
                    .unwrap_or_else(|| Scalar::Other(serde_json::Value::Number(n))),
            },
            serde_json::Value::String(s) => Scalar::String(s),
            other => Scalar::Other(other),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Float(v) => serializer.serialize_f64(*v),
            Scalar::Int(v) => serializer.serialize_i64(*v),
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Other(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Scalar::from)
    }
}
