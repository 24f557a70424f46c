//! The typed field model shared by every decoder and the line protocol encoder.

use bytes::Bytes;

/// A single typed scalar carried by a [`Field`].
///
/// There is no nested representation: JSON objects and arrays never make it
/// into a `Value`, decoders reject them before a record is produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Double(f64),
    /// Boolean.
    Boolean(bool),
    /// UTF-8 text.
    String(String),
    /// Opaque binary data. Line protocol has no representation for it.
    Bytes(Bytes),
}

impl Value {
    /// Short name of the value kind, used in error messages and event labels.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Double(_) => "double",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

/// A named value attached to a [`Record`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One telemetry event: its type, originating logger, timestamp and fields.
///
/// `timestamp` is nanoseconds since the Unix epoch; `0` means unset. Field
/// order is the order the encoder writes them in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    pub record_type: String,
    pub logger: String,
    pub timestamp: i64,
    pub fields: Vec<Field>,
}

impl Record {
    /// Creates an empty record for `logger` with no type, timestamp or fields.
    pub fn new(logger: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a field. Names are not deduplicated here; the encoder rejects
    /// a second value for the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push(Field::new(name, value));
    }

    /// Returns the first value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    pub const fn has_timestamp(&self) -> bool {
        self.timestamp != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_insertion_order() {
        let record = Record::new("svc.api.Ping")
            .with_type("Ping")
            .with_timestamp(1)
            .with_field("b", 1_i64)
            .with_field("a", "x");

        let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(record.get("a"), Some(&Value::String("x".into())));
        assert!(record.has_timestamp());
    }

    #[test]
    fn get_returns_first_duplicate() {
        let record = Record::new("a.B")
            .with_field("x", 1_i64)
            .with_field("x", 2_i64);
        assert_eq!(record.get("x"), Some(&Value::Integer(1)));
    }

    #[test]
    fn value_kinds() {
        assert_eq!(Value::from(1_i64).kind(), "integer");
        assert_eq!(Value::from(1.5_f64).kind(), "double");
        assert_eq!(Value::from(true).kind(), "boolean");
        assert_eq!(Value::from("s").kind(), "string");
        assert_eq!(Value::from(Bytes::from_static(b"\x00")).kind(), "bytes");
    }
}
