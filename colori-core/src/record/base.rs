//! Key-value records for logging training metrics.
use crate::error::ColoriError;
use chrono::prelude::{DateTime, Local};
use std::collections::{hash_map::Iter, HashMap};

/// A value stored in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single floating-point value, typically a loss or a rate.
    Scalar(f32),

    /// A timestamp in the local timezone.
    DateTime(DateTime<Local>),

    /// A text value, useful for labels such as a model path.
    String(String),
}

/// A container of named metric values produced by one step of the
/// training pipeline.
///
/// # Examples
///
/// ```
/// use colori_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("loss_total", 1.25);
/// record.insert("loss_policy", RecordValue::Scalar(0.75));
/// assert_eq!(record.get_scalar("loss_policy").unwrap(), 0.75);
/// ```
#[derive(Debug, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record holding a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair, overwriting an existing value.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns the value for the given key, if present.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Iterates over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Merges another record into this one, the other side winning on
    /// duplicate keys.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Returns the scalar stored under the given key.
    ///
    /// # Errors
    ///
    /// Fails if the key is missing or holds a non-scalar value.
    pub fn get_scalar(&self, k: &str) -> Result<f32, ColoriError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            _ => Err(ColoriError::RecordValueType(k.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_roundtrip() {
        let mut record = Record::from_scalar("loss_total", 2.0);
        record.insert("loss_value", RecordValue::Scalar(0.5));
        assert_eq!(record.get_scalar("loss_total").unwrap(), 2.0);
        assert_eq!(record.get_scalar("loss_value").unwrap(), 0.5);
        assert!(record.get_scalar("missing").is_err());
    }

    #[test]
    fn merge_overwrites() {
        let mut a = Record::from_scalar("x", 1.0);
        a.merge_inplace(Record::from_scalar("x", 2.0));
        assert_eq!(a.get_scalar("x").unwrap(), 2.0);
    }
}
