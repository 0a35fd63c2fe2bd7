use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;
use std::sync::Arc;

use crate::error::{Result, SyncError};
use crate::header::HeaderIndex;

/// One projected row: a value for every named header field, in header order.
///
/// The field set is fixed by the header the record was built from. Setting a
/// name outside it fails instead of growing the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Arc<HeaderIndex>,
    values: Vec<String>,
}

impl Record {
    pub(crate) fn new(header: Arc<HeaderIndex>, values: Vec<String>) -> Self {
        debug_assert_eq!(header.len(), values.len());
        Record { header, values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let pos = self.header.position(name)?;
        self.values.get(pos).map(String::as_str)
    }

    /// Replace a field's value, returning the previous one
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<String> {
        let pos = self
            .header
            .position(name)
            .ok_or_else(|| SyncError::UnknownField(name.to_string()))?;
        Ok(std::mem::replace(&mut self.values[pos], value.into()))
    }

    /// Field names and values in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.header
            .names()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn header(&self) -> &Arc<HeaderIndex> {
        &self.header
    }

    /// Value at a dense field position
    pub(crate) fn value_at(&self, pos: usize) -> &str {
        self.values.get(pos).map(String::as_str).unwrap_or("")
    }
}

impl Index<&str> for Record {
    type Output = str;

    /// Panics when `name` is not a header field
    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no field named {name:?}"),
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
