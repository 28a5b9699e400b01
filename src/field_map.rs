//! Field maps and projected rows.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use csv::StringRecord;
use foldhash::{HashSet, HashSetExt};

use crate::error::{ParserError, Result};

/// Association of logical field names with zero-based column indices.
///
/// Names are unique and keep their insertion order, which is also the order
/// of every [`ProjectedRow`] built from this map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<(Arc<str>, usize)>,
}

impl FieldMap {
    /// Build a field map from `(name, index)` pairs.
    ///
    /// Fails with [`ParserError::InvalidConfig`] if a name appears twice.
    ///
    /// ```
    /// use csv_fieldmap::FieldMap;
    ///
    /// let map = FieldMap::new([("state", 1), ("streetAddress", 5)]).unwrap();
    /// assert_eq!(map.index_of("state"), Some(1));
    /// ```
    pub fn new<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        let pairs = pairs.into_iter();
        let mut seen = HashSet::with_capacity(pairs.size_hint().0);
        let mut fields = Vec::with_capacity(pairs.size_hint().0);

        for (name, index) in pairs {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                return Err(ParserError::InvalidConfig(format!(
                    "duplicate field name {name:?}"
                )));
            }
            fields.push((Arc::from(name), index));
        }

        Ok(Self { fields })
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column index assigned to `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|&(_, i)| i)
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_ref())
    }

    /// `(name, index)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.fields.iter().map(|(n, i)| (n.as_ref(), *i))
    }

    /// Project a decoded row onto this map.
    ///
    /// An index past the end of `record` yields an absent value rather than an
    /// error, so short rows are tolerated.
    pub fn project(&self, record: &StringRecord) -> ProjectedRow {
        let values = self
            .fields
            .iter()
            .map(|(name, index)| (Arc::clone(name), record.get(*index).map(str::to_string)))
            .collect();
        ProjectedRow { values }
    }
}

/// A decoded row keyed by field name.
///
/// Its keys are exactly the keys of the [`FieldMap`] that produced it, in the
/// same order. `None` marks a field whose column did not exist in the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedRow {
    values: Vec<(Arc<str>, Option<String>)>,
}

impl ProjectedRow {
    /// Value of `name`, or `None` if the field is absent or not in the map.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name).and_then(|v| v.as_deref())
    }

    /// Returns true if `name` is a key of this row (absent or not).
    pub fn contains_key(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Returns true if `name` is a key whose column was missing from the row.
    pub fn is_absent(&self, name: &str) -> bool {
        matches!(self.entry(name), Some(None))
    }

    fn entry(&self, name: &str) -> Option<&Option<String>> {
        self.values
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field names in field map order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_ref())
    }

    /// `(name, value)` pairs in field map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(n, v)| (n.as_ref(), v.as_deref()))
    }

    /// Convert into an ordered map, for comparisons and serialization.
    pub fn into_map(self) -> BTreeMap<String, Option<String>> {
        self.values
            .into_iter()
            .map(|(n, v)| (n.to_string(), v))
            .collect()
    }
}

impl fmt::Display for ProjectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Some(v) => write!(f, "{name}: {v:?}")?,
                None => write!(f, "{name}: <absent>")?,
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = FieldMap::new([("a", 0), ("b", 1), ("a", 2)]);
        assert!(matches!(result, Err(ParserError::InvalidConfig(_))));
    }

    #[test]
    fn test_keeps_insertion_order() {
        let map = FieldMap::new([("z", 2), ("a", 0), ("m", 1)]).unwrap();
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(map.index_of("m"), Some(1));
        assert_eq!(map.index_of("x"), None);
    }

    #[test]
    fn test_project_selected_fields() {
        let map = FieldMap::new([("state", 1), ("streetAddress", 5)]).unwrap();
        let row = map.project(&record(&[
            "Post Office",
            "NSW",
            "Queanbeyan",
            "1",
            "0",
            "131 Monaro Street",
        ]));

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("state"), Some("NSW"));
        assert_eq!(row.get("streetAddress"), Some("131 Monaro Street"));
        assert!(!row.contains_key("facilityName"));
    }

    #[test]
    fn test_short_row_gives_absent_values() {
        let map = FieldMap::new([("first", 0), ("tenth", 9)]).unwrap();
        let row = map.project(&record(&["only"]));

        assert_eq!(row.get("first"), Some("only"));
        assert!(row.contains_key("tenth"));
        assert!(row.is_absent("tenth"));
        assert_eq!(row.get("tenth"), None);
    }

    #[test]
    fn test_empty_field_is_not_absent() {
        let map = FieldMap::new([("b", 1)]).unwrap();
        let row = map.project(&record(&["a", ""]));
        assert_eq!(row.get("b"), Some(""));
        assert!(!row.is_absent("b"));
    }

    #[test]
    fn test_display_and_into_map() {
        let map = FieldMap::new([("a", 0), ("b", 3)]).unwrap();
        let row = map.project(&record(&["x", "y"]));

        assert_eq!(row.to_string(), "{a: \"x\", b: <absent>}");

        let as_map = row.into_map();
        assert_eq!(as_map.get("a"), Some(&Some("x".to_string())));
        assert_eq!(as_map.get("b"), Some(&None));
    }
}
