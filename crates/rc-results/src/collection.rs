//! Named analysis collection with JSON import and export.
//!
//! Records are kept in insertion order. Adding a record under an existing
//! name replaces it in place, so it keeps its original position.

use std::fs;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::record::AnalysisRecord;
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisCollection {
    records: Vec<AnalysisRecord>,
}

impl AnalysisCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }

    /// Insert or replace a record under its own name.
    pub fn add(&mut self, record: AnalysisRecord) {
        match self.position(&record.name) {
            Some(i) => {
                tracing::debug!(name = %record.name, "replacing analysis");
                self.records[i] = record;
            }
            None => self.records.push(record),
        }
    }

    /// Add a record from loosely typed data. The data must be an object
    /// carrying a `name` and every other record field.
    pub fn add_from_data(&mut self, data: serde_json::Value) -> ResultsResult<()> {
        let has_name = data
            .as_object()
            .and_then(|obj| obj.get("name"))
            .is_some_and(|n| n.is_string());
        if !has_name {
            return Err(ResultsError::MalformedRecord {
                what: "analysis data must be an object with a string 'name'".to_string(),
            });
        }
        self.add(AnalysisRecord::from_value(data)?);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AnalysisRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Like [`AnalysisCollection::get`], with a missing name as an error.
    pub fn require(&self, name: &str) -> ResultsResult<&AnalysisRecord> {
        self.get(name).ok_or_else(|| ResultsError::NotFound {
            name: name.to_string(),
        })
    }

    /// Most recently added record, by insertion position.
    pub fn last(&self) -> Option<&AnalysisRecord> {
        self.records.last()
    }

    /// Record names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.records.iter()
    }

    /// Records matching `names`, in the order requested. Unknown names are
    /// skipped.
    pub fn compare<S: AsRef<str>>(&self, names: &[S]) -> Vec<&AnalysisRecord> {
        names.iter().filter_map(|n| self.get(n.as_ref())).collect()
    }

    pub fn to_json_string(&self) -> ResultsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a `name -> record` JSON object.
    pub fn from_json_str(content: &str) -> ResultsResult<Self> {
        let mut collection = Self::new();
        collection.merge_json_str(content)?;
        Ok(collection)
    }

    fn merge_json_str(&mut self, content: &str) -> ResultsResult<usize> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let serde_json::Value::Object(entries) = value else {
            return Err(ResultsError::MalformedRecord {
                what: "analysis file must hold a JSON object keyed by name".to_string(),
            });
        };

        // Parse everything first so a bad entry leaves `self` untouched.
        let records = entries
            .into_iter()
            .map(|(key, entry)| -> ResultsResult<AnalysisRecord> {
                let mut record = AnalysisRecord::from_value(entry)?;
                if record.name != key {
                    tracing::warn!(key = %key, name = %record.name, "record name differs from its key");
                    record.name = key;
                }
                Ok(record)
            })
            .collect::<ResultsResult<Vec<_>>>()?;

        let count = records.len();
        for record in records {
            self.add(record);
        }
        Ok(count)
    }

    /// Write every record to `path` as pretty-printed JSON.
    pub fn export_json(&self, path: &Path) -> ResultsResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_string()?)?;
        tracing::info!(path = %path.display(), count = self.len(), "exported analyses");
        Ok(())
    }

    /// Merge the records stored at `path` into this collection, replacing
    /// any with the same name. Returns how many records were read.
    pub fn import_json(&mut self, path: &Path) -> ResultsResult<usize> {
        if !path.exists() {
            return Err(ResultsError::NotFound {
                name: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        let count = self.merge_json_str(&content)?;
        tracing::info!(path = %path.display(), count, "imported analyses");
        Ok(count)
    }

    /// Load a collection from a file.
    pub fn load(path: &Path) -> ResultsResult<Self> {
        let mut collection = Self::new();
        collection.import_json(path)?;
        Ok(collection)
    }
}

impl Serialize for AnalysisCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.name, record)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a AnalysisCollection {
    type Item = &'a AnalysisRecord;
    type IntoIter = std::slice::Iter<'a, AnalysisRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
