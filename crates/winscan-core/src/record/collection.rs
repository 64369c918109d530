//! Per-image ordered detection results

use super::DetectionRecord;
use serde::{Deserialize, Serialize};

/// Detections for one image, in the order the scan produced them.
///
/// Append-only while scanning; writers only iterate it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultCollection {
    records: Vec<DetectionRecord>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DetectionRecord) {
        self.records.push(record);
    }

    pub fn as_slice(&self) -> &[DetectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionRecord> {
        self.records.iter()
    }

    /// Highest score in the collection, if any
    pub fn max_score(&self) -> Option<f64> {
        self.records
            .iter()
            .map(DetectionRecord::score)
            .fold(None, |best, s| match best {
                Some(b) if b >= s => Some(b),
                _ => Some(s),
            })
    }
}

impl IntoIterator for ResultCollection {
    type Item = DetectionRecord;
    type IntoIter = std::vec::IntoIter<DetectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a DetectionRecord;
    type IntoIter = std::slice::Iter<'a, DetectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<DetectionRecord> for ResultCollection {
    fn from_iter<T: IntoIterator<Item = DetectionRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<DetectionRecord> for ResultCollection {
    fn extend<T: IntoIterator<Item = DetectionRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}
