use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Stage names in the order the stock model was trained with.
pub const DEFAULT_LABELS: [&str; 4] = [
    "Mild Demented",
    "Moderate Demented",
    "Non Demented",
    "Very Mild Demented",
];

/// Ordered class names. Position `i` names output `i` of the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Rejects empty sets, blank names and duplicates.
    pub fn new(labels: Vec<String>) -> Result<LabelSet, LoadError> {
        if labels.is_empty() {
            return Err(LoadError::InvalidModel("label set is empty".into()));
        }
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(LoadError::InvalidModel(format!("label {} is blank", i)));
            }
            if labels[..i].contains(label) {
                return Err(LoadError::InvalidModel(format!("duplicate label {:?}", label)));
            }
        }
        Ok(LabelSet(labels))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Picks the label set for a model.
    ///
    /// Labels declared by the artifact win. When `expected` is also given the
    /// two must agree element for element. Without artifact labels, `expected`
    /// is used, then `DEFAULT_LABELS`. The result must have exactly `outputs`
    /// entries.
    pub fn resolve(
        declared: Option<&[String]>,
        expected: Option<&[String]>,
        outputs: usize,
    ) -> Result<LabelSet, LoadError> {
        let chosen = match (declared, expected) {
            (Some(found), Some(expected)) if found != expected => {
                return Err(LoadError::LabelMismatch {
                    expected: expected.to_vec(),
                    found: found.to_vec(),
                });
            }
            (Some(found), _) => found.to_vec(),
            (None, Some(expected)) => expected.to_vec(),
            (None, None) => LabelSet::default().0,
        };
        let set = LabelSet::new(chosen)?;
        if set.len() != outputs {
            return Err(LoadError::LabelCount { labels: set.len(), outputs });
        }
        Ok(set)
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        LabelSet(DEFAULT_LABELS.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for LabelSet {
    type Error = LoadError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        LabelSet::new(labels)
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Vec<String> {
        set.0
    }
}
