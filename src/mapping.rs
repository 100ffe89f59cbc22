use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::StoreError;

/// Waste categories known to the guidance book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WasteLabel {
    Chemical,
    Organic,
    Plastic,
    Metal,
    Glass,
}

impl WasteLabel {
    pub const ALL: [WasteLabel; 5] = [
        WasteLabel::Chemical,
        WasteLabel::Organic,
        WasteLabel::Plastic,
        WasteLabel::Metal,
        WasteLabel::Glass,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WasteLabel::Chemical => "Chemical Waste",
            WasteLabel::Organic => "Organic Waste",
            WasteLabel::Plastic => "Plastic Waste",
            WasteLabel::Metal => "Metal Waste",
            WasteLabel::Glass => "Glass Waste",
        }
    }
}

impl fmt::Display for WasteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WasteLabel {
    type Err = StoreError;

    /// Accepts the display name ("Organic Waste") or the bare category
    /// ("organic"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        WasteLabel::ALL
            .into_iter()
            .find(|label| {
                let name = label.name();
                name.eq_ignore_ascii_case(wanted)
                    || name
                        .strip_suffix(" Waste")
                        .is_some_and(|short| short.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| StoreError::UnknownLabel(wanted.to_string()))
    }
}

/// Ordered labels matching the model's output positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<WasteLabel>,
}

impl Default for LabelSet {
    /// The three classes the bundled model was trained on.
    fn default() -> Self {
        Self {
            labels: vec![WasteLabel::Chemical, WasteLabel::Organic, WasteLabel::Plastic],
        }
    }
}

impl LabelSet {
    pub fn new(labels: Vec<WasteLabel>) -> Self {
        Self { labels }
    }

    pub fn get(&self, index: usize) -> Option<WasteLabel> {
        self.labels.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: WasteLabel) -> bool {
        self.labels.contains(&label)
    }

    pub fn iter(&self) -> impl Iterator<Item = WasteLabel> + '_ {
        self.labels.iter().copied()
    }
}

/// Reads a label file with one label per line, in model output order.
pub fn load_class_mapping(file_path: impl AsRef<Path>) -> Result<LabelSet, StoreError> {
    let path = file_path.as_ref();
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut labels = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        labels.push(line.parse::<WasteLabel>()?);
    }

    Ok(LabelSet::new(labels))
}
