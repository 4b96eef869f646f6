//! Category label table.
//!
//! Maps the classifier's output index to a lowercase food name. The table is
//! built once at startup and shared read-only; growing the taxonomy is a data
//! change (a new label file), not a code change.

use crate::core::FoodError;
use std::path::Path;
use std::sync::Arc;

/// Labels of the bundled model, in output order.
pub const DEFAULT_FOOD_LABELS: [&str; 36] = [
    "apple",
    "banana",
    "beetroot",
    "bell pepper",
    "cabbage",
    "capsicum",
    "carrot",
    "cauliflower",
    "chilli pepper",
    "corn",
    "cucumber",
    "eggplant",
    "garlic",
    "ginger",
    "grapes",
    "jalepeno",
    "kiwi",
    "lemon",
    "lettuce",
    "mango",
    "onion",
    "orange",
    "paprika",
    "pear",
    "peas",
    "pineapple",
    "pomegranate",
    "potato",
    "raddish",
    "soy beans",
    "spinach",
    "sweetcorn",
    "sweetpotato",
    "tomato",
    "turnip",
    "watermelon",
];

/// Immutable mapping from category id (`0..N`) to food name.
///
/// Cloning is cheap; clones share the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    names: Arc<[String]>,
}

impl LabelTable {
    /// Builds a table from names in id order.
    ///
    /// Names are trimmed and lowercased.
    ///
    /// # Errors
    ///
    /// Returns `FoodError::InvalidInput` if the list is empty or a name is blank.
    pub fn new<I, S>(names: I) -> Result<Self, FoodError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .collect();

        if names.is_empty() {
            return Err(FoodError::invalid_input("label table must not be empty"));
        }
        if let Some(id) = names.iter().position(|name| name.is_empty()) {
            return Err(FoodError::invalid_input(format!(
                "label for category {id} is blank"
            )));
        }

        Ok(Self {
            names: names.into(),
        })
    }

    /// Returns the table of the bundled model.
    pub fn default_food() -> Self {
        Self {
            names: DEFAULT_FOOD_LABELS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    /// Reads a label file with one name per line; blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns `FoodError::InvalidInput` if the file cannot be read or holds no names.
    pub fn from_file(path: &Path) -> Result<Self, FoodError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FoodError::invalid_input(format!(
                "Failed to read label file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::new(content.lines().filter(|line| !line.trim().is_empty()))
    }

    /// Name of a category, if the id is known.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Id of a category name.
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the table has no categories.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates names in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::default_food()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_table() {
        let labels = LabelTable::default_food();
        assert_eq!(labels.len(), 36);
        assert_eq!(labels.name(0), Some("apple"));
        assert_eq!(labels.name(1), Some("banana"));
        assert_eq!(labels.name(35), Some("watermelon"));
        assert_eq!(labels.name(36), None);
        assert_eq!(labels.id_of("mango"), Some(19));
    }

    #[test]
    fn test_from_file_normalizes_names() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Apple").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  Dragon Fruit ").unwrap();

        let labels = LabelTable::from_file(file.path()).unwrap();
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec!["apple", "dragon fruit"]);
    }

    #[test]
    fn test_empty_table_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(LabelTable::from_file(file.path()).is_err());
        assert!(LabelTable::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(LabelTable::from_file(Path::new("/nonexistent/labels.txt")).is_err());
    }

    #[test]
    fn test_clones_share_storage() {
        let labels = LabelTable::default_food();
        let clone = labels.clone();
        assert!(Arc::ptr_eq(&labels.names, &clone.names));
    }
}
