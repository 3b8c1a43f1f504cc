use crate::models::DatasetDescriptor;
use crate::types::{AppError, AppResult};

/// Holds the descriptor of the currently loaded dataset, if any.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    current: Option<DatasetDescriptor>,
}

impl DatasetRegistry {
    /// Swap in a new descriptor, returning the one it replaces.
    pub fn replace(&mut self, dataset: DatasetDescriptor) -> Option<DatasetDescriptor> {
        self.current.replace(dataset)
    }

    pub fn current(&self) -> Option<&DatasetDescriptor> {
        self.current.as_ref()
    }

    pub fn require(&self) -> AppResult<&DatasetDescriptor> {
        self.current.as_ref().ok_or(AppError::NoDataset)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(name: &str) -> DatasetDescriptor {
        DatasetDescriptor::new(name, name, 1, vec!["A".into()]).unwrap()
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut registry = DatasetRegistry::default();
        assert!(!registry.is_loaded());
        assert_eq!(registry.require().unwrap_err(), AppError::NoDataset);

        assert!(registry.replace(dataset("one.csv")).is_none());
        let previous = registry.replace(dataset("two.csv")).unwrap();
        assert_eq!(previous.filename, "one.csv");
        assert_eq!(registry.current().unwrap().filename, "two.csv");
    }
}
