//! Host type-loading integration.
//!
//! A host asks a [`LoaderChain`] for the file declaring a type; the chain
//! tries each registered [`TypeLocator`] in order. The class path resolver
//! is registered last, as the fallback for names no earlier locator knows.

use std::path::PathBuf;
use std::sync::Arc;

use crate::resolver::Resolver;

/// Something that can map a type name to the full path of its source file.
pub trait TypeLocator: Send + Sync {
    /// Returns the declaring file's full path, or `None` if unknown.
    fn locate(&self, type_name: &str) -> Option<PathBuf>;
}

impl TypeLocator for Resolver {
    fn locate(&self, type_name: &str) -> Option<PathBuf> {
        Resolver::locate(self, type_name)
    }
}

/// Ordered list of locators consulted until one answers.
#[derive(Default)]
pub struct LoaderChain {
    locators: Vec<Arc<dyn TypeLocator>>,
}

impl LoaderChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a locator after those already registered.
    pub fn register(&mut self, locator: Arc<dyn TypeLocator>) {
        self.locators.push(locator);
    }

    /// Asks each locator in registration order.
    pub fn locate(&self, type_name: &str) -> Option<PathBuf> {
        self.locators
            .iter()
            .find_map(|locator| locator.locate(type_name))
    }

    /// Number of registered locators.
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Returns `true` if no locator is registered.
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed(HashMap<&'static str, &'static str>);

    impl TypeLocator for Fixed {
        fn locate(&self, type_name: &str) -> Option<PathBuf> {
            self.0.get(type_name).map(PathBuf::from)
        }
    }

    #[test]
    fn earlier_locator_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib/Varien/Object.php");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "<?php").unwrap();

        let mut chain = LoaderChain::new();
        chain.register(Arc::new(Fixed(HashMap::from([(
            "Varien_Object",
            "/override/Object.php",
        )]))));
        chain.register(Arc::new(Resolver::builder(dir.path()).build()));
        assert_eq!(chain.len(), 2);

        assert_eq!(
            chain.locate("Varien_Object"),
            Some(PathBuf::from("/override/Object.php"))
        );
    }

    #[test]
    fn resolver_is_the_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib/Varien/Object.php");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "<?php").unwrap();

        let mut chain = LoaderChain::new();
        chain.register(Arc::new(Fixed(HashMap::new())));
        chain.register(Arc::new(Resolver::builder(dir.path()).build()));

        assert_eq!(chain.locate("Varien_Object"), Some(path));
        assert_eq!(chain.locate("Varien_Nothing"), None);
    }
}
