use std::sync::Arc;

use crate::db::KeyValueStore;

/// The search box contents, mirrored into a key-value store on every change.
/// A saved empty term counts as nothing saved.
pub struct SearchState {
    store: Arc<dyn KeyValueStore>,
    key: String,
    term: String,
}

impl SearchState {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &str, default_term: &str) -> Self {
        let term = match store.get_string(key) {
            Ok(Some(saved)) if !saved.is_empty() => saved,
            Ok(_) => default_term.to_string(),
            Err(e) => {
                log::warn!("Failed to read saved search term: {}", e);
                default_term.to_string()
            }
        };

        Self {
            store,
            key: key.to_string(),
            term,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn set(&mut self, term: &str) {
        if self.term == term {
            return;
        }
        self.term = term.to_string();
        if let Err(e) = self.store.set_string(&self.key, &self.term) {
            log::warn!("Failed to save search term: {}", e);
        }
    }
}
