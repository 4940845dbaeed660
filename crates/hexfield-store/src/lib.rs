//! Named storage for hexfield templates.
//!
//! A template is an ordered list of field definitions saved under a unique
//! name. Saving under an existing name replaces all of its fields; names are
//! trimmed and listed in lexicographic order.
//!
//! ```
//! use hexfield::field::{FieldDefinition, Template};
//! use hexfield_store::{MemoryStore, TemplateStore};
//!
//! let mut store = MemoryStore::new();
//! store
//!     .save(Template::new("header", vec![FieldDefinition::new("version", 1, 3)]))
//!     .unwrap();
//! assert_eq!(store.list_names().unwrap(), vec!["header".to_string()]);
//! assert_eq!(store.load("header").unwrap().fields.len(), 1);
//! ```

mod error;
mod json;
mod memory;

pub use error::{Result, StoreError};
pub use json::{DEFAULT_STORE_PATH, JsonFileStore};
pub use memory::MemoryStore;

use hexfield::field::Template;

/// Keyed storage of templates.
pub trait TemplateStore {
    /// Inserts or replaces the template with the same (trimmed) name.
    fn save(&mut self, template: Template) -> Result<()>;

    /// Loads the template stored under `name`.
    fn load(&self, name: &str) -> Result<Template>;

    /// All stored names, sorted.
    fn list_names(&self) -> Result<Vec<String>>;

    /// Removes the template stored under `name`. Returns false if there was none.
    fn delete(&mut self, name: &str) -> Result<bool>;
}

/// Trims `name` and rejects empty names.
pub(crate) fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(name.to_string())
}
