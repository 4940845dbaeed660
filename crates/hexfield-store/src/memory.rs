use std::collections::BTreeMap;

use hexfield::field::Template;

use crate::{Result, StoreError, TemplateStore, normalize_name};

/// In-memory template store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    templates: BTreeMap<String, Template>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        normalize_name(name).is_ok_and(|name| self.templates.contains_key(&name))
    }

    /// Templates in name order.
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }
}

impl TemplateStore for MemoryStore {
    fn save(&mut self, mut template: Template) -> Result<()> {
        template.name = normalize_name(&template.name)?;
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Template> {
        let name = normalize_name(name)?;
        self.templates
            .get(&name)
            .cloned()
            .ok_or(StoreError::NotFound(name))
    }

    fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.templates.keys().cloned().collect())
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let name = normalize_name(name)?;
        Ok(self.templates.remove(&name).is_some())
    }
}
