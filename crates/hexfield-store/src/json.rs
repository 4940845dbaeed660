//! Template store backed by a single JSON document on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use hexfield::{field::Template, serde::TemplateDef};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{MemoryStore, Result, StoreError, TemplateStore};

/// Store file used when no path is configured.
pub const DEFAULT_STORE_PATH: &str = "templates.json";

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    templates: Vec<TemplateDef>,
}

/// File-backed template store.
///
/// The whole document is loaded on [JsonFileStore::open] and rewritten on
/// every change. Writes go to a sibling `.tmp` file which is then renamed
/// over the store, so a failed write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    templates: MemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; the file
    /// is created on the first change.
    ///
    /// A document with a blank or repeated template name is rejected rather
    /// than loaded, since the next write would drop the affected entries.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let templates = if path.exists() {
            let data = fs::read_to_string(&path)?;
            let document: StoreDocument = serde_json::from_str(&data)?;
            load_document(document)?
        } else {
            MemoryStore::new()
        };

        info!(
            "Opened template store {}: {} templates",
            path.display(),
            templates.len()
        );

        Ok(Self { path, templates })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let document = StoreDocument {
            version: FORMAT_VERSION,
            templates: self.templates.templates().map(TemplateDef::from).collect(),
        };
        let data = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp_path);
        })?;

        debug!("Wrote template store {}", self.path.display());

        Ok(())
    }
}

fn load_document(document: StoreDocument) -> Result<MemoryStore> {
    let mut templates = MemoryStore::new();

    for def in document.templates {
        let template = Template::from(def);
        if template.name.trim().is_empty() {
            warn!("Template store contains a template without a name");
            return Err(StoreError::EmptyName);
        }
        if templates.contains(&template.name) {
            warn!("Template store contains {} more than once", template.name.trim());
            return Err(StoreError::DuplicateName(template.name.trim().to_string()));
        }
        templates.save(template)?;
    }

    Ok(templates)
}

impl TemplateStore for JsonFileStore {
    fn save(&mut self, template: Template) -> Result<()> {
        let name = template.name.trim().to_string();
        let field_count = template.fields.len();
        let previous = self.templates.clone();

        self.templates.save(template)?;
        if let Err(err) = self.persist() {
            self.templates = previous;
            return Err(err);
        }

        info!("Saved template {} ({} fields)", name, field_count);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Template> {
        self.templates.load(name)
    }

    fn list_names(&self) -> Result<Vec<String>> {
        self.templates.list_names()
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let previous = self.templates.clone();

        if !self.templates.delete(name)? {
            return Ok(false);
        }
        if let Err(err) = self.persist() {
            self.templates = previous;
            return Err(err);
        }

        info!("Deleted template {}", name.trim());
        Ok(true)
    }
}
