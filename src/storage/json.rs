//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable storage implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads entire file into memory once
//! - **Write**: O(n) - serializes and writes entire dataset
//! - **Best for**: < 10k instances, infrequent writes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::entity::{Program, SearchResults, TrackedEntityAttribute, TrackedEntityInstance};
use crate::domain::error::{Result, TeiSearchError};
use crate::domain::query::SearchQuery;
use crate::storage::backend::Storage;
use crate::storage::query;

/// JSON storage container format.
///
/// This is the top-level structure serialized to disk. Wraps the program
/// catalog, attribute definitions, and instances in a single object for better
/// JSON structure and future extensibility. Programs and attributes keep their
/// insertion order because it is also their selector and form order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// All programs, in selector order.
    #[serde(default)]
    programs: Vec<Program>,

    /// All attribute definitions, in form order.
    #[serde(default)]
    attributes: Vec<TrackedEntityAttribute>,

    /// All tracked-entity instances.
    #[serde(default)]
    instances: Vec<TrackedEntityInstance>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            programs: Vec::new(),
            attributes: Vec::new(),
            instances: Vec::new(),
        }
    }
}

/// JSON file storage backend.
///
/// Stores the full catalog in a human-readable JSON file with atomic writes.
/// The entire dataset is kept in memory and persisted on modifications.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It's designed to be owned by the single
/// search-worker thread, matching the application's threading model.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "programs": [
///     { "id": "prog-mch", "name": "Maternal and Child Health", "attribute_ids": ["first", "dob"] }
///   ],
///   "attributes": [
///     { "id": "first", "label": "First name", "value_type": "Text", "options": [] }
///   ],
///   "instances": [
///     {
///       "id": "tei-1",
///       "org_unit": "Clinic A",
///       "programs": ["prog-mch"],
///       "values": { "first": "Awino" },
///       "last_updated": 1234567890
///     }
///   ]
/// }
/// ```
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// If the file exists, loads existing data. Otherwise creates a new empty storage.
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use teisearch::storage::JsonStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonStorage::new(PathBuf::from("/tmp/entities.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            tracing::debug!(parent = ?parent, "creating parent directory");
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            tracing::debug!("loading existing data");
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(
            program_count = data.programs.len(),
            attribute_count = data.attributes.len(),
            instance_count = data.instances.len(),
            "storage initialized"
        );

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Loads storage data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    fn load_from_file(path: &PathBuf) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| TeiSearchError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            programs = data.programs.len(),
            attributes = data.attributes.len(),
            instances = data.instances.len(),
            "loaded storage data"
        );

        Ok(data)
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then atomically renames it to the target path.
    /// This ensures the file is never left in a corrupt state, even if the process crashes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - JSON serialization fails (should never happen with valid data)
    /// - Temporary file cannot be written
    /// - Rename operation fails (rare on POSIX systems)
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        tracing::debug!(path = ?self.file_path, "saving storage data");

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| TeiSearchError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!("storage saved successfully");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn programs(&self) -> Result<Vec<Program>> {
        let _span = tracing::debug_span!("json_programs").entered();

        let programs = self.data.programs.clone();

        tracing::debug!(count = programs.len(), "retrieved programs");
        Ok(programs)
    }

    fn attributes(&self) -> Result<Vec<TrackedEntityAttribute>> {
        let _span = tracing::debug_span!("json_attributes").entered();

        let attributes = self.data.attributes.clone();

        tracing::debug!(count = attributes.len(), "retrieved attributes");
        Ok(attributes)
    }

    fn attributes_for_program(&self, program_id: &str) -> Result<Vec<TrackedEntityAttribute>> {
        let _span =
            tracing::debug_span!("json_attributes_for_program", program_id = %program_id).entered();

        let program = self
            .data
            .programs
            .iter()
            .find(|p| p.id == program_id)
            .ok_or_else(|| TeiSearchError::Storage(format!("program not found: {program_id}")))?;

        let attributes: Vec<TrackedEntityAttribute> = program
            .attribute_ids
            .iter()
            .filter_map(|id| self.data.attributes.iter().find(|a| &a.id == id).cloned())
            .collect();

        tracing::debug!(count = attributes.len(), "retrieved program attributes");
        Ok(attributes)
    }

    fn search(&self, search_query: &SearchQuery) -> Result<SearchResults> {
        let _span = tracing::debug_span!("json_search",
            program = ?search_query.program,
            page = search_query.page
        )
        .entered();

        let results = query::execute(&self.data.attributes, &self.data.instances, search_query);

        tracing::debug!(total = results.pager.total, "search complete");
        Ok(results)
    }

    fn put_program(&mut self, program: &Program) -> Result<()> {
        let _span = tracing::debug_span!("json_put_program", program_id = %program.id).entered();

        if let Some(existing) = self.data.programs.iter_mut().find(|p| p.id == program.id) {
            tracing::debug!("updating existing program");
            existing.clone_from(program);
        } else {
            tracing::debug!("inserting new program");
            self.data.programs.push(program.clone());
        }

        self.dirty = true;
        self.save_to_file()
    }

    fn put_attribute(&mut self, attribute: &TrackedEntityAttribute) -> Result<()> {
        let _span =
            tracing::debug_span!("json_put_attribute", attribute_id = %attribute.id).entered();

        if let Some(existing) = self
            .data
            .attributes
            .iter_mut()
            .find(|a| a.id == attribute.id)
        {
            tracing::debug!("updating existing attribute");
            existing.clone_from(attribute);
        } else {
            tracing::debug!("inserting new attribute");
            self.data.attributes.push(attribute.clone());
        }

        self.dirty = true;
        self.save_to_file()
    }

    fn put_instance(&mut self, instance: &TrackedEntityInstance) -> Result<()> {
        let _span = tracing::debug_span!("json_put_instance", instance_id = %instance.id).entered();

        if let Some(existing) = self
            .data
            .instances
            .iter_mut()
            .find(|i| i.id == instance.id)
        {
            tracing::debug!("updating existing instance");
            existing.clone_from(instance);
        } else {
            tracing::debug!("inserting new instance");
            self.data.instances.push(instance.clone());
        }

        self.dirty = true;
        self.save_to_file()
    }

    fn put_instances_batch(&mut self, instances: &[TrackedEntityInstance]) -> Result<usize> {
        let _span =
            tracing::debug_span!("json_put_instances_batch", count = instances.len()).entered();

        for instance in instances {
            if let Some(existing) = self
                .data
                .instances
                .iter_mut()
                .find(|i| i.id == instance.id)
            {
                existing.clone_from(instance);
            } else {
                self.data.instances.push(instance.clone());
            }
        }

        self.dirty = true;
        self.save_to_file()?;

        tracing::debug!(stored = instances.len(), "batch stored");
        Ok(instances.len())
    }

    fn save(&mut self) -> Result<()> {
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    /// Ensures data is saved on drop, even if the user forgot to call save explicitly.
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
