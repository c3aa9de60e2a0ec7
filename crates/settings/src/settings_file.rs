use crate::errors::SettingsError;
use crate::field::{correct_document, tidy_float, Correction, FieldKind};
use crate::Settings;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use toml_edit::{value as toml_value, DocumentMut, Item};
use tracing::{debug, error, info, warn};

/// Parses `text`, corrects it against `T::fields()` and deserializes the result.
pub fn parse_settings<T: Settings>(text: &str) -> Result<(T, Vec<Correction>), SettingsError> {
    let mut doc: DocumentMut = text.parse()?;
    let corrections = correct_document(&mut doc, T::fields());
    let value = toml::from_str(&doc.to_string())?;
    Ok((value, corrections))
}

/// Serializes `value` and decorates every key with its documentation comment.
pub fn render_settings<T: Settings>(value: &T) -> Result<String, SettingsError> {
    let mut doc: DocumentMut = toml::to_string(value)?.parse()?;
    let table = doc.as_table_mut();
    for (index, field) in T::fields().iter().enumerate() {
        if let FieldKind::Float { .. } = field.kind {
            if let Some(v) = table.get(field.key).and_then(Item::as_float) {
                table.insert(field.key, toml_value(tidy_float(v)));
            }
        }
        if let Some(mut key) = table.key_mut(field.key) {
            key.leaf_decor_mut()
                .set_prefix(field.comment_block(index == 0));
        }
    }
    Ok(doc.to_string())
}

/// A settings value mirrored to a TOML file.
///
/// Notes:
/// - Loading never keeps an invalid document on disk: corrections and parse
///   failures both lead to a rewrite.
/// - Persist writes a temporary file and renames it into place; an advisory lock
///   is acquired around the write for cross-process safety.
/// - The modification time seen after our own writes is remembered, so only
///   external edits count as changes.
pub struct SettingsFile<T: Settings> {
    path: PathBuf,
    value: T,
    modified: Option<SystemTime>,
}

impl<T: Settings> SettingsFile<T> {
    /// Open (or create) the settings file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let mut file = Self {
            path: path.into(),
            value: T::default(),
            modified: None,
        };
        file.load()?;
        Ok(file)
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the current value and write it out.
    pub fn save(&mut self, value: T) -> Result<(), SettingsError> {
        self.persist(value)?;
        info!(settings = T::NAME, path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// True if the file was modified by someone else since we last read or wrote it.
    /// A missing file is not a change.
    pub fn has_changed(&self) -> bool {
        self.path.exists() && modified_time(&self.path) != self.modified
    }

    /// Reload when [`has_changed`](Self::has_changed) says so.
    /// Returns the new value if a reload happened.
    pub fn reload_if_changed(&mut self) -> Result<Option<&T>, SettingsError> {
        if !self.has_changed() {
            return Ok(None);
        }
        info!(settings = T::NAME, "settings file changed on disk, reloading");
        self.load()?;
        Ok(Some(&self.value))
    }

    /// Delete the file and write a fresh default document.
    pub fn force_regenerate(&mut self) -> Result<(), SettingsError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!(settings = T::NAME, "deleted existing settings file to force regeneration");
        }
        self.persist(T::default())
    }

    fn load(&mut self) -> Result<(), SettingsError> {
        if !self.path.exists() {
            info!(
                settings = T::NAME,
                path = %self.path.display(),
                "no settings file found, creating defaults"
            );
            return self.persist(T::default());
        }

        let text = std::fs::read_to_string(&self.path)?;
        self.modified = modified_time(&self.path);

        match parse_settings::<T>(&text) {
            Ok((value, corrections)) if corrections.is_empty() => {
                debug!(settings = T::NAME, path = %self.path.display(), "settings loaded");
                self.value = value;
                Ok(())
            }
            Ok((value, corrections)) => {
                for correction in &corrections {
                    warn!(settings = T::NAME, "{correction}");
                }
                self.persist(value)
            }
            Err(SettingsError::Parse(err)) => {
                error!(
                    settings = T::NAME,
                    "failed to parse settings: {err}. Using defaults."
                );
                self.persist(T::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Helper that acquires an exclusive lock on the backing file (creates it if needed),
    /// runs the provided closure and releases the lock.
    fn with_lock<F, R>(&self, f: F) -> Result<R, SettingsError>
    where
        F: FnOnce(&File) -> Result<R, SettingsError>,
    {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let res = f(&file);
        file.unlock()?;
        res
    }

    fn persist(&mut self, value: T) -> Result<(), SettingsError> {
        let bytes = render_settings(&value)?.into_bytes();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        self.with_lock(|_file| {
            let mut f = File::create(&tmp)?;
            f.write_all(&bytes)?;
            f.sync_all()?;
            // atomic rename
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        })?;
        self.modified = modified_time(&self.path);
        self.value = value;
        Ok(())
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
