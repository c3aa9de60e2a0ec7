//! Validated, self-correcting settings documents backed by a TOML file.
//!
//! A settings type declares its fields once (range, default, documentation)
//! via [`Settings::fields`]. Loading checks every field against those rules,
//! replaces anything missing or invalid with its default and writes the
//! corrected document back, so the file on disk always holds a valid,
//! commented configuration.

mod errors;
mod field;
mod settings_file;

pub use errors::SettingsError;
pub use field::{correct_document, Correction, CorrectionReason, FieldKind, FieldSpec};
pub use settings_file::{parse_settings, render_settings, SettingsFile};

use serde::{de::DeserializeOwned, Serialize};

/// A flat settings document with declared validation rules.
pub trait Settings: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human readable name, used in log messages.
    const NAME: &'static str;

    /// Field rules in document order. Keys must match the serde names.
    fn fields() -> &'static [FieldSpec];
}
