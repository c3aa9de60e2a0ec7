use std::fmt;
use toml_edit::{value as toml_value, DocumentMut, Item};

/// Type, default and accepted values of a single settings field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Floating point value within `min..=max`. Integers are accepted.
    Float { default: f32, min: f32, max: f32 },
    /// String value accepted by `accepts`.
    Text {
        default: &'static str,
        accepts: fn(&str) -> bool,
    },
    Bool { default: bool },
}

/// Rule for one top-level key of a settings document.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub doc: &'static str,
    /// Section heading written above this key. Extra lines become notes.
    pub heading: Option<&'static str>,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn float(key: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self {
            key,
            doc: "",
            heading: None,
            kind: FieldKind::Float { default, min, max },
        }
    }

    pub const fn text(key: &'static str, default: &'static str, accepts: fn(&str) -> bool) -> Self {
        Self {
            key,
            doc: "",
            heading: None,
            kind: FieldKind::Text { default, accepts },
        }
    }

    pub const fn boolean(key: &'static str, default: bool) -> Self {
        Self {
            key,
            doc: "",
            heading: None,
            kind: FieldKind::Bool { default },
        }
    }

    pub const fn doc(mut self, doc: &'static str) -> Self {
        self.doc = doc;
        self
    }

    pub const fn heading(mut self, heading: &'static str) -> Self {
        self.heading = Some(heading);
        self
    }

    /// The default value as a TOML item.
    pub fn default_item(&self) -> Item {
        match self.kind {
            FieldKind::Float { default, .. } => toml_value(tidy_float(default as f64)),
            FieldKind::Text { default, .. } => toml_value(default),
            FieldKind::Bool { default } => toml_value(default),
        }
    }

    /// Returns why `item` is not acceptable for this field, if it isn't.
    pub fn check(&self, item: &Item) -> Option<CorrectionReason> {
        match self.kind {
            FieldKind::Float { min, max, .. } => {
                let number = item
                    .as_float()
                    .or_else(|| item.as_integer().map(|i| i as f64));
                match number {
                    None => Some(CorrectionReason::WrongType),
                    Some(v) if v.is_nan() || v < min as f64 || v > max as f64 => {
                        Some(CorrectionReason::OutOfRange(v))
                    }
                    Some(_) => None,
                }
            }
            FieldKind::Text { accepts, .. } => match item.as_str() {
                None => Some(CorrectionReason::WrongType),
                Some(s) if !accepts(s) => Some(CorrectionReason::Rejected(s.to_string())),
                Some(_) => None,
            },
            FieldKind::Bool { .. } => match item.as_bool() {
                None => Some(CorrectionReason::WrongType),
                Some(_) => None,
            },
        }
    }

    /// Comment lines written in front of the key.
    pub(crate) fn comment_block(&self, first: bool) -> String {
        let mut block = String::new();
        if let Some(heading) = self.heading {
            if !first {
                block.push('\n');
            }
            for (i, line) in heading.lines().enumerate() {
                if i == 0 {
                    block.push_str(&format!("# ========== {line} ==========\n"));
                } else {
                    block.push_str(&format!("# {line}\n"));
                }
            }
            block.push('\n');
        }
        let summary = match self.kind {
            FieldKind::Float { default, min, max } => {
                format!("(default: {default}, range: {min} to {max})")
            }
            FieldKind::Text { default, .. } => format!("(default: \"{default}\")"),
            FieldKind::Bool { default } => format!("(default: {default})"),
        };
        if self.doc.is_empty() {
            block.push_str(&format!("# {summary}\n"));
        } else {
            block.push_str(&format!("# {} {summary}\n", self.doc));
        }
        block
    }
}

/// Why a field was reset to its default.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionReason {
    Missing,
    WrongType,
    OutOfRange(f64),
    Rejected(String),
    /// Key is not part of the document and was dropped.
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub key: String,
    pub reason: CorrectionReason,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            CorrectionReason::Missing => write!(f, "'{}' is missing, using default", self.key),
            CorrectionReason::WrongType => {
                write!(f, "'{}' has the wrong type, using default", self.key)
            }
            CorrectionReason::OutOfRange(v) => {
                write!(f, "'{}' = {v} is out of range, using default", self.key)
            }
            CorrectionReason::Rejected(s) => {
                write!(f, "'{}' = \"{s}\" is not accepted, using default", self.key)
            }
            CorrectionReason::Unknown => write!(f, "unknown key '{}' removed", self.key),
        }
    }
}

/// Brings `doc` in line with `fields` in place and reports every change.
pub fn correct_document(doc: &mut DocumentMut, fields: &[FieldSpec]) -> Vec<Correction> {
    let table = doc.as_table_mut();
    let mut corrections = Vec::new();

    let unknown: Vec<String> = table
        .iter()
        .map(|(key, _)| key.to_string())
        .filter(|key| !fields.iter().any(|field| field.key == key.as_str()))
        .collect();
    for key in unknown {
        table.remove(&key);
        corrections.push(Correction {
            key,
            reason: CorrectionReason::Unknown,
        });
    }

    for field in fields {
        let reason = match table.get(field.key) {
            None => Some(CorrectionReason::Missing),
            Some(item) => field.check(item),
        };
        if let Some(reason) = reason {
            table.insert(field.key, field.default_item());
            corrections.push(Correction {
                key: field.key.to_string(),
                reason,
            });
        }
    }

    corrections
}

/// Shortest single-precision representation, so `0.3_f32` is written as `0.3`.
pub(crate) fn tidy_float(v: f64) -> f64 {
    (v as f32).to_string().parse().unwrap_or(v)
}
