//! Integration tests for SettingsFile:
//! - Creating a commented default document
//! - Correcting invalid documents and persisting the result
//! - Detecting external modifications

use std::fs;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use settings::{parse_settings, render_settings, FieldSpec, Settings, SettingsFile};
use tempfile::TempDir;
use test_log::test;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
struct Audio {
    volume: f32,
    pitch: f32,
    device: String,
    muted: bool,
}

impl Default for Audio {
    fn default() -> Self {
        Self {
            volume: 0.8,
            pitch: -2.5,
            device: "default".into(),
            muted: false,
        }
    }
}

const AUDIO_FIELDS: &[FieldSpec] = &[
    FieldSpec::float("volume", 0.8, 0.0, 1.0)
        .doc("Master volume")
        .heading("Audio Settings\nValues are linear"),
    FieldSpec::float("pitch", -2.5, -12.0, 12.0).doc("Pitch shift in semitones"),
    FieldSpec::text("device", "default", |s| !s.is_empty()).doc("Output device"),
    FieldSpec::boolean("muted", false).heading("Misc Settings"),
];

impl Settings for Audio {
    const NAME: &'static str = "audio";

    fn fields() -> &'static [FieldSpec] {
        AUDIO_FIELDS
    }
}

fn bump_mtime(path: &std::path::Path) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(30))
        .unwrap();
}

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config").join("audio.toml");

    let file = SettingsFile::<Audio>::open(&path).unwrap();

    assert_eq!(file.value(), &Audio::default());
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("# ========== Audio Settings ==========\n# Values are linear\n"));
    assert!(text.contains("# Master volume (default: 0.8, range: 0 to 1)\nvolume = 0.8\n"));
    assert!(text.contains("\n# ========== Misc Settings ==========\n"));
    assert!(!file.has_changed());
}

#[test]
fn out_of_range_field_is_reset_and_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audio.toml");
    fs::write(
        &path,
        "volume = 4.0\npitch = 3\ndevice = \"hdmi\"\nmuted = true\n",
    )
    .unwrap();

    let file = SettingsFile::<Audio>::open(&path).unwrap();

    assert_eq!(file.value().volume, 0.8);
    assert_eq!(file.value().pitch, 3.0);
    assert_eq!(file.value().device, "hdmi");
    assert!(file.value().muted);

    let (reloaded, corrections) = parse_settings::<Audio>(&fs::read_to_string(&path).unwrap())
        .unwrap();
    assert!(corrections.is_empty(), "rewritten file should be valid: {corrections:?}");
    assert_eq!(&reloaded, file.value());
}

#[test]
fn missing_fields_are_filled_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audio.toml");
    fs::write(&path, "volume = 0.5\n").unwrap();

    let file = SettingsFile::<Audio>::open(&path).unwrap();
    assert_eq!(file.value().volume, 0.5);
    assert_eq!(file.value().device, "default");

    let written = fs::read_to_string(&path).unwrap();
    let again = SettingsFile::<Audio>::open(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), written);
    assert_eq!(again.value(), file.value());
}

#[test]
fn unparsable_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audio.toml");
    fs::write(&path, "volume = = nope").unwrap();

    let file = SettingsFile::<Audio>::open(&path).unwrap();

    assert_eq!(file.value(), &Audio::default());
    let (_, corrections) =
        parse_settings::<Audio>(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(corrections.is_empty());
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audio.toml");
    let mut file = SettingsFile::<Audio>::open(&path).unwrap();

    let custom = Audio {
        volume: 0.3,
        pitch: 11.75,
        device: "usb".into(),
        muted: true,
    };
    file.save(custom.clone()).unwrap();
    assert!(!file.has_changed());

    let reopened = SettingsFile::<Audio>::open(&path).unwrap();
    assert_eq!(reopened.value(), &custom);
    assert!(render_settings(&custom).unwrap().contains("volume = 0.3\n"));
}

#[test]
fn external_edit_is_detected_and_reloaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audio.toml");
    let mut file = SettingsFile::<Audio>::open(&path).unwrap();
    assert!(file.reload_if_changed().unwrap().is_none());

    fs::write(&path, "volume = 0.25\npitch = 0.0\ndevice = \"default\"\nmuted = false\n")
        .unwrap();
    bump_mtime(&path);
    assert!(file.has_changed());

    let reloaded = file.reload_if_changed().unwrap().cloned();
    assert_eq!(reloaded.map(|a| a.volume), Some(0.25));
    assert!(!file.has_changed());
    assert!(file.reload_if_changed().unwrap().is_none());
}

#[test]
fn deleted_file_is_not_a_change() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audio.toml");
    let file = SettingsFile::<Audio>::open(&path).unwrap();

    fs::remove_file(&path).unwrap();
    assert!(!file.has_changed());
}

#[test]
fn force_regenerate_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audio.toml");
    let mut file = SettingsFile::<Audio>::open(&path).unwrap();
    file.save(Audio {
        muted: true,
        ..Audio::default()
    })
    .unwrap();

    file.force_regenerate().unwrap();

    assert_eq!(file.value(), &Audio::default());
    let reopened = SettingsFile::<Audio>::open(&path).unwrap();
    assert_eq!(reopened.value(), &Audio::default());
}
