//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Recording settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Sampling frequency in Hz (valid range: 1.0 - 1000.0)
    #[serde(default = "default_frequency")]
    pub frequency_hz: f64,

    /// Directory for tables whose name comes from `filename_template`
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// chrono format string used to name recordings without an explicit path
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Table played back when no file is given
    #[serde(default = "default_file")]
    pub default_file: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            frequency_hz: default_frequency(),
            output_directory: default_output_directory(),
            filename_template: default_filename_template(),
            default_file: default_file(),
        }
    }
}

/// Headless canvas settings used by the recorder's live view and by playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas width in pixels (valid range: 16 - 8192)
    #[serde(default = "default_canvas_size")]
    pub width: u32,

    /// Canvas height in pixels (valid range: 16 - 8192)
    #[serde(default = "default_canvas_size")]
    pub height: u32,

    /// Pen thickness in pixels (valid range: 1 - 20)
    #[serde(default = "default_stroke_thickness")]
    pub stroke_thickness: u32,

    /// Pen intensity, 0 is black
    #[serde(default = "default_stroke_gray")]
    pub stroke_gray: u8,

    #[serde(default = "default_background_gray")]
    pub background_gray: u8,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_size(),
            height: default_canvas_size(),
            stroke_thickness: default_stroke_thickness(),
            stroke_gray: default_stroke_gray(),
            background_gray: default_background_gray(),
        }
    }
}

fn default_frequency() -> f64 {
    50.0
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./data")
}

fn default_filename_template() -> String {
    "trajectory_%Y-%m-%d_%H%M%S".to_string()
}

fn default_file() -> PathBuf {
    PathBuf::from("./data/data_sample.csv")
}

fn default_canvas_size() -> u32 {
    512
}

fn default_stroke_thickness() -> u32 {
    3
}

fn default_stroke_gray() -> u8 {
    0
}

fn default_background_gray() -> u8 {
    255
}
