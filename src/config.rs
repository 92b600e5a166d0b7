//! Render settings shared by every chart.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::labels::LabelConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// TTF registered as the `sans-serif` family. When unset, a few common
    /// system locations are tried.
    pub font_path: Option<PathBuf>,
    /// Line-point labels placed around bar labels.
    pub labels: LabelConfig,
    /// Font size of bar and segment annotations.
    pub annotation_font_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 500,
            font_path: None,
            labels: LabelConfig::default(),
            annotation_font_size: 11,
        }
    }
}

impl RenderConfig {
    /// Read settings from a JSON file; missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&txt).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}
