//! Minimal view of the PEFT `adapter_config.json` schema.
//!
//! Only the fields the merge engine needs are parsed; everything else in
//! the file is preserved by the passthrough copy in [`super::files`].

use super::files::ADAPTER_CONFIG_FILE;
use crate::error::{MezclarError, Result};
use serde::Deserialize;
use std::path::Path;

/// The subset of a PEFT adapter configuration required to fold the adapter
/// into base weights.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PeftAdapterConfig {
    /// LoRA rank.
    pub r: usize,
    /// LoRA alpha scaling parameter.
    pub lora_alpha: f32,
    /// Base model name or path, when recorded.
    #[serde(default)]
    pub base_model_name_or_path: Option<String>,
}

impl PeftAdapterConfig {
    /// Load the configuration from an adapter directory.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(ADAPTER_CONFIG_FILE);
        if !path.is_file() {
            return Err(MezclarError::AdapterFileNotFound { path });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| MezclarError::io(format!("reading {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| MezclarError::Serialization {
            message: format!("invalid {}: {e}", path.display()),
        })
    }

    /// Delta scaling factor applied when folding: `lora_alpha / r`.
    pub fn scaling(&self) -> f32 {
        self.lora_alpha / self.r as f32
    }
}
