//! Dense base-model checkpoint: load, mutate, export.

use crate::adapter::{copy_aux_files, AdapterWeights, TensorData};
use crate::config::Precision;
use crate::error::{MezclarError, Result};
use std::path::{Path, PathBuf};

/// File name of the single-file checkpoint inside a base model directory.
pub const MODEL_WEIGHTS_FILE: &str = "model.safetensors";

/// Model configuration files copied verbatim on export when present.
const MODEL_CONFIG_FILES: [&str; 2] = ["config.json", "generation_config.json"];

/// A base model's dense weights, held in memory as f32 during folding.
///
/// The export precision is fixed at load time; all tensors are written at
/// that precision regardless of their dtype in the source checkpoint.
pub struct BaseModel {
    weights: AdapterWeights,
    precision: Precision,
    source_dir: PathBuf,
}

impl BaseModel {
    /// Load a base model from a directory containing `model.safetensors`.
    pub fn load(dir: impl AsRef<Path>, precision: Precision) -> Result<Self> {
        let dir = dir.as_ref();
        let checkpoint = dir.join(MODEL_WEIGHTS_FILE);
        if !checkpoint.is_file() {
            return Err(MezclarError::ModelNotFound { path: checkpoint });
        }

        Ok(Self {
            weights: AdapterWeights::load(checkpoint)?,
            precision,
            source_dir: dir.to_path_buf(),
        })
    }

    /// Tensor by parameter name.
    pub fn get(&self, name: &str) -> Option<&TensorData> {
        self.weights.get(name)
    }

    /// Mutable tensor by parameter name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TensorData> {
        self.weights.get_mut(name)
    }

    /// Number of tensors in the checkpoint.
    pub fn tensor_count(&self) -> usize {
        self.weights.len()
    }

    /// Total parameter count.
    pub fn param_count(&self) -> u64 {
        self.weights.iter().map(|(_, t)| t.len() as u64).sum()
    }

    /// Persist the model into `dir`: the checkpoint at the configured
    /// precision, plus the source model's config and tokenizer files.
    pub fn export(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| MezclarError::io(format!("creating {}", dir.display()), e))?;

        let dtype = self.precision.dtype();
        let mut out = AdapterWeights::new();
        for (name, t) in self.weights.iter() {
            out.insert(
                name.clone(),
                TensorData { dtype, shape: t.shape.clone(), values: t.values.clone() },
            );
        }
        out.save(dir.join(MODEL_WEIGHTS_FILE))?;

        for fname in MODEL_CONFIG_FILES {
            let src = self.source_dir.join(fname);
            if src.is_file() {
                let dst = dir.join(fname);
                std::fs::copy(&src, &dst)
                    .map_err(|e| MezclarError::io(format!("copying {}", src.display()), e))?;
            }
        }
        copy_aux_files(&self.source_dir, dir)?;

        Ok(())
    }
}
