//! Folding a PEFT adapter's low-rank delta into dense base weights.

use super::model::BaseModel;
use crate::adapter::{AdapterWeights, PeftAdapterConfig};
use crate::error::{MezclarError, Result};
use ndarray::ArrayView2;
use std::path::Path;

/// PEFT prefixes adapter keys with the wrapped model's attribute path.
const PEFT_KEY_PREFIX: &str = "base_model.model.";
const LORA_A_SUFFIX: &str = ".lora_A.weight";
const LORA_B_SUFFIX: &str = ".lora_B.weight";

/// Fold an adapter into the base model's weights in place.
///
/// For every `lora_A`/`lora_B` pair in the adapter, the target base tensor
/// `{module}.weight` becomes `W + (alpha/r) * (B @ A)`. Adapter keys that
/// are not part of a LoRA pair are ignored. Returns the number of modules
/// folded.
///
/// An unpaired `lora_A`, a pair without a matching base tensor, or
/// inconsistent shapes are fatal; the model is only mutated per-module
/// after that module's inputs validate.
pub fn fold_adapter(model: &mut BaseModel, adapter_dir: &Path) -> Result<usize> {
    let weights = AdapterWeights::load_dir(adapter_dir)?;
    let config = PeftAdapterConfig::load(adapter_dir)?;
    let scaling = config.scaling();

    // Sorted for deterministic error reporting across runs
    let mut a_keys: Vec<&String> =
        weights.keys().filter(|k| k.ends_with(LORA_A_SUFFIX)).collect();
    a_keys.sort();

    let mut folded = 0;
    for a_key in a_keys {
        let module = a_key.strip_suffix(LORA_A_SUFFIX).expect("filtered on suffix");
        let b_key = format!("{module}{LORA_B_SUFFIX}");

        let ta = weights.get(a_key).expect("key from weights iteration");
        let tb = weights.get(&b_key).ok_or_else(|| {
            MezclarError::validation(format!("adapter has {a_key} but no {b_key}"))
        })?;

        if ta.shape.len() != 2 {
            return Err(MezclarError::validation(format!(
                "{a_key} must be a 2-D matrix, got shape {:?}",
                ta.shape
            )));
        }
        let (rank, d_in) = (ta.shape[0], ta.shape[1]);

        if tb.shape.len() != 2 {
            return Err(MezclarError::validation(format!(
                "{b_key} must be a 2-D matrix, got shape {:?}",
                tb.shape
            )));
        }
        let d_out = tb.shape[0];
        if tb.shape[1] != rank {
            return Err(MezclarError::ShapeMismatch {
                name: b_key.clone(),
                expected: vec![d_out, rank],
                actual: tb.shape.clone(),
            });
        }

        let module_path = module.strip_prefix(PEFT_KEY_PREFIX).unwrap_or(module);
        let target = format!("{module_path}.weight");

        let base = model.get(&target).ok_or_else(|| {
            MezclarError::validation(format!(
                "base model has no tensor '{target}' for adapter module '{module_path}'"
            ))
        })?;
        if base.shape != [d_out, d_in] {
            return Err(MezclarError::ShapeMismatch {
                name: target.clone(),
                expected: vec![d_out, d_in],
                actual: base.shape.clone(),
            });
        }

        let a = ArrayView2::from_shape(
            (rank, d_in),
            ta.values.as_slice().expect("owned tensor data is contiguous"),
        )
        .map_err(|e| MezclarError::validation(format!("reshaping {a_key}: {e}")))?;
        let b = ArrayView2::from_shape(
            (d_out, rank),
            tb.values.as_slice().expect("owned tensor data is contiguous"),
        )
        .map_err(|e| MezclarError::validation(format!("reshaping {b_key}: {e}")))?;

        // Delta in f32: scaling * (B @ A), row-major like the base tensor
        let delta = b.dot(&a);

        let base = model.get_mut(&target).expect("validated above");
        for (w, d) in base.values.iter_mut().zip(delta.iter()) {
            *w += scaling * d;
        }

        folded += 1;
    }

    Ok(folded)
}
