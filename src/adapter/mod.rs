//! Adapter weight sets and the operations over them.
//!
//! A weight set maps parameter names to tensors, loaded from and saved to
//! PEFT-style `adapter_model.safetensors` files. Parameter names are
//! classified into attention / MLP / other groups, and blend or scale
//! coefficients are resolved per group.

mod classify;
mod coeffs;
mod combine;
mod files;
mod peft;
mod weights;

pub use classify::{classify_key, TensorGroup, ATTENTION_MARKERS, MLP_MARKERS};
pub use coeffs::{BlendCoeffs, CoeffPair, ScaleCoeffs};
pub use combine::{blend, scale};
pub use files::{copy_adapter_config, copy_aux_files, ADAPTER_CONFIG_FILE, AUX_FILES};
pub use peft::PeftAdapterConfig;
pub use weights::{AdapterWeights, TensorData, TensorDtype, ADAPTER_WEIGHTS_FILE};
