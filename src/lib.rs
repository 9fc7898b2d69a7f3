//! Mezclar — LoRA adapter blending and merge tooling
//!
//! Combines parameter-efficient fine-tuning adapters (PEFT/LoRA weight
//! deltas) produced for a shared base model:
//! - Linearly blend two adapters with per-tensor-group coefficients
//! - Scale two adapters independently, then merge each into the base model
//! - Sequentially merge two adapters (e.g. pretraining then SFT) into the
//!   base model
//!
//! # Usage
//!
//! ```bash
//! # Blend two adapters 50/50, boosting adapter A on attention projections
//! mezclar blend --adapter-a ./lora-pt --adapter-b ./lora-sft \
//!     --out-dir ./lora-blend --alpha-attn-a 0.7 --alpha-attn-b 0.3
//!
//! # Scale adapters independently and fold both into the base model
//! mezclar merge-scaled --base-model ./llama-3-8b \
//!     --adapter-a ./lora-pt --adapter-b ./lora-sft \
//!     --export-dir ./merged --alpha-a 0.8 --alpha-b 1.0
//!
//! # Sequential merge without scaling
//! mezclar merge-seq --base-model ./llama-3-8b \
//!     --pt-adapter ./lora-pt --sft-adapter ./lora-sft --export-dir ./merged
//! ```
//!
//! Adapter directories follow the PEFT layout (`adapter_model.safetensors`
//! plus `adapter_config.json`); base model directories hold a single-file
//! `model.safetensors` checkpoint with its config and tokenizer files.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod error;
pub mod merge;

pub use error::{MezclarError, Result};
