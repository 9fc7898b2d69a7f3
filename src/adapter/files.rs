//! Adapter directory auxiliary files: config passthrough and tokenizer copies.

use crate::error::{MezclarError, Result};
use std::path::Path;

/// File name of the adapter configuration inside an adapter directory.
pub const ADAPTER_CONFIG_FILE: &str = "adapter_config.json";

/// Tokenizer and template files carried along unchanged when present.
pub const AUX_FILES: [&str; 4] =
    ["tokenizer.json", "tokenizer_config.json", "special_tokens_map.json", "chat_template.jinja"];

/// Copy `adapter_config.json` from one adapter directory to another.
///
/// The configuration is passed through as-is (parsed and re-emitted as
/// pretty JSON, never reinterpreted). A missing source config is fatal.
pub fn copy_adapter_config(src_dir: &Path, dst_dir: &Path) -> Result<()> {
    let src = src_dir.join(ADAPTER_CONFIG_FILE);
    if !src.is_file() {
        return Err(MezclarError::AdapterFileNotFound { path: src });
    }

    let content = std::fs::read_to_string(&src)
        .map_err(|e| MezclarError::io(format!("reading {}", src.display()), e))?;
    let config: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        MezclarError::Serialization { message: format!("invalid {}: {e}", src.display()) }
    })?;
    let pretty = serde_json::to_string_pretty(&config).map_err(|e| {
        MezclarError::Serialization { message: format!("re-encoding adapter config: {e}") }
    })?;

    let dst = dst_dir.join(ADAPTER_CONFIG_FILE);
    std::fs::write(&dst, pretty)
        .map_err(|e| MezclarError::io(format!("writing {}", dst.display()), e))?;
    Ok(())
}

/// Copy the auxiliary tokenizer/template files that exist in `src_dir`
/// into `dst_dir`. Absent files are skipped, not an error.
pub fn copy_aux_files(src_dir: &Path, dst_dir: &Path) -> Result<()> {
    for fname in AUX_FILES {
        let src = src_dir.join(fname);
        if src.is_file() {
            let dst = dst_dir.join(fname);
            std::fs::copy(&src, &dst)
                .map_err(|e| MezclarError::io(format!("copying {}", src.display()), e))?;
        }
    }
    Ok(())
}
