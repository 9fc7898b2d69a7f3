//! Merge-scaled command implementation

use crate::adapter::{
    copy_adapter_config, copy_aux_files, scale, AdapterWeights, ScaleCoeffs,
};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::MergeScaledArgs;
use crate::error::Result;
use crate::merge::{fold_adapter, BaseModel};
use std::path::Path;

/// Scale one adapter into a destination directory, carrying its config and
/// any tokenizer/template files along.
fn scale_into(src_dir: &Path, dst_dir: &Path, coeffs: &ScaleCoeffs) -> Result<()> {
    let weights = AdapterWeights::load_dir(src_dir)?;
    let scaled = scale(&weights, coeffs);
    scaled.save_dir(dst_dir)?;
    copy_adapter_config(src_dir, dst_dir)?;
    copy_aux_files(src_dir, dst_dir)?;
    Ok(())
}

/// Scale adapters A and B independently, then fold each into the base model.
///
/// The scaled adapters land in `_tmp_adapter_a` / `_tmp_adapter_b` under the
/// export directory and are left in place after the merge.
pub fn run_merge_scaled(args: MergeScaledArgs, level: LogLevel) -> Result<()> {
    let tmp_a = args.export_dir.join("_tmp_adapter_a");
    let tmp_b = args.export_dir.join("_tmp_adapter_b");

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Scaling {} (alpha={}) and {} (alpha={})",
            args.adapter_a.display(),
            args.alpha_a,
            args.adapter_b.display(),
            args.alpha_b
        ),
    );

    let coeffs_a = ScaleCoeffs::new(args.alpha_a)
        .with_attention(args.alpha_attn_a)
        .with_mlp(args.alpha_mlp_a);
    let coeffs_b = ScaleCoeffs::new(args.alpha_b)
        .with_attention(args.alpha_attn_b)
        .with_mlp(args.alpha_mlp_b);

    scale_into(&args.adapter_a, &tmp_a, &coeffs_a)?;
    scale_into(&args.adapter_b, &tmp_b, &coeffs_b)?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Scaled adapters written to {} and {}", tmp_a.display(), tmp_b.display()),
    );

    log(
        level,
        LogLevel::Normal,
        &format!("Merging into base model {} ({})", args.base_model.display(), args.dtype),
    );
    let mut model = BaseModel::load(&args.base_model, args.dtype)?;

    // Order matters: B folds into the result of folding A
    let folded_a = fold_adapter(&mut model, &tmp_a)?;
    let folded_b = fold_adapter(&mut model, &tmp_b)?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Folded {folded_a} modules from A, then {folded_b} from B"),
    );

    model.export(&args.export_dir)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Merged model written to {}", args.export_dir.display()),
    );

    Ok(())
}
