//! Merge-seq command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::MergeSeqArgs;
use crate::error::Result;
use crate::merge::{fold_adapter, BaseModel};

/// Fold the pretraining adapter, then the SFT adapter, into the base model.
pub fn run_merge_seq(args: MergeSeqArgs, level: LogLevel) -> Result<()> {
    log(
        level,
        LogLevel::Normal,
        &format!("Loading base model {} ({})", args.base_model.display(), args.dtype),
    );
    let mut model = BaseModel::load(&args.base_model, args.dtype)?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Base model: {} tensors, {} params", model.tensor_count(), model.param_count()),
    );

    // The SFT adapter folds into the result of folding the PT adapter
    let folded_pt = fold_adapter(&mut model, &args.pt_adapter)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Folded {} ({folded_pt} modules)", args.pt_adapter.display()),
    );

    let folded_sft = fold_adapter(&mut model, &args.sft_adapter)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Folded {} ({folded_sft} modules)", args.sft_adapter.display()),
    );

    model.export(&args.export_dir)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Merged model written to {}", args.export_dir.display()),
    );

    Ok(())
}
