//! Blend command implementation

use crate::adapter::{blend, copy_adapter_config, AdapterWeights, BlendCoeffs, CoeffPair};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::BlendArgs;
use crate::error::Result;
use crate::merge::{fold_adapter, BaseModel};

pub fn run_blend(args: BlendArgs, level: LogLevel) -> Result<()> {
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Blending {} and {} (alpha_a={}, alpha_b={})",
            args.adapter_a.display(),
            args.adapter_b.display(),
            args.alpha_a,
            args.alpha_b
        ),
    );

    let wa = AdapterWeights::load_dir(&args.adapter_a)?;
    let wb = AdapterWeights::load_dir(&args.adapter_b)?;
    log(
        level,
        LogLevel::Verbose,
        &format!("  Loaded {} tensors from A, {} from B", wa.len(), wb.len()),
    );

    let coeffs = BlendCoeffs::new(CoeffPair::new(args.alpha_a, args.alpha_b))
        .with_attention(CoeffPair::from_parts(args.alpha_attn_a, args.alpha_attn_b))
        .with_mlp(CoeffPair::from_parts(args.alpha_mlp_a, args.alpha_mlp_b));

    let blended = blend(&wa, &wb, &coeffs)?;

    blended.save_dir(&args.out_dir)?;
    copy_adapter_config(&args.adapter_b, &args.out_dir)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Blended adapter written to {}", args.out_dir.display()),
    );

    // Merged-model export runs only when both the base model and the
    // export target were given
    if let (Some(base_model), Some(export_dir)) = (&args.base_model, &args.export_merged_dir) {
        log(
            level,
            LogLevel::Normal,
            &format!("Merging into base model {} ({})", base_model.display(), args.dtype),
        );

        let mut model = BaseModel::load(base_model, args.dtype)?;
        log(
            level,
            LogLevel::Verbose,
            &format!("  Base model: {} tensors, {} params", model.tensor_count(), model.param_count()),
        );

        let folded = fold_adapter(&mut model, &args.out_dir)?;
        log(level, LogLevel::Verbose, &format!("  Folded {folded} modules"));

        model.export(export_dir)?;
        log(
            level,
            LogLevel::Normal,
            &format!("Merged model written to {}", export_dir.display()),
        );
    }

    Ok(())
}
