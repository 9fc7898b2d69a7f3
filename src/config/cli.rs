//! Core CLI types - Cli, Command, and per-workflow argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::precision::Precision;

/// Mezclar: LoRA adapter blending and merge tooling
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "mezclar")]
#[command(version)]
#[command(about = "Blend, scale, and merge LoRA adapters for a shared base model")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Blend two adapters linearly, optionally merging into the base model
    Blend(BlendArgs),

    /// Scale two adapters independently, then merge each into the base model
    MergeScaled(MergeScaledArgs),

    /// Merge two adapters sequentially into the base model, unscaled
    MergeSeq(MergeSeqArgs),
}

/// Arguments for the blend command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct BlendArgs {
    /// Directory of adapter A
    #[arg(long)]
    pub adapter_a: PathBuf,

    /// Directory of adapter B
    #[arg(long)]
    pub adapter_b: PathBuf,

    /// Output directory for the blended adapter
    #[arg(long)]
    pub out_dir: PathBuf,

    /// Global coefficient for adapter A
    #[arg(long, default_value_t = 0.5)]
    pub alpha_a: f32,

    /// Global coefficient for adapter B
    #[arg(long, default_value_t = 0.5)]
    pub alpha_b: f32,

    /// Attention-group coefficient for adapter A (requires --alpha-attn-b)
    #[arg(long)]
    pub alpha_attn_a: Option<f32>,

    /// Attention-group coefficient for adapter B (requires --alpha-attn-a)
    #[arg(long)]
    pub alpha_attn_b: Option<f32>,

    /// MLP-group coefficient for adapter A (requires --alpha-mlp-b)
    #[arg(long)]
    pub alpha_mlp_a: Option<f32>,

    /// MLP-group coefficient for adapter B (requires --alpha-mlp-a)
    #[arg(long)]
    pub alpha_mlp_b: Option<f32>,

    /// Base model directory; with --export-merged-dir, fold the blended
    /// adapter into it
    #[arg(long)]
    pub base_model: Option<PathBuf>,

    /// Directory to export the merged full model to
    #[arg(long)]
    pub export_merged_dir: Option<PathBuf>,

    /// Export precision (bf16, f16, f32); unrecognized values fall back to bf16
    #[arg(long, default_value = "bf16")]
    pub dtype: Precision,
}

/// Arguments for the merge-scaled command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct MergeScaledArgs {
    /// Base model directory
    #[arg(long)]
    pub base_model: PathBuf,

    /// Directory of adapter A
    #[arg(long)]
    pub adapter_a: PathBuf,

    /// Directory of adapter B
    #[arg(long)]
    pub adapter_b: PathBuf,

    /// Directory to export the merged full model to
    #[arg(long)]
    pub export_dir: PathBuf,

    /// Global scale for adapter A
    #[arg(long, default_value_t = 0.5)]
    pub alpha_a: f32,

    /// Global scale for adapter B
    #[arg(long, default_value_t = 0.5)]
    pub alpha_b: f32,

    /// Attention-group scale for adapter A
    #[arg(long)]
    pub alpha_attn_a: Option<f32>,

    /// Attention-group scale for adapter B
    #[arg(long)]
    pub alpha_attn_b: Option<f32>,

    /// MLP-group scale for adapter A
    #[arg(long)]
    pub alpha_mlp_a: Option<f32>,

    /// MLP-group scale for adapter B
    #[arg(long)]
    pub alpha_mlp_b: Option<f32>,

    /// Export precision (bf16, f16, f32); unrecognized values fall back to bf16
    #[arg(long, default_value = "bf16")]
    pub dtype: Precision,
}

/// Arguments for the merge-seq command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct MergeSeqArgs {
    /// Base model directory
    #[arg(long)]
    pub base_model: PathBuf,

    /// Pretraining adapter directory (applied first)
    #[arg(long)]
    pub pt_adapter: PathBuf,

    /// Supervised fine-tuning adapter directory (applied second)
    #[arg(long)]
    pub sft_adapter: PathBuf,

    /// Directory to export the merged full model to
    #[arg(long)]
    pub export_dir: PathBuf,

    /// Export precision (bf16, f16, f32); unrecognized values fall back to bf16
    #[arg(long, default_value = "bf16")]
    pub dtype: Precision,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
