//! Mezclar CLI
//!
//! Adapter blending and merge entry point for the mezclar library.
//!
//! # Usage
//!
//! ```bash
//! # Blend two adapters
//! mezclar blend --adapter-a ./lora-a --adapter-b ./lora-b --out-dir ./blend
//!
//! # Blend and merge into the base model
//! mezclar blend --adapter-a ./lora-a --adapter-b ./lora-b --out-dir ./blend \
//!     --base-model ./base --export-merged-dir ./merged
//!
//! # Scale adapters independently, then merge both
//! mezclar merge-scaled --base-model ./base --adapter-a ./lora-a \
//!     --adapter-b ./lora-b --export-dir ./merged --alpha-a 0.8 --alpha-b 1.0
//!
//! # Sequential merge, unscaled
//! mezclar merge-seq --base-model ./base --pt-adapter ./lora-pt \
//!     --sft-adapter ./lora-sft --export-dir ./merged
//! ```

use clap::Parser;
use mezclar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
