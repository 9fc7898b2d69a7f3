//! CLI argument structures and option types.

mod cli;
mod precision;

pub use cli::{parse_args, BlendArgs, Cli, Command, MergeScaledArgs, MergeSeqArgs};
pub use precision::Precision;
