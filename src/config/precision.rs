//! Numeric precision selector for base-model load and export.

use crate::adapter::TensorDtype;

/// Target precision for merged model export.
///
/// Parsing is lossy: an unrecognized selector falls back to the default
/// (bf16) instead of failing. This mirrors the behavior of the tooling this
/// utility replaces and keeps scripted invocations from breaking on typos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// bfloat16 — truncated-mantissa 16-bit, the usual LLM checkpoint dtype.
    #[default]
    Bf16,
    /// IEEE half precision.
    F16,
    /// Full 32-bit precision.
    F32,
}

impl Precision {
    /// Parse a selector string, falling back to the default on anything
    /// unrecognized.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bf16" | "bfloat16" => Precision::Bf16,
            "f16" | "fp16" | "float16" | "half" => Precision::F16,
            "f32" | "fp32" | "float32" => Precision::F32,
            _ => Precision::default(),
        }
    }

    /// Storage dtype used when exporting tensors at this precision.
    pub fn dtype(self) -> TensorDtype {
        match self {
            Precision::Bf16 => TensorDtype::Bf16,
            Precision::F16 => TensorDtype::F16,
            Precision::F32 => TensorDtype::F32,
        }
    }
}

impl std::str::FromStr for Precision {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Precision::parse_lossy(s))
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::Bf16 => write!(f, "bf16"),
            Precision::F16 => write!(f, "f16"),
            Precision::F32 => write!(f, "f32"),
        }
    }
}
