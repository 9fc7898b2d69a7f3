//! Blend and scale coefficients with per-group overrides.
//!
//! Group overrides are all-or-nothing: a blend override takes effect only
//! when both of its values were supplied, so the pair is modeled as a single
//! optional value rather than two independent optionals.

use super::classify::TensorGroup;

/// A pair of blend coefficients (one per adapter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoeffPair {
    /// Coefficient applied to adapter A's tensor.
    pub a: f32,
    /// Coefficient applied to adapter B's tensor.
    pub b: f32,
}

impl CoeffPair {
    /// Create a coefficient pair.
    pub fn new(a: f32, b: f32) -> Self {
        Self { a, b }
    }

    /// Build a pair from two optional values, present only when both are.
    ///
    /// A half-supplied override is treated as not overridden at all.
    pub fn from_parts(a: Option<f32>, b: Option<f32>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Self { a, b }),
            _ => None,
        }
    }
}

/// Coefficients for the blend operation: a global default pair plus
/// optional attention/MLP overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendCoeffs {
    default: CoeffPair,
    attention: Option<CoeffPair>,
    mlp: Option<CoeffPair>,
}

impl BlendCoeffs {
    /// Create blend coefficients with only a global default.
    pub fn new(default: CoeffPair) -> Self {
        Self { default, attention: None, mlp: None }
    }

    /// Set the attention-group override.
    pub fn with_attention(mut self, pair: Option<CoeffPair>) -> Self {
        self.attention = pair;
        self
    }

    /// Set the MLP-group override.
    pub fn with_mlp(mut self, pair: Option<CoeffPair>) -> Self {
        self.mlp = pair;
        self
    }

    /// Coefficient pair to apply to a tensor of the given group.
    pub fn resolve(&self, group: TensorGroup) -> CoeffPair {
        match group {
            TensorGroup::Attention => self.attention.unwrap_or(self.default),
            TensorGroup::Mlp => self.mlp.unwrap_or(self.default),
            TensorGroup::Other => self.default,
        }
    }
}

/// Coefficients for the scale operation: a global scalar plus optional
/// per-group scalars, each gated on its single value being present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleCoeffs {
    default: f32,
    attention: Option<f32>,
    mlp: Option<f32>,
}

impl ScaleCoeffs {
    /// Create scale coefficients with only a global default.
    pub fn new(default: f32) -> Self {
        Self { default, attention: None, mlp: None }
    }

    /// Set the attention-group scale.
    pub fn with_attention(mut self, scale: Option<f32>) -> Self {
        self.attention = scale;
        self
    }

    /// Set the MLP-group scale.
    pub fn with_mlp(mut self, scale: Option<f32>) -> Self {
        self.mlp = scale;
        self
    }

    /// Scalar to apply to a tensor of the given group.
    pub fn resolve(&self, group: TensorGroup) -> f32 {
        match group {
            TensorGroup::Attention => self.attention.unwrap_or(self.default),
            TensorGroup::Mlp => self.mlp.unwrap_or(self.default),
            TensorGroup::Other => self.default,
        }
    }
}
