//! Parameter-name classification into tensor groups.

/// Substrings identifying attention projection parameters.
pub const ATTENTION_MARKERS: [&str; 4] = ["q_proj", "k_proj", "v_proj", "o_proj"];

/// Substrings identifying MLP projection parameters.
pub const MLP_MARKERS: [&str; 4] = ["up_proj", "down_proj", "gate_proj", "gate_up_proj"];

/// Group a parameter belongs to, for coefficient resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TensorGroup {
    /// Attention projections (q/k/v/o).
    Attention,
    /// MLP projections (up/down/gate).
    Mlp,
    /// Everything else (embeddings, norms, heads, ...).
    Other,
}

/// Classify a parameter name by substring containment.
///
/// Attention markers are checked before MLP markers; a name matching
/// neither set is [`TensorGroup::Other`]. Matching is containment, not
/// path-segment equality, so a name embedding a marker inside a longer
/// token still matches.
pub fn classify_key(key: &str) -> TensorGroup {
    if ATTENTION_MARKERS.iter().any(|m| key.contains(m)) {
        TensorGroup::Attention
    } else if MLP_MARKERS.iter().any(|m| key.contains(m)) {
        TensorGroup::Mlp
    } else {
        TensorGroup::Other
    }
}
