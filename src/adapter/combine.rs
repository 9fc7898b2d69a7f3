//! Weight-set combination: blend and scale.

use super::classify::classify_key;
use super::coeffs::{BlendCoeffs, ScaleCoeffs};
use super::weights::{AdapterWeights, TensorData};
use crate::error::{MezclarError, Result};

/// Verify two weight sets cover exactly the same parameter names.
///
/// Runs before any tensor arithmetic; the error lists, sorted, the keys
/// absent from each side.
fn validate_key_sets(a: &AdapterWeights, b: &AdapterWeights) -> Result<()> {
    let mut missing_in_a: Vec<String> =
        b.keys().filter(|k| a.get(k).is_none()).cloned().collect();
    let mut missing_in_b: Vec<String> =
        a.keys().filter(|k| b.get(k).is_none()).cloned().collect();

    if missing_in_a.is_empty() && missing_in_b.is_empty() {
        return Ok(());
    }

    missing_in_a.sort();
    missing_in_b.sort();
    Err(MezclarError::KeyMismatch { missing_in_a, missing_in_b })
}

/// Linearly blend two weight sets.
///
/// For each key `k`, the result is `coeff.a * a[k] + coeff.b * b[k]`
/// element-wise, with the coefficient pair resolved from the key's group.
/// Requires identical key sets and, per key, identical shapes; the result
/// keeps each tensor's shape and the dtype of adapter A's tensor. Inputs
/// are not mutated.
pub fn blend(a: &AdapterWeights, b: &AdapterWeights, coeffs: &BlendCoeffs) -> Result<AdapterWeights> {
    validate_key_sets(a, b)?;

    let mut out = AdapterWeights::new();
    for (name, ta) in a.iter() {
        let tb = b.get(name).expect("key sets validated equal");
        if ta.shape != tb.shape {
            return Err(MezclarError::ShapeMismatch {
                name: name.clone(),
                expected: ta.shape.clone(),
                actual: tb.shape.clone(),
            });
        }

        let pair = coeffs.resolve(classify_key(name));
        let values = &ta.values * pair.a + &tb.values * pair.b;
        out.insert(name.clone(), TensorData { dtype: ta.dtype, shape: ta.shape.clone(), values });
    }

    Ok(out)
}

/// Scale a weight set by per-group scalars.
///
/// Each tensor becomes `s * w[k]` element-wise with `s` resolved from the
/// key's group. Returns a new weight set with identical keys, shapes, and
/// dtypes; the input is not mutated.
pub fn scale(w: &AdapterWeights, coeffs: &ScaleCoeffs) -> AdapterWeights {
    let mut out = AdapterWeights::new();
    for (name, t) in w.iter() {
        let s = coeffs.resolve(classify_key(name));
        out.insert(
            name.clone(),
            TensorData { dtype: t.dtype, shape: t.shape.clone(), values: &t.values * s },
        );
    }
    out
}
