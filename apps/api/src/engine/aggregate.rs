//! Weighted aggregation — combines normalized factors into one composite.
//!
//! Missing factors keep their neutral default in the per-factor breakdown
//! but give their weight to the present factors, redistributed
//! proportionally so active weights always sum to 1.0.

/// One factor's contribution as seen by the aggregator.
#[derive(Debug, Clone, Copy)]
pub struct WeightedInput {
    pub normalized: f64,
    pub declared_weight: f64,
    pub missing: bool,
}

/// Tolerance for weight-sum checks, here and at rubric validation.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Redistributes the weights of missing factors proportionally across the
/// present ones. Returns one effective weight per input, in order.
///
/// When every factor is missing (or present weight is all zero) the
/// declared weights are kept, so the composite degrades to the weighted
/// neutral defaults instead of failing.
pub fn effective_weights(inputs: &[WeightedInput]) -> Vec<f64> {
    let present_sum: f64 = inputs
        .iter()
        .filter(|i| !i.missing)
        .map(|i| i.declared_weight)
        .sum();

    if present_sum <= WEIGHT_TOLERANCE {
        return inputs.iter().map(|i| i.declared_weight).collect();
    }

    inputs
        .iter()
        .map(|i| {
            if i.missing {
                0.0
            } else {
                i.declared_weight / present_sum
            }
        })
        .collect()
}

/// Weighted sum at full precision. Rounding for display happens in the
/// engine façade; the exact value is kept for comparator tie-breaking.
pub fn aggregate(inputs: &[WeightedInput]) -> f64 {
    let weights = effective_weights(inputs);
    inputs
        .iter()
        .zip(weights.iter())
        .map(|(i, w)| i.normalized * w)
        .sum()
}
