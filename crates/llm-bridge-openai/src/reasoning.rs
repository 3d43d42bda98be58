//! Reasoning-model detection and sampling-parameter reconciliation.
//!
//! Reasoning models accept only `temperature = 1.0` and reject `top_p`
//! outright. Mismatched caller values are reconciled here rather than
//! rejected, so the same options work unchanged across models.

use tracing::debug;

/// Model prefixes that require reasoning-model sampling constraints.
const REASONING_PREFIXES: &[&str] = &[
    "o1-", "o1-mini", "o1-preview", "o3-", "o3-mini", "o4-", "o4-mini", "gpt-5", "gpt-5-mini",
    "gpt-5-nano",
];

/// Whether `model` is a reasoning model. Azure deployments named after the
/// underlying model get the same treatment.
pub fn is_reasoning_model(model: &str) -> bool {
    REASONING_PREFIXES.iter().any(|p| model.starts_with(p))
}

/// The temperature actually transmitted for `model`. Reasoning models are
/// pinned to 1.0; a differing request is logged, not rejected.
pub fn effective_temperature(model: &str, requested: f64) -> f64 {
    if is_reasoning_model(model) {
        if (requested - 1.0).abs() > f64::EPSILON {
            debug!(
                model,
                requested_temperature = requested,
                forced_temperature = 1.0,
                "overriding temperature for reasoning model"
            );
        }
        return 1.0;
    }
    requested
}
