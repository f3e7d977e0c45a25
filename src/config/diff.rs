//! Deciding whether a remote app definition needs an update call.

use crate::api::AppDefinition;
use crate::config::{AppConfig, validate};
use crate::error::PreviewResult;

/// Returns true when the deploy-token-enabled flag differs between the
/// current definition and the desired configuration, or when the
/// current definition, re-normalized through the validator, is not
/// structurally equal to the desired configuration.
///
/// This is full equality of both sides, not a subset check: a field
/// present on one side and absent on the other counts as a mismatch.
/// The consequence that extra remote fields force a save is kept on
/// purpose.
pub fn config_needs_saving(current: &AppDefinition, expected: &AppConfig) -> PreviewResult<bool> {
    let current_enabled = current.app_deploy_token_config.as_ref().map(|c| c.enabled);
    let expected_enabled = expected.app_deploy_token_config.as_ref().map(|c| c.enabled);
    if current_enabled != expected_enabled {
        return Ok(true);
    }

    let current_value = serde_json::to_value(current)?;
    let normalized = validate::app_config(&current_value);
    Ok(normalized != *expected)
}
