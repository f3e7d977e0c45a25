//! Merging of partial configurations.
//!
//! List fields (env vars, volumes, ports) merge element-wise by their
//! natural key: an override entry replaces the base entry with the
//! same key, base entries without an override are retained, and new
//! keys append after the base order. Scalar fields follow a simple
//! override-wins rule.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::config::AppConfig;

/// Merge `overrides` onto `base`, producing a new configuration.
/// Neither input is mutated.
#[must_use]
pub fn configs(base: &AppConfig, overrides: &AppConfig) -> AppConfig {
    let mut result = base.clone();

    result.env_vars = merge_keyed(base.env_vars.as_deref(), overrides.env_vars.as_deref(), |e| {
        e.key.clone()
    });
    result.volumes = merge_keyed(base.volumes.as_deref(), overrides.volumes.as_deref(), |v| {
        v.container_path.clone()
    });
    result.ports = merge_keyed(base.ports.as_deref(), overrides.ports.as_deref(), |p| {
        p.container_port
    });

    result.description = overrides.description.clone().or(result.description);
    result.force_ssl = overrides.force_ssl.or(result.force_ssl);
    result.websocket_support = overrides.websocket_support.or(result.websocket_support);
    result.instance_count = overrides.instance_count.or(result.instance_count);
    result.container_http_port = overrides.container_http_port.or(result.container_http_port);
    result.redirect_domain = overrides.redirect_domain.clone().or(result.redirect_domain);
    result.custom_nginx_config = overrides
        .custom_nginx_config
        .clone()
        .or(result.custom_nginx_config);
    result.app_deploy_token_config = overrides
        .app_deploy_token_config
        .clone()
        .or(result.app_deploy_token_config);

    result
}

fn merge_keyed<T: Clone, K: Hash + Eq>(
    base: Option<&[T]>,
    overrides: Option<&[T]>,
    key: impl Fn(&T) -> K,
) -> Option<Vec<T>> {
    match (base, overrides) {
        (Some(base), Some(overrides)) => {
            let mut merged: IndexMap<K, T> = IndexMap::new();
            for item in base.iter().chain(overrides) {
                merged.insert(key(item), item.clone());
            }
            Some(merged.into_values().collect())
        }
        (None, Some(side)) | (Some(side), None) => Some(side.to_vec()),
        (None, None) => None,
    }
}
