//! Field-by-field validation of untyped JSON into an [`AppConfig`].
//!
//! Malformed individual fields are dropped with a warning instead of
//! failing the whole operation; only a non-object top level is treated
//! as unusable. List fields accept either an explicit array of records
//! or a mapping keyed by the natural key, and both normalize to the
//! sorted array form.

use serde_json::Value;
use tracing::warn;

use crate::config::{AppConfig, EnvVar, PortMapping, Protocol, PublishMode, Volume};
use crate::error::{PreviewError, PreviewResult};

/// Validate an untyped JSON value into a partial [`AppConfig`].
///
/// Returns an empty config when the top-level value is not an object.
#[must_use]
pub fn app_config(value: &Value) -> AppConfig {
    let Value::Object(obj) = value else {
        warn!("invalid app config: expected object, got {}", json_type(value));
        return AppConfig::default();
    };

    let mut config = AppConfig::default();

    if let Some(raw) = obj.get("volumes") {
        config.volumes = volumes_field(raw);
    }
    if let Some(raw) = obj.get("ports") {
        config.ports = ports_field(raw);
    }
    if let Some(raw) = obj.get("envVars") {
        config.env_vars = env_vars_field(raw);
    }

    config.description = string_field(obj, "description");
    config.force_ssl = bool_field(obj, "forceSsl");
    config.websocket_support = bool_field(obj, "websocketSupport");
    config.instance_count = count_field(obj, "instanceCount");
    config.container_http_port = port_number_field(obj, "containerHttpPort");
    config.redirect_domain = string_field(obj, "redirectDomain");
    config.custom_nginx_config = string_field(obj, "customNginxConfig");

    config
}

/// Parse and validate an inline JSON config string.
///
/// Empty input yields an empty config; anything that is not a JSON
/// object at the top level is an error.
pub fn parse_config(config_json: &str) -> PreviewResult<AppConfig> {
    if config_json.is_empty() {
        return Ok(AppConfig::default());
    }

    let value: Value = serde_json::from_str(config_json)
        .map_err(|err| PreviewError::InvalidConfig(Box::new(err.into())))?;
    if !value.is_object() {
        return Err(PreviewError::InvalidConfig(Box::new(
            PreviewError::ConfigNotObject,
        )));
    }
    Ok(app_config(&value))
}

/// Load and validate a JSON config file.
pub fn load_config_from_path(path: &str) -> PreviewResult<AppConfig> {
    read_config_file(path).map_err(|source| PreviewError::ConfigFile {
        path: path.to_string(),
        source: Box::new(source),
    })
}

fn read_config_file(path: &str) -> PreviewResult<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    if !value.is_object() {
        return Err(PreviewError::ConfigNotObject);
    }
    Ok(app_config(&value))
}

/// Validate a single env var record.
#[must_use]
pub fn env_var(value: &Value) -> Option<EnvVar> {
    let Value::Object(obj) = value else {
        warn!("invalid env var: expected object, got {}", json_type(value));
        return None;
    };

    let Some(Value::String(key)) = obj.get("key") else {
        warn!("invalid env var key: expected string");
        return None;
    };
    let Some(Value::String(var_value)) = obj.get("value") else {
        warn!("invalid env var value: expected string");
        return None;
    };

    Some(EnvVar {
        key: key.clone(),
        value: var_value.clone(),
    })
}

/// Validate a single volume record. Invalid optional fields are
/// dropped with a warning; only a missing `containerPath` rejects the
/// whole record.
#[must_use]
pub fn volume(value: &Value) -> Option<Volume> {
    let Value::Object(obj) = value else {
        warn!("invalid volume: expected object, got {}", json_type(value));
        return None;
    };

    let Some(Value::String(container_path)) = obj.get("containerPath") else {
        warn!("invalid volume containerPath: expected string");
        return None;
    };

    Some(Volume {
        container_path: container_path.clone(),
        volume_name: optional_string(obj, "volumeName", "volume volumeName"),
        host_path: optional_string(obj, "hostPath", "volume hostPath"),
        mode: optional_string(obj, "mode", "volume mode"),
    })
}

/// Validate a single port record.
#[must_use]
pub fn port(value: &Value) -> Option<PortMapping> {
    let Value::Object(obj) = value else {
        warn!("invalid port: expected object, got {}", json_type(value));
        return None;
    };

    let Some(container_port) = obj.get("containerPort").and_then(as_port) else {
        warn!("invalid port containerPort: expected port number");
        return None;
    };
    let Some(host_port) = obj.get("hostPort").and_then(as_port) else {
        warn!("invalid port hostPort: expected port number");
        return None;
    };

    let protocol = match obj.get("protocol") {
        None => None,
        Some(Value::String(s)) if s == "tcp" => Some(Protocol::Tcp),
        Some(Value::String(s)) if s == "udp" => Some(Protocol::Udp),
        Some(other) => {
            warn!("invalid port protocol: expected \"tcp\" or \"udp\", got {other}");
            None
        }
    };

    let publish_mode = match obj.get("publishMode") {
        None => None,
        Some(Value::String(s)) if s == "ingress" => Some(PublishMode::Ingress),
        Some(Value::String(s)) if s == "host" => Some(PublishMode::Host),
        Some(other) => {
            warn!("invalid port publishMode: expected \"ingress\" or \"host\", got {other}");
            None
        }
    };

    Some(PortMapping {
        container_port,
        host_port,
        protocol,
        publish_mode,
    })
}

fn env_vars_field(raw: &Value) -> Option<Vec<EnvVar>> {
    let mut validated = match raw {
        Value::Array(items) => items.iter().filter_map(env_var).collect::<Vec<_>>(),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| EnvVar {
                key: key.clone(),
                value: coerce_string(value),
            })
            .collect(),
        other => {
            warn!("invalid envVars: expected array or object, got {}", json_type(other));
            return None;
        }
    };

    if validated.is_empty() {
        return None;
    }
    validated.sort_by(|a, b| a.key.cmp(&b.key));
    Some(validated)
}

fn volumes_field(raw: &Value) -> Option<Vec<Volume>> {
    let mut validated = match raw {
        Value::Array(items) => items.iter().filter_map(volume).collect::<Vec<_>>(),
        Value::Object(map) => map
            .iter()
            .map(|(container_path, path_or_volume)| {
                let target = coerce_string(path_or_volume);
                let mut entry = Volume {
                    container_path: container_path.clone(),
                    volume_name: None,
                    host_path: None,
                    mode: None,
                };
                if target.starts_with('/') {
                    entry.host_path = Some(target);
                } else {
                    entry.volume_name = Some(target);
                }
                entry
            })
            .collect(),
        other => {
            warn!("invalid volumes: expected array or object, got {}", json_type(other));
            return None;
        }
    };

    if validated.is_empty() {
        return None;
    }
    validated.sort_by(|a, b| a.container_path.cmp(&b.container_path));
    Some(validated)
}

fn ports_field(raw: &Value) -> Option<Vec<PortMapping>> {
    let mut validated = match raw {
        Value::Array(items) => items.iter().filter_map(port).collect::<Vec<_>>(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(container_port, host_port)| {
                let Ok(container_port) = container_port.parse::<u16>() else {
                    warn!("invalid port key '{container_port}': expected port number");
                    return None;
                };
                let Some(host_port) = as_port(host_port) else {
                    warn!("invalid host port for {container_port}: expected port number");
                    return None;
                };
                Some(PortMapping {
                    container_port,
                    host_port,
                    protocol: None,
                    publish_mode: None,
                })
            })
            .collect(),
        other => {
            warn!("invalid ports: expected array or object, got {}", json_type(other));
            return None;
        }
    };

    if validated.is_empty() {
        return None;
    }
    validated.sort_by_key(|p| p.container_port);
    Some(validated)
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!("invalid {key}: expected string, got {}", json_type(other));
            None
        }
    }
}

fn bool_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<bool> {
    match obj.get(key) {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            warn!("invalid {key}: expected boolean, got {}", json_type(other));
            None
        }
    }
}

fn count_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<u64> {
    match obj.get(key) {
        None => None,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(count) => Some(count),
            None => {
                warn!("invalid {key}: expected non-negative integer, got {n}");
                None
            }
        },
        Some(other) => {
            warn!("invalid {key}: expected number, got {}", json_type(other));
            None
        }
    }
}

fn port_number_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<u16> {
    match obj.get(key) {
        None => None,
        Some(value @ Value::Number(_)) => match as_port(value) {
            Some(port) => Some(port),
            None => {
                warn!("invalid {key}: expected port number");
                None
            }
        },
        Some(other) => {
            warn!("invalid {key}: expected number, got {}", json_type(other));
            None
        }
    }
}

fn optional_string(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    label: &str,
) -> Option<String> {
    match obj.get(key) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!("invalid {label}: expected string, got {}", json_type(other));
            None
        }
    }
}

fn as_port(value: &Value) -> Option<u16> {
    value.as_u64().and_then(|n| u16::try_from(n).ok())
}

/// Coerce a mapping value to its string form. Scalars keep their text
/// representation; anything else becomes compact JSON.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
