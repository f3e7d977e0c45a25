use caprover_preview::config::{AppConfig, EnvVar, PortMapping, Volume, merge};

fn env_var(key: &str, value: &str) -> EnvVar {
    EnvVar {
        key: key.into(),
        value: value.into(),
    }
}

fn port(container_port: u16, host_port: u16) -> PortMapping {
    PortMapping {
        container_port,
        host_port,
        protocol: None,
        publish_mode: None,
    }
}

fn named_volume(container_path: &str, volume_name: &str) -> Volume {
    Volume {
        container_path: container_path.into(),
        volume_name: Some(volume_name.into()),
        host_path: None,
        mode: None,
    }
}

#[test]
fn ports_merge_by_container_port() {
    let base = AppConfig {
        ports: Some(vec![port(80, 8080)]),
        ..AppConfig::default()
    };
    let overrides = AppConfig {
        ports: Some(vec![port(80, 9090), port(443, 9443)]),
        ..AppConfig::default()
    };

    let merged = merge::configs(&base, &overrides);
    assert_eq!(merged.ports, Some(vec![port(80, 9090), port(443, 9443)]));
}

#[test]
fn env_vars_override_wins_and_base_keys_are_retained() {
    let base = AppConfig {
        env_vars: Some(vec![env_var("KEEP", "base"), env_var("CLASH", "base")]),
        ..AppConfig::default()
    };
    let overrides = AppConfig {
        env_vars: Some(vec![env_var("CLASH", "override"), env_var("NEW", "override")]),
        ..AppConfig::default()
    };

    let merged = merge::configs(&base, &overrides);
    assert_eq!(
        merged.env_vars,
        Some(vec![
            env_var("KEEP", "base"),
            env_var("CLASH", "override"),
            env_var("NEW", "override"),
        ])
    );
}

#[test]
fn volumes_merge_by_container_path() {
    let base = AppConfig {
        volumes: Some(vec![named_volume("/data", "base-vol")]),
        ..AppConfig::default()
    };
    let overrides = AppConfig {
        volumes: Some(vec![named_volume("/data", "override-vol")]),
        ..AppConfig::default()
    };

    let merged = merge::configs(&base, &overrides);
    assert_eq!(
        merged.volumes,
        Some(vec![named_volume("/data", "override-vol")])
    );
}

#[test]
fn one_sided_list_is_used_verbatim() {
    // An unsorted one-sided list stays unsorted: the merger never
    // re-validates.
    let unsorted = vec![env_var("B", "2"), env_var("A", "1")];
    let base = AppConfig {
        env_vars: Some(unsorted.clone()),
        ..AppConfig::default()
    };

    let merged = merge::configs(&base, &AppConfig::default());
    assert_eq!(merged.env_vars, Some(unsorted.clone()));

    let merged = merge::configs(&AppConfig::default(), &base);
    assert_eq!(merged.env_vars, Some(unsorted));
}

#[test]
fn scalar_override_wins_only_when_present() {
    let base = AppConfig {
        description: Some("base".into()),
        force_ssl: Some(false),
        instance_count: Some(1),
        ..AppConfig::default()
    };
    let overrides = AppConfig {
        force_ssl: Some(true),
        container_http_port: Some(3000),
        ..AppConfig::default()
    };

    let merged = merge::configs(&base, &overrides);
    assert_eq!(merged.description.as_deref(), Some("base"));
    assert_eq!(merged.force_ssl, Some(true));
    assert_eq!(merged.instance_count, Some(1));
    assert_eq!(merged.container_http_port, Some(3000));
}

#[test]
fn merge_does_not_mutate_inputs() {
    let base = AppConfig {
        env_vars: Some(vec![env_var("A", "1")]),
        ..AppConfig::default()
    };
    let overrides = AppConfig {
        env_vars: Some(vec![env_var("A", "2")]),
        ..AppConfig::default()
    };
    let base_before = base.clone();
    let overrides_before = overrides.clone();

    let _ = merge::configs(&base, &overrides);
    assert_eq!(base, base_before);
    assert_eq!(overrides, overrides_before);
}

#[test]
fn merge_is_associative_for_disjoint_keys() {
    let a = AppConfig {
        env_vars: Some(vec![env_var("A", "1")]),
        ..AppConfig::default()
    };
    let b = AppConfig {
        env_vars: Some(vec![env_var("B", "2")]),
        ..AppConfig::default()
    };
    let c = AppConfig {
        env_vars: Some(vec![env_var("C", "3")]),
        ..AppConfig::default()
    };

    let left = merge::configs(&merge::configs(&a, &b), &c);
    let right = merge::configs(&a, &merge::configs(&b, &c));
    assert_eq!(left, right);
}
