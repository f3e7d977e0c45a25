use caprover_preview::api::AppDefinition;
use caprover_preview::config::{DeployTokenConfig, EnvVar, diff, validate};

fn remote_app() -> AppDefinition {
    AppDefinition {
        app_name: "pr-42".into(),
        env_vars: vec![
            EnvVar {
                key: "ZEBRA".into(),
                value: "z".into(),
            },
            EnvVar {
                key: "ALPHA".into(),
                value: "a".into(),
            },
        ],
        description: Some("preview".into()),
        instance_count: Some(1),
        ..AppDefinition::default()
    }
}

#[test]
fn normalized_current_needs_no_save() {
    let current = remote_app();
    let expected = validate::app_config(&serde_json::to_value(&current).unwrap());

    assert!(!diff::config_needs_saving(&current, &expected).unwrap());
}

#[test]
fn changed_scalar_needs_save() {
    let current = remote_app();
    let mut expected = validate::app_config(&serde_json::to_value(&current).unwrap());
    expected.instance_count = Some(3);

    assert!(diff::config_needs_saving(&current, &expected).unwrap());
}

#[test]
fn deploy_token_flag_difference_needs_save() {
    let mut current = remote_app();
    current.app_deploy_token_config = Some(DeployTokenConfig {
        enabled: false,
        app_deploy_token: None,
    });
    let mut expected = validate::app_config(&serde_json::to_value(&remote_app()).unwrap());
    expected.app_deploy_token_config = Some(DeployTokenConfig {
        enabled: true,
        app_deploy_token: None,
    });

    assert!(diff::config_needs_saving(&current, &expected).unwrap());
}

#[test]
fn missing_field_on_either_side_needs_save() {
    // Full structural equality, not a subset check: a field absent
    // from the desired config but present on the normalized current
    // definition counts as a difference.
    let current = remote_app();
    let mut expected = validate::app_config(&serde_json::to_value(&current).unwrap());
    expected.description = None;

    assert!(diff::config_needs_saving(&current, &expected).unwrap());
}

#[test]
fn extra_field_on_expected_side_needs_save() {
    let current = remote_app();
    let mut expected = validate::app_config(&serde_json::to_value(&current).unwrap());
    expected.redirect_domain = Some("example.com".into());

    assert!(diff::config_needs_saving(&current, &expected).unwrap());
}

#[test]
fn list_order_is_normalized_before_comparing() {
    // The remote definition carries env vars unsorted; normalization
    // sorts them, so a sorted expected config matches.
    let current = remote_app();
    let expected = validate::app_config(&serde_json::to_value(&current).unwrap());
    let env_vars = expected.env_vars.clone().unwrap();
    assert_eq!(env_vars[0].key, "ALPHA");
    assert_eq!(env_vars[1].key, "ZEBRA");

    assert!(!diff::config_needs_saving(&current, &expected).unwrap());
}
