//! Setup flow: idempotently ensure the preview app exists, has SSL
//! and a deploy token enabled, and carries the desired configuration,
//! then hand the deploy token back to the CI workflow.

use std::fs::OpenOptions;
use std::io::Write;

use tracing::{info, warn};

use crate::api::{AppDefinition, CapRoverClient};
use crate::config::{AppConfig, DeployTokenConfig, diff, merge, validate};
use crate::env::CiEnv;
use crate::error::{PreviewError, PreviewResult};
use crate::retry::with_default_retry;

/// Run the setup flow and return the app's deploy token.
pub async fn run(env: &CiEnv) -> PreviewResult<String> {
    let client = with_default_retry(|| {
        CapRoverClient::login(&env.caprover_server, &env.caprover_password, None)
    })
    .await?;

    let app_name = env.caprover_app_name.as_str();
    info!("checking for app: {app_name}");

    let apps = with_default_retry(|| client.get_all_apps()).await?;
    let mut app_def = match apps.find_app(app_name) {
        Some(def) => def.clone(),
        None => {
            info!("app '{app_name}' not found, creating it");
            let created = with_default_retry(|| register_and_fetch(&client, env))
                .await
                .map_err(|source| PreviewError::AppCreateFailed {
                    app_name: app_name.to_string(),
                    source: Box::new(source),
                })?;
            info!("app '{app_name}' created");
            created
        }
    };

    if env.enable_ssl && !app_def.has_default_sub_domain_ssl {
        info!("enabling SSL for app '{app_name}'");
        match client.enable_ssl_for_base_domain(app_name).await {
            Ok(()) => info!("SSL enabled for app '{app_name}'"),
            Err(error) => {
                // SSL is best effort; the deploy token is the point.
                warn!("failed to enable SSL: {error}; continuing without SSL");
            }
        }
    }

    let desired = desired_config(env)?;
    if diff::config_needs_saving(&app_def, &desired)? {
        info!("updating app '{app_name}'");
        app_def.apply_config(&desired);
        with_default_retry(|| client.update_config_and_save(app_name, &app_def)).await?;
    }

    let apps = with_default_retry(|| client.get_all_apps()).await?;
    let token = apps
        .find_app(app_name)
        .and_then(|def| def.app_deploy_token_config.as_ref())
        .and_then(|config| config.app_deploy_token.clone())
        .ok_or_else(|| PreviewError::MissingDeployToken(app_name.to_string()))?;

    info!("app '{app_name}' is ready with deploy token");

    if let Some(output_path) = &env.github_output {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(output_path)?;
        writeln!(file, "app-token={token}")?;
    }

    Ok(token)
}

/// Desired configuration: a deploy-token-enabled base, file config on
/// top, inline config highest.
fn desired_config(env: &CiEnv) -> PreviewResult<AppConfig> {
    let base = AppConfig {
        app_deploy_token_config: Some(DeployTokenConfig {
            enabled: true,
            app_deploy_token: None,
        }),
        ..AppConfig::default()
    };

    let file_config = match &env.app_config_path {
        Some(path) => validate::load_config_from_path(path)?,
        None => AppConfig::default(),
    };
    let inline_config = match &env.app_config {
        Some(json) => validate::parse_config(json)?,
        None => AppConfig::default(),
    };

    Ok(merge::configs(
        &merge::configs(&base, &file_config),
        &inline_config,
    ))
}

async fn register_and_fetch(
    client: &CapRoverClient,
    env: &CiEnv,
) -> PreviewResult<AppDefinition> {
    let project_id = env.project_name.clone().unwrap_or_default();
    client
        .register_app(&env.caprover_app_name, &project_id, env.has_persistent_data)
        .await?;

    let apps = client.get_all_apps().await?;
    apps.find_app(&env.caprover_app_name)
        .cloned()
        .ok_or_else(|| PreviewError::CreatedAppMissing(env.caprover_app_name.clone()))
}
