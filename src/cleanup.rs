//! Cleanup flow: idempotently delete the preview app and,
//! optionally, its named volumes. A missing app is a success, not an
//! error.

use tracing::info;

use crate::api::CapRoverClient;
use crate::env::CiEnv;
use crate::error::{PreviewError, PreviewResult};
use crate::retry::with_default_retry;

/// Run the cleanup flow.
pub async fn run(env: &CiEnv) -> PreviewResult<()> {
    let client = with_default_retry(|| {
        CapRoverClient::login(&env.caprover_server, &env.caprover_password, None)
    })
    .await?;

    let app_name = env.caprover_app_name.as_str();
    info!("checking for app: {app_name}");

    let apps = with_default_retry(|| client.get_all_apps()).await?;
    let Some(app_def) = apps.find_app(app_name) else {
        info!("app '{app_name}' not found, nothing to delete");
        return Ok(());
    };

    let volumes = if env.cleanup_storage {
        app_def.volume_names()
    } else {
        Vec::new()
    };

    info!("found app '{app_name}', deleting");
    with_default_retry(|| client.delete_app(app_name, &volumes, None))
        .await
        .map_err(|source| PreviewError::DeleteFailed {
            app_name: app_name.to_string(),
            source: Box::new(source),
        })?;

    info!("app '{app_name}' deleted");
    Ok(())
}
