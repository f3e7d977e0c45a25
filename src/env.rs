use crate::error::{PreviewError, PreviewResult};

/// Flow selected by the `COMMAND` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCommand {
    Setup,
    Cleanup,
}

impl FlowCommand {
    /// Read the command from the process environment.
    pub fn from_env() -> PreviewResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse the command from a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PreviewResult<Self> {
        match lookup("COMMAND").filter(|value| !value.is_empty()) {
            None => Err(PreviewError::MissingCommand),
            Some(command) => match command.as_str() {
                "setup" => Ok(Self::Setup),
                "cleanup" => Ok(Self::Cleanup),
                _ => Err(PreviewError::UnknownCommand(command)),
            },
        }
    }
}

/// Validated CI environment, constructed once at process start and
/// passed by value into the flows.
///
/// `CAPROVER_PASSWORD`, `CAPROVER_APP_NAME` and `CAPROVER_SERVER` are
/// required; every missing one is reported in a single error. Empty
/// values count as unset.
#[derive(Debug, Clone)]
pub struct CiEnv {
    pub caprover_password: String,
    pub caprover_app_name: String,
    pub caprover_server: String,
    /// Delete attached volumes during cleanup. Default true, disabled
    /// only by the literal `"false"`.
    pub cleanup_storage: bool,
    pub project_name: Option<String>,
    /// `HAS_PERSISTENT_DATA="true"` enables persistent volumes on
    /// app creation.
    pub has_persistent_data: bool,
    /// Default true, disabled only by the literal `"false"`.
    pub enable_ssl: bool,
    /// Optional path to a JSON config file (`APP_CONFIG_PATH`).
    pub app_config_path: Option<String>,
    /// Optional inline JSON config (`APP_CONFIG`), higher priority
    /// than the file.
    pub app_config: Option<String>,
    /// GitHub Actions output file; the deploy token is appended as
    /// `app-token=<token>` when set.
    pub github_output: Option<String>,
}

impl CiEnv {
    /// Build the environment from the process environment.
    pub fn from_env() -> PreviewResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the environment from a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PreviewResult<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let password = get("CAPROVER_PASSWORD");
        let app_name = get("CAPROVER_APP_NAME");
        let server = get("CAPROVER_SERVER");

        let mut missing = Vec::new();
        if password.is_none() {
            missing.push("CAPROVER_PASSWORD".to_string());
        }
        if app_name.is_none() {
            missing.push("CAPROVER_APP_NAME".to_string());
        }
        if server.is_none() {
            missing.push("CAPROVER_SERVER".to_string());
        }

        let (Some(caprover_password), Some(caprover_app_name), Some(caprover_server)) =
            (password, app_name, server)
        else {
            return Err(PreviewError::MissingEnv(missing));
        };

        Ok(Self {
            caprover_password,
            caprover_app_name,
            caprover_server,
            cleanup_storage: get("CLEANUP_STORAGE").as_deref() != Some("false"),
            project_name: get("PROJECT_NAME"),
            has_persistent_data: get("HAS_PERSISTENT_DATA").as_deref() == Some("true"),
            enable_ssl: get("ENABLE_SSL").as_deref() != Some("false"),
            app_config_path: get("APP_CONFIG_PATH"),
            app_config: get("APP_CONFIG"),
            github_output: get("GITHUB_OUTPUT"),
        })
    }
}
