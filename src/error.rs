pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("missing required CapRover environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("COMMAND environment variable is required")]
    MissingCommand,

    #[error("unknown command: {0}. Must be \"setup\" or \"cleanup\"")]
    UnknownCommand(String),

    #[error("authentication failed")]
    AuthFailed,

    #[error("{message}")]
    Api { status: i64, message: String },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("config must be a JSON object")]
    ConfigNotObject,

    #[error("invalid config format")]
    InvalidConfig(#[source] Box<PreviewError>),

    #[error("failed to load config from {path}")]
    ConfigFile {
        path: String,
        #[source]
        source: Box<PreviewError>,
    },

    #[error("failed after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<PreviewError>,
    },

    #[error("failed to create app '{app_name}'")]
    AppCreateFailed {
        app_name: String,
        #[source]
        source: Box<PreviewError>,
    },

    #[error("failed to fetch newly created app '{0}'")]
    CreatedAppMissing(String),

    #[error("no deploy token found for app '{0}'")]
    MissingDeployToken(String),

    #[error("failed to delete app '{app_name}'")]
    DeleteFailed {
        app_name: String,
        #[source]
        source: Box<PreviewError>,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
