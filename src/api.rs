//! CapRover management API client.
//!
//! Thin JSON-over-HTTP wrapper around the CapRover envelope protocol:
//! every response carries `{status, description?, data}`, where
//! statuses 100/101/102/200 are success and 401/1001 mean the session
//! is not authenticated.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use crate::config::{AppConfig, DeployTokenConfig, EnvVar, PortMapping, Volume};
use crate::error::{PreviewError, PreviewResult};

const SUCCESS_STATUSES: [i64; 4] = [100, 101, 102, 200];
const AUTH_FAILURE_STATUSES: [i64; 2] = [401, 1001];

/// The authoritative remote representation of a deployed application.
///
/// Known fields are typed; everything else the server sends is kept in
/// `extra` so an update call round-trips the whole definition.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppDefinition {
    pub app_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub has_persistent_data: bool,
    pub has_default_sub_domain_ssl: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_deploy_token_config: Option<DeployTokenConfig>,
    pub env_vars: Vec<EnvVar>,
    pub volumes: Vec<Volume>,
    pub ports: Vec<PortMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websocket_support: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_http_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_nginx_config: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AppDefinition {
    /// Assign every present field of `config` onto this definition.
    /// List fields are replaced wholesale, not merged.
    pub fn apply_config(&mut self, config: &AppConfig) {
        if let Some(env_vars) = &config.env_vars {
            self.env_vars = env_vars.clone();
        }
        if let Some(volumes) = &config.volumes {
            self.volumes = volumes.clone();
        }
        if let Some(ports) = &config.ports {
            self.ports = ports.clone();
        }
        if let Some(description) = &config.description {
            self.description = Some(description.clone());
        }
        if let Some(force_ssl) = config.force_ssl {
            self.force_ssl = Some(force_ssl);
        }
        if let Some(websocket_support) = config.websocket_support {
            self.websocket_support = Some(websocket_support);
        }
        if let Some(instance_count) = config.instance_count {
            self.instance_count = Some(instance_count);
        }
        if let Some(container_http_port) = config.container_http_port {
            self.container_http_port = Some(container_http_port);
        }
        if let Some(redirect_domain) = &config.redirect_domain {
            self.redirect_domain = Some(redirect_domain.clone());
        }
        if let Some(custom_nginx_config) = &config.custom_nginx_config {
            self.custom_nginx_config = Some(custom_nginx_config.clone());
        }
        if let Some(token_config) = &config.app_deploy_token_config {
            self.app_deploy_token_config = Some(token_config.clone());
        }
    }

    /// Names of the named volumes attached to this definition.
    #[must_use]
    pub fn volume_names(&self) -> Vec<String> {
        self.volumes
            .iter()
            .filter_map(|v| v.volume_name.clone())
            .collect()
    }
}

/// Response of the app-definitions listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppDefinitionsResponse {
    pub app_definitions: Vec<AppDefinition>,
    pub root_domain: String,
    pub captain_sub_domain: String,
    pub default_nginx_config: String,
}

impl AppDefinitionsResponse {
    /// Look up an app definition by name.
    #[must_use]
    pub fn find_app(&self, name: &str) -> Option<&AppDefinition> {
        self.app_definitions.iter().find(|def| def.app_name == name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    status: i64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

/// Authenticated CapRover API client.
#[derive(Debug, Clone)]
pub struct CapRoverClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl CapRoverClient {
    /// Create an unauthenticated client for `server`.
    pub fn new(server: &str) -> PreviewResult<Self> {
        let base_url = Url::parse(server)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("caprover-preview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Log in with the CapRover password (and optional OTP token),
    /// returning an authenticated client.
    pub async fn login(
        server: &str,
        password: &str,
        otp_token: Option<&str>,
    ) -> PreviewResult<Self> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct LoginRequest<'a> {
            password: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            otp_token: Option<&'a str>,
        }

        #[derive(Deserialize)]
        struct LoginResponse {
            token: String,
        }

        let mut client = Self::new(server)?;
        let response: LoginResponse = client
            .post(
                "/api/v2/login",
                &LoginRequest {
                    password,
                    otp_token,
                },
            )
            .await?;
        client.token = Some(response.token);
        Ok(client)
    }

    /// Fetch every app definition on the server.
    pub async fn get_all_apps(&self) -> PreviewResult<AppDefinitionsResponse> {
        self.get("/api/v2/user/apps/appDefinitions").await
    }

    /// Register a new app.
    pub async fn register_app(
        &self,
        app_name: &str,
        project_id: &str,
        has_persistent_data: bool,
    ) -> PreviewResult<()> {
        self.post_unit(
            "/api/v2/user/apps/appDefinitions/register",
            &json!({
                "appName": app_name,
                "projectId": project_id,
                "hasPersistentData": has_persistent_data,
            }),
        )
        .await
    }

    /// Enable SSL for the app's base domain.
    pub async fn enable_ssl_for_base_domain(&self, app_name: &str) -> PreviewResult<()> {
        self.post_unit(
            "/api/v2/user/apps/appDefinitions/enablebasedomainssl",
            &json!({ "appName": app_name }),
        )
        .await
    }

    /// Push the full app definition. The body is the serialized
    /// definition with `appName` set and `projectId` defaulted to the
    /// empty string.
    pub async fn update_config_and_save(
        &self,
        app_name: &str,
        definition: &AppDefinition,
    ) -> PreviewResult<()> {
        let mut body = serde_json::to_value(definition)?;
        if let Value::Object(map) = &mut body {
            map.insert("appName".to_string(), Value::String(app_name.to_string()));
            map.insert(
                "projectId".to_string(),
                Value::String(definition.project_id.clone().unwrap_or_default()),
            );
        }
        self.post_unit("/api/v2/user/apps/appDefinitions/update", &body)
            .await
    }

    /// Delete an app, its named volumes, and optionally additional
    /// apps in the same call.
    pub async fn delete_app(
        &self,
        app_name: &str,
        volumes: &[String],
        app_names: Option<&[String]>,
    ) -> PreviewResult<()> {
        let mut body = json!({ "appName": app_name, "volumes": volumes });
        if let Some(names) = app_names {
            body["appNames"] = json!(names);
        }
        self.post_unit("/api/v2/user/apps/appDefinitions/delete", &body)
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> PreviewResult<T> {
        let text = self.send::<()>(Method::GET, path, None).await?;
        decode(&text)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> PreviewResult<T> {
        let text = self.send(Method::POST, path, Some(body)).await?;
        decode(&text)
    }

    async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> PreviewResult<()> {
        let text = self.send(Method::POST, path, Some(body)).await?;
        let envelope: Envelope<Value> = serde_json::from_str(&text)?;
        check_status(envelope.status, envelope.description)
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> PreviewResult<String> {
        let url = self.base_url.join(path)?;
        let mut request = self
            .http
            .request(method, url)
            .header("x-namespace", "captain");
        if let Some(token) = &self.token {
            request = request.header("x-captain-auth", token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(PreviewError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> PreviewResult<T> {
    let envelope: Envelope<T> = serde_json::from_str(text)?;
    let status = envelope.status;
    check_status(status, envelope.description)?;
    envelope.data.ok_or(PreviewError::Api {
        status,
        message: "API response is missing data".to_string(),
    })
}

fn check_status(status: i64, description: Option<String>) -> PreviewResult<()> {
    if SUCCESS_STATUSES.contains(&status) {
        return Ok(());
    }
    if AUTH_FAILURE_STATUSES.contains(&status) {
        return Err(PreviewError::AuthFailed);
    }
    Err(PreviewError::Api {
        status,
        message: description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("API error: status {status}")),
    })
}
