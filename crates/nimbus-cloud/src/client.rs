//! Console HTTP client
//!
//! Direct REST implementation with bearer token authentication. The
//! token is obtained once at login and reused for every call.

use crate::api::{
    AssociateKeyRequest, BackendInfo, CreateBackendRequest, KeyInfo, MachineInfo, ManagementApi,
};
use crate::error::{CloudError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for the console client
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub email: String,
    pub password: String,
}

impl ConsoleConfig {
    /// Create ConsoleConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("NIMBUS_API_URL")
            .map_err(|_| CloudError::MissingEnvVar("NIMBUS_API_URL".to_string()))?;
        let email = std::env::var("NIMBUS_EMAIL")
            .map_err(|_| CloudError::MissingEnvVar("NIMBUS_EMAIL".to_string()))?;
        let password = std::env::var("NIMBUS_PASSWORD")
            .map_err(|_| CloudError::MissingEnvVar("NIMBUS_PASSWORD".to_string()))?;

        Ok(Self {
            api_url,
            email,
            password,
        })
    }
}

/// Authenticated console session
pub struct ConsoleClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl ConsoleClient {
    /// Log in and return an authenticated session.
    ///
    /// Performs one backend listing after the token exchange so a
    /// rejected account fails here rather than halfway through a sync.
    pub async fn login(config: &ConsoleConfig) -> Result<Self> {
        let http = reqwest::Client::new();
        let api_url = config.api_url.trim_end_matches('/').to_string();

        tracing::debug!("POST {}/auth ({})", api_url, config.email);
        let response = http
            .post(format!("{api_url}/auth"))
            .json(&AuthRequest {
                email: &config.email,
                password: &config.password,
            })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CloudError::AuthenticationFailed(config.email.clone()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CloudError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let auth: AuthResponse = response.json().await?;
        let client = Self {
            http,
            api_url,
            token: auth.token,
        };

        // Session check with the fresh token
        client.list_backends().await?;

        Ok(client)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Fail non-2xx responses with the body as the message
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(CloudError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!("GET {}", path);
        let response = self
            .http
            .get(self.endpoint(path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        tracing::debug!("POST {}", path);
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        tracing::debug!("POST {}", path);
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        tracing::debug!("PUT {}", path);
        let response = self
            .http
            .put(self.endpoint(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ManagementApi for ConsoleClient {
    async fn list_backends(&self) -> Result<HashMap<String, BackendInfo>> {
        let backends: Vec<BackendInfo> = self.get_json("/backends").await?;
        Ok(backends.into_iter().map(|b| (b.title.clone(), b)).collect())
    }

    async fn create_backend(&self, request: &CreateBackendRequest) -> Result<()> {
        self.post_json("/backends", request).await
    }

    async fn list_keys(&self) -> Result<HashMap<String, KeyInfo>> {
        let keys: Vec<KeyInfo> = self.get_json("/keys").await?;
        Ok(keys.into_iter().map(|k| (k.name.clone(), k)).collect())
    }

    async fn create_key(&self, name: &str, private: &str) -> Result<()> {
        self.post_json("/keys", &CreateKeyRequest { name, private })
            .await
    }

    async fn set_default_key(&self, name: &str) -> Result<()> {
        self.post_empty(&format!("/keys/{name}/default")).await
    }

    async fn lookup_backend(&self, backend_id: &str) -> Result<BackendInfo> {
        // The console lists backends by title; ids are resolved by scan
        let backends = self.list_backends().await?;
        backends
            .into_values()
            .find(|b| b.id == backend_id)
            .ok_or_else(|| CloudError::BackendNotFound(backend_id.to_string()))
    }

    async fn list_machines(&self, backend_id: &str) -> Result<Vec<MachineInfo>> {
        self.get_json(&format!("/backends/{backend_id}/machines"))
            .await
    }

    async fn associate_key(&self, request: &AssociateKeyRequest) -> Result<()> {
        let path = format!(
            "/backends/{}/machines/{}/keys/{}",
            request.backend_id, request.machine_id, request.key_name
        );
        self.put_json(
            &path,
            &AssociateBody {
                host: &request.host,
                ssh_user: &request.ssh_user,
                ssh_port: &request.ssh_port,
            },
        )
        .await
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Serialize)]
struct CreateKeyRequest<'a> {
    name: &'a str,
    private: &'a str,
}

#[derive(Serialize)]
struct AssociateBody<'a> {
    host: &'a str,
    ssh_user: &'a str,
    ssh_port: &'a str,
}
