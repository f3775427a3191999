use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::composite::CompositeConfig;
use crate::ingest::IngestConfig;
use crate::watcher::WatcherConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub remote_store: RemoteStoreConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub composite: CompositeConfig,
    #[serde(default)]
    pub state_store: Option<StateStoreConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    3010
}

/// Remote drive backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteStoreConfig {
    /// Drive API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Drive upload API base URL (multipart uploads go here)
    #[serde(default = "default_upload_api_base")]
    pub upload_api_base: String,
    /// Folder that name-guarded uploads land in (empty disables them)
    #[serde(default)]
    pub upload_folder_id: String,
    /// OAuth2 access token
    pub access_token: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_upload_api_base() -> String {
    "https://www.googleapis.com/upload/drive/v3".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Document store configuration for per-item flags
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StateStoreConfig {
    /// Firestore API base URL
    #[serde(default = "default_state_api_base")]
    pub api_base: String,
    /// Project id the document database lives in
    pub project_id: String,
    /// Collection holding the per-item documents (default: "Images")
    #[serde(default = "default_collection")]
    pub collection: String,
    /// OAuth2 access token
    pub access_token: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_state_api_base() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_collection() -> String {
    "Images".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub remote_store: SanitizedRemoteStoreConfig,
    pub watcher: WatcherConfig,
    pub composite: SanitizedCompositeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_store: Option<SanitizedStateStoreConfig>,
}

/// Sanitized remote store config (access token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRemoteStoreConfig {
    pub api_base: String,
    pub upload_folder_id: String,
    pub access_token_configured: bool,
    pub timeout_secs: u32,
}

/// Sanitized composite config (worker internals elided)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCompositeConfig {
    pub dest_folder_id: String,
    pub output_name: String,
    pub max_inputs: usize,
}

/// Sanitized state store config (access token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStateStoreConfig {
    pub project_id: String,
    pub collection: String,
    pub access_token_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            remote_store: SanitizedRemoteStoreConfig {
                api_base: config.remote_store.api_base.clone(),
                upload_folder_id: config.remote_store.upload_folder_id.clone(),
                access_token_configured: !config.remote_store.access_token.is_empty(),
                timeout_secs: config.remote_store.timeout_secs,
            },
            watcher: config.watcher.clone(),
            composite: SanitizedCompositeConfig {
                dest_folder_id: config.composite.dest_folder_id.clone(),
                output_name: config.composite.output_name.clone(),
                max_inputs: config.composite.max_inputs,
            },
            state_store: config.state_store.as_ref().map(|s| SanitizedStateStoreConfig {
                project_id: s.project_id.clone(),
                collection: s.collection.clone(),
                access_token_configured: !s.access_token.is_empty(),
            }),
        }
    }
}
