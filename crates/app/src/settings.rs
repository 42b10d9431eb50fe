//! Application configuration: a TOML file merged with `WEBCASH`-prefixed
//! environment variables, then CLI overrides on top.

use clap::Parser;
use serde::Deserialize;

use config::ConfigError;

const DEFAULT_CONFIG_PATH: &str = "config/webcash.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the hosted store project.
    pub base_url: String,
    /// Project api key sent with every request.
    pub api_key: String,
    /// Signed-in user id (UUID), as issued by the auth service.
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Bearer token of the active session.
    pub access_token: String,
    /// Log level filter.
    pub log: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:54321".to_string(),
            api_key: String::new(),
            user_id: String::new(),
            email: String::new(),
            display_name: None,
            access_token: String::new(),
            log: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "webcash", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override store base URL (e.g. http://127.0.0.1:54321).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the project api key.
    #[arg(long)]
    api_key: Option<String>,
    /// Override the signed-in user id (UUID).
    #[arg(long)]
    user_id: Option<String>,
    /// Override the signed-in user email.
    #[arg(long)]
    email: Option<String>,
    /// Override the session access token.
    #[arg(long)]
    access_token: Option<String>,
}

pub fn load() -> Result<AppConfig, ConfigError> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("WEBCASH"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(api_key) = args.api_key {
        settings.api_key = api_key;
    }
    if let Some(user_id) = args.user_id {
        settings.user_id = user_id;
    }
    if let Some(email) = args.email {
        settings.email = email;
    }
    if let Some(access_token) = args.access_token {
        settings.access_token = access_token;
    }

    Ok(settings)
}
