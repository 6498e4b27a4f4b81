use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::workflow::escalation::EscalationRules;
use crate::workflow::triage::TriageRules;

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

pub fn config_directory() -> AppResult<PathBuf> {
    if let Ok(dir) = env::var("SOPORTE_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(dir).join("soporte"));
    }
    let home = env::var("HOME").map_err(|_| {
        AppError::Configuration("cannot locate a home directory for the config file".to_string())
    })?;
    Ok(PathBuf::from(home).join(".config").join("soporte"))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// On-disk configuration. Everything is optional here; validation happens
/// when the chat command assembles an `AppConfig`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_token: Option<String>,
    pub jira_project_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub triage: Option<TriageRules>,
    pub escalation: Option<EscalationRules>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

/// Validated runtime configuration. Missing credentials are a startup
/// failure; a session never starts with a half-configured tracker.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_base_url: String,
    pub jira_email: String,
    pub jira_token: String,
    pub jira_project_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub triage: TriageRules,
    pub escalation: EscalationRules,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;

        Ok(Self {
            jira_base_url: require(resolve(stored.jira_base_url, "JIRA_URL"), "Jira base URL")?,
            jira_email: require(resolve(stored.jira_email, "JIRA_EMAIL"), "Jira email")?,
            jira_token: require(resolve(stored.jira_token, "JIRA_API_TOKEN"), "Jira API token")?,
            jira_project_key: require(
                resolve(stored.jira_project_key, "JIRA_PROJECT_KEY"),
                "Jira project key",
            )?,
            gemini_api_key: require(
                resolve(stored.gemini_api_key, "GEMINI_API_KEY"),
                "Gemini API key",
            )?,
            gemini_model: resolve(stored.gemini_model, "GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            triage: stored.triage.unwrap_or_default(),
            escalation: stored.escalation.unwrap_or_default(),
        })
    }
}

fn resolve(stored: Option<String>, env_var: &str) -> Option<String> {
    env::var(env_var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or(stored)
}

fn require(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{field} not configured; run `soporte config init`")))
}
