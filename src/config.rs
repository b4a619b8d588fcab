use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AppError, Result};

pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

pub const OUTPUT_DIR: &str = "output";
pub const BASE_FILENAME: &str = "jira_test_cases";

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Variables que deben estar definidas antes de hablar con Jira o Gemini
pub const REQUIRED_VARS: [&str; 6] = [
    "JIRA_EMAIL",
    "JIRA_API_TOKEN",
    "JIRA_SERVER",
    "PROJECT_KEY",
    "GEMINI_MODEL",
    "GEMINI_API_KEY",
];

/// Configuración leída del entorno (y del archivo .env si existe)
#[derive(Clone)]
pub struct Settings {
    pub jira_email: String,
    pub jira_api_token: String,
    pub jira_server: String,
    pub project_key: String,
    pub gemini_model: String,
    pub gemini_api_key: String,
    pub gemini_api_base: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda.
    ///
    /// Se informan todas las variables faltantes de una sola vez; una variable
    /// vacía cuenta como faltante.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|key| value(key).is_none())
            .map(|key| key.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::MissingEnv(missing));
        }

        let required = |key: &str| value(key).unwrap_or_default();

        Ok(Settings {
            jira_email: required("JIRA_EMAIL"),
            jira_api_token: required("JIRA_API_TOKEN"),
            jira_server: required("JIRA_SERVER"),
            project_key: required("PROJECT_KEY"),
            gemini_model: required("GEMINI_MODEL"),
            gemini_api_key: required("GEMINI_API_KEY"),
            gemini_api_base: value("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
        })
    }
}

/// Carga el archivo .env del directorio actual, si existe.
/// Las variables ya definidas en el entorno tienen prioridad.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "archivo .env cargado"),
        Err(e) if e.not_found() => debug!("sin archivo .env"),
        Err(e) => warn!(error = %e, "no se pudo leer el archivo .env"),
    }
}
