use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("faltan variables de entorno: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("error de Jira ({status}): {body}")]
    Jira { status: u16, body: String },

    #[error("historia no encontrada: {0}")]
    StoryNotFound(String),

    #[error("error de Gemini: {0}")]
    Gemini(String),

    #[error("error de conexión: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Prompt(#[from] inquire::InquireError),
}

pub type Result<T> = std::result::Result<T, AppError>;
