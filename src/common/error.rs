use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio. Serviços e repositórios só conhecem este.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Cursor de paginação inválido: {0}")]
    InvalidCursor(String),

    #[error("Tamanho de página inválido: {requested} (máximo {max})")]
    InvalidPageSize { requested: usize, max: usize },

    #[error("Empresa não encontrada")]
    CompanyNotFound,

    // Store fora do ar, query quebrada etc. Propagado sem retry.
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// O erro que sai pela API, já com o status e a mensagem no idioma do cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidCursor(_)
            | AppError::InvalidPageSize { .. } => StatusCode::BAD_REQUEST,
            AppError::CompanyNotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let en = locale.is_english();

        let error = match self {
            AppError::ValidationError(_) if en => "One or more fields are invalid.".to_string(),
            AppError::ValidationError(_) => "Um ou mais campos são inválidos.".to_string(),
            AppError::InvalidCursor(cursor) if en => format!("Invalid pagination cursor '{}'.", cursor),
            AppError::InvalidCursor(cursor) => format!("Cursor de paginação '{}' inválido.", cursor),
            AppError::InvalidPageSize { max, .. } if en => {
                format!("numItems must be between 1 and {}.", max)
            }
            AppError::InvalidPageSize { max, .. } => {
                format!("numItems deve estar entre 1 e {}.", max)
            }
            AppError::CompanyNotFound if en => "Company not found.".to_string(),
            AppError::CompanyNotFound => "Empresa não encontrada.".to_string(),
            // Os detalhes de erros internos ficam só no log
            e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                if en {
                    "An unexpected error occurred.".to_string()
                } else {
                    "Ocorreu um erro inesperado.".to_string()
                }
            }
        };

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            _ => None,
        };

        ApiError { status: self.status(), error, details }
    }
}

// Achata os erros do validator em { "campo": ["mensagem", ...] }.
// Erros aninhados (ex.: companies[3].cnpj) viram "companies[3].cnpj".
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = serde_json::Map::new();
    collect_validation_messages(errors, String::new(), &mut details);
    Value::Object(details)
}

fn collect_validation_messages(
    errors: &validator::ValidationErrors,
    prefix: String,
    out: &mut serde_json::Map<String, Value>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages: Vec<Value> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .map(Value::String)
                    .collect();
                out.insert(path, Value::Array(messages));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_validation_messages(inner, path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation_messages(inner, format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Para quando não há Locale disponível (ex.: fallback de rotas): responde em português.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
