use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Condições de leitura (código desconhecido, item já completo) NÃO moram
// aqui: são desfechos do ScanResult, porque nunca abortam a sessão.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Já existe uma ordem de picking para a fatura {0}")]
    DuplicateOrder(String),

    #[error("Nenhum produto encontrado no documento")]
    EmptyDocument,

    #[error("Ordem de picking não encontrada")]
    OrderNotFound,

    #[error("A ordem já foi concluída e não aceita novas alterações")]
    OrderAlreadyCompleted,

    #[error("Item não encontrado nesta ordem")]
    ItemNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("O produto está sendo usado em ordens de picking")]
    ProductInUse,

    #[error("Nenhuma unidade foi separada; salvamento parcial vazio")]
    NothingPicked,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::DuplicateOrder(invoice) => (
                StatusCode::CONFLICT,
                format!("Já existe uma ordem de picking para a fatura {invoice}."),
            ),
            AppError::EmptyDocument => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Nenhum produto foi encontrado no documento de cobrança.".to_string(),
            ),
            AppError::OrderNotFound => (
                StatusCode::NOT_FOUND,
                "Ordem de picking não encontrada.".to_string(),
            ),
            AppError::OrderAlreadyCompleted => (
                StatusCode::CONFLICT,
                "A ordem já foi concluída e não aceita novas alterações.".to_string(),
            ),
            AppError::ItemNotFound => (
                StatusCode::NOT_FOUND,
                "Item não encontrado nesta ordem.".to_string(),
            ),
            AppError::ProductNotFound => (
                StatusCode::NOT_FOUND,
                "Produto não encontrado.".to_string(),
            ),
            AppError::ProductInUse => (
                StatusCode::CONFLICT,
                "Não é possível excluir o produto porque ele está sendo usado em ordens de picking.".to_string(),
            ),
            AppError::NothingPicked => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Nenhuma unidade foi separada; não há o que salvar como parcial.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
