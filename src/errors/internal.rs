use sea_orm::DbErr;

/// Internal error taxonomy. These never cross the API boundary directly;
/// services map them into the ApiResponse enums in `errors::api`.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    #[error("database error during {operation}: {source}")]
    Database {
        operation: String,
        #[source]
        source: DbErr,
    },

    #[error("password hashing error: {0}")]
    Hash(String),

    #[error("object storage error: {0}")]
    Storage(String),

    #[error("mail delivery error: {0}")]
    Mail(String),
}

impl InternalError {
    pub fn database(operation: impl Into<String>, source: DbErr) -> Self {
        InternalError::Database {
            operation: operation.into(),
            source,
        }
    }
}
