use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Registration payload as posted by the form. Every field is optional so the
/// validator can report all missing fields at once instead of failing on the
/// first absent one during deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CadastroRequest {
    pub nome_completo: Option<String>,
    pub email: Option<String>,
    pub curso: Option<String>,
    pub semestre: Option<i64>,
    pub senha: Option<String>,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioPublico {
    pub id: i64,
    pub nome_completo: String,
    pub email: String,
    pub curso: String,
    pub semestre: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct CadastroResponse {
    pub message: String,
    pub id: i64,
    pub usuario: UsuarioPublico,
}

#[derive(Debug, Serialize)]
pub struct UsuariosListResponse {
    pub usuarios: Vec<UsuarioPublico>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct UsuarioResponse {
    pub usuario: UsuarioPublico,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}
