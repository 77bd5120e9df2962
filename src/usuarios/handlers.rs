use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::usuarios::dto::{
    CadastroRequest, CadastroResponse, UsuarioResponse, UsuariosListResponse,
};
use crate::usuarios::password::hash_password;
use crate::usuarios::repo::Usuario;
use crate::usuarios::validation;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/usuarios/cadastro", post(cadastro))
        .route("/usuarios", get(listar_usuarios))
        .route("/usuarios/:id", get(buscar_usuario))
}

#[instrument(skip(state, payload))]
pub async fn cadastro(
    State(state): State<AppState>,
    Json(payload): Json<CadastroRequest>,
) -> Result<(StatusCode, Json<CadastroResponse>), ApiError> {
    let valido = validation::validate(&payload, &state.config.institutional_domain)
        .map_err(|erros| {
            warn!(
                campos = ?erros.campos.keys().collect::<Vec<_>>(),
                "cadastro rejeitado pela validação"
            );
            ApiError::Validation(erros)
        })?;

    let senha_hash = hash_password(&valido.senha)?;

    let usuario = Usuario::create(&state.db, &valido, &senha_hash).await?;

    info!(id = usuario.id, email = %usuario.email, "usuário cadastrado");
    Ok((
        StatusCode::CREATED,
        Json(CadastroResponse {
            message: "Usuário cadastrado com sucesso".into(),
            id: usuario.id,
            usuario: usuario.into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn listar_usuarios(
    State(state): State<AppState>,
) -> Result<Json<UsuariosListResponse>, ApiError> {
    let usuarios = Usuario::list_all(&state.db).await?;
    let total = usuarios.len();
    Ok(Json(UsuariosListResponse { usuarios, total }))
}

#[instrument(skip(state))]
pub async fn buscar_usuario(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UsuarioResponse>, ApiError> {
    let id: i64 = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(id = %id, "id de usuário não numérico");
            return Err(ApiError::InvalidId);
        }
    };

    let usuario = Usuario::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(UsuarioResponse { usuario }))
}
