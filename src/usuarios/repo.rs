use sqlx::SqlitePool;
use thiserror::Error;
use time::OffsetDateTime;

use crate::usuarios::dto::UsuarioPublico;
use crate::usuarios::validation::CadastroValidado;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("email já cadastrado")]
    DuplicateEmail,

    #[error("armazenamento indisponível")]
    Unavailable(#[from] sqlx::Error),
}

/// Full row, hash included. Only the registration path sees this type;
/// everything returned over HTTP is a `UsuarioPublico`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Usuario {
    pub id: i64,
    pub nome_completo: String,
    pub email: String,
    pub curso: String,
    pub semestre: i64,
    pub senha_hash: String,
    pub created_at: OffsetDateTime,
}

impl From<Usuario> for UsuarioPublico {
    fn from(u: Usuario) -> Self {
        UsuarioPublico {
            id: u.id,
            nome_completo: u.nome_completo,
            email: u.email,
            curso: u.curso,
            semestre: u.semestre,
            created_at: u.created_at,
        }
    }
}

impl Usuario {
    /// Insert a validated candidate. The UNIQUE constraint on email decides
    /// duplicates atomically, so a concurrent race surfaces here as
    /// `DuplicateEmail` instead of a second row.
    pub async fn create(
        db: &SqlitePool,
        cadastro: &CadastroValidado,
        senha_hash: &str,
    ) -> Result<Usuario, RepoError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (nome_completo, email, curso, semestre, senha_hash)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, nome_completo, email, curso, semestre, senha_hash, created_at
            "#,
        )
        .bind(&cadastro.nome_completo)
        .bind(&cadastro.email)
        .bind(&cadastro.curso)
        .bind(cadastro.semestre)
        .bind(senha_hash)
        .fetch_one(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::DuplicateEmail
            }
            _ => RepoError::Unavailable(e),
        })?;
        Ok(usuario)
    }

    /// Find a user by normalized (lowercase) email.
    pub async fn find_by_email(
        db: &SqlitePool,
        email: &str,
    ) -> Result<Option<Usuario>, RepoError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id, nome_completo, email, curso, semestre, senha_hash, created_at
            FROM usuarios
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(usuario)
    }

    pub async fn find_by_id(
        db: &SqlitePool,
        id: i64,
    ) -> Result<Option<UsuarioPublico>, RepoError> {
        let usuario = sqlx::query_as::<_, UsuarioPublico>(
            r#"
            SELECT id, nome_completo, email, curso, semestre, created_at
            FROM usuarios
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(usuario)
    }

    /// All users, most recently created first.
    pub async fn list_all(db: &SqlitePool) -> Result<Vec<UsuarioPublico>, RepoError> {
        let usuarios = sqlx::query_as::<_, UsuarioPublico>(
            r#"
            SELECT id, nome_completo, email, curso, semestre, created_at
            FROM usuarios
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(usuarios)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn test_db() -> SqlitePool {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("open in-memory database");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("run migrations");
        db
    }

    fn cadastro(email: &str) -> CadastroValidado {
        CadastroValidado {
            nome_completo: "Maria Silva".into(),
            email: email.into(),
            curso: "Ciência da Computação".into(),
            semestre: 3,
            senha: "Abcdef12".into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let db = test_db().await;
        let usuario = Usuario::create(&db, &cadastro("maria@universidade.edu.br"), "hash")
            .await
            .expect("create should succeed");
        assert!(usuario.id > 0);
        assert_eq!(usuario.email, "maria@universidade.edu.br");
        assert_eq!(usuario.senha_hash, "hash");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let db = test_db().await;
        Usuario::create(&db, &cadastro("maria@universidade.edu.br"), "hash")
            .await
            .expect("first create should succeed");
        let err = Usuario::create(&db, &cadastro("maria@universidade.edu.br"), "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::DuplicateEmail));
    }

    #[tokio::test]
    async fn concurrent_creates_yield_exactly_one_row() {
        let db = test_db().await;
        let c = cadastro("maria@universidade.edu.br");
        let (a, b) = tokio::join!(
            Usuario::create(&db, &c, "hash-a"),
            Usuario::create(&db, &c, "hash-b"),
        );
        let sucessos = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(sucessos, 1);
        let perdedor = if a.is_ok() { b } else { a };
        assert!(matches!(perdedor.unwrap_err(), RepoError::DuplicateEmail));
    }

    #[tokio::test]
    async fn find_by_email_returns_none_for_unknown() {
        let db = test_db().await;
        let encontrado = Usuario::find_by_email(&db, "ninguem@universidade.edu.br")
            .await
            .expect("query should succeed");
        assert!(encontrado.is_none());
    }

    #[tokio::test]
    async fn find_by_id_projects_without_hash() {
        let db = test_db().await;
        let criado = Usuario::create(&db, &cadastro("maria@universidade.edu.br"), "hash")
            .await
            .expect("create should succeed");
        let publico = Usuario::find_by_id(&db, criado.id)
            .await
            .expect("query should succeed")
            .expect("user should exist");
        assert_eq!(publico.id, criado.id);
        assert_eq!(publico.nome_completo, criado.nome_completo);
        assert_eq!(publico.email, criado.email);
        assert_eq!(publico.curso, criado.curso);
        assert_eq!(publico.semestre, criado.semestre);
        assert_eq!(publico.created_at, criado.created_at);

        let json = serde_json::to_value(&publico).expect("serialize projection");
        assert!(json.get("senhaHash").is_none());
        assert!(json.get("senha_hash").is_none());
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown() {
        let db = test_db().await;
        let encontrado = Usuario::find_by_id(&db, 42).await.expect("query should succeed");
        assert!(encontrado.is_none());
    }

    #[tokio::test]
    async fn list_all_orders_most_recent_first() {
        let db = test_db().await;
        let primeiro = Usuario::create(&db, &cadastro("a@universidade.edu.br"), "hash")
            .await
            .expect("create should succeed");
        let segundo = Usuario::create(&db, &cadastro("b@universidade.edu.br"), "hash")
            .await
            .expect("create should succeed");

        let todos = Usuario::list_all(&db).await.expect("list should succeed");
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].id, segundo.id);
        assert_eq!(todos[1].id, primeiro.id);
    }
}
