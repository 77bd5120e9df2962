use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Required email suffix for admission, e.g. "@universidade.edu.br".
    pub institutional_domain: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let institutional_domain = std::env::var("INSTITUTIONAL_DOMAIN")
            .unwrap_or_else(|_| "@universidade.edu.br".into());
        Ok(Self {
            database_url,
            institutional_domain,
        })
    }
}
