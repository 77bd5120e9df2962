use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::usuarios::dto::CadastroRequest;

const NOME_MIN_CHARS: usize = 3;
const SENHA_MIN_CHARS: usize = 8;
const SEMESTRE_RANGE: std::ops::RangeInclusive<i64> = 1..=12;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref NOME_RE: Regex = Regex::new(r"^[A-Za-zÀ-ÿ\s]+$").unwrap();
}

/// Candidate accepted by every rule, ready for persistence. Strings are
/// trimmed and the email lowercased. `senha` is transient: it is hashed right
/// after validation and never stored or logged.
#[derive(Debug, Clone)]
pub struct CadastroValidado {
    pub nome_completo: String,
    pub email: String,
    pub curso: String,
    pub semestre: i64,
    pub senha: String,
}

/// Every violation found, keyed by wire field name. A field may accumulate
/// more than one message (senha reports each unmet requirement separately).
#[derive(Debug, Default)]
pub struct ValidationErrors {
    pub campos: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    fn add(&mut self, campo: &'static str, mensagem: impl Into<String>) {
        self.campos.entry(campo).or_default().push(mensagem.into());
    }

    pub fn is_empty(&self) -> bool {
        self.campos.is_empty()
    }
}

/// Authoritative validation pass. Pure function of the payload plus the
/// configured institutional domain; evaluates all rules rather than stopping
/// at the first violation.
pub fn validate(
    payload: &CadastroRequest,
    institutional_domain: &str,
) -> Result<CadastroValidado, ValidationErrors> {
    let mut erros = ValidationErrors::default();

    let nome = payload.nome_completo.as_deref().map(str::trim).unwrap_or("");
    if nome.is_empty() {
        erros.add("nomeCompleto", "Nome completo é obrigatório");
    } else {
        if nome.chars().count() < NOME_MIN_CHARS {
            erros.add("nomeCompleto", "Nome deve ter pelo menos 3 caracteres");
        }
        if !NOME_RE.is_match(nome) {
            erros.add("nomeCompleto", "Nome deve conter apenas letras e espaços");
        }
        if nome.split_whitespace().count() < 2 {
            erros.add("nomeCompleto", "Digite nome e sobrenome");
        }
    }

    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    if email.is_empty() {
        erros.add("email", "E-mail é obrigatório");
    } else {
        if !EMAIL_RE.is_match(&email) {
            erros.add("email", "Formato de email inválido");
        }
        if !email.ends_with(institutional_domain) {
            erros.add(
                "email",
                format!("Email deve ser institucional ({institutional_domain})"),
            );
        }
    }

    let curso = payload.curso.as_deref().map(str::trim).unwrap_or("");
    if curso.is_empty() {
        erros.add("curso", "Seleção do curso é obrigatória");
    }

    let semestre = match payload.semestre {
        None => {
            erros.add("semestre", "Seleção do período é obrigatória");
            0
        }
        Some(s) => {
            if !SEMESTRE_RANGE.contains(&s) {
                erros.add("semestre", "Semestre deve ser um número entre 1 e 12");
            }
            s
        }
    };

    let senha = payload.senha.as_deref().unwrap_or("");
    if senha.is_empty() {
        erros.add("senha", "Senha é obrigatória");
    } else {
        if senha.chars().count() < SENHA_MIN_CHARS {
            erros.add("senha", "Senha deve ter pelo menos 8 caracteres");
        }
        if !senha.chars().any(|c| c.is_ascii_uppercase()) {
            erros.add("senha", "Senha deve conter pelo menos uma letra maiúscula");
        }
        if !senha.chars().any(|c| c.is_ascii_lowercase()) {
            erros.add("senha", "Senha deve conter pelo menos uma letra minúscula");
        }
        if !senha.chars().any(|c| c.is_ascii_digit()) {
            erros.add("senha", "Senha deve conter pelo menos um número");
        }
    }

    if !erros.is_empty() {
        return Err(erros);
    }

    Ok(CadastroValidado {
        nome_completo: nome.to_string(),
        email,
        curso: curso.to_string(),
        semestre,
        senha: senha.to_string(),
    })
}
