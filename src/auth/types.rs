//! Types for login and registration

use serde::Serialize;

use crate::error::{Error, Result};

pub const MISSING_FIELDS_MESSAGE: &str = "Preencha todos os campos obrigatórios.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "As senhas não correspondem.";
pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "A senha deve ter pelo menos 4 caracteres.";

pub const MIN_PASSWORD_LEN: usize = 4;

/// Whether the auth form signs in or creates an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    /// Endpoint under the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/usuarios/login",
            Self::Register => "/usuarios/cadastrar",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Login => "✓ Bem-vindo de volta!",
            Self::Register => "✓ Conta criada com sucesso!",
        }
    }

    /// Message shown when the backend rejects the request with `status`
    pub fn error_message(&self, status: u16) -> &'static str {
        match (status, self) {
            (400 | 409, Self::Login) => "Credenciais inválidas.",
            (400 | 409, Self::Register) => "Usuário já existe.",
            (401, _) => "Acesso não autorizado.",
            (500, _) => "Erro no servidor. Tente novamente.",
            _ => "Erro ao processar solicitação.",
        }
    }
}

/// Request body of the login and registration endpoints
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    /// Validate raw form input. `password_confirm` is only checked when registering.
    pub fn validate(
        mode: AuthMode,
        username: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Self> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(Error::validation(MISSING_FIELDS_MESSAGE));
        }
        if mode == AuthMode::Register && password != password_confirm {
            return Err(Error::validation(PASSWORD_MISMATCH_MESSAGE));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(PASSWORD_TOO_SHORT_MESSAGE));
        }

        Ok(Self {
            username: username.trim().to_string(),
            password: password.to_string(),
        })
    }
}
