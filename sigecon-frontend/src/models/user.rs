use super::RawId;
use crate::middleware::auth::{SESSION_TOKEN_KEY, SESSION_USER_KEY};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "OPERADOR")]
    Operador,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Operador => "OPERADOR",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub ativo: Option<bool>,
}

/// POST /auth/login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /usuarios response; carries the generated initial password exactly
/// once, for the admin to hand over.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub senha_inicial: Option<String>,
}

/// Session-backed identity for protected handlers. Missing or incomplete
/// sessions redirect to the login page.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub token: String,
    pub user: User,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    pub fn nome(&self) -> String {
        self.user.nome.clone().unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;

        let token: Option<String> = session.get(SESSION_TOKEN_KEY).await.unwrap_or(None);
        let user: Option<User> = session.get(SESSION_USER_KEY).await.unwrap_or(None);

        match (token, user) {
            (Some(token), Some(user)) => Ok(Self { token, user }),
            _ => Err(Redirect::to("/login")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_backend_casing() {
        let admin: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert!(admin.is_admin());
        let operador: Role = serde_json::from_str("\"OPERADOR\"").unwrap();
        assert_eq!(operador.as_str(), "OPERADOR");
        assert!(serde_json::from_str::<Role>("\"GESTOR\"").is_err());
    }

    #[test]
    fn created_user_carries_initial_password() {
        let created: CreatedUser = serde_json::from_value(serde_json::json!({
            "id": 7,
            "nome": "Maria",
            "cpf": "12345678901",
            "role": "OPERADOR",
            "senha_inicial": "x9k2m1"
        }))
        .unwrap();
        assert_eq!(created.senha_inicial.as_deref(), Some("x9k2m1"));
        assert_eq!(created.user.nome.as_deref(), Some("Maria"));
    }
}
