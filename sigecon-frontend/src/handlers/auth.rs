use crate::domain::cpf::cpf_digits;
use crate::middleware::auth::{SESSION_TOKEN_KEY, SESSION_USER_KEY};
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: String,
    pub cpf: String,
}

pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        error: String::new(),
        cpf: String::new(),
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub senha: String,
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: tower_sessions::Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let cpf = cpf_digits(&form.cpf);
    if cpf.is_empty() || form.senha.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                error: "Informe CPF e senha.".to_string(),
                cpf: form.cpf.clone(),
            },
        )
            .into_response();
    }

    match state.api.login(&cpf, &form.senha).await {
        Ok(data) => {
            let token_saved = session.insert(SESSION_TOKEN_KEY, &data.token).await.is_ok();
            let user_saved = session.insert(SESSION_USER_KEY, &data.user).await.is_ok();
            if !token_saved || !user_saved {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    LoginTemplate {
                        error: "Não foi possível iniciar a sessão.".to_string(),
                        cpf: form.cpf.clone(),
                    },
                )
                    .into_response();
            }
            tracing::info!(role = data.user.role.as_str(), "user logged in");
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                error: e.to_string(),
                cpf: form.cpf.clone(),
            },
        )
            .into_response(),
    }
}

pub async fn logout_handler(session: tower_sessions::Session) -> impl IntoResponse {
    session.clear().await;
    Redirect::to("/login")
}
