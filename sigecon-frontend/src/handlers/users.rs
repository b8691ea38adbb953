use crate::domain::cpf::{cpf_digits, format_cpf};
use crate::handlers::{flash_message, FlashParams};
use crate::middleware::auth::SESSION_USER_KEY;
use crate::models::user::{AuthUser, Role};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub nome: String,
    pub role: String,
    pub is_admin: bool,
    pub profile_cpf: String,
    pub users: Vec<UserRow>,
    pub senha_inicial: String,
    pub created_nome: String,
    pub error: String,
    pub notice: String,
}

pub struct UserRow {
    pub nome: String,
    pub cpf: String,
    pub role: String,
    pub ativo: String,
}

struct CreatedNotice {
    nome: String,
    senha_inicial: String,
}

async fn render_users(
    state: &AppState,
    auth: &AuthUser,
    status: StatusCode,
    error: String,
    notice: String,
    created: Option<CreatedNotice>,
) -> Response {
    let mut error = error;

    // only admins see the account list
    let users = if auth.is_admin() {
        match state.api.list_users(&auth.token).await {
            Ok(users) => users
                .iter()
                .map(|user| UserRow {
                    nome: user.nome.clone().unwrap_or_default(),
                    cpf: format_cpf(user.cpf.as_deref().unwrap_or_default()),
                    role: user.role.as_str().to_string(),
                    ativo: match user.ativo {
                        Some(false) => "Inativo".to_string(),
                        _ => "Ativo".to_string(),
                    },
                })
                .collect(),
            Err(e) => {
                if error.is_empty() {
                    error = e.to_string();
                }
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let (created_nome, senha_inicial) = created
        .map(|c| (c.nome, c.senha_inicial))
        .unwrap_or_default();

    (
        status,
        UsersTemplate {
            nome: auth.nome(),
            role: auth.user.role.as_str().to_string(),
            is_admin: auth.is_admin(),
            profile_cpf: format_cpf(auth.user.cpf.as_deref().unwrap_or_default()),
            users,
            senha_inicial,
            created_nome,
            error,
            notice,
        },
    )
        .into_response()
}

pub async fn users_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<FlashParams>,
) -> Response {
    render_users(
        &state,
        &auth,
        StatusCode::OK,
        String::new(),
        flash_message(&params),
        None,
    )
    .await
}

#[derive(Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub nome: String,
}

pub async fn update_name(
    State(state): State<AppState>,
    session: Session,
    auth: AuthUser,
    Form(form): Form<NameForm>,
) -> Response {
    let nome = form.nome.trim();
    if nome.is_empty() {
        return render_users(
            &state,
            &auth,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Informe o novo nome.".to_string(),
            String::new(),
            None,
        )
        .await;
    }

    match state.api.update_my_name(&auth.token, nome).await {
        Ok(user) => {
            let _ = session.insert(SESSION_USER_KEY, &user).await;
            Redirect::to("/users?ok=name_updated").into_response()
        }
        Err(e) => {
            render_users(
                &state,
                &auth,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
                None,
            )
            .await
        }
    }
}

#[derive(Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub senha_atual: String,
    #[serde(default)]
    pub senha_nova: String,
    #[serde(default)]
    pub senha_nova_confirm: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<PasswordForm>,
) -> Response {
    if form.senha_atual.is_empty() || form.senha_nova.is_empty() {
        return render_users(
            &state,
            &auth,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Preencha a senha atual e a nova senha.".to_string(),
            String::new(),
            None,
        )
        .await;
    }
    if form.senha_nova != form.senha_nova_confirm {
        return render_users(
            &state,
            &auth,
            StatusCode::UNPROCESSABLE_ENTITY,
            "A confirmação não confere com a nova senha.".to_string(),
            String::new(),
            None,
        )
        .await;
    }

    match state
        .api
        .change_my_password(&auth.token, &form.senha_atual, &form.senha_nova)
        .await
    {
        Ok(()) => Redirect::to("/users?ok=password_changed").into_response(),
        Err(e) => {
            render_users(
                &state,
                &auth,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
                None,
            )
            .await
        }
    }
}

#[derive(Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub role: String,
}

/// Creates an account and renders the page directly so the generated initial
/// password shows exactly once.
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<NewUserForm>,
) -> Response {
    if !auth.is_admin() {
        return render_users(
            &state,
            &auth,
            StatusCode::FORBIDDEN,
            "Apenas administradores podem criar usuários.".to_string(),
            String::new(),
            None,
        )
        .await;
    }

    let nome = form.nome.trim();
    let cpf = cpf_digits(&form.cpf);
    if nome.is_empty() || cpf.is_empty() {
        return render_users(
            &state,
            &auth,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Informe nome e CPF do novo usuário.".to_string(),
            String::new(),
            None,
        )
        .await;
    }

    let role = if form.role == "ADMIN" {
        Role::Admin
    } else {
        Role::Operador
    };

    match state.api.create_user(&auth.token, nome, &cpf, role).await {
        Ok(created) => {
            let notice = CreatedNotice {
                nome: created.user.nome.clone().unwrap_or_else(|| nome.to_string()),
                senha_inicial: created.senha_inicial.clone().unwrap_or_default(),
            };
            render_users(
                &state,
                &auth,
                StatusCode::OK,
                String::new(),
                "Usuário criado com sucesso.".to_string(),
                Some(notice),
            )
            .await
        }
        Err(e) => {
            render_users(
                &state,
                &auth,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
                None,
            )
            .await
        }
    }
}
