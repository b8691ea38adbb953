use crate::domain::balance::{ContractStatus, FinancialSummary};
use crate::domain::format::format_brl;
use crate::handlers::display_date;
use crate::middleware::auth::{SESSION_TOKEN_KEY, SESSION_USER_KEY};
use crate::models::num;
use crate::models::user::AuthUser;
use crate::services::api_client::ApiError;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use tower_sessions::Session;

pub async fn index(session: Session) -> impl IntoResponse {
    let token: Option<String> = session.get(SESSION_TOKEN_KEY).await.unwrap_or(None);
    if token.is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nome: String,
    pub role: String,
    pub active_contracts: usize,
    pub total_remaining: String,
    pub month_usage: String,
    pub recent_orders: Vec<RecentOrderRow>,
    pub error: String,
}

pub struct RecentOrderRow {
    pub id: String,
    pub order_number: String,
    pub contract_number: String,
    pub order_type: String,
    pub total: String,
    pub issue_date: String,
}

pub async fn dashboard_handler(
    State(state): State<AppState>,
    session: Session,
    auth: AuthUser,
) -> Response {
    // re-validate the token on entry; a rejected token ends the session
    let user = match state.api.me(&auth.token).await {
        Ok(user) => {
            let _ = session.insert(SESSION_USER_KEY, &user).await;
            user
        }
        Err(ApiError::Upstream { status, .. })
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN =>
        {
            session.clear().await;
            return Redirect::to("/login").into_response();
        }
        Err(_) => auth.user.clone(),
    };

    let mut error = String::new();

    let mut active_contracts = 0usize;
    let mut total_remaining = Decimal::ZERO;
    match state.api.list_contracts(&auth.token).await {
        Ok(contracts) => {
            for contract in &contracts {
                let summary = FinancialSummary::for_contract(contract);
                if summary.status() != ContractStatus::Closed {
                    active_contracts += 1;
                    total_remaining += summary.remaining.unwrap_or(summary.total);
                }
            }
        }
        Err(e) => error = e.to_string(),
    }

    let current_month = chrono::Utc::now().format("%Y-%m").to_string();
    let mut month_usage = Decimal::ZERO;
    let mut recent_orders = Vec::new();
    match state.api.list_orders(&auth.token).await {
        Ok(orders) => {
            for order in &orders {
                let issued = crate::models::contract::normalize_date_for_input(
                    order.issue_date.as_deref(),
                );
                if issued.starts_with(&current_month) {
                    month_usage += num(order.total_amount.as_ref()).unwrap_or_default();
                }
            }
            recent_orders = orders
                .iter()
                .take(5)
                .map(|order| {
                    let id = order.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
                    RecentOrderRow {
                        order_number: order
                            .order_number
                            .clone()
                            .unwrap_or_else(|| format!("Ordem #{}", id)),
                        contract_number: order.contract_number.clone().unwrap_or_default(),
                        order_type: order.order_type.clone().unwrap_or_default(),
                        total: format_brl(num(order.total_amount.as_ref()).unwrap_or_default()),
                        issue_date: display_date(order.issue_date.as_deref()),
                        id,
                    }
                })
                .collect();
        }
        Err(e) => {
            if error.is_empty() {
                error = e.to_string();
            }
        }
    }

    DashboardTemplate {
        nome: user.nome.clone().unwrap_or_default(),
        role: user.role.as_str().to_string(),
        active_contracts,
        total_remaining: format_brl(total_remaining),
        month_usage: format_brl(month_usage),
        recent_orders,
        error,
    }
    .into_response()
}
