use crate::domain::balance::FinancialSummary;
use crate::domain::capability::{validate_item_submission, ItemForm};
use crate::domain::format::{format_brl, format_brl_opt, format_number};
use crate::domain::items::{item_number, prepare_contract_items};
use crate::handlers::{flash_message, FlashParams};
use crate::models::contract::{normalize_date_for_input, Contract, ContractUpdatePayload, ImportPayload};
use crate::models::num;
use crate::models::user::AuthUser;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use validator::Validate;

#[derive(Template)]
#[template(path = "contracts.html")]
pub struct ContractsTemplate {
    pub nome: String,
    pub role: String,
    pub rows: Vec<ContractRow>,
    pub error: String,
    pub notice: String,
}

pub struct ContractRow {
    pub id: String,
    pub number: String,
    pub supplier: String,
    pub description: String,
    pub total: String,
    pub used: String,
    pub remaining: String,
    pub status_code: String,
    pub status_label: String,
}

fn contract_row(contract: &Contract) -> ContractRow {
    let summary = FinancialSummary::for_contract(contract);
    let status = summary.status();
    ContractRow {
        id: contract.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
        number: contract.number.clone().unwrap_or_default(),
        supplier: contract.supplier.clone().unwrap_or_default(),
        description: contract.description.clone().unwrap_or_default(),
        total: format_brl(summary.total),
        used: format_brl_opt(summary.used),
        remaining: format_brl_opt(summary.remaining),
        status_code: status.code().to_string(),
        status_label: status.label().to_string(),
    }
}

async fn render_list(
    state: &AppState,
    auth: &AuthUser,
    status: StatusCode,
    error: String,
    notice: String,
) -> Response {
    let (rows, error) = match state.api.list_contracts(&auth.token).await {
        Ok(contracts) => (contracts.iter().map(contract_row).collect(), error),
        Err(e) => (
            Vec::new(),
            if error.is_empty() { e.to_string() } else { error },
        ),
    };

    (
        status,
        ContractsTemplate {
            nome: auth.nome(),
            role: auth.user.role.as_str().to_string(),
            rows,
            error,
            notice,
        },
    )
        .into_response()
}

pub async fn contracts_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<FlashParams>,
) -> Response {
    render_list(
        &state,
        &auth,
        StatusCode::OK,
        String::new(),
        flash_message(&params),
    )
    .await
}

/// Multipart PDF upload: the extraction service turns the file into rows,
/// then the backend creates the contract and its items.
pub async fn import_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Response {
    let mut file_name = String::new();
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            file_name = field.file_name().unwrap_or("contrato.pdf").to_string();
            match field.bytes().await {
                Ok(bytes) => file_bytes = Some(bytes.to_vec()),
                Err(_) => file_bytes = None,
            }
            break;
        }
    }

    let Some(bytes) = file_bytes.filter(|b| !b.is_empty()) else {
        return render_list(
            &state,
            &auth,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Selecione um arquivo PDF para importar.".to_string(),
            String::new(),
        )
        .await;
    };

    let extract = match state.extractor.extract(&file_name, bytes).await {
        Ok(extract) => extract,
        Err(e) => {
            return render_list(
                &state,
                &auth,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
            )
            .await;
        }
    };

    let payload = ImportPayload::from_extract(&file_name, extract);
    match state.api.import_contract(&auth.token, &payload).await {
        Ok(_) => Redirect::to("/contracts?ok=imported").into_response(),
        Err(e) => {
            render_list(
                &state,
                &auth,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
            )
            .await
        }
    }
}

#[derive(Template)]
#[template(path = "contract_detail.html")]
pub struct ContractDetailTemplate {
    pub nome: String,
    pub role: String,
    pub is_admin: bool,
    pub id: String,
    pub number: String,
    pub supplier: String,
    pub start_date: String,
    pub end_date: String,
    pub total: String,
    pub used: String,
    pub remaining: String,
    pub items: Vec<ItemRow>,
    pub items_total: String,
    pub error: String,
    pub notice: String,
}

pub struct ItemRow {
    pub item_no: String,
    pub description: String,
    pub unit: String,
    pub quantity: String,
    pub unit_price: String,
    pub total_price: String,
}

async fn render_detail(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    status: StatusCode,
    error: String,
    notice: String,
) -> Response {
    let contract = match state.api.get_contract(&auth.token, id).await {
        Ok(contract) => contract,
        Err(e) => {
            return render_list(state, auth, StatusCode::OK, e.to_string(), String::new()).await;
        }
    };

    let summary = FinancialSummary::for_contract(&contract);
    let prepared = prepare_contract_items(&contract.items);
    let items = prepared
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| ItemRow {
            item_no: item_number(item)
                .map(|n| n.to_string())
                .unwrap_or_else(|| (idx + 1).to_string()),
            description: item.description.clone().unwrap_or_default(),
            unit: item.unit.clone().unwrap_or_default(),
            quantity: num(item.quantity.as_ref())
                .map(|q| format_number(q, 0))
                .unwrap_or_default(),
            unit_price: num(item.unit_price.as_ref())
                .map(format_brl)
                .unwrap_or_default(),
            total_price: num(item.total_price.as_ref())
                .map(format_brl)
                .unwrap_or_default(),
        })
        .collect();

    (
        status,
        ContractDetailTemplate {
            nome: auth.nome(),
            role: auth.user.role.as_str().to_string(),
            is_admin: auth.is_admin(),
            id: id.to_string(),
            number: contract.number.clone().unwrap_or_default(),
            supplier: contract.supplier.clone().unwrap_or_default(),
            start_date: normalize_date_for_input(contract.start_date.as_deref()),
            end_date: normalize_date_for_input(contract.end_date.as_deref()),
            total: format_brl(summary.total),
            used: format_brl_opt(summary.used),
            remaining: format_brl_opt(summary.remaining),
            items,
            items_total: format_brl(prepared.total),
            error,
            notice,
        },
    )
        .into_response()
}

pub async fn contract_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(params): Query<FlashParams>,
) -> Response {
    render_detail(
        &state,
        &auth,
        &id,
        StatusCode::OK,
        String::new(),
        flash_message(&params),
    )
    .await
}

#[derive(Deserialize, Validate)]
pub struct ContractEditForm {
    #[validate(length(min = 1, message = "Informe o número do contrato."))]
    pub number: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

pub async fn update_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Form(form): Form<ContractEditForm>,
) -> Response {
    if form.validate().is_err() {
        return render_detail(
            &state,
            &auth,
            &id,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Informe o número do contrato.".to_string(),
            String::new(),
        )
        .await;
    }

    let non_empty = |s: String| if s.trim().is_empty() { None } else { Some(s) };
    let payload = ContractUpdatePayload {
        number: form.number.trim().to_string(),
        supplier: non_empty(form.supplier),
        start_date: non_empty(form.start_date),
        end_date: non_empty(form.end_date),
    };

    match state.api.update_contract(&auth.token, &id, &payload).await {
        Ok(_) => Redirect::to(&format!("/contracts/{}?ok=contract_saved", id)).into_response(),
        Err(e) => {
            render_detail(
                &state,
                &auth,
                &id,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
            )
            .await
        }
    }
}

pub async fn delete_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Response {
    if !auth.is_admin() {
        return render_detail(
            &state,
            &auth,
            &id,
            StatusCode::FORBIDDEN,
            "Apenas administradores podem excluir contratos.".to_string(),
            String::new(),
        )
        .await;
    }
    match state.api.delete_contract(&auth.token, &id).await {
        Ok(()) => Redirect::to("/contracts?ok=contract_deleted").into_response(),
        Err(e) => {
            render_detail(
                &state,
                &auth,
                &id,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
            )
            .await
        }
    }
}

#[derive(Deserialize)]
pub struct ItemFormData {
    #[serde(default)]
    pub item_no: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
}

/// Add (no item number) or update (with item number) a contract item. Role
/// rules are enforced before any backend call.
pub async fn save_contract_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Form(form): Form<ItemFormData>,
) -> Response {
    let item_no = form
        .item_no
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|_| !form.item_no.trim().is_empty());

    let submission = ItemForm {
        item_no,
        description: form.description,
        unit: form.unit,
        quantity: form.quantity,
        unit_price: form.unit_price,
    };

    let payload = match validate_item_submission(auth.user.role, &submission) {
        Ok(payload) => payload,
        Err(e) => {
            return render_detail(
                &state,
                &auth,
                &id,
                StatusCode::UNPROCESSABLE_ENTITY,
                e.to_string(),
                String::new(),
            )
            .await;
        }
    };

    match state
        .api
        .update_contract_item(&auth.token, &id, &payload)
        .await
    {
        Ok(_) => Redirect::to(&format!("/contracts/{}?ok=item_saved", id)).into_response(),
        Err(e) => {
            render_detail(
                &state,
                &auth,
                &id,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
            )
            .await
        }
    }
}

pub async fn delete_contract_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, item_no)): Path<(String, u64)>,
) -> Response {
    if !auth.is_admin() {
        return render_detail(
            &state,
            &auth,
            &id,
            StatusCode::FORBIDDEN,
            "Apenas administradores podem excluir itens do contrato.".to_string(),
            String::new(),
        )
        .await;
    }

    match state
        .api
        .delete_contract_item(&auth.token, &id, item_no)
        .await
    {
        Ok(_) => Redirect::to(&format!("/contracts/{}?ok=item_deleted", id)).into_response(),
        Err(e) => {
            render_detail(
                &state,
                &auth,
                &id,
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
            )
            .await
        }
    }
}
