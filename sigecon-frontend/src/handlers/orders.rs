use crate::domain::format::{format_brl, format_number};
use crate::domain::items::{item_number, prepare_contract_items};
use crate::domain::parse::parse_quantity;
use crate::domain::quantity::clamp_quantity;
use crate::handlers::{display_date, flash_message, FlashParams};
use crate::models::num;
use crate::models::order::{
    Order, OrderCreatePayload, OrderItemRef, OrderItemUpdate, OrderUpdatePayload, XlsxExtras,
    EXPENSE_OPTIONS, MODALITY_OPTIONS,
};
use crate::models::user::AuthUser;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub nome: String,
    pub role: String,
    pub contracts: Vec<ContractOption>,
    pub selected_contract_id: String,
    pub entry_items: Vec<EntryItemRow>,
    pub orders: Vec<OrderRow>,
    pub today: String,
    pub error: String,
    pub notice: String,
}

pub struct ContractOption {
    pub id: String,
    pub label: String,
}

/// Contract item offered on the issuance form.
pub struct EntryItemRow {
    pub item_id: String,
    pub item_no: String,
    pub description: String,
    pub unit: String,
    pub available: String,
    pub unit_price: String,
}

pub struct OrderRow {
    pub id: String,
    pub order_number: String,
    pub contract_number: String,
    pub order_type: String,
    pub total: String,
    pub issue_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersQuery {
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default)]
    pub ok: Option<String>,
}

async fn render_orders(
    state: &AppState,
    auth: &AuthUser,
    selected: Option<&str>,
    status: StatusCode,
    error: String,
    notice: String,
) -> Response {
    let mut error = error;

    let contracts = match state.api.list_contracts(&auth.token).await {
        Ok(contracts) => contracts,
        Err(e) => {
            if error.is_empty() {
                error = e.to_string();
            }
            Vec::new()
        }
    };
    let contract_options = contracts
        .iter()
        .map(|contract| {
            let id = contract.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
            let number = contract.number.clone().unwrap_or_else(|| format!("#{}", id));
            let label = match contract.supplier.as_deref() {
                Some(supplier) if !supplier.is_empty() => format!("{} — {}", number, supplier),
                _ => number,
            };
            ContractOption { id, label }
        })
        .collect();

    let selected_contract_id = selected.unwrap_or_default().to_string();
    let mut entry_items = Vec::new();
    if !selected_contract_id.is_empty() {
        match state.api.get_contract(&auth.token, &selected_contract_id).await {
            Ok(contract) => {
                let prepared = prepare_contract_items(&contract.items);
                entry_items = prepared
                    .items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| EntryItemRow {
                        item_id: item.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                        item_no: item_number(item)
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| (idx + 1).to_string()),
                        description: item.description.clone().unwrap_or_default(),
                        unit: item.unit.clone().unwrap_or_default(),
                        available: num(item.quantity.as_ref())
                            .map(|q| format_number(q, 0))
                            .unwrap_or_default(),
                        unit_price: num(item.unit_price.as_ref())
                            .map(format_brl)
                            .unwrap_or_default(),
                    })
                    .collect();
            }
            Err(e) => {
                if error.is_empty() {
                    error = e.to_string();
                }
            }
        }
    }

    let orders = match state.api.list_orders(&auth.token).await {
        Ok(orders) => orders
            .iter()
            .map(|order| {
                let id = order.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
                OrderRow {
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
            .collect(),
        Err(e) => {
            if error.is_empty() {
                error = e.to_string();
            }
            Vec::new()
        }
    };

    (
        status,
        OrdersTemplate {
            nome: auth.nome(),
            role: auth.user.role.as_str().to_string(),
            contracts: contract_options,
            selected_contract_id,
            entry_items,
            orders,
            today: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            error,
            notice,
        },
    )
        .into_response()
}

pub async fn orders_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<OrdersQuery>,
) -> Response {
    let notice = flash_message(&FlashParams {
        ok: params.ok.clone(),
    });
    render_orders(
        &state,
        &auth,
        params.contract.as_deref(),
        StatusCode::OK,
        String::new(),
        notice,
    )
    .await
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Issues an order. Quantities come in as one `qty_<contractItemId>` field
/// per item; entries are normalized against the contract's available
/// quantities and non-positive ones drop out.
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let mut contract_id = String::new();
    let mut order_type = String::new();
    let mut order_number = None;
    let mut issue_date = None;
    let mut reference_period = None;
    let mut justification = None;
    let mut quantities: Vec<(String, String)> = Vec::new();

    for (name, value) in fields {
        match name.as_str() {
            "contract_id" => contract_id = value.trim().to_string(),
            "order_type" => order_type = value.trim().to_string(),
            "order_number" => order_number = non_empty(Some(value)),
            "issue_date" => issue_date = non_empty(Some(value)),
            "reference_period" => reference_period = non_empty(Some(value)),
            "justification" => justification = non_empty(Some(value)),
            _ => {
                if let Some(item_id) = name.strip_prefix("qty_") {
                    quantities.push((item_id.to_string(), value));
                }
            }
        }
    }

    if contract_id.is_empty() || order_type.is_empty() {
        return render_orders(
            &state,
            &auth,
            None,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Selecione o contrato e o tipo da ordem.".to_string(),
            String::new(),
        )
        .await;
    }

    let contract = match state.api.get_contract(&auth.token, &contract_id).await {
        Ok(contract) => contract,
        Err(e) => {
            return render_orders(
                &state,
                &auth,
                Some(&contract_id),
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
            )
            .await;
        }
    };

    let prepared = prepare_contract_items(&contract.items);
    let mut items = Vec::new();
    for (item_id, raw) in &quantities {
        let available = prepared
            .items
            .iter()
            .find(|item| {
                item.id
                    .as_ref()
                    .map(|i| i.to_string() == *item_id)
                    .unwrap_or(false)
            })
            .and_then(|item| num(item.quantity.as_ref()))
            .unwrap_or(Decimal::MAX);
        if let Some(quantity) = clamp_quantity(raw, available) {
            items.push(OrderItemRef {
                contract_item_id: item_id.clone(),
                quantity: Decimal::from(quantity),
            });
        }
    }

    if items.is_empty() {
        return render_orders(
            &state,
            &auth,
            Some(&contract_id),
            StatusCode::UNPROCESSABLE_ENTITY,
            "Informe a quantidade para pelo menos um item.".to_string(),
            String::new(),
        )
        .await;
    }

    let payload = OrderCreatePayload {
        contract_id: contract_id.clone(),
        order_type,
        order_number,
        issue_date,
        reference_period,
        justification,
        items,
    };

    match state.api.create_order(&auth.token, &payload).await {
        Ok(_) => Redirect::to("/orders?ok=order_created").into_response(),
        Err(e) => {
            render_orders(
                &state,
                &auth,
                Some(&contract_id),
                StatusCode::BAD_GATEWAY,
                e.to_string(),
                String::new(),
            )
            .await
        }
    }
}

#[derive(Template)]
#[template(path = "order_detail.html")]
pub struct OrderDetailTemplate {
    pub nome: String,
    pub role: String,
    pub is_admin: bool,
    pub id: String,
    pub order_number: String,
    pub order_type: String,
    pub contract_number: String,
    pub supplier: String,
    pub issue_date: String,
    pub reference_period: String,
    pub justification: String,
    pub total: String,
    pub items: Vec<OrderItemRow>,
    pub extras: ExtrasForm,
    pub error: String,
    pub notice: String,
}

pub struct OrderItemRow {
    pub item_id: String,
    pub item_no: String,
    pub description: String,
    pub unit: String,
    pub quantity: String,
    pub unit_price: String,
    pub total_price: String,
}

/// Spreadsheet fields prefilled on the download form.
pub struct ExtrasForm {
    pub order_type_text: String,
    pub de_text: String,
    pub para_text: String,
    pub nome_razao: String,
    pub endereco: String,
    pub celular_texto: String,
    pub justificativa_campo: String,
    pub expense_options: Vec<CheckOption>,
    pub modality_options: Vec<CheckOption>,
}

pub struct CheckOption {
    pub label: String,
    pub checked: bool,
}

fn check_options(all: &[&str], selected: &[String]) -> Vec<CheckOption> {
    all.iter()
        .map(|option| CheckOption {
            label: option.to_string(),
            checked: selected.iter().any(|s| s == option),
        })
        .collect()
}

fn extras_form(order: &Order) -> ExtrasForm {
    let extras = XlsxExtras::for_order(order);
    ExtrasForm {
        expense_options: check_options(EXPENSE_OPTIONS, &extras.tipos_despesa_selecionados),
        modality_options: check_options(MODALITY_OPTIONS, &extras.modalidades_selecionadas),
        order_type_text: extras.order_type_text,
        de_text: extras.de_text,
        para_text: extras.para_text,
        nome_razao: extras.nome_razao,
        endereco: extras.endereco,
        celular_texto: extras.celular_texto,
        justificativa_campo: extras.justificativa_campo,
    }
}

async fn render_order_detail(
    state: &AppState,
    auth: &AuthUser,
    id: &str,
    status: StatusCode,
    error: String,
    notice: String,
) -> Response {
    let order = match state.api.get_order(&auth.token, id).await {
        Ok(order) => order,
        Err(e) => {
            return render_orders(state, auth, None, StatusCode::OK, e.to_string(), String::new())
                .await;
        }
    };

    // the contract lookup is best effort; the order renders without it
    let mut contract_number = String::new();
    let mut supplier = String::new();
    if let Some(contract_id) = order.contract_id.as_ref() {
        if let Ok(contract) = state
            .api
            .get_contract(&auth.token, &contract_id.to_string())
            .await
        {
            contract_number = contract.number.unwrap_or_default();
            supplier = contract.supplier.unwrap_or_default();
        }
    }

    let items: Vec<OrderItemRow> = order
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| OrderItemRow {
            item_id: item.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
            item_no: item
                .item_no
                .as_ref()
                .and_then(|raw| raw.as_decimal())
                .map(|n| format_number(n, 0))
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

    let total = num(order.total_amount.as_ref())
        .map(format_brl)
        .unwrap_or_else(|| "—".to_string());

    (
        status,
        OrderDetailTemplate {
            nome: auth.nome(),
            role: auth.user.role.as_str().to_string(),
            is_admin: auth.is_admin(),
            id: id.to_string(),
            order_number: order
                .order_number
                .clone()
                .unwrap_or_else(|| format!("Ordem #{}", id)),
            order_type: order.order_type.clone().unwrap_or_default(),
            contract_number,
            supplier,
            issue_date: display_date(order.issue_date.as_deref()),
            reference_period: order.reference_period.clone().unwrap_or_default(),
            justification: order.justification.clone().unwrap_or_default(),
            total,
            extras: extras_form(&order),
            items,
            error,
            notice,
        },
    )
        .into_response()
}

pub async fn order_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(params): Query<FlashParams>,
) -> Response {
    render_order_detail(
        &state,
        &auth,
        &id,
        StatusCode::OK,
        String::new(),
        flash_message(&params),
    )
    .await
}

/// Reconciles an issued order's quantities. One `qty_<orderItemId>` field per
/// line; only positive parseable entries are sent.
pub async fn update_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    if !auth.is_admin() {
        return render_order_detail(
            &state,
            &auth,
            &id,
            StatusCode::FORBIDDEN,
            "Apenas administradores podem alterar a ordem.".to_string(),
            String::new(),
        )
        .await;
    }

    let mut items = Vec::new();
    for (name, value) in &fields {
        if let Some(order_item_id) = name.strip_prefix("qty_") {
            if let Some(quantity) = parse_quantity(value).filter(|q| *q > Decimal::ZERO) {
                items.push(OrderItemUpdate {
                    order_item_id: order_item_id.to_string(),
                    quantity,
                });
            }
        }
    }

    if items.is_empty() {
        return render_order_detail(
            &state,
            &auth,
            &id,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Informe uma quantidade válida para pelo menos um item.".to_string(),
            String::new(),
        )
        .await;
    }

    let payload = OrderUpdatePayload { items };
    match state.api.update_order(&auth.token, &id, &payload).await {
        Ok(_) => Redirect::to(&format!("/orders/{}?ok=order_updated", id)).into_response(),
        Err(e) => {
            render_order_detail(
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

pub async fn delete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Response {
    if !auth.is_admin() {
        return render_order_detail(
            &state,
            &auth,
            &id,
            StatusCode::FORBIDDEN,
            "Apenas administradores podem excluir ordens.".to_string(),
            String::new(),
        )
        .await;
    }
    match state.api.delete_order(&auth.token, &id).await {
        Ok(()) => Redirect::to("/orders?ok=order_deleted").into_response(),
        Err(e) => {
            render_order_detail(
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

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Streams the generated spreadsheet back as a download. Checkbox groups
/// (`tipos_despesa`, `modalidades`) repeat their field name per selection.
pub async fn download_order_xlsx(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let mut extras = XlsxExtras::default();
    let mut tipos = Vec::new();
    let mut modalidades = Vec::new();

    for (name, value) in fields {
        match name.as_str() {
            "order_type_text" => extras.order_type_text = value,
            "de_text" => extras.de_text = value,
            "para_text" => extras.para_text = value,
            "nome_razao" => extras.nome_razao = value,
            "endereco" => extras.endereco = value,
            "celular_texto" => extras.celular_texto = value,
            "justificativa_campo" => extras.justificativa_campo = value,
            "tipos_despesa" => tipos.push(value),
            "modalidades" => modalidades.push(value),
            _ => {}
        }
    }
    extras.tipos_despesa_selecionados = tipos;
    extras.modalidades_selecionadas = modalidades;

    match state.api.order_xlsx(&auth.token, &id, &extras).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, XLSX_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"ordem-{}.xlsx\"", id),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            render_order_detail(
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
