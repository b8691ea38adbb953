use super::{RawId, RawNumber};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Row of GET /orders.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderSummary {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, alias = "orderNumber")]
    pub order_number: Option<String>,
    #[serde(default, alias = "orderType")]
    pub order_type: Option<String>,
    #[serde(default, alias = "contractNumber")]
    pub contract_number: Option<String>,
    #[serde(default, alias = "fornecedor")]
    pub supplier: Option<String>,
    #[serde(default, alias = "issueDate")]
    pub issue_date: Option<String>,
    #[serde(default, alias = "totalAmount")]
    pub total_amount: Option<RawNumber>,
}

/// Full order with items, from GET /orders/:id.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Order {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, alias = "orderNumber")]
    pub order_number: Option<String>,
    #[serde(default, alias = "orderType")]
    pub order_type: Option<String>,
    #[serde(default, alias = "issueDate")]
    pub issue_date: Option<String>,
    #[serde(default, alias = "referencePeriod")]
    pub reference_period: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default, alias = "totalAmount")]
    pub total_amount: Option<RawNumber>,
    #[serde(default, alias = "contractId")]
    pub contract_id: Option<RawId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, alias = "itemNo")]
    pub item_no: Option<RawNumber>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: Option<RawNumber>,
    #[serde(default, alias = "unitPrice")]
    pub unit_price: Option<RawNumber>,
    #[serde(default, alias = "totalPrice")]
    pub total_price: Option<RawNumber>,
}

/// POST /orders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatePayload {
    pub contract_id: String,
    pub order_type: String,
    pub order_number: Option<String>,
    pub issue_date: Option<String>,
    pub reference_period: Option<String>,
    pub justification: Option<String>,
    pub items: Vec<OrderItemRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRef {
    pub contract_item_id: String,
    pub quantity: Decimal,
}

/// PUT /orders/:id
#[derive(Debug, Clone, Serialize)]
pub struct OrderUpdatePayload {
    pub items: Vec<OrderItemUpdate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemUpdate {
    pub order_item_id: String,
    pub quantity: Decimal,
}

pub const EXPENSE_OPTIONS: &[&str] = &[
    "SERVIÇOS / OBRAS DE ENGENHARIA",
    "AQUIS. BENS / MAT. DE CONSUMO",
    "OUTROS  (Diárias; Passagens; etc.)",
];

pub const MODALITY_OPTIONS: &[&str] = &[
    "DISPENSA DE LICITAÇÃO",
    "INEXIGIBILIDADE DE LICITAÇÃO",
    "CONC. PÚBLICA",
    "PREGÃO ELETRÔNICO",
    "OUTROS",
];

/// Descriptive fields the spreadsheet generator expects alongside the order
/// (POST /orders/:id/xlsx).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XlsxExtras {
    pub order_type_text: String,
    pub de_text: String,
    pub para_text: String,
    pub nome_razao: String,
    pub endereco: String,
    pub celular_texto: String,
    pub justificativa_campo: String,
    pub tipos_despesa_selecionados: Vec<String>,
    pub modalidades_selecionadas: Vec<String>,
}

impl Default for XlsxExtras {
    fn default() -> Self {
        Self {
            order_type_text: String::new(),
            de_text: "SECRETARIA MUNICIPAL DE GESTÃO E ORÇAMENTO".to_string(),
            para_text: "05.281.738/0001-98".to_string(),
            nome_razao: "S. T. BORBA".to_string(),
            endereco: "RUA DEP. RAIMUNDO BACELAR,421, CENTRO, COELHO NETO-MA".to_string(),
            celular_texto: "CONTRATO Nº 009 DE 09 DE JANEIRO DE 2025".to_string(),
            justificativa_campo: String::new(),
            tipos_despesa_selecionados: vec!["SERVIÇOS / OBRAS DE ENGENHARIA".to_string()],
            modalidades_selecionadas: vec!["PREGÃO ELETRÔNICO Nº 001/2024".to_string()],
        }
    }
}

impl XlsxExtras {
    /// Form defaults derived from the order itself: type text mirrors the
    /// order type, the justification field appends the reference period.
    pub fn for_order(order: &Order) -> Self {
        let mut extras = Self::default();
        if let Some(order_type) = order.order_type.as_deref() {
            extras.order_type_text = order_type.to_string();
        }
        let mut justificativa = order.justification.clone().unwrap_or_default();
        if let Some(period) = order.reference_period.as_deref() {
            if !period.is_empty() {
                justificativa.push_str(&format!(" Período de Referência: {}.", period));
            }
        }
        extras.justificativa_campo = justificativa;
        extras
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extras_compose_justification_with_reference_period() {
        let order = Order {
            order_type: Some("ORDEM DE SERVIÇO".to_string()),
            justification: Some("Manutenção da rede de drenagem.".to_string()),
            reference_period: Some("Janeiro/2025".to_string()),
            ..Order::default()
        };
        let extras = XlsxExtras::for_order(&order);
        assert_eq!(extras.order_type_text, "ORDEM DE SERVIÇO");
        assert_eq!(
            extras.justificativa_campo,
            "Manutenção da rede de drenagem. Período de Referência: Janeiro/2025."
        );
    }

    #[test]
    fn extras_keep_defaults_when_order_is_bare() {
        let extras = XlsxExtras::for_order(&Order::default());
        assert_eq!(extras.order_type_text, "");
        assert_eq!(extras.justificativa_campo, "");
        assert!(!extras.de_text.is_empty());
    }
}
