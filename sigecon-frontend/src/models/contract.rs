use super::{RawId, RawNumber};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract as returned by the backend. Field casing varies between
/// endpoints, so camelCase aliases are accepted everywhere.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Contract {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, alias = "numero")]
    pub number: Option<String>,
    #[serde(default, alias = "fornecedor")]
    pub supplier: Option<String>,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(default, alias = "usedAmount")]
    pub used_amount: Option<RawNumber>,
    #[serde(default, alias = "remainingAmount")]
    pub remaining_amount: Option<RawNumber>,
    #[serde(default, alias = "totalAmount", alias = "valorTotal")]
    pub total_amount: Option<RawNumber>,
    #[serde(default)]
    pub items: Vec<ContractItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContractItem {
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

/// PUT /contracts/:id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractUpdatePayload {
    pub number: String,
    pub supplier: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// PUT /contracts/:id/items. Without an item number the backend creates a
/// new item; with one it updates the matching item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_no: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
}

/// Rows extracted from a contract PDF by the extraction service.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<serde_json::Value>,
    #[serde(default)]
    pub soma_valor_total: Option<RawNumber>,
    #[serde(default)]
    pub soma_valor_unit: Option<RawNumber>,
    #[serde(default)]
    pub issues: Vec<serde_json::Value>,
}

/// POST /contracts/import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload {
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Value>,
    pub total: Option<RawNumber>,
    pub total_unit: Option<RawNumber>,
    pub issues: Vec<serde_json::Value>,
}

impl ImportPayload {
    pub fn from_extract(file_name: &str, extract: ExtractResult) -> Self {
        Self {
            file_name: file_name.to_string(),
            columns: extract.columns,
            rows: extract.rows,
            total: extract.soma_valor_total,
            total_unit: extract.soma_valor_unit,
            issues: extract.issues,
        }
    }
}

/// Normalizes backend dates (RFC 3339 or already plain) to YYYY-MM-DD for
/// date inputs. Unknown shapes keep their first ten characters.
pub fn normalize_date_for_input(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if value.is_empty() {
        return String::new();
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    value.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_accepts_both_casings() {
        let camel: Contract = serde_json::from_value(serde_json::json!({
            "id": 1,
            "number": "009/2025",
            "supplier": "S. T. BORBA",
            "usedAmount": 10.5,
            "items": [{ "itemNo": "1", "description": "Cimento", "unitPrice": "2,50" }]
        }))
        .unwrap();
        assert_eq!(camel.number.as_deref(), Some("009/2025"));
        assert!(camel.used_amount.is_some());
        assert!(camel.items[0].unit_price.is_some());

        let snake: Contract = serde_json::from_value(serde_json::json!({
            "id": "c-1",
            "numero": "014/2025",
            "fornecedor": "Concretex",
            "used_amount": "48.000,00",
            "items": [{ "item_no": 2, "description": "Brita", "unit_price": 90 }]
        }))
        .unwrap();
        assert_eq!(snake.number.as_deref(), Some("014/2025"));
        assert_eq!(snake.supplier.as_deref(), Some("Concretex"));
        assert!(snake.items[0].unit_price.is_some());
    }

    #[test]
    fn date_normalization() {
        assert_eq!(
            normalize_date_for_input(Some("2025-01-09T00:00:00Z")),
            "2025-01-09"
        );
        assert_eq!(normalize_date_for_input(Some("2025-01-09")), "2025-01-09");
        assert_eq!(
            normalize_date_for_input(Some("2025-01-09 extra")),
            "2025-01-09"
        );
        assert_eq!(normalize_date_for_input(None), "");
    }
}
