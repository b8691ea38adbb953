pub mod app;
pub mod auth;
pub mod contracts;
pub mod metrics;
pub mod orders;
pub mod users;

use crate::models::contract::normalize_date_for_input;
use serde::Deserialize;

/// Success codes carried through redirects as `?ok=<code>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlashParams {
    #[serde(default)]
    pub ok: Option<String>,
}

pub(crate) fn flash_message(params: &FlashParams) -> String {
    let Some(code) = params.ok.as_deref() else {
        return String::new();
    };
    match code {
        "imported" => "Contrato importado com sucesso.",
        "contract_saved" => "Alterações do contrato salvas com sucesso.",
        "contract_deleted" => "Contrato excluído com sucesso.",
        "item_saved" => "Item do contrato salvo com sucesso.",
        "item_deleted" => "Item removido com sucesso.",
        "order_created" => "Ordem criada com sucesso.",
        "order_updated" => "Itens da ordem atualizados com sucesso.",
        "order_deleted" => "Ordem excluída com sucesso.",
        "name_updated" => "Nome atualizado com sucesso.",
        "password_changed" => "Senha alterada com sucesso.",
        _ => "",
    }
    .to_string()
}

/// dd/mm/yyyy for tables, with a placeholder for missing dates.
pub(crate) fn display_date(value: Option<&str>) -> String {
    let normalized = normalize_date_for_input(value);
    match chrono::NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) if normalized.is_empty() => "—".to_string(),
        Err(_) => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_codes_map_to_messages() {
        let params = FlashParams {
            ok: Some("order_created".into()),
        };
        assert_eq!(flash_message(&params), "Ordem criada com sucesso.");
        assert_eq!(flash_message(&FlashParams::default()), "");
        let unknown = FlashParams {
            ok: Some("nope".into()),
        };
        assert_eq!(flash_message(&unknown), "");
    }

    #[test]
    fn dates_render_pt_br() {
        assert_eq!(display_date(Some("2025-01-09T12:00:00Z")), "09/01/2025");
        assert_eq!(display_date(None), "—");
    }
}
