use crate::domain::parse::parse_decimal;
use crate::models::contract::ItemPayload;
use crate::models::user::Role;
use thiserror::Error;

/// Contract item fields an editor can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    Unit,
    Quantity,
    UnitPrice,
}

impl Role {
    /// Operators may only adjust quantities; admins edit everything.
    pub fn can_edit(&self, field: ItemField) -> bool {
        match self {
            Role::Admin => true,
            Role::Operador => matches!(field, ItemField::Quantity),
        }
    }
}

/// Raw contract item form as submitted. An item number means update,
/// its absence means a new item.
#[derive(Debug, Clone, Default)]
pub struct ItemForm {
    pub item_no: Option<u64>,
    pub description: String,
    pub unit: String,
    pub quantity: String,
    pub unit_price: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemFormError {
    #[error("Apenas administradores podem adicionar itens ao contrato.")]
    AdminRequired,
    #[error(
        "Preencha descrição, unidade, quantidade e valor unitário para adicionar um novo item."
    )]
    IncompleteNewItem,
    #[error("Informe a nova quantidade para atualizar o item.")]
    QuantityRequired,
    #[error("Informe ao menos um campo para atualizar o item.")]
    EmptyUpdate,
}

/// Validates an item submission against the editor's role and builds the
/// backend payload. Failures block the submission before any request is
/// sent. The total price is always recomputed here, never taken from the
/// form.
pub fn validate_item_submission(role: Role, form: &ItemForm) -> Result<ItemPayload, ItemFormError> {
    let description = form.description.trim();
    let unit = form.unit.trim();
    let quantity = parse_field(&form.quantity);
    let unit_price = parse_field(&form.unit_price);

    match form.item_no {
        None => {
            if role != Role::Admin {
                return Err(ItemFormError::AdminRequired);
            }
            let (Some(quantity), Some(unit_price)) = (quantity, unit_price) else {
                return Err(ItemFormError::IncompleteNewItem);
            };
            if description.is_empty() || unit.is_empty() {
                return Err(ItemFormError::IncompleteNewItem);
            }
            Ok(ItemPayload {
                item_no: None,
                description: Some(description.to_string()),
                unit: Some(unit.to_string()),
                quantity: Some(quantity),
                unit_price: Some(unit_price),
                total_price: Some(quantity * unit_price),
            })
        }
        Some(item_no) => {
            if role == Role::Operador {
                let quantity = quantity.ok_or(ItemFormError::QuantityRequired)?;
                return Ok(ItemPayload {
                    item_no: Some(item_no),
                    quantity: Some(quantity),
                    ..ItemPayload::default()
                });
            }

            let mut payload = ItemPayload {
                item_no: Some(item_no),
                ..ItemPayload::default()
            };
            if !description.is_empty() {
                payload.description = Some(description.to_string());
            }
            if !unit.is_empty() {
                payload.unit = Some(unit.to_string());
            }
            payload.quantity = quantity;
            payload.unit_price = unit_price;
            if let (Some(q), Some(vu)) = (quantity, unit_price) {
                payload.total_price = Some(q * vu);
            }

            let untouched = payload.description.is_none()
                && payload.unit.is_none()
                && payload.quantity.is_none()
                && payload.unit_price.is_none();
            if untouched {
                return Err(ItemFormError::EmptyUpdate);
            }
            Ok(payload)
        }
    }
}

fn parse_field(raw: &str) -> Option<rust_decimal::Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_decimal(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form(
        item_no: Option<u64>,
        description: &str,
        unit: &str,
        quantity: &str,
        unit_price: &str,
    ) -> ItemForm {
        ItemForm {
            item_no,
            description: description.to_string(),
            unit: unit.to_string(),
            quantity: quantity.to_string(),
            unit_price: unit_price.to_string(),
        }
    }

    #[test]
    fn operador_cannot_add_items() {
        let err = validate_item_submission(
            Role::Operador,
            &form(None, "Cimento", "UN", "10", "2,50"),
        )
        .unwrap_err();
        assert_eq!(err, ItemFormError::AdminRequired);
    }

    #[test]
    fn new_item_requires_all_fields() {
        let err = validate_item_submission(Role::Admin, &form(None, "Cimento", "UN", "10", ""))
            .unwrap_err();
        assert_eq!(err, ItemFormError::IncompleteNewItem);

        let err = validate_item_submission(Role::Admin, &form(None, "", "UN", "10", "2,50"))
            .unwrap_err();
        assert_eq!(err, ItemFormError::IncompleteNewItem);
    }

    #[test]
    fn new_item_recomputes_total() {
        let payload =
            validate_item_submission(Role::Admin, &form(None, "Cimento", "UN", "10", "2,50"))
                .unwrap();
        assert_eq!(payload.total_price, Some(dec!(25.00)));
        assert_eq!(payload.item_no, None);
    }

    #[test]
    fn operador_update_needs_only_quantity() {
        let payload = validate_item_submission(
            Role::Operador,
            &form(Some(3), "ignored", "ignored", "7", "9,99"),
        )
        .unwrap();
        assert_eq!(payload.quantity, Some(dec!(7)));
        assert_eq!(payload.description, None);
        assert_eq!(payload.unit_price, None);
        assert_eq!(payload.total_price, None);
    }

    #[test]
    fn operador_update_without_quantity_fails() {
        let err = validate_item_submission(Role::Operador, &form(Some(3), "", "", "", ""))
            .unwrap_err();
        assert_eq!(err, ItemFormError::QuantityRequired);
    }

    #[test]
    fn admin_update_requires_at_least_one_field() {
        let err =
            validate_item_submission(Role::Admin, &form(Some(3), "", "", "", "")).unwrap_err();
        assert_eq!(err, ItemFormError::EmptyUpdate);
    }

    #[test]
    fn admin_partial_update_skips_total() {
        let payload =
            validate_item_submission(Role::Admin, &form(Some(3), "", "", "5", "")).unwrap();
        assert_eq!(payload.quantity, Some(dec!(5)));
        assert_eq!(payload.total_price, None);

        let full =
            validate_item_submission(Role::Admin, &form(Some(3), "", "", "5", "2,00")).unwrap();
        assert_eq!(full.total_price, Some(dec!(10.00)));
    }

    #[test]
    fn capability_matrix() {
        assert!(Role::Admin.can_edit(ItemField::Description));
        assert!(Role::Admin.can_edit(ItemField::UnitPrice));
        assert!(Role::Operador.can_edit(ItemField::Quantity));
        assert!(!Role::Operador.can_edit(ItemField::Description));
        assert!(!Role::Operador.can_edit(ItemField::Unit));
        assert!(!Role::Operador.can_edit(ItemField::UnitPrice));
    }
}
