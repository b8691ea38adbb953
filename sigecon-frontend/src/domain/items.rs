use crate::models::contract::ContractItem;
use crate::models::{num, RawNumber};
use rust_decimal::Decimal;

/// Items ready for display, plus the recomputed contract total.
#[derive(Debug, Clone)]
pub struct PreparedItems {
    pub items: Vec<ContractItem>,
    pub total: Decimal,
}

/// Filters extraction noise out of a contract's item list and orders it by
/// item number.
///
/// Kept items have a non-empty description without the whole word "total",
/// are not a footer row (a total with neither quantity nor unit price), and
/// carry at least one non-zero numeric field. Sorting is ascending by the
/// numeric prefix of the item number; items without one go last, keeping
/// their input order. The total sums total_price over kept items, missing
/// values counting as zero.
pub fn prepare_contract_items(items: &[ContractItem]) -> PreparedItems {
    let mut kept: Vec<&ContractItem> = items.iter().filter(|it| keep_item(it)).collect();

    kept.sort_by_key(|it| match item_number(it) {
        Some(n) => (false, n),
        None => (true, 0),
    });

    let total = kept
        .iter()
        .map(|it| num(it.total_price.as_ref()).unwrap_or(Decimal::ZERO))
        .sum();

    PreparedItems {
        items: kept.into_iter().cloned().collect(),
        total,
    }
}

/// Numeric key of an item: the first digit run of the raw item number.
pub fn item_number(item: &ContractItem) -> Option<u64> {
    let raw = item.item_no.as_ref()?;
    let text = match raw {
        RawNumber::Number(n) => n.to_string(),
        RawNumber::Text(s) => s.clone(),
    };
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn keep_item(item: &ContractItem) -> bool {
    let description = item.description.as_deref().unwrap_or("").trim();
    if description.is_empty() {
        return false;
    }
    if contains_word_total(description) {
        return false;
    }

    let quantity = num(item.quantity.as_ref());
    let unit_price = num(item.unit_price.as_ref());
    let total_price = num(item.total_price.as_ref());

    // footer rows carry only a total
    let quantity_blank = quantity.map_or(true, |v| v.is_zero());
    let unit_price_blank = unit_price.map_or(true, |v| v.is_zero());
    if quantity_blank && unit_price_blank && total_price.is_some() {
        return false;
    }

    let values: Vec<Decimal> = [quantity, unit_price, total_price]
        .into_iter()
        .flatten()
        .collect();
    if values.is_empty() {
        return false;
    }
    !values.iter().all(|v| v.is_zero())
}

fn contains_word_total(description: &str) -> bool {
    let lower = description.to_lowercase();
    let bytes = lower.as_bytes();
    let mut start = 0;
    while let Some(pos) = lower[start..].find("total") {
        let begin = start + pos;
        let end = begin + "total".len();
        let boundary_before =
            begin == 0 || (!bytes[begin - 1].is_ascii_alphanumeric() && bytes[begin - 1] != b'_');
        let boundary_after =
            end == bytes.len() || (!bytes[end].is_ascii_alphanumeric() && bytes[end] != b'_');
        if boundary_before && boundary_after {
            return true;
        }
        start = begin + 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(
        item_no: Option<&str>,
        description: &str,
        quantity: Option<f64>,
        unit_price: Option<f64>,
        total_price: Option<f64>,
    ) -> ContractItem {
        ContractItem {
            item_no: item_no.map(|s| RawNumber::Text(s.to_string())),
            description: Some(description.to_string()),
            quantity: quantity.map(RawNumber::Number),
            unit_price: unit_price.map(RawNumber::Number),
            total_price: total_price.map(RawNumber::Number),
            ..ContractItem::default()
        }
    }

    #[test]
    fn drops_empty_descriptions_and_total_rows() {
        let items = vec![
            item(Some("1"), "Cimento CP II", Some(10.0), Some(2.5), Some(25.0)),
            item(Some("2"), "   ", Some(1.0), Some(1.0), Some(1.0)),
            item(None, "TOTAL GERAL", None, None, Some(25.0)),
            item(None, "Valor total do lote", Some(1.0), Some(1.0), Some(2.0)),
        ];
        let prepared = prepare_contract_items(&items);
        assert_eq!(prepared.items.len(), 1);
        assert_eq!(prepared.items[0].description.as_deref(), Some("Cimento CP II"));
    }

    #[test]
    fn keeps_subtotal_like_words() {
        // "total" only matches as a whole word
        let items = vec![item(Some("1"), "Totalizador elétrico", Some(2.0), Some(5.0), Some(10.0))];
        assert_eq!(prepare_contract_items(&items).items.len(), 1);
    }

    #[test]
    fn drops_footer_rows_with_only_a_total() {
        let items = vec![
            item(None, "Resumo", None, None, Some(99.0)),
            item(None, "Resumo zerado", Some(0.0), Some(0.0), Some(99.0)),
        ];
        assert!(prepare_contract_items(&items).items.is_empty());
    }

    #[test]
    fn drops_all_null_and_all_zero_rows() {
        let items = vec![
            item(Some("1"), "Sem números", None, None, None),
            item(Some("2"), "Zerado", Some(0.0), Some(0.0), Some(0.0)),
        ];
        assert!(prepare_contract_items(&items).items.is_empty());
    }

    #[test]
    fn sorts_by_numeric_item_number_with_unparseable_last() {
        let items = vec![
            item(Some("ITEM 10"), "C", Some(1.0), Some(1.0), Some(1.0)),
            item(Some("x"), "D", Some(1.0), Some(1.0), Some(1.0)),
            item(Some("2"), "A", Some(1.0), Some(1.0), Some(1.0)),
            item(None, "E", Some(1.0), Some(1.0), Some(1.0)),
            item(Some("3"), "B", Some(1.0), Some(1.0), Some(1.0)),
        ];
        let prepared = prepare_contract_items(&items);
        let order: Vec<_> = prepared
            .items
            .iter()
            .map(|it| it.description.clone().unwrap())
            .collect();
        assert_eq!(order, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn total_sums_kept_items_with_missing_as_zero() {
        let items = vec![
            item(Some("1"), "A", Some(2.0), Some(5.0), Some(10.0)),
            item(Some("2"), "B", Some(1.0), Some(3.5), None),
            item(None, "TOTAL", None, None, Some(999.0)),
        ];
        assert_eq!(prepare_contract_items(&items).total, dec!(10));
    }

    #[test]
    fn item_number_extracts_digit_run() {
        let it = item(Some("ITEM 12-A"), "x", Some(1.0), None, None);
        assert_eq!(item_number(&it), Some(12));
        let none = item(Some("abc"), "x", Some(1.0), None, None);
        assert_eq!(item_number(&none), None);
    }
}
