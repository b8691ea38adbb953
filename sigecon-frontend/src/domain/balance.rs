use crate::domain::items::prepare_contract_items;
use crate::models::contract::Contract;
use crate::models::num;
use rust_decimal::Decimal;

/// Contract balance computed on this side: the total always comes from the
/// filtered item list, never from the backend's raw totalAmount. `used` and
/// `remaining` stay None when the backend does not report them, and the UI
/// renders a placeholder instead of inventing a zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    pub total: Decimal,
    pub used: Option<Decimal>,
    pub remaining: Option<Decimal>,
}

impl FinancialSummary {
    pub fn for_contract(contract: &Contract) -> Self {
        let total = prepare_contract_items(&contract.items).total;
        let used = num(contract.used_amount.as_ref());
        let remaining = num(contract.remaining_amount.as_ref())
            .or_else(|| used.map(|u| total - u));
        Self {
            total,
            used,
            remaining,
        }
    }

    pub fn status(&self) -> ContractStatus {
        ContractStatus::classify(self.total, self.remaining.unwrap_or(self.total))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractStatus {
    Ok,
    Low,
    Closed,
}

impl ContractStatus {
    /// Remaining balance at or below 10% of the total is Low; exactly 10%
    /// counts as Low.
    pub fn classify(total: Decimal, remaining: Decimal) -> Self {
        if total <= Decimal::ZERO {
            return ContractStatus::Ok;
        }
        if remaining <= Decimal::ZERO {
            return ContractStatus::Closed;
        }
        if remaining / total <= Decimal::new(10, 2) {
            return ContractStatus::Low;
        }
        ContractStatus::Ok
    }

    pub fn code(&self) -> &'static str {
        match self {
            ContractStatus::Ok => "OK",
            ContractStatus::Low => "BAIXO",
            ContractStatus::Closed => "ENCERRADO",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Ok => "OK",
            ContractStatus::Low => "Saldo baixo",
            ContractStatus::Closed => "Encerrado",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contract::ContractItem;
    use crate::models::RawNumber;
    use rust_decimal_macros::dec;

    #[test]
    fn classify_boundaries() {
        assert_eq!(
            ContractStatus::classify(dec!(100), dec!(10)),
            ContractStatus::Low
        );
        assert_eq!(
            ContractStatus::classify(dec!(100), dec!(10.01)),
            ContractStatus::Ok
        );
        assert_eq!(
            ContractStatus::classify(dec!(100), dec!(0)),
            ContractStatus::Closed
        );
        assert_eq!(
            ContractStatus::classify(dec!(100), dec!(-5)),
            ContractStatus::Closed
        );
        assert_eq!(ContractStatus::classify(dec!(0), dec!(0)), ContractStatus::Ok);
        assert_eq!(
            ContractStatus::classify(dec!(-1), dec!(-1)),
            ContractStatus::Ok
        );
    }

    fn contract(used: Option<f64>, remaining: Option<f64>) -> Contract {
        Contract {
            used_amount: used.map(RawNumber::Number),
            remaining_amount: remaining.map(RawNumber::Number),
            items: vec![ContractItem {
                item_no: Some(RawNumber::Text("1".into())),
                description: Some("Cimento".into()),
                quantity: Some(RawNumber::Number(10.0)),
                unit_price: Some(RawNumber::Number(10.0)),
                total_price: Some(RawNumber::Number(100.0)),
                ..ContractItem::default()
            }],
            ..Contract::default()
        }
    }

    #[test]
    fn total_comes_from_items() {
        let mut c = contract(None, None);
        c.total_amount = Some(RawNumber::Number(999999.0));
        let summary = FinancialSummary::for_contract(&c);
        assert_eq!(summary.total, dec!(100));
    }

    #[test]
    fn remaining_derived_from_used_when_absent() {
        let summary = FinancialSummary::for_contract(&contract(Some(40.0), None));
        assert_eq!(summary.remaining, Some(dec!(60)));
    }

    #[test]
    fn unknown_stays_unknown() {
        let summary = FinancialSummary::for_contract(&contract(None, None));
        assert_eq!(summary.used, None);
        assert_eq!(summary.remaining, None);
        // unknown balance does not close the contract
        assert_eq!(summary.status(), ContractStatus::Ok);
    }

    #[test]
    fn backend_remaining_wins_over_derivation() {
        let summary = FinancialSummary::for_contract(&contract(Some(40.0), Some(5.0)));
        assert_eq!(summary.remaining, Some(dec!(5)));
        assert_eq!(summary.status(), ContractStatus::Low);
    }
}
