use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::model;

#[derive(Debug, Deserialize)]
struct Commission {
    per_transaction: f64,
    transactions: i32,
}

#[derive(Debug, Deserialize)]
struct CapitalGainTax {
    percent: f64,
}

#[derive(Debug, Deserialize)]
struct IncomeTax {
    incurred_at_vesting: f64,
    stocks_vested: i32,
}

/// On-disk shape of an ESPP order. Optional groups map onto the model's
/// boolean toggles: an absent group means the deduction is disabled.
#[derive(Debug, Deserialize)]
struct EsppOrder {
    discount_percent: f64,
    cost_per_share: f64,
    #[serde(default)]
    selling_price_per_share: f64,
    number_of_shares_sold: i32,
    commission: Option<Commission>,
    capital_gain_tax: Option<CapitalGainTax>,
}

impl EsppOrder {
    pub fn to_model(&self) -> model::espp::EsppOrder {
        let mut order = model::espp::EsppOrder {
            discount_percent: self.discount_percent,
            cost_per_share: self.cost_per_share,
            selling_price_per_share: self.selling_price_per_share,
            number_of_shares_sold: self.number_of_shares_sold,
            ..model::espp::EsppOrder::default()
        };
        if let Some(commission) = &self.commission {
            order.consider_commission = true;
            order.commission_per_transaction = commission.per_transaction;
            order.number_of_transactions = commission.transactions;
        }
        if let Some(tax) = &self.capital_gain_tax {
            order.consider_capital_gain_tax = true;
            order.capital_gain_tax_percent = tax.percent;
        }
        order
    }
}

#[derive(Debug, Deserialize)]
struct RsuOrder {
    #[serde(default)]
    selling_price_per_share: f64,
    number_of_shares_sold: i32,
    #[serde(default)]
    market_value_per_share_at_vesting: f64,
    commission: Option<Commission>,
    capital_gain_tax: Option<CapitalGainTax>,
    income_tax: Option<IncomeTax>,
}

impl RsuOrder {
    pub fn to_model(&self) -> model::rsu::RsuOrder {
        let mut order = model::rsu::RsuOrder {
            selling_price_per_share: self.selling_price_per_share,
            number_of_shares_sold: self.number_of_shares_sold,
            market_value_per_share_at_vesting: self.market_value_per_share_at_vesting,
            ..model::rsu::RsuOrder::default()
        };
        if let Some(commission) = &self.commission {
            order.consider_commission = true;
            order.commission_per_transaction = commission.per_transaction;
            order.number_of_transactions = commission.transactions;
        }
        if let Some(tax) = &self.capital_gain_tax {
            order.consider_capital_gain_tax = true;
            order.capital_gain_tax_percent = tax.percent;
        }
        if let Some(income_tax) = &self.income_tax {
            order.consider_income_tax = true;
            order.income_tax_incurred_at_vesting = income_tax.incurred_at_vesting;
            order.number_of_stocks_vested = income_tax.stocks_vested;
        }
        order
    }
}

pub fn load_espp_order(path: &Path) -> anyhow::Result<model::espp::EsppOrder> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read order file {}", path.display()))?;
    let order: EsppOrder = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse ESPP order file {}", path.display()))?;
    Ok(order.to_model())
}

pub fn load_rsu_order(path: &Path) -> anyhow::Result<model::rsu::RsuOrder> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read order file {}", path.display()))?;
    let order: RsuOrder = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse RSU order file {}", path.display()))?;
    Ok(order.to_model())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_espp_order_with_all_groups() {
        let yaml = "\
discount_percent: 15
cost_per_share: 100
selling_price_per_share: 95
number_of_shares_sold: 10
commission:
  per_transaction: 5
  transactions: 1
capital_gain_tax:
  percent: 24
";
        let order: EsppOrder = serde_yaml::from_str(yaml).unwrap();
        let order = order.to_model();
        assert!(order.consider_commission);
        assert!(order.consider_capital_gain_tax);
        assert_eq!(24.0, order.capital_gain_tax_percent);
        assert_eq!(85.0, order.effective_cost_per_share());
    }

    #[test]
    fn test_absent_groups_disable_toggles() {
        let yaml = "\
discount_percent: 15
cost_per_share: 100
number_of_shares_sold: 10
";
        let order: EsppOrder = serde_yaml::from_str(yaml).unwrap();
        let order = order.to_model();
        assert!(!order.consider_commission);
        assert!(!order.consider_capital_gain_tax);
        assert_eq!(0.0, order.effective_commission());
    }

    #[test]
    fn test_rsu_order_with_income_tax_group() {
        let yaml = "\
selling_price_per_share: 200
number_of_shares_sold: 1
market_value_per_share_at_vesting: 120.34
income_tax:
  incurred_at_vesting: 2166.12
  stocks_vested: 33
";
        let order: RsuOrder = serde_yaml::from_str(yaml).unwrap();
        let order = order.to_model();
        assert!(order.consider_income_tax);
        assert!(!order.consider_capital_gain_tax);
        assert_eq!(33, order.number_of_stocks_vested);
        assert!((order.income_tax_per_share().unwrap() - 65.64).abs() < 1e-9);
    }
}
