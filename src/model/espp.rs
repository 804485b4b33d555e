use super::error::ValuationError;
use super::solver::{self, GainBasis, TargetPriceProblem};

/// Parameters of a single ESPP sale. Built once per calculation request;
/// summaries are re-derived from it rather than mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EsppOrder {
    pub discount_percent: f64,
    pub cost_per_share: f64,
    pub selling_price_per_share: f64,
    pub number_of_shares_sold: i32,

    pub consider_commission: bool,
    pub commission_per_transaction: f64,
    pub number_of_transactions: i32,

    pub consider_capital_gain_tax: bool,
    pub capital_gain_tax_percent: f64,
}

impl EsppOrder {
    pub fn discount_amount(&self) -> f64 {
        self.cost_per_share * self.discount_percent / 100.0
    }

    pub fn effective_cost_per_share(&self) -> f64 {
        self.cost_per_share - self.discount_amount()
    }

    pub fn effective_commission(&self) -> f64 {
        if self.consider_commission {
            f64::from(self.number_of_transactions) * self.commission_per_transaction
        } else {
            0.0
        }
    }

    /// Profit or loss before any tax: proceeds over the discounted cost,
    /// less commission when enabled. May be negative.
    pub fn net_result(&self) -> f64 {
        f64::from(self.number_of_shares_sold)
            * (self.selling_price_per_share - self.effective_cost_per_share())
            - self.effective_commission()
    }

    /// Capital-gains tax on a realized profit. Defined only over a
    /// non-negative gain; callers check `net_result() > 0` first.
    pub fn capital_gain_tax(&self, profit: f64) -> Result<f64, ValuationError> {
        if profit < 0.0 {
            return Err(ValuationError::InvalidInput(
                "profit must be greater than or equal to zero".to_string(),
            ));
        }
        Ok(profit * self.capital_gain_tax_percent / 100.0)
    }

    pub fn summary(&self) -> Result<EsppOrderSummary, ValuationError> {
        let shares = f64::from(self.number_of_shares_sold);
        let effective_cost_per_share = self.effective_cost_per_share();
        let net_result = self.net_result();

        let capital_gain_tax_amount = if self.consider_capital_gain_tax && net_result > 0.0 {
            self.capital_gain_tax(net_result)?
        } else {
            0.0
        };

        Ok(EsppOrderSummary {
            effective_cost_per_share,
            total_selling_price: shares * self.selling_price_per_share,
            total_cost: shares * effective_cost_per_share,
            effective_commission: self.effective_commission(),
            net_result,
            capital_gain_tax_amount,
        })
    }

    /// Selling price per share that yields `target_percent` profit over the
    /// discounted purchase cost, after commission and capital-gains tax when
    /// enabled.
    pub fn selling_price_for_target_profit_percent(
        &self,
        target_percent: f64,
    ) -> Result<f64, ValuationError> {
        let problem = TargetPriceProblem {
            basis_per_share: self.effective_cost_per_share(),
            shares_sold: self.number_of_shares_sold,
            commission: self.effective_commission(),
            capital_gain_tax_percent: self
                .consider_capital_gain_tax
                .then_some(self.capital_gain_tax_percent),
            gain_basis: GainBasis::PreTaxProfit,
        };
        solver::solve_target_price(&problem, target_percent)
    }
}

/// Stateless projection of an `EsppOrder`. Every field is always present;
/// disabled deductions show up as exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EsppOrderSummary {
    pub effective_cost_per_share: f64,
    pub total_selling_price: f64,
    pub total_cost: f64,
    pub effective_commission: f64,
    pub net_result: f64,
    pub capital_gain_tax_amount: f64,
}

impl EsppOrderSummary {
    pub fn profit_after_capital_gain_tax(&self) -> f64 {
        self.net_result - self.capital_gain_tax_amount
    }

    pub fn is_profitable(&self) -> bool {
        self.net_result > 0.0
    }

    pub fn profit_or_loss_margin(&self) -> f64 {
        if self.total_cost == 0.0 {
            0.0
        } else {
            self.net_result / self.total_cost * 100.0
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::error::ValuationError;

    // 15% discount on a $100 cost price, one share, one $5 commission,
    // 24% capital-gains tax.
    fn discounted_order() -> EsppOrder {
        EsppOrder {
            discount_percent: 15.0,
            cost_per_share: 100.0,
            number_of_shares_sold: 1,
            consider_commission: true,
            commission_per_transaction: 5.0,
            number_of_transactions: 1,
            consider_capital_gain_tax: true,
            capital_gain_tax_percent: 24.0,
            ..EsppOrder::default()
        }
    }

    #[test]
    fn test_effective_cost_applies_discount() {
        let order = discounted_order();
        assert_eq!(15.0, order.discount_amount());
        assert_eq!(85.0, order.effective_cost_per_share());
    }

    #[test]
    fn test_net_result_deducts_commission() {
        let order = EsppOrder {
            selling_price_per_share: 95.0,
            ..discounted_order()
        };
        assert!((order.net_result() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_commission_toggle_contributes_exactly_zero() {
        let with = EsppOrder {
            selling_price_per_share: 95.0,
            ..discounted_order()
        };
        let without = EsppOrder {
            consider_commission: false,
            ..with.clone()
        };
        assert_eq!(0.0, without.effective_commission());
        assert!((with.net_result() + 5.0 - without.net_result()).abs() < 1e-9);
    }

    #[test]
    fn test_capital_gain_tax_rejects_negative_profit() {
        let order = discounted_order();
        let err = order.capital_gain_tax(-1.0).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidInput(_)));
    }

    #[test]
    fn test_summary_omits_tax_on_a_loss() {
        let order = EsppOrder {
            selling_price_per_share: 80.0,
            ..discounted_order()
        };
        let summary = order.summary().unwrap();
        assert!(summary.net_result < 0.0);
        assert_eq!(0.0, summary.capital_gain_tax_amount);
        assert!(!summary.is_profitable());
    }

    #[test]
    fn test_summary_taxes_a_profit() {
        let order = EsppOrder {
            selling_price_per_share: 100.0,
            ..discounted_order()
        };
        let summary = order.summary().unwrap();
        assert!((summary.net_result - 10.0).abs() < 1e-9);
        assert!((summary.capital_gain_tax_amount - 2.4).abs() < 1e-9);
        assert!((summary.profit_after_capital_gain_tax() - 7.6).abs() < 1e-9);
        assert!(summary.is_profitable());
    }

    #[test]
    fn test_summary_is_idempotent() {
        let order = EsppOrder {
            selling_price_per_share: 100.0,
            ..discounted_order()
        };
        assert_eq!(order.summary().unwrap(), order.summary().unwrap());
    }

    #[test]
    fn test_break_even_selling_price() {
        let order = discounted_order();
        let price = order.selling_price_for_target_profit_percent(0.0).unwrap();

        // $85 cost basis plus the $5 commission over a single share.
        assert!((price - 90.0).abs() < 0.01);

        let mut at_break_even = order.clone();
        at_break_even.selling_price_per_share = price;
        let summary = at_break_even.summary().unwrap();
        assert!(summary.net_result.abs() < 0.01);
        assert!(summary.capital_gain_tax_amount.abs() < 0.01);
    }

    #[test]
    fn test_target_profit_round_trip() {
        let order = discounted_order();
        let price = order.selling_price_for_target_profit_percent(25.0).unwrap();

        let mut at_target = order.clone();
        at_target.selling_price_per_share = price;
        let summary = at_target.summary().unwrap();
        let realized_percent = summary.profit_after_capital_gain_tax() / summary.total_cost * 100.0;
        assert!((realized_percent - 25.0).abs() < 0.01);
    }
}
