use super::error::ValuationError;
use super::solver::{self, GainBasis, TargetPriceProblem};

/// Parameters of a single RSU sale. Shares vest at zero purchase cost, so
/// income tax levied at vesting stands in for the cost basis, and the
/// fair-market-value at vesting is the capital-gains basis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RsuOrder {
    pub selling_price_per_share: f64,
    pub number_of_shares_sold: i32,

    pub consider_commission: bool,
    pub commission_per_transaction: f64,
    pub number_of_transactions: i32,

    pub consider_capital_gain_tax: bool,
    pub capital_gain_tax_percent: f64,
    pub market_value_per_share_at_vesting: f64,

    pub consider_income_tax: bool,
    pub income_tax_incurred_at_vesting: f64,
    pub number_of_stocks_vested: i32,
}

impl RsuOrder {
    pub fn effective_commission(&self) -> f64 {
        if self.consider_commission {
            f64::from(self.number_of_transactions) * self.commission_per_transaction
        } else {
            0.0
        }
    }

    /// Proceeds less commission. There is no purchase cost to subtract.
    pub fn net_result(&self) -> f64 {
        f64::from(self.number_of_shares_sold) * self.selling_price_per_share
            - self.effective_commission()
    }

    /// The capital-gains taxable amount: appreciation above the vesting
    /// fair-market-value. Can be negative while `net_result()` is positive.
    pub fn gain_over_vesting_value(&self) -> f64 {
        f64::from(self.number_of_shares_sold)
            * (self.selling_price_per_share - self.market_value_per_share_at_vesting)
    }

    pub fn capital_gain_tax(&self, gain: f64) -> Result<f64, ValuationError> {
        if gain < 0.0 {
            return Err(ValuationError::InvalidInput(
                "gain must be greater than or equal to zero".to_string(),
            ));
        }
        Ok(gain * self.capital_gain_tax_percent / 100.0)
    }

    pub fn income_tax_per_share(&self) -> Result<f64, ValuationError> {
        if self.number_of_stocks_vested <= 0 {
            return Err(ValuationError::InvalidInput(
                "number of stocks vested must be greater than zero".to_string(),
            ));
        }
        Ok(self.income_tax_incurred_at_vesting / f64::from(self.number_of_stocks_vested))
    }

    pub fn total_income_tax(&self) -> Result<f64, ValuationError> {
        Ok(self.income_tax_per_share()? * f64::from(self.number_of_shares_sold))
    }

    /// Net result after every enabled tax. Disabled taxes contribute
    /// exactly zero.
    pub fn true_profit_or_loss(&self) -> Result<f64, ValuationError> {
        let capital_gain_tax_amount = self.enabled_capital_gain_tax()?;
        let total_income_tax = if self.consider_income_tax {
            self.total_income_tax()?
        } else {
            0.0
        };
        Ok(self.net_result() - capital_gain_tax_amount - total_income_tax)
    }

    pub fn summary(&self) -> Result<RsuOrderSummary, ValuationError> {
        let total_income_tax_incurred = if self.consider_income_tax {
            self.total_income_tax()?
        } else {
            0.0
        };

        Ok(RsuOrderSummary {
            total_selling_price: f64::from(self.number_of_shares_sold)
                * self.selling_price_per_share,
            effective_commission: self.effective_commission(),
            net_result: self.net_result(),
            capital_gain_tax_amount: self.enabled_capital_gain_tax()?,
            total_income_tax_incurred,
        })
    }

    /// Selling price per share that yields `target_percent` profit over the
    /// income tax paid at vesting (zero basis when income tax is not
    /// considered), after commission and capital-gains tax when enabled.
    pub fn selling_price_for_target_profit_percent(
        &self,
        target_percent: f64,
    ) -> Result<f64, ValuationError> {
        let basis_per_share = if self.consider_income_tax {
            self.income_tax_per_share()?
        } else {
            0.0
        };
        let problem = TargetPriceProblem {
            basis_per_share,
            shares_sold: self.number_of_shares_sold,
            commission: self.effective_commission(),
            capital_gain_tax_percent: self
                .consider_capital_gain_tax
                .then_some(self.capital_gain_tax_percent),
            gain_basis: GainBasis::AboveReferenceValue(self.market_value_per_share_at_vesting),
        };
        solver::solve_target_price(&problem, target_percent)
    }

    fn enabled_capital_gain_tax(&self) -> Result<f64, ValuationError> {
        if !self.consider_capital_gain_tax {
            return Ok(0.0);
        }
        let gain = self.gain_over_vesting_value();
        if gain <= 0.0 {
            // Sold at or below the vesting value, no capital gain to tax.
            return Ok(0.0);
        }
        self.capital_gain_tax(gain)
    }
}

/// Stateless projection of an `RsuOrder`. Every field is always present;
/// disabled deductions show up as exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct RsuOrderSummary {
    pub total_selling_price: f64,
    pub effective_commission: f64,
    pub net_result: f64,
    pub capital_gain_tax_amount: f64,
    pub total_income_tax_incurred: f64,
}

impl RsuOrderSummary {
    pub fn profit_after_capital_gain_tax(&self) -> f64 {
        self.net_result - self.capital_gain_tax_amount
    }

    pub fn profit_after_income_tax(&self) -> f64 {
        self.net_result - self.total_income_tax_incurred
    }

    pub fn true_profit_or_loss(&self) -> f64 {
        self.net_result - self.capital_gain_tax_amount - self.total_income_tax_incurred
    }

    pub fn profit_or_loss_margin(&self) -> f64 {
        if self.total_selling_price == 0.0 {
            0.0
        } else {
            self.true_profit_or_loss() / self.total_selling_price * 100.0
        }
    }
}
