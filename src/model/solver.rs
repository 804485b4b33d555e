use super::error::ValuationError;

const MAX_ITERATIONS: u32 = 1000;
const TOLERANCE_PERCENT: f64 = 0.01;

/// How the taxable gain is measured for a candidate selling price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GainBasis {
    /// Tax the whole pre-tax profit. Used for ESPP lots, where the
    /// discounted purchase price is the cost basis.
    PreTaxProfit,
    /// Tax only the appreciation above a per-share reference value. Used for
    /// RSU grants, where the fair-market-value at vesting is the basis.
    AboveReferenceValue(f64),
}

/// A target-price search, fully described by the holder's cost basis, the
/// sale size, and the enabled deductions.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPriceProblem {
    /// Per-share cost basis the target percentage is measured against:
    /// effective (discounted) cost for ESPP, income tax paid per share for
    /// RSU when income tax is considered, zero otherwise.
    pub basis_per_share: f64,
    pub shares_sold: i32,
    /// Total commission across the sale; zero when commission is disabled.
    pub commission: f64,
    /// Capital-gains tax rate, `None` when the toggle is off.
    pub capital_gain_tax_percent: Option<f64>,
    pub gain_basis: GainBasis,
}

/// Finds the selling price per share that yields `target_percent` profit,
/// after all enabled deductions, relative to the total cost basis.
///
/// Capital-gains tax depends on the gain, which depends on the price being
/// solved for, so there is no closed form; a fixed-point iteration adjusts a
/// seeded estimate until the realized profit percentage is within 0.01 of
/// the target.
pub fn solve_target_price(
    problem: &TargetPriceProblem,
    target_percent: f64,
) -> Result<f64, ValuationError> {
    if target_percent < 0.0 {
        return Err(ValuationError::InvalidInput(
            "target profit percent must be greater than or equal to zero".to_string(),
        ));
    }
    if problem.shares_sold <= 0 {
        return Err(ValuationError::InvalidInput(
            "number of shares sold must be greater than zero".to_string(),
        ));
    }

    let shares = f64::from(problem.shares_sold);
    let total_basis = problem.basis_per_share * shares;
    if total_basis == 0.0 {
        // No finite price yields a positive percentage of a zero basis.
        return if target_percent == 0.0 {
            Ok(0.0)
        } else {
            Err(ValuationError::InvalidInput(
                "cannot target a profit percentage over a zero cost basis".to_string(),
            ))
        };
    }

    let mut estimate = problem.basis_per_share * (1.0 + target_percent / 100.0);
    for _ in 0..MAX_ITERATIONS {
        let actual_percent = profit_percent_at(problem, estimate, total_basis);
        if (actual_percent - target_percent).abs() < TOLERANCE_PERCENT {
            return Ok(estimate);
        }
        estimate += (target_percent - actual_percent) / 100.0 * problem.basis_per_share;
    }

    Err(ValuationError::NonConvergence {
        estimate,
        iterations: MAX_ITERATIONS,
    })
}

fn profit_percent_at(problem: &TargetPriceProblem, price: f64, total_basis: f64) -> f64 {
    let shares = f64::from(problem.shares_sold);
    let total_selling_price = price * shares;
    let mut profit = total_selling_price - total_basis - problem.commission;

    if let Some(tax_percent) = problem.capital_gain_tax_percent {
        let gain = match problem.gain_basis {
            GainBasis::PreTaxProfit => profit,
            GainBasis::AboveReferenceValue(reference) => shares * (price - reference),
        };
        if gain > 0.0 {
            profit -= gain * tax_percent / 100.0;
        }
    }

    profit / total_basis * 100.0
}
