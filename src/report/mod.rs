use crate::model::error::ValuationError;
use crate::model::espp::{EsppOrder, EsppOrderSummary};
use crate::model::rsu::{RsuOrder, RsuOrderSummary};

fn format_currency(value: f64) -> String {
    format!("${value:.2}")
}

/// Line items for an ESPP order. Every amount is rendered from a field that
/// is always present on the summary, so no line needs to null-check.
pub fn espp_summary_lines(order: &EsppOrder, summary: &EsppOrderSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Cost per share: {}", format_currency(order.cost_per_share)),
        format!("Discount: {:.2}%", order.discount_percent),
        format!(
            "Effective cost per share: {}",
            format_currency(summary.effective_cost_per_share)
        ),
        format!(
            "Selling price per share: {}",
            format_currency(order.selling_price_per_share)
        ),
        format!("Number of shares sold: {}", order.number_of_shares_sold),
        format!(
            "Total selling price ({} * {}): {}",
            order.number_of_shares_sold,
            format_currency(order.selling_price_per_share),
            format_currency(summary.total_selling_price)
        ),
        format!(
            "Total cost ({} * {}): {}",
            order.number_of_shares_sold,
            format_currency(summary.effective_cost_per_share),
            format_currency(summary.total_cost)
        ),
    ];

    if order.consider_commission {
        lines.push(format!(
            "Effective commission fee ({} * {}): {}",
            order.number_of_transactions,
            format_currency(order.commission_per_transaction),
            format_currency(summary.effective_commission)
        ));
    }

    if summary.is_profitable() {
        lines.push(format!(
            "Profit (before capital gain tax): {}",
            format_currency(summary.net_result)
        ));
        if order.consider_capital_gain_tax {
            lines.push(format!(
                "Capital gain tax amount: {}",
                format_currency(summary.capital_gain_tax_amount)
            ));
            lines.push(format!(
                "Profit (after capital gain tax): {}",
                format_currency(summary.profit_after_capital_gain_tax())
            ));
        }
    } else if summary.net_result < 0.0 {
        lines.push(format!("Loss: {}", format_currency(summary.net_result)));
    } else {
        lines.push(format!("Broke even: {}", format_currency(summary.net_result)));
    }

    lines.push(format!(
        "Gain/Loss margin: {:.2}%",
        summary.profit_or_loss_margin()
    ));
    lines
}

pub fn rsu_summary_lines(order: &RsuOrder, summary: &RsuOrderSummary) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Selling price per share: {}",
            format_currency(order.selling_price_per_share)
        ),
        format!("Number of shares sold: {}", order.number_of_shares_sold),
        format!(
            "Total selling price ({} * {}): {}",
            order.number_of_shares_sold,
            format_currency(order.selling_price_per_share),
            format_currency(summary.total_selling_price)
        ),
    ];

    if order.consider_commission {
        lines.push(format!(
            "Effective commission fee ({} * {}): {}",
            order.number_of_transactions,
            format_currency(order.commission_per_transaction),
            format_currency(summary.effective_commission)
        ));
    }

    if summary.net_result > 0.0 {
        lines.push(format!("Profit: {}", format_currency(summary.net_result)));
    } else if summary.net_result < 0.0 {
        lines.push(format!("Loss: {}", format_currency(summary.net_result)));
    } else {
        lines.push(format!("Broke even: {}", format_currency(summary.net_result)));
    }

    if order.consider_capital_gain_tax {
        let gain = order.gain_over_vesting_value();
        if gain <= 0.0 {
            lines.push(format!(
                "Sold at or below vesting value ({}). No capital gain.",
                format_currency(gain)
            ));
        } else {
            lines.push(format!(
                "Capital gain tax amount: {}",
                format_currency(summary.capital_gain_tax_amount)
            ));
            lines.push(format!(
                "Profit (after capital gain tax): {}",
                format_currency(summary.profit_after_capital_gain_tax())
            ));
        }
    }

    if order.consider_income_tax {
        lines.push(format!(
            "Total income tax incurred: {}",
            format_currency(summary.total_income_tax_incurred)
        ));
        lines.push(format!(
            "Profit (after income tax): {}",
            format_currency(summary.profit_after_income_tax())
        ));
    }

    lines.push(format!(
        "True profit/loss: {}",
        format_currency(summary.true_profit_or_loss())
    ));
    lines.push(format!(
        "Gain/Loss margin: {:.2}%",
        summary.profit_or_loss_margin()
    ));
    lines
}

/// Selling prices for target profit percentages from 0% to 100% in steps of
/// five, each row re-derived from a clone of the order priced at the solved
/// value. A price the iteration could only approximate is marked with `~`;
/// an unreachable target renders as `n/a`.
pub fn espp_target_lines(order: &EsppOrder) -> Result<Vec<String>, ValuationError> {
    let mut lines = vec![format!(
        "{:>8} {:>12} {:>14} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Profit %",
        "Price/share",
        "Total selling",
        "Total cost",
        "Commission",
        "Before tax",
        "Gain tax",
        "After tax"
    )];

    for target_percent in (0..=100).step_by(5) {
        let target_percent = f64::from(target_percent);
        let price = match order.selling_price_for_target_profit_percent(target_percent) {
            Ok(price) => price,
            Err(ValuationError::NonConvergence { estimate, .. }) => {
                lines.push(format!(
                    "{:>7.0}% {:>12} (approximate, did not converge)",
                    target_percent,
                    format!("~{}", format_currency(estimate))
                ));
                continue;
            }
            Err(ValuationError::InvalidInput(_)) => {
                lines.push(format!("{:>7.0}% {:>12}", target_percent, "n/a"));
                continue;
            }
        };

        let mut priced = order.clone();
        priced.selling_price_per_share = price;
        let summary = priced.summary()?;
        lines.push(format!(
            "{:>7.0}% {:>12} {:>14} {:>12} {:>12} {:>12} {:>12} {:>12}",
            target_percent,
            format_currency(price),
            format_currency(summary.total_selling_price),
            format_currency(summary.total_cost),
            format_currency(summary.effective_commission),
            format_currency(summary.net_result),
            format_currency(summary.capital_gain_tax_amount),
            format_currency(summary.profit_after_capital_gain_tax()),
        ));
    }
    Ok(lines)
}

pub fn rsu_target_lines(order: &RsuOrder) -> Result<Vec<String>, ValuationError> {
    let mut lines = vec![format!(
        "{:>8} {:>12} {:>14} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Profit %",
        "Price/share",
        "Total selling",
        "Commission",
        "Net result",
        "Gain tax",
        "Income tax",
        "True P/L"
    )];

    for target_percent in (0..=100).step_by(5) {
        let target_percent = f64::from(target_percent);
        let price = match order.selling_price_for_target_profit_percent(target_percent) {
            Ok(price) => price,
            Err(ValuationError::NonConvergence { estimate, .. }) => {
                lines.push(format!(
                    "{:>7.0}% {:>12} (approximate, did not converge)",
                    target_percent,
                    format!("~{}", format_currency(estimate))
                ));
                continue;
            }
            Err(ValuationError::InvalidInput(_)) => {
                lines.push(format!("{:>7.0}% {:>12}", target_percent, "n/a"));
                continue;
            }
        };

        let mut priced = order.clone();
        priced.selling_price_per_share = price;
        let summary = priced.summary()?;
        lines.push(format!(
            "{:>7.0}% {:>12} {:>14} {:>12} {:>12} {:>12} {:>12} {:>12}",
            target_percent,
            format_currency(price),
            format_currency(summary.total_selling_price),
            format_currency(summary.effective_commission),
            format_currency(summary.net_result),
            format_currency(summary.capital_gain_tax_amount),
            format_currency(summary.total_income_tax_incurred),
            format_currency(summary.true_profit_or_loss()),
        ));
    }
    Ok(lines)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!("$0.00", format_currency(0.0));
        assert_eq!("$0.01", format_currency(0.01));
        assert_eq!("$1234.56", format_currency(1234.56));
        assert_eq!("$-5.00", format_currency(-5.0));
    }

    #[test]
    fn test_espp_lines_always_include_margin() {
        let order = EsppOrder {
            discount_percent: 15.0,
            cost_per_share: 100.0,
            selling_price_per_share: 80.0,
            number_of_shares_sold: 1,
            ..EsppOrder::default()
        };
        let summary = order.summary().unwrap();
        let lines = espp_summary_lines(&order, &summary);
        assert!(lines.iter().any(|line| line.starts_with("Loss: ")));
        assert!(lines.iter().any(|line| line.starts_with("Gain/Loss margin: ")));
        assert!(!lines.iter().any(|line| line.contains("commission")));
    }

    #[test]
    fn test_rsu_lines_note_missing_capital_gain() {
        let order = RsuOrder {
            selling_price_per_share: 100.0,
            number_of_shares_sold: 1,
            consider_capital_gain_tax: true,
            capital_gain_tax_percent: 24.0,
            market_value_per_share_at_vesting: 120.34,
            ..RsuOrder::default()
        };
        let summary = order.summary().unwrap();
        let lines = rsu_summary_lines(&order, &summary);
        assert!(lines.iter().any(|line| line.contains("No capital gain")));
    }

    #[test]
    fn test_espp_target_table_has_a_row_per_step() {
        let order = EsppOrder {
            discount_percent: 15.0,
            cost_per_share: 100.0,
            number_of_shares_sold: 1,
            consider_commission: true,
            commission_per_transaction: 5.0,
            number_of_transactions: 1,
            ..EsppOrder::default()
        };
        let lines = espp_target_lines(&order).unwrap();
        // One header plus 0%..=100% in steps of five.
        assert_eq!(22, lines.len());
    }

    #[test]
    fn test_rsu_zero_basis_targets_render_as_unreachable() {
        let order = RsuOrder {
            number_of_shares_sold: 1,
            ..RsuOrder::default()
        };
        let lines = rsu_target_lines(&order).unwrap();
        assert!(lines[2].contains("n/a"));
    }
}
