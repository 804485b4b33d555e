use std::path::Path;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;

mod dto;
mod model;
mod prompt;
mod report;

use model::espp::EsppOrder;
use model::rsu::RsuOrder;

#[derive(Parser)]
#[command(about = "Profit/loss, tax, and target-price calculations for stock orders")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate profit/loss on an ESPP order
    Espp(OrderArgs),

    /// Calculate profit/loss on an RSU order
    Rsu(OrderArgs),
}

#[derive(Debug, Parser, Default)]
struct OrderArgs {
    /// Load order parameters from a YAML file instead of prompting
    #[arg(long = "order")]
    pub order: Option<String>,

    /// Also print selling prices for target profit percentages (0% to 100%)
    #[arg(long = "targets", default_value = "false")]
    pub targets: bool,
}

fn run_command(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Espp(args) => run_espp(args),
        Command::Rsu(args) => run_rsu(args),
    }
}

fn run_espp(args: OrderArgs) -> anyhow::Result<()> {
    let order = match &args.order {
        Some(path) => dto::load_espp_order(Path::new(path))?,
        None => prompt_espp_order()?,
    };

    let summary = order.summary().context("failed to calculate ESPP summary")?;
    for line in report::espp_summary_lines(&order, &summary) {
        println!("{line}");
    }

    if args.targets {
        println!();
        for line in report::espp_target_lines(&order)
            .context("failed to calculate target selling prices")?
        {
            println!("{line}");
        }
    }
    Ok(())
}

fn run_rsu(args: OrderArgs) -> anyhow::Result<()> {
    let order = match &args.order {
        Some(path) => dto::load_rsu_order(Path::new(path))?,
        None => prompt_rsu_order()?,
    };

    let summary = order.summary().context("failed to calculate RSU summary")?;
    for line in report::rsu_summary_lines(&order, &summary) {
        println!("{line}");
    }

    if args.targets {
        println!();
        for line in report::rsu_target_lines(&order)
            .context("failed to calculate target selling prices")?
        {
            println!("{line}");
        }
    }
    Ok(())
}

fn prompt_espp_order() -> anyhow::Result<EsppOrder> {
    let discount_percent =
        prompt::percent("What is the discounted (buying) price percent per share (%)? ")?;
    let cost_per_share =
        prompt::amount("What is the cost price per share (with/without look-back) ($)? ")?;

    let mut order = EsppOrder {
        discount_percent,
        cost_per_share,
        ..EsppOrder::default()
    };
    println!("Discount amount: ${:.2}", order.discount_amount());
    println!(
        "Effective cost per share: ${:.2}",
        order.effective_cost_per_share()
    );

    order.selling_price_per_share = prompt::amount("What is the selling price per share ($)? ")?;
    order.number_of_shares_sold = prompt::count("How many shares sold? ")?;

    if prompt::yes_no("Deduct transaction commission [y/n]? ")? {
        order.consider_commission = true;
        order.commission_per_transaction =
            prompt::amount("What is the commission paid per transaction ($)? ")?;
        order.number_of_transactions = prompt::count("Number of transactions? ")?;
    }

    // Capital-gains tax only applies to a profit, so only ask once the
    // pre-tax result is known to be positive.
    if order.net_result() > 0.0
        && prompt::yes_no("Calculate capital gain tax and deduct from the profit [y/n]? ")?
    {
        order.consider_capital_gain_tax = true;
        order.capital_gain_tax_percent = prompt::percent(
            "What is the capital gain tax percent (Short-Term: 10%-35%) (Long-Term: 0%-20%)? ",
        )?;
    }

    Ok(order)
}

fn prompt_rsu_order() -> anyhow::Result<RsuOrder> {
    let mut order = RsuOrder {
        selling_price_per_share: prompt::amount("What is the selling price per share ($)? ")?,
        number_of_shares_sold: prompt::count("How many shares sold? ")?,
        ..RsuOrder::default()
    };

    if prompt::yes_no("Deduct transaction commission [y/n]? ")? {
        order.consider_commission = true;
        order.commission_per_transaction =
            prompt::amount("What is the commission paid per transaction ($)? ")?;
        order.number_of_transactions = prompt::count("Number of transactions? ")?;
    }

    if order.net_result() > 0.0
        && prompt::yes_no("Calculate capital gain tax and deduct from the profit [y/n]? ")?
    {
        order.consider_capital_gain_tax = true;
        order.capital_gain_tax_percent = prompt::percent(
            "What is the capital gain tax percent (Short-Term: 10%-35%) (Long-Term: 0%-20%)? ",
        )?;
        order.market_value_per_share_at_vesting =
            prompt::amount("What is the (FMV) market price on vested stock per share ($)? ")?;
    }

    if prompt::yes_no("Calculate and deduct income tax on vested stock [y/n]? ")? {
        order.consider_income_tax = true;
        order.income_tax_incurred_at_vesting =
            prompt::amount("What is the income tax paid on vested stock ($)? ")?;
        loop {
            let stocks_vested = prompt::count("Number of stocks vested? ")?;
            if stocks_vested > 0 {
                order.number_of_stocks_vested = stocks_vested;
                break;
            }
            println!("Number of stocks vested must be greater than 0");
        }
    }

    Ok(order)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    run_command(args.command)
}
