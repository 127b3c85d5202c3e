use std::{fs, path::PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use engine::{
    Category, DateFilter, Direction, ExpenseDraft, JsonFile, Ledger, MoneyWon, PayMethod,
    PersistOutcome, Receipt, RecordId, Roster,
};

use crate::error::Result;

mod config;
mod error;

#[derive(Debug, Parser)]
#[command(name = "moim", about = "Shared trip-expense ledger")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the ledger file path.
    #[arg(long)]
    ledger: Option<String>,
    /// Override the trip budget in won.
    #[arg(long)]
    budget: Option<i64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct ExpenseArgs {
    /// Expense date (YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,
    #[arg(long)]
    title: String,
    /// Cost in whole won; comma separators accepted.
    #[arg(long)]
    cost: MoneyWon,
    /// One of FOOD, TRANS, STAY, SHOP, TICKET, ETC.
    #[arg(long)]
    category: String,
    /// Member code of who paid.
    #[arg(long)]
    payer: String,
    /// One of CARD, CASH, QR.
    #[arg(long, default_value = "CARD")]
    method: String,
    /// Comma-separated member codes sharing the cost, or ALL.
    #[arg(long, value_delimiter = ',')]
    involved: Vec<String>,
    /// Attach a receipt image file (stored base64 in the ledger).
    #[arg(long)]
    receipt: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a new expense.
    Add(ExpenseArgs),
    /// Replace every field of an existing expense.
    Edit {
        id: u64,
        #[command(flatten)]
        expense: ExpenseArgs,
    },
    /// Remove an expense.
    Delete { id: u64 },
    /// List expenses, optionally scoped to one date.
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Distinct dates appearing in the ledger.
    Dates,
    /// Budget, spending total and per-category breakdown.
    Summary {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Per-member paid/share/diff positions (always trip-wide).
    Balances,
    /// Who pays whom; optionally one member's view.
    Settle {
        #[arg(long)]
        member: Option<String>,
    },
    /// Export the ledger as CSV.
    Export {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "moim={level},engine={level}",
            level = settings.level
        ))
        .init();

    let roster = Roster::new(&settings.members)?;
    let ledger_path = cli.ledger.unwrap_or_else(|| settings.ledger.clone());
    let budget = MoneyWon::new(cli.budget.unwrap_or(settings.budget));
    let mut ledger = Ledger::open(roster, Box::new(JsonFile::new(&ledger_path)))?;
    tracing::debug!(path = %ledger_path, records = ledger.records().len(), "ledger opened");

    match cli.command {
        Command::Add(expense) => {
            let draft = build_draft(&ledger, expense)?;
            let (id, outcome) = ledger.add(draft)?;
            println!("added {id}");
            report(outcome);
        }
        Command::Edit { id, expense } => {
            let draft = build_draft(&ledger, expense)?;
            let outcome = ledger.edit(RecordId(id), draft)?;
            println!("edited #{id}");
            report(outcome);
        }
        Command::Delete { id } => {
            let outcome = ledger.delete(RecordId(id))?;
            println!("deleted #{id}");
            report(outcome);
        }
        Command::List { date } => {
            for record in ledger.filtered(filter_from(date)) {
                let involved = if record.involves_all(ledger.roster()) {
                    "ALL".to_string()
                } else {
                    record
                        .involved
                        .iter()
                        .map(|m| ledger.roster().code(*m))
                        .collect::<Vec<_>>()
                        .join("+")
                };
                let receipt = if record.receipt.is_some() { " [receipt]" } else { "" };
                println!(
                    "{} {} {:10} {:>10} {:6} {:4} {:4} {}{}",
                    record.id,
                    record.date,
                    record.title,
                    record.cost.to_string(),
                    record.category,
                    ledger.roster().code(record.payer),
                    record.method,
                    involved,
                    receipt,
                );
            }
        }
        Command::Dates => {
            for date in ledger.dates() {
                println!("{date}");
            }
        }
        Command::Summary { date } => {
            let filter = filter_from(date);
            let summary = ledger.summary(budget, filter);
            println!("trip:      {}", settings.trip);
            println!("budget:    {}", summary.total_budget);
            println!("spent:     {}", summary.total_spent);
            println!("remaining: {}", summary.remaining);
            for breakdown in ledger.category_stats(filter) {
                println!(
                    "  {:6} {:>10} {:>3}%",
                    breakdown.category,
                    breakdown.amount.to_string(),
                    breakdown.percent,
                );
            }
        }
        Command::Balances => {
            for balance in ledger.member_stats() {
                println!(
                    "{:4} paid {:>10} share {:>10} diff {:>10}",
                    ledger.roster().code(balance.member),
                    balance.paid.to_string(),
                    balance.share.to_string(),
                    balance.diff.to_string(),
                );
            }
        }
        Command::Settle { member } => match member {
            Some(code) => {
                let member = ledger.roster().member(&code)?;
                for line in ledger.settlement_for(member) {
                    let verb = match line.direction {
                        Direction::Send => "send",
                        Direction::Receive => "receive",
                    };
                    println!(
                        "{verb} {} {} {}",
                        line.amount,
                        match line.direction {
                            Direction::Send => "to",
                            Direction::Receive => "from",
                        },
                        ledger.roster().code(line.counterpart),
                    );
                }
            }
            None => {
                for transfer in ledger.settlement() {
                    println!(
                        "{} -> {}: {}",
                        ledger.roster().code(transfer.from),
                        ledger.roster().code(transfer.to),
                        transfer.amount,
                    );
                }
            }
        },
        Command::Export { out, date } => {
            let file = fs::File::create(&out)?;
            engine::export_csv(&ledger, filter_from(date), file)?;
            println!("exported to {}", out.display());
        }
    }

    Ok(())
}

fn filter_from(date: Option<NaiveDate>) -> DateFilter {
    match date {
        Some(day) => DateFilter::On(day),
        None => DateFilter::All,
    }
}

fn build_draft(ledger: &Ledger, args: ExpenseArgs) -> Result<ExpenseDraft> {
    let roster = ledger.roster();

    let involved = if args.involved.len() == 1 && args.involved[0].eq_ignore_ascii_case("ALL") {
        roster.members().collect()
    } else {
        args.involved
            .iter()
            .map(|code| roster.member(code))
            .collect::<engine::LedgerResult<Vec<_>>>()?
    };

    let receipt = match args.receipt {
        Some(path) => {
            let bytes = fs::read(&path)?;
            let label = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "receipt".to_string());
            Some(Receipt::new(label, STANDARD.encode(bytes))?)
        }
        None => None,
    };

    Ok(ExpenseDraft {
        date: args.date,
        title: args.title,
        cost: args.cost,
        category: Category::try_from(args.category.as_str())?,
        payer: roster.member(&args.payer)?,
        method: PayMethod::try_from(args.method.as_str())?,
        involved,
        receipt,
    })
}

fn report(outcome: PersistOutcome) {
    if let PersistOutcome::Warned(err) = outcome {
        eprintln!("warning: ledger not saved: {err}");
    }
}
