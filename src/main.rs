use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use debtors::api::{
    fill_placeholder_names, pending_debts, ClientDirectory, FileSalesSource, HttpBackend,
    SalesSource,
};
use debtors::config::{
    config_dir, config_file, init_config, load_config, load_config_or_default, Config,
};
use debtors::debt::{client_debt, ClientDebtSummary, DebtReport};
use debtors::error::{DebtorsError, Result};
use debtors::money::format_money;

#[derive(Parser)]
#[command(name = "debtors")]
#[command(version, about = "Pending installment debts per client", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.debtors)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show configuration and backend endpoints
    Status,

    /// List clients with pending installment debt, largest first
    List {
        /// Read sales from an exported JSON file instead of the backend
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of clients to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Look up names for clients the sales list does not name
        #[arg(long)]
        resolve_names: bool,
    },

    /// Show the pending sales of one client
    Show {
        /// Client id
        client_id: i64,

        /// Read sales from an exported JSON file instead of the backend
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the client's debt as JSON
        #[arg(long)]
        json: bool,

        /// Look up the client's name if the sales list does not carry it
        #[arg(long)]
        resolve_names: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::List {
            input,
            limit,
            json,
            resolve_names,
        } => cmd_list(&cfg_dir, input, limit, json, resolve_names),
        Commands::Show {
            client_id,
            input,
            json,
            resolve_names,
        } => cmd_show(&cfg_dir, client_id, input, json, resolve_names),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config(cfg_dir)?;

    println!("Initialized debtors config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Point it at your backend:  $EDITOR {}", path.display());
    println!("  2. List pending debts:        debtors list");

    Ok(())
}

fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let backend = HttpBackend::from_config(&config);

    println!("Debtors Status");
    println!("{}", "-".repeat(50));
    println!("Config file:      {}", config_file(cfg_dir).display());
    println!("Sales endpoint:   {}", backend.sales_url());
    println!("Clients endpoint: {}", backend.clients_url());
    println!("Timeout:          {}s", config.api.timeout_secs);
    println!(
        "Token:            {}",
        if config.api_token().is_some() { "set" } else { "not set" }
    );
    println!("Currency:         {}", config.report.currency_symbol);
    println!("Zero tolerance:   {}", config.policy().epsilon);

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct DebtorRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "CLIENT")]
    name: String,
    #[tabled(rename = "SALES")]
    sales: usize,
    #[tabled(rename = "DEBT")]
    debt: String,
}

#[derive(Tabled)]
struct SaleDebtRow {
    #[tabled(rename = "SALE")]
    sale: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "PLAN TOTAL")]
    plan_total: String,
    #[tabled(rename = "PAID")]
    paid: String,
    #[tabled(rename = "PAYMENTS")]
    payments: usize,
    #[tabled(rename = "LAST PAYMENT")]
    last_payment: String,
    #[tabled(rename = "PENDING")]
    pending: String,
}

/// Config is optional when reading from a file; the backend needs one.
fn load_for(cfg_dir: &Path, input: Option<&PathBuf>) -> Result<Config> {
    match input {
        Some(_) => load_config_or_default(cfg_dir),
        None => load_config(cfg_dir),
    }
}

fn load_debts(
    config: &Config,
    input: Option<&PathBuf>,
    resolve_names: bool,
) -> Vec<ClientDebtSummary> {
    let policy = config.policy();
    let backend = HttpBackend::from_config(config);
    let file_source;
    let source: &dyn SalesSource = match input {
        Some(path) => {
            file_source = FileSalesSource::new(path.clone());
            &file_source
        }
        None => &backend,
    };

    let mut debts = pending_debts(source, &policy);

    if resolve_names {
        let mut directory = ClientDirectory::new(&backend);
        fill_placeholder_names(&mut debts, &mut directory);
        tracing::info!(looked_up = directory.cached(), "resolved client names");
    }

    debts
}

fn cmd_list(
    cfg_dir: &Path,
    input: Option<PathBuf>,
    limit: Option<usize>,
    json: bool,
    resolve_names: bool,
) -> Result<()> {
    let config = load_for(cfg_dir, input.as_ref())?;
    let symbol = config.report.currency_symbol.clone();

    let mut debts = load_debts(&config, input.as_ref(), resolve_names);
    if let Some(n) = limit {
        debts.truncate(n);
    }
    let report = DebtReport::build(debts, &symbol);

    if json {
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    if report.clients.is_empty() {
        println!("No pending debts found.");
        return Ok(());
    }

    let rows: Vec<DebtorRow> = report
        .clients
        .iter()
        .enumerate()
        .map(|(idx, c)| DebtorRow {
            rank: idx + 1,
            id: c.client_id,
            name: c.name.clone(),
            sales: c.sales.len(),
            debt: format_money(c.total_debt, &symbol),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let table = add_total_footer(&table, "TOTAL", &format_money(report.total_debt, &symbol));
    println!("{table}");

    println!();
    println!(
        "{} client(s) owe on {} sale(s). Generated {}.",
        report.client_count, report.sale_count, report.generated_at
    );
    println!("Use 'debtors show <ID>' for the sales behind a balance.");

    Ok(())
}

fn cmd_show(
    cfg_dir: &Path,
    client_id: i64,
    input: Option<PathBuf>,
    json: bool,
    resolve_names: bool,
) -> Result<()> {
    let config = load_for(cfg_dir, input.as_ref())?;
    let symbol = &config.report.currency_symbol;

    let debts = load_debts(&config, input.as_ref(), resolve_names);
    let debt = client_debt(&debts, client_id).ok_or(DebtorsError::ClientNotFound(client_id))?;

    if json {
        println!("{}", to_json(debt)?);
        return Ok(());
    }

    println!("{} (client {})", debt.name, debt.client_id);

    let rows: Vec<SaleDebtRow> = debt
        .sales
        .iter()
        .map(|s| SaleDebtRow {
            sale: s.sale_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            date: s.date.map_or_else(|| "-".to_string(), |d| d.to_string()),
            plan_total: format_money(s.plan_total, symbol),
            paid: format_money(s.paid, symbol),
            payments: s.payment_count,
            last_payment: s.last_payment.map_or_else(|| "-".to_string(), |d| d.to_string()),
            pending: format_money(s.pending, symbol),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let table = add_total_footer(&table, "TOTAL PENDING", &format_money(debt.total_debt, symbol));
    println!("{table}");

    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| DebtorsError::Json {
        origin: "report".to_string(),
        source: e,
    })
}

/// Replace the bottom border of a rounded table with a one-row footer that
/// spans every column but the last.
fn add_total_footer(table: &str, label: &str, total: &str) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let Some(inner) = lines[0]
        .strip_prefix('╭')
        .and_then(|s| s.strip_suffix('╮'))
    else {
        return table.to_string();
    };

    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    let Some((&value_width, label_cols)) = widths.split_last() else {
        return table.to_string();
    };
    if label_cols.is_empty() {
        return table.to_string();
    }
    // merged cells absorb the separators between them
    let label_width = label_cols.iter().sum::<usize>() + label_cols.len() - 1;

    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');

    let merged: Vec<String> = label_cols.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!(
        "├{}┼{}┤\n",
        merged.join("┴"),
        "─".repeat(value_width)
    ));
    out.push_str(&format!(
        "│ {:>left$} │ {:>right$} │\n",
        label,
        total,
        left = label_width.saturating_sub(2),
        right = value_width.saturating_sub(2)
    ));
    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(label_width),
        "─".repeat(value_width)
    ));

    out
}
