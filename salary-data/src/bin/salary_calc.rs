use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use salary_core::calculations::SalaryRequest;
use salary_core::{
    ConfigAuditEntry, DEFAULT_HISTORY_LIMIT, DbConfig, PayrollCalculator, RepositoryRegistry,
    SalaryConfig, SalaryConfigUpdate, SalaryRepository, SolverOptions,
};
use salary_data::{PlanningPositionLoader, PlanningRecalculator, SalarySettings};
use salary_db_sqlite::SqliteRepositoryFactory;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Salary calculator: gross to net, net to gross, and the stored settings
/// and planning positions behind them.
#[derive(Parser, Debug)]
#[command(name = "salary-calc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Database backend
    #[arg(long, global = true, default_value = "sqlite")]
    backend: String,

    /// Database location (a file path, `:memory:`, or a sqlx URL)
    #[arg(long, global = true, default_value = "salary.db")]
    db: String,

    /// TOML salary config to calculate with instead of the stored one
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate withholdings and net pay from a gross salary
    Gross {
        amount: Decimal,

        /// Do not apply the personal income-tax deduction
        #[arg(long)]
        no_deduction: bool,
    },

    /// Find the gross salary that pays a given net salary
    Net {
        amount: Decimal,

        /// Do not apply the personal income-tax deduction
        #[arg(long)]
        no_deduction: bool,

        /// Use the fixed 20-step search with no bracket expansion
        #[arg(long)]
        legacy: bool,
    },

    /// Show or change the stored salary config
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// List recent salary config changes, newest first
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },

    /// Manage planning positions
    Positions {
        #[command(subcommand)]
        action: PositionsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the stored config
    Show,

    /// Change stored config fields and recalculate planning positions
    Set(ConfigSetArgs),
}

#[derive(Args, Debug)]
struct ConfigSetArgs {
    #[arg(long)]
    mrp: Option<Decimal>,
    #[arg(long)]
    mzp: Option<Decimal>,
    #[arg(long)]
    opv_rate: Option<Decimal>,
    #[arg(long)]
    opvr_rate: Option<Decimal>,
    #[arg(long)]
    vosms_rate: Option<Decimal>,
    #[arg(long)]
    vosms_employer_rate: Option<Decimal>,
    #[arg(long)]
    so_rate: Option<Decimal>,
    #[arg(long)]
    sn_rate: Option<Decimal>,
    #[arg(long)]
    ipn_rate: Option<Decimal>,
    #[arg(long)]
    opv_limit_mzp: Option<Decimal>,
    #[arg(long)]
    opvr_limit_mzp: Option<Decimal>,
    #[arg(long)]
    vosms_limit_mzp: Option<Decimal>,
    #[arg(long)]
    ipn_deduction_mrp: Option<Decimal>,

    /// Who is making the change, recorded in the history
    #[arg(long)]
    changed_by: String,
}

impl From<&ConfigSetArgs> for SalaryConfigUpdate {
    fn from(args: &ConfigSetArgs) -> Self {
        SalaryConfigUpdate {
            mrp: args.mrp,
            mzp: args.mzp,
            opv_rate: args.opv_rate,
            opvr_rate: args.opvr_rate,
            vosms_rate: args.vosms_rate,
            vosms_employer_rate: args.vosms_employer_rate,
            so_rate: args.so_rate,
            sn_rate: args.sn_rate,
            ipn_rate: args.ipn_rate,
            opv_limit_mzp: args.opv_limit_mzp,
            opvr_limit_mzp: args.opvr_limit_mzp,
            vosms_limit_mzp: args.vosms_limit_mzp,
            ipn_deduction_mrp: args.ipn_deduction_mrp,
        }
    }
}

#[derive(Subcommand, Debug)]
enum PositionsCommand {
    /// Load planning positions from a CSV file
    ///
    /// Columns: position_title, department, base_net, kpi_net, bonus_net.
    /// Empty department, kpi_net and bonus_net cells are allowed.
    Load {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List stored planning positions
    List,

    /// Recalculate every position's gross amounts under the stored config
    Recalculate,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

async fn open_repository(cli: &Cli) -> Result<Box<dyn SalaryRepository>> {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    let config = DbConfig {
        backend: cli.backend.clone(),
        connection_string: cli.db.clone(),
    };
    registry
        .create(&config)
        .await
        .with_context(|| format!("Failed to open {} database: {}", cli.backend, cli.db))
}

fn read_config_file(path: &Path) -> Result<SalaryConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// The config calculations run under: the `--config-file` when given, the
/// stored config otherwise.
async fn calculation_config(cli: &Cli) -> Result<SalaryConfig> {
    if let Some(path) = &cli.config_file {
        info!(path = %path.display(), "Using salary config file");
        return read_config_file(path);
    }
    let repo = open_repository(cli).await?;
    SalarySettings::new(&*repo)
        .current()
        .await
        .context("Failed to read salary config")
}

fn calculator_for(config: SalaryConfig) -> Result<PayrollCalculator> {
    PayrollCalculator::new(config).context("Invalid salary config")
}

fn format_optional(value: Option<Decimal>) -> String {
    value.map_or_else(|| "unset".to_string(), |v| v.to_string())
}

fn print_audit_entry(entry: &ConfigAuditEntry) {
    println!(
        "#{} {} by {}",
        entry.id,
        entry.changed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        entry.changed_by
    );
    for change in &entry.changes {
        println!(
            "    {:<20} {} -> {}",
            change.field,
            format_optional(change.old),
            format_optional(change.new)
        );
    }
}

async fn run_gross(
    cli: &Cli,
    amount: Decimal,
    no_deduction: bool,
) -> Result<()> {
    let calculator = calculator_for(calculation_config(cli).await?)?;

    let mut request = SalaryRequest::gross(amount);
    if no_deduction {
        request = request.without_deduction();
    }
    let breakdown = calculator.calculate_salary(&request, &SolverOptions::default());

    println!("{breakdown}");
    Ok(())
}

async fn run_net(
    cli: &Cli,
    amount: Decimal,
    no_deduction: bool,
    legacy: bool,
) -> Result<()> {
    let calculator = calculator_for(calculation_config(cli).await?)?;
    let options = if legacy {
        SolverOptions::legacy()
    } else {
        SolverOptions::default()
    };

    let solution = calculator.solve_gross(amount, !no_deduction, &options);
    if !solution.converged {
        warn!(
            net = %amount,
            gross = %solution.gross,
            iterations = solution.iterations,
            "Search did not converge; showing the closest gross found"
        );
    }

    println!("{}", calculator.breakdown(solution.gross, !no_deduction));
    Ok(())
}

async fn run_config(
    cli: &Cli,
    action: &ConfigCommand,
) -> Result<()> {
    let repo = open_repository(cli).await?;
    let settings = SalarySettings::new(&*repo);

    match action {
        ConfigCommand::Show => {
            let config = settings
                .current()
                .await
                .context("Failed to read salary config")?;
            println!("{config}");
        }
        ConfigCommand::Set(args) => {
            let update = SalaryConfigUpdate::from(args);
            if update.is_empty() {
                bail!("No config fields given; see `salary-calc config set --help`");
            }

            match settings
                .update(&update, &args.changed_by)
                .await
                .context("Failed to update salary config")?
            {
                None => println!("Config already has these values; nothing changed."),
                Some(result) => {
                    print_audit_entry(&result.audit);
                    println!(
                        "Recalculated {} positions: {} updated, {} changed by more than 1.",
                        result.recalculation.processed,
                        result.recalculation.updated,
                        result.recalculation.changed
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_history(
    cli: &Cli,
    limit: u32,
) -> Result<()> {
    let repo = open_repository(cli).await?;
    let history = SalarySettings::new(&*repo)
        .history(limit)
        .await
        .context("Failed to read config history")?;

    if history.is_empty() {
        println!("No config changes recorded.");
    }
    for entry in &history {
        print_audit_entry(entry);
    }
    Ok(())
}

async fn run_positions(
    cli: &Cli,
    action: &PositionsCommand,
) -> Result<()> {
    let repo = open_repository(cli).await?;

    match action {
        PositionsCommand::Load { file } => {
            let config = match &cli.config_file {
                Some(path) => read_config_file(path)?,
                None => SalarySettings::new(&*repo)
                    .current()
                    .await
                    .context("Failed to read salary config")?,
            };
            let calculator = calculator_for(config)?;

            println!("Loading planning positions from: {}", file.display());
            let reader = File::open(file)
                .with_context(|| format!("Failed to open: {}", file.display()))?;
            let records = PlanningPositionLoader::parse(reader)
                .with_context(|| format!("Failed to parse CSV: {}", file.display()))?;
            println!("Parsed {} records from CSV", records.len());

            let inserted = PlanningPositionLoader::load(&*repo, &records, &calculator)
                .await
                .context("Failed to load planning positions into database")?;
            println!("Successfully loaded {} planning positions.", inserted);
        }
        PositionsCommand::List => {
            let positions = repo
                .list_planning_positions()
                .await
                .context("Failed to list planning positions")?;

            println!(
                "{:>5}  {:<30} {:<20} {:>14} {:>14}",
                "id", "position", "department", "total net", "total gross"
            );
            for position in &positions {
                println!(
                    "{:>5}  {:<30} {:<20} {:>14} {:>14}",
                    position.id,
                    position.position_title,
                    position.department.as_deref().unwrap_or("-"),
                    position.total_net(),
                    position.total_gross()
                );
            }
        }
        PositionsCommand::Recalculate => {
            let config = SalarySettings::new(&*repo)
                .current()
                .await
                .context("Failed to read salary config")?;
            let summary = PlanningRecalculator::run(&*repo, &config)
                .await
                .context("Failed to recalculate planning positions")?;
            println!(
                "Recalculated {} positions: {} updated, {} changed by more than 1.",
                summary.processed, summary.updated, summary.changed
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Gross {
            amount,
            no_deduction,
        } => run_gross(&cli, *amount, *no_deduction).await,
        Command::Net {
            amount,
            no_deduction,
            legacy,
        } => run_net(&cli, *amount, *no_deduction, *legacy).await,
        Command::Config { action } => run_config(&cli, action).await,
        Command::History { limit } => run_history(&cli, *limit).await,
        Command::Positions { action } => run_positions(&cli, action).await,
    }
}
