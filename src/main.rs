// SPDX-License-Identifier: GPL-3.0-or-later

use std::env;
use std::fs;
use std::process::Command;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use afisha::budget::{self, BudgetContext, BudgetSummary, TicketCategory, parse_price};
use afisha::catalog::Catalog;
use afisha::config::Config;
use afisha::report::{html, json, money, terminal, text};
use afisha::storage::{HistoryEntry, Storage};
use afisha::watch::ChangeWatcher;

#[derive(Parser)]
#[command(
    name = "afisha",
    about = "Plan what your favorite cultural events will cost",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List events in the catalog
    Events {
        /// Only show events of this type
        #[arg(long = "type")]
        kind: Option<String>,

        /// Only show free events
        #[arg(long)]
        free: bool,
    },

    /// Manage favorite events
    Favorites {
        #[command(subcommand)]
        command: Option<FavoriteCommands>,
    },

    /// Show or change the ticket category
    Category {
        #[command(subcommand)]
        command: Option<CategoryCommands>,
    },

    /// Calculate and manage your events budget
    Budget {
        #[command(subcommand)]
        command: Option<BudgetCommands>,
    },

    /// Show the budget and refresh it whenever another process changes it
    Watch {
        /// Seconds between checks (defaults to the configured interval)
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many checks
        #[arg(long)]
        cycles: Option<usize>,
    },

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// List favorite events
    List,

    /// Add events to favorites
    Add {
        #[arg(required = true)]
        ids: Vec<u32>,
    },

    /// Remove events from favorites
    Remove {
        #[arg(required = true)]
        ids: Vec<u32>,
    },

    /// Add an event if it is not a favorite, remove it otherwise
    Toggle { id: u32 },

    /// Remove all favorites
    Clear,
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Show the available categories and the active one
    Show,

    /// Set the active ticket category
    Set { category: CategoryArg },
}

#[derive(Clone, clap::ValueEnum)]
enum CategoryArg {
    Full,
    Student,
    Discount,
}

impl From<CategoryArg> for TicketCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Full => TicketCategory::Full,
            CategoryArg::Student => TicketCategory::Student,
            CategoryArg::Discount => TicketCategory::Discount,
        }
    }
}

#[derive(Subcommand)]
enum BudgetCommands {
    /// Show the budget for your favorite events
    Show {
        /// Output format
        #[arg(long, default_value = "terminal")]
        format: ReportFormat,
    },

    /// Set your planned budget (0 to clear)
    Set {
        /// Amount in rubles
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Show recent budget calculations
    History,
}

#[derive(Clone, clap::ValueEnum)]
enum ReportFormat {
    Terminal,
    Json,
    Html,
    Text,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open configuration file in $EDITOR
    Edit,
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        None => cmd_budget(&config, None),
        Some(Commands::Events { kind, free }) => cmd_events(&config, kind.as_deref(), free),
        Some(Commands::Favorites { command }) => cmd_favorites(&config, command),
        Some(Commands::Category { command }) => cmd_category(&config, command),
        Some(Commands::Budget { command }) => cmd_budget(&config, command),
        Some(Commands::Watch { interval, cycles }) => cmd_watch(&config, interval, cycles),
        Some(Commands::Config { command }) => cmd_config(&config, &command),
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("AFISHA_LOG").unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open the database for a read-only render. Rendering still works with
/// default settings when storage is unavailable.
fn open_storage_for_read() -> Option<Storage> {
    match Storage::open() {
        Ok(storage) => Some(storage),
        Err(e) => {
            warn!(error = %e, "failed to open database; using default settings");
            eprintln!("Warning: failed to open database: {e:#}");
            None
        }
    }
}

/// Evaluate the budget from the current favorites and settings.
fn current_summary(
    catalog: &Catalog,
    storage: Option<&Storage>,
) -> Result<(BudgetSummary, BudgetContext)> {
    let (ids, context) = match storage {
        Some(storage) => (storage.favorite_ids()?, storage.context()?),
        None => (Vec::new(), BudgetContext::default()),
    };

    let events = catalog.select(&ids);
    debug!(
        favorites = ids.len(),
        selected = events.len(),
        category = %context.category,
        planned = context.planned_budget,
        "evaluating budget"
    );
    Ok((budget::evaluate(&events, &context), context))
}

/// Append the current calculation to the history. Failures are only logged.
fn record_history(catalog: &Catalog, storage: &Storage) {
    let result = (|| -> Result<()> {
        let ids = storage.favorite_ids()?;
        let context = storage.context()?;
        let events = catalog.select(&ids);
        let budget = budget::compute_budget(&events, context.category);

        storage.append_history(&HistoryEntry {
            calculated_at: Utc::now(),
            planned_budget: context.planned_budget,
            category: context.category,
            event_ids: events.iter().map(|e| e.id).collect(),
            total: budget.total,
        })
    })();

    if let Err(e) = result {
        warn!(error = %e, "failed to record calculation history");
    }
}

fn cmd_events(config: &Config, kind: Option<&str>, free: bool) -> Result<()> {
    let catalog = Catalog::load(config)?;
    let favorites = match open_storage_for_read() {
        Some(storage) => storage.favorite_ids()?,
        None => Vec::new(),
    };

    let events: Vec<_> = catalog
        .events()
        .iter()
        .filter(|e| kind.is_none_or(|k| e.kind.as_deref() == Some(k)))
        .filter(|e| !free || parse_price(&e.price) == 0)
        .collect();

    print!("{}", terminal::render_events(&events, &favorites));
    Ok(())
}

fn cmd_favorites(config: &Config, command: Option<FavoriteCommands>) -> Result<()> {
    let catalog = Catalog::load(config)?;
    let storage = Storage::open().context("Failed to open database")?;

    match command.unwrap_or(FavoriteCommands::List) {
        FavoriteCommands::List => {
            let ids = storage.favorite_ids()?;
            let selected = catalog.select(&ids);
            let events: Vec<_> = selected.iter().collect();
            print!("{}", terminal::render_events(&events, &ids));
            return Ok(());
        }
        FavoriteCommands::Add { ids } => {
            for id in ids {
                if catalog.get(id).is_none() {
                    eprintln!("No event with ID {id} in the catalog");
                } else if storage.add_favorite(id)? {
                    eprintln!("Added event {id} to favorites");
                } else {
                    eprintln!("Event {id} is already a favorite");
                }
            }
        }
        FavoriteCommands::Remove { ids } => {
            for id in ids {
                if storage.remove_favorite(id)? {
                    eprintln!("Removed event {id} from favorites");
                } else {
                    eprintln!("Event {id} is not a favorite");
                }
            }
        }
        FavoriteCommands::Toggle { id } => {
            if catalog.get(id).is_none() && !storage.is_favorite(id)? {
                eprintln!("No event with ID {id} in the catalog");
                return Ok(());
            }
            if storage.toggle_favorite(id)? {
                eprintln!("Added event {id} to favorites");
            } else {
                eprintln!("Removed event {id} from favorites");
            }
        }
        FavoriteCommands::Clear => {
            let removed = storage.clear_favorites()?;
            eprintln!("Removed {removed} favorites");
        }
    }

    record_history(&catalog, &storage);
    Ok(())
}

fn cmd_category(config: &Config, command: Option<CategoryCommands>) -> Result<()> {
    match command.unwrap_or(CategoryCommands::Show) {
        CategoryCommands::Show => {
            let active = match open_storage_for_read() {
                Some(storage) => storage.active_category()?,
                None => TicketCategory::default(),
            };
            print!("{}", terminal::render_categories(active));
        }
        CategoryCommands::Set { category } => {
            let category = TicketCategory::from(category);
            let storage = Storage::open().context("Failed to open database")?;
            storage.set_active_category(category)?;
            eprintln!(
                "Ticket category set to {} (coefficient {})",
                category.label(),
                category.coefficient()
            );
            record_history(&Catalog::load(config)?, &storage);
        }
    }
    Ok(())
}

fn cmd_budget(config: &Config, command: Option<BudgetCommands>) -> Result<()> {
    let command = command.unwrap_or(BudgetCommands::Show {
        format: ReportFormat::Terminal,
    });

    match command {
        BudgetCommands::Show { format } => cmd_budget_show(config, &format),
        BudgetCommands::Set { amount } => cmd_budget_set(config, amount),
        BudgetCommands::History => cmd_budget_history(),
    }
}

fn cmd_budget_show(config: &Config, format: &ReportFormat) -> Result<()> {
    let catalog = Catalog::load(config)?;
    let storage = open_storage_for_read();
    let (summary, context) = current_summary(&catalog, storage.as_ref())?;
    let now = Utc::now();

    match format {
        ReportFormat::Terminal => terminal::print_summary(&summary, &context),
        ReportFormat::Json => json::print_json(&summary, &context, now)?,
        ReportFormat::Html => html::print_html(&summary, &context, now),
        ReportFormat::Text => text::print_text(&summary, &context, now),
    }

    Ok(())
}

fn cmd_budget_set(config: &Config, amount: i64) -> Result<()> {
    let amount = if amount < 0 {
        eprintln!("Planned budget cannot be negative; using 0");
        0
    } else {
        amount as u64
    };

    let storage = Storage::open().context("Failed to open database")?;
    storage.set_planned_budget(amount)?;

    if amount == 0 {
        eprintln!("Planned budget cleared");
    } else {
        eprintln!("Planned budget set to {}", money(amount));
    }

    record_history(&Catalog::load(config)?, &storage);
    Ok(())
}

fn cmd_budget_history() -> Result<()> {
    let storage = Storage::open().context("Failed to open database")?;
    let history = storage
        .history()
        .context("Failed to read calculation history")?;

    if history.is_empty() {
        eprintln!("No calculations recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["When", "Category", "Planned", "Events", "Total"]);
    for entry in &history {
        let ids: Vec<_> = entry.event_ids.iter().map(|id| id.to_string()).collect();
        table.add_row(vec![
            entry.calculated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            entry.category.label().to_string(),
            money(entry.planned_budget),
            ids.join(", "),
            money(entry.total),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn cmd_watch(config: &Config, interval: Option<u64>, cycles: Option<usize>) -> Result<()> {
    let catalog = Catalog::load(config)?;
    let storage = Storage::open().context("Failed to open database")?;
    let interval = match interval {
        Some(secs) => std::time::Duration::from_secs(secs.max(1)),
        None => config.watch.interval(),
    };

    let render = || -> Result<()> {
        let (summary, context) = current_summary(&catalog, Some(&storage))?;
        terminal::print_summary(&summary, &context);
        Ok(())
    };

    render()?;

    let mut watcher = ChangeWatcher::new(&storage)?;
    watcher.run(&storage, interval, cycles, || {
        println!("\n--- updated {} ---", Utc::now().format("%H:%M:%S"));
        render()
    })
}

fn cmd_config(config: &Config, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => cmd_config_show(config),
        Some(ConfigCommands::Edit) => cmd_config_edit(),
    }
}

fn cmd_config_show(config: &Config) -> Result<()> {
    let path = Config::config_path()?;
    eprintln!("# {}", path.display());

    let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;
    print!("{toml}");
    Ok(())
}

fn cmd_config_edit() -> Result<()> {
    let path = Config::config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    if !path.exists() {
        let default_toml = toml::to_string_pretty(&Config::default())
            .context("Failed to serialize default config")?;
        fs::write(&path, &default_toml)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        eprintln!("Created default config at {}", path.display());
    }

    let editor = env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| format!("Failed to launch editor '{editor}'"))?;

    if !status.success() {
        anyhow::bail!("Editor '{editor}' exited with {status}");
    }

    Ok(())
}
