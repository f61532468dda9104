//! Orgdesk - command line mini ERP for department and staff management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use orgdesk as app;

use app::client::BackendClient;
use app::config::{AppConfig, ConfigLoadResult, StorageMode};
use app::locate::{self, CompanyNode};
use app::models::{
    CreateDepartment, CreateEmployee, Title, UpdateDepartment, UpdateEmployee, seed,
};
use app::storage::{FileRepository, MemoryRepository, SnapshotRepository};
use app::store::OrgStore;
use app::sync::Replicator;
use app::table::{DepartmentColumn, EmployeeColumn, SortDirection, TableState};
use app::{error::Result as AppResult, export};

/// Command line mini ERP for department and staff management.
#[derive(Parser)]
#[command(name = "orgdesk", version, about)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Path to the config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write daily log files into this directory instead of stderr
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the store with the sample dataset (and the backend when enabled)
    Init,
    /// Replace local state with the backend's departments
    Pull,
    /// List departments as a table
    List(ViewArgs),
    /// List employees of one department as a table
    Staff {
        /// Owning department id
        department_id: u32,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Manage departments
    #[command(subcommand)]
    Department(DepartmentCommand),
    /// Manage employees
    #[command(subcommand)]
    Employee(EmployeeCommand),
    /// Move employees between departments
    Transfer {
        /// Source department id
        #[arg(long)]
        from: u32,
        /// Target department id
        #[arg(long)]
        to: u32,
        /// Employee ids to move
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<u32>,
    },
    /// Print the company tree
    Tree,
    /// Locate an employee by exact full name
    Locate {
        /// Full "First Last" name
        name: String,
    },
    /// Suggest employee names containing a fragment (two characters minimum)
    Suggest {
        query: String,
    },
    /// Export a report to an Excel file
    Export {
        /// Output file (defaults to a timestamped name)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Export the employee roster instead of the department overview
        #[arg(long)]
        staff: bool,
    },
}

/// Shared table view flags.
#[derive(Args)]
struct ViewArgs {
    /// Case-insensitive substring filter
    #[arg(long)]
    filter: Option<String>,

    /// Sort column
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Page index (zero-based)
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Rows per page
    #[arg(long, default_value_t = app::table::DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

impl ViewArgs {
    fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

#[derive(Subcommand)]
enum DepartmentCommand {
    /// Create a department
    Add {
        name: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated keyword list
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
    /// Update a department
    Update {
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Clear the notes field
        #[arg(long, conflicts_with = "notes")]
        clear_notes: bool,
        /// Comma-separated keyword list (replaces the current one)
        #[arg(long, value_delimiter = ',')]
        keywords: Option<Vec<String>>,
    },
    /// Delete a department and all of its employees
    Delete { id: u32 },
}

#[derive(Subcommand)]
enum EmployeeCommand {
    /// Create an employee in a department
    Add {
        /// Owning department id
        #[arg(long)]
        department: u32,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Manager, Analyst, or Developer (default: Developer)
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        mail: String,
        #[arg(long)]
        street_name: Option<String>,
        #[arg(long)]
        house_number: Option<String>,
        #[arg(long)]
        postal_code: Option<String>,
        #[arg(long)]
        locality: Option<String>,
        #[arg(long)]
        province: Option<String>,
        #[arg(long)]
        country: Option<String>,
    },
    /// Update an employee
    Update {
        id: u32,
        /// Owning department id
        #[arg(long)]
        department: u32,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Manager, Analyst, or Developer
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        mail: Option<String>,
    },
    /// Delete an employee
    Delete {
        id: u32,
        /// Owning department id
        #[arg(long)]
        department: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.log_dir.as_deref());

    // Determine config path based on mode
    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        cli.config.clone().unwrap_or_else(AppConfig::default_path)
    };
    tracing::info!("Config path: {:?}", config_path);

    let config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            config
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, using defaults");
            AppConfig::default()
        }
        ConfigLoadResult::Invalid(e) => {
            anyhow::bail!("Invalid config {config_path:?}: {e}");
        }
    };

    let mut store = open_store(&config).await?;
    run_command(cli.command, &mut store).await
}

/// Initialize logging, optionally into daily rolling files.
fn init_logging(log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "orgdesk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

/// Build the store from the configured snapshot strategy and backend settings.
async fn open_store(config: &AppConfig) -> anyhow::Result<OrgStore> {
    let repository: Box<dyn SnapshotRepository> = match config.storage.mode {
        StorageMode::Memory => Box::new(MemoryRepository::new()),
        StorageMode::File => Box::new(FileRepository::new(config.storage.data_path.clone())),
    };

    let mut store = OrgStore::open(repository)
        .await
        .context("Failed to open the local store")?;

    if config.backend.enabled {
        let client = BackendClient::new(
            &config.backend.url,
            config.backend.repository_type,
            config.backend.timeout(),
        )
        .context("Failed to build the backend client")?;
        store = store.with_replicator(Replicator::new(client, config.retry.policy()));
        tracing::info!("Backend replication enabled: {}", config.backend.url);
    }

    Ok(store)
}

async fn run_command(command: Command, store: &mut OrgStore) -> anyhow::Result<()> {
    match command {
        Command::Init => {
            let departments = seed::initial_departments();
            let count = departments.len();
            store.seed(departments).await?;
            println!("Seeded {count} departments");
        }
        Command::Pull => {
            let count = store.pull_from_backend().await?;
            println!("Pulled {count} departments from backend");
        }
        Command::List(view) => list_departments(store, &view)?,
        Command::Staff { department_id, view } => list_staff(store, department_id, &view)?,
        Command::Department(command) => run_department_command(command, store).await?,
        Command::Employee(command) => run_employee_command(command, store).await?,
        Command::Transfer { from, to, ids } => {
            let moved = store.transfer_employees(from, to, &ids).await?;
            println!("Transferred {moved} employees from department {from} to {to}");
        }
        Command::Tree => {
            let tree = locate::build_tree(store.departments());
            print_tree(&tree, 0);
        }
        Command::Locate { name } => {
            let mut tree = locate::build_tree(store.departments());
            match locate::expand_path(&mut tree, &name) {
                Some(trail) => println!("{}", trail.join(" > ")),
                None => anyhow::bail!("Employee with name '{name}' not found"),
            }
        }
        Command::Suggest { query } => {
            let tree = locate::build_tree(store.departments());
            let names = locate::collect_employee_names(&tree);
            let suggestions = locate::autocomplete(&names, &query);
            if suggestions.is_empty() {
                println!("No suggestions (queries need at least two characters)");
            } else {
                for name in suggestions {
                    println!("{name}");
                }
            }
        }
        Command::Export { out, staff } => {
            let prefix = if staff { "roster" } else { "departments" };
            let path = out.unwrap_or_else(|| PathBuf::from(export::generate_export_filename(prefix)));
            let result = if staff {
                export::export_roster_to_excel(store.departments(), &path)
            } else {
                export::export_departments_to_excel(store.departments(), &path)
            };
            result
                .map_err(app::AppError::from)
                .with_context(|| format!("Failed to write {path:?}"))?;
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

fn list_departments(store: &OrgStore, view: &ViewArgs) -> AppResult<()> {
    let mut state = TableState::new();
    if let Some(filter) = &view.filter {
        state.filter = filter.clone();
    }
    if let Some(sort) = &view.sort {
        state.sort = Some((sort.parse::<DepartmentColumn>()?, view.direction()));
    }
    state.page_index = view.page;
    state.page_size = view.page_size;

    println!("{:>4}  {:<25} {:>6}  {}", "ID", "NAME", "STAFF", "KEYWORDS");
    for department in state.view(store.departments()) {
        println!(
            "{:>4}  {:<25} {:>6}  {}",
            department.id,
            department.name,
            department.employees.len(),
            department.keywords.join(", ")
        );
    }
    Ok(())
}

fn list_staff(store: &OrgStore, department_id: u32, view: &ViewArgs) -> AppResult<()> {
    let employees = store
        .employees_of(department_id)
        .ok_or_else(|| app::AppError::not_found(format!("Department id[{department_id}]")))?;

    let mut state = TableState::new();
    if let Some(filter) = &view.filter {
        state.filter = filter.clone();
    }
    if let Some(sort) = &view.sort {
        state.sort = Some((sort.parse::<EmployeeColumn>()?, view.direction()));
    }
    state.page_index = view.page;
    state.page_size = view.page_size;

    println!(
        "{:>4}  {:<15} {:<15} {:<10} {:<16} {}",
        "ID", "FIRST NAME", "LAST NAME", "TITLE", "PHONE", "MAIL"
    );
    for employee in state.view(employees) {
        println!(
            "{:>4}  {:<15} {:<15} {:<10} {:<16} {}",
            employee.id, employee.first_name, employee.last_name, employee.title, employee.phone, employee.mail
        );
    }
    Ok(())
}

async fn run_department_command(command: DepartmentCommand, store: &mut OrgStore) -> anyhow::Result<()> {
    match command {
        DepartmentCommand::Add {
            name,
            start_date,
            end_date,
            notes,
            keywords,
        } => {
            let data = CreateDepartment {
                name,
                start_date: start_date.as_deref().map(parse_date).transpose()?,
                end_date: end_date.as_deref().map(parse_date).transpose()?,
                notes,
                keywords,
            };
            let created = store.create_department(data).await?;
            println!("Created department {} (id {})", created.name, created.id);
        }
        DepartmentCommand::Update {
            id,
            name,
            notes,
            clear_notes,
            keywords,
        } => {
            let data = UpdateDepartment {
                name,
                notes: if clear_notes { Some(None) } else { notes.map(Some) },
                keywords,
                ..Default::default()
            };
            let updated = store.update_department(id, data).await?;
            println!("Updated department {} (id {})", updated.name, updated.id);
        }
        DepartmentCommand::Delete { id } => {
            store.delete_department(id).await?;
            println!("Deleted department {id}");
        }
    }
    Ok(())
}

async fn run_employee_command(command: EmployeeCommand, store: &mut OrgStore) -> anyhow::Result<()> {
    match command {
        EmployeeCommand::Add {
            department,
            first_name,
            last_name,
            title,
            phone,
            mail,
            street_name,
            house_number,
            postal_code,
            locality,
            province,
            country,
        } => {
            let data = CreateEmployee {
                first_name,
                last_name,
                title: title.as_deref().map(str::parse::<Title>).transpose()?,
                phone,
                mail,
                street_name,
                house_number,
                postal_code,
                locality,
                province,
                country,
            };
            let created = store.create_employee(department, data).await?;
            println!("Created employee {} (id {})", created.full_name(), created.id);
        }
        EmployeeCommand::Update {
            id,
            department,
            first_name,
            last_name,
            title,
            phone,
            mail,
        } => {
            let data = UpdateEmployee {
                first_name,
                last_name,
                title: title.as_deref().map(str::parse::<Title>).transpose()?,
                phone,
                mail,
                ..Default::default()
            };
            let updated = store.update_employee(department, id, data).await?;
            println!("Updated employee {} (id {})", updated.full_name(), updated.id);
        }
        EmployeeCommand::Delete { id, department } => {
            store.delete_employee(department, id).await?;
            println!("Deleted employee {id}");
        }
    }
    Ok(())
}

fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

fn print_tree(nodes: &[CompanyNode], depth: usize) {
    for node in nodes {
        let pad = "  ".repeat(depth);
        if node.has_children() {
            println!("{pad}{name}/", name = node.name);
        } else {
            println!("{pad}{name}", name = node.name);
        }
        print_tree(&node.children, depth + 1);
    }
}
