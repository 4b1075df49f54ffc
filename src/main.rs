// Console front-end for the repair-log report.
//
// Menu:
// - [1] (re)loads the source, dropping any cached table first.
// - [2] classifies, aggregates, prints and exports the reports.
// - [3] toggles whether decommissioned units count in the KPIs.
// `--once` does [1] and [2] and exits.
use anyhow::{Context, Result};
use bitacora_report::config::{Cli, ColumnConfig};
use bitacora_report::loader::CachedLoader;
use bitacora_report::{aggregate, classify, output, util};
use chrono::{Local, NaiveDate};
use clap::Parser;
use once_cell::sync::Lazy;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PREVIEW_ROWS: usize = 15;

// The loader memoizes the table across menu actions until the file changes
// or the user forces a refresh.
static APP_STATE: Lazy<Mutex<Option<AppState>>> = Lazy::new(|| Mutex::new(None));

struct AppState {
    loader: CachedLoader,
    columns: ColumnConfig,
    out_dir: PathBuf,
    reference_date: Option<NaiveDate>,
    active_only: bool,
    top_n: usize,
}

fn with_state<T>(f: impl FnOnce(&mut AppState) -> Result<T>) -> Result<T> {
    let mut guard = APP_STATE
        .lock()
        .map_err(|_| anyhow::anyhow!("application state poisoned"))?;
    let state = guard.as_mut().context("application state not initialised")?;
    f(state)
}

/// Next trimmed line of input, or `None` once the input is closed or
/// unreadable.
fn read_choice_from(input: &mut impl BufRead) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    read_choice_from(&mut io::stdin().lock())
}

fn handle_load() -> Result<()> {
    with_state(|state| {
        state.loader.invalidate();
        let table = state.loader.load()?;
        println!(
            "Loaded {} rows, {} columns.\n",
            util::format_int(table.rows.len()),
            util::format_int(table.headers.len())
        );
        Ok(())
    })
}

fn handle_generate_reports() -> Result<()> {
    with_state(|state| {
        let table = state.loader.load()?;
        let rows = classify(table, &state.columns)?;
        let reference_date = state
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        let result = aggregate(&rows, state.active_only, reference_date, state.top_n);

        output::print_report(&result, PREVIEW_ROWS);
        output::export(&state.out_dir, &result)
            .with_context(|| format!("writing reports to {}", state.out_dir.display()))?;
        println!("(Reports exported to {})\n", state.out_dir.display());
        Ok(())
    })
}

fn handle_toggle_active() -> Result<()> {
    with_state(|state| {
        state.active_only = !state.active_only;
        println!(
            "Excluir 'De Baja' de los KPIs: {}\n",
            if state.active_only { "sí" } else { "no" }
        );
        Ok(())
    })
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    {
        let mut guard = APP_STATE
            .lock()
            .map_err(|_| anyhow::anyhow!("application state poisoned"))?;
        *guard = Some(AppState {
            loader: CachedLoader::new(cli.sources()),
            columns: cli.columns(),
            out_dir: cli.out_dir.clone(),
            reference_date: cli.reference_date,
            active_only: !cli.include_decommissioned,
            top_n: cli.top,
        });
    }

    if cli.once {
        handle_load()?;
        return handle_generate_reports();
    }

    loop {
        println!("Bitácora - Reparaciones");
        println!("[1] Load / refresh the file");
        println!("[2] Generate reports");
        println!("[3] Toggle 'De Baja' exclusion");
        println!("[4] Exit\n");
        let Some(choice) = read_choice() else {
            println!("\nInput closed. Exiting the program.");
            break;
        };
        let outcome = match choice.as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_generate_reports()
            }
            "3" => handle_toggle_active(),
            "4" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 1-4.\n");
                Ok(())
            }
        };
        if let Err(e) = outcome {
            warn!(error = %e, "menu action failed");
            eprintln!("Error: {:#}\n", e);
        }
    }
    Ok(())
}
