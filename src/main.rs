mod alarm;
mod engine;
mod storage;
mod time_source;
mod ui;

use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};

use crate::alarm::model::AlarmTime;
use crate::alarm::projector;
use crate::alarm::store::AlarmStore;
use crate::engine::ClockEngine;
use crate::storage::FileKvStore;
use crate::time_source::SystemTimeSource;

#[derive(Parser, Debug)]
#[command(
    name = "neonclock",
    version,
    about = "Local alarm clock with snooze and next-alarm projection"
)]
struct Cli {
    /// Directory holding the persisted alarm data.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an alarm at HH:MM (24-hour).
    Add {
        time: AlarmTime,
        #[arg(long, default_value = "")]
        label: String,
    },
    /// Show all alarms and the next one due.
    List,
    /// Flip an alarm between enabled and disabled.
    Toggle { id: String },
    /// Delete an alarm.
    Remove { id: String },
    /// Run the live clock loop.
    Run {
        #[arg(long, default_value_t = 1_000)]
        tick_ms: u64,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    if let Err(err) = simple_file_logger::init_logger!("neonclock") {
        eprintln!("warning: file logging disabled: {err}");
    }

    let cli = Cli::parse();
    let storage = FileKvStore::new(&cli.data_dir);
    let mut store = AlarmStore::load(Box::new(storage));

    match cli.command {
        Command::Add { time, label } => {
            let alarm = store.create(time, &label, Local::now())?;
            println!("added alarm {} at {} ({})", alarm.id, alarm.time, alarm.label);
        }
        Command::List => print_alarms(&store),
        Command::Toggle { id } => {
            if store.toggle(&id)? {
                println!("toggled {id}");
            } else {
                println!("no alarm with id {id}");
            }
        }
        Command::Remove { id } => {
            if store.delete(&id)? {
                println!("removed {id}");
            } else {
                println!("no alarm with id {id}");
            }
        }
        Command::Run { tick_ms } => {
            if tick_ms == 0 {
                bail!("--tick-ms must be greater than zero");
            }
            let engine = ClockEngine::new(store);
            ui::run_clock(engine, &SystemTimeSource, tick_ms)?;
        }
    }

    Ok(())
}

fn print_alarms(store: &AlarmStore) {
    if store.alarms().is_empty() {
        println!("no alarms set");
        return;
    }
    for alarm in store.alarms() {
        let state = if alarm.enabled { "on " } else { "off" };
        println!("{}  {}  {}  {}", alarm.id, alarm.time, state, alarm.label);
    }
    if let Some(next) = projector::project(store.alarms(), Local::now()) {
        println!(
            "next: {} in {}",
            next.alarm.label,
            ui::format_minutes_until(next.minutes_until)
        );
    }
}
