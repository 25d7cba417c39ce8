use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::alarm::model::Alarm;
use crate::engine::ClockEngine;
use crate::time_source::TimeSource;

enum UserAction {
    Dismiss,
    Snooze,
    Quit,
}

/// The live clock loop: one tick per `tick_ms`, a status line while idle,
/// an alert block when an alarm fires. Stdin is read on a helper thread so
/// the loop never blocks; the thread owns no engine state and only forwards
/// actions over the channel.
pub fn run_clock(
    mut engine: ClockEngine,
    time_source: &dyn TimeSource,
    tick_ms: u64,
) -> Result<()> {
    let actions = spawn_stdin_reader();
    println!("neonclock running; s = snooze, d = dismiss, q = quit");

    loop {
        let now = time_source.now();
        if let Some(alarm) = engine.tick(now) {
            print_alert(&alarm);
        }

        loop {
            match actions.try_recv() {
                Ok(UserAction::Dismiss) => {
                    if let Some(alarm) = engine.dismiss() {
                        println!("dismissed {}", alarm.label);
                    }
                }
                Ok(UserAction::Snooze) => {
                    if let Some(alarm) = engine.snooze(now) {
                        println!("snoozed {} for 5 minutes", alarm.label);
                    }
                }
                Ok(UserAction::Quit) | Err(TryRecvError::Disconnected) => return Ok(()),
                Err(TryRecvError::Empty) => break,
            }
        }

        render_status(&engine, now)?;
        thread::sleep(Duration::from_millis(tick_ms));
    }
}

fn spawn_stdin_reader() -> Receiver<UserAction> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let action = match line.trim() {
                "s" | "snooze" => UserAction::Snooze,
                "d" | "dismiss" => UserAction::Dismiss,
                "q" | "quit" => UserAction::Quit,
                _ => continue,
            };
            if tx.send(action).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_alert(alarm: &Alarm) {
    println!();
    println!("  *** ALARM  {}  {} ***", alarm.time, alarm.label);
    println!("  s = snooze 5 min, d = dismiss");
}

fn render_status(engine: &ClockEngine, now: DateTime<Local>) -> Result<()> {
    if engine.firing().is_some() {
        return Ok(());
    }
    let mut line = now.format("%H:%M:%S").to_string();
    if let Some(next) = engine.next_alarm(now) {
        line.push_str(&format!(
            "  next: {} in {}",
            next.alarm.label,
            format_minutes_until(next.minutes_until)
        ));
    }
    let mut stdout = io::stdout();
    write!(stdout, "\r\x1b[2K{line}")?;
    stdout.flush()?;
    Ok(())
}

pub fn format_minutes_until(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours == 0 {
        format!("{mins}m")
    } else {
        format!("{hours}h {mins}m")
    }
}
