//! Terminal UI for the dashboard loop

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};

use sohmon_core::{ChatMessage, HealthStatus, Result, Sender};

use crate::result_view::{PredictionResultView, format_weight};
use crate::session::AssistantSession;
use crate::voltage::VoltageInputManager;

/// How many feature importances the dashboard lists
const TOP_IMPORTANCE_COUNT: usize = 5;

/// Display the startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(58, terminal_width.saturating_sub(4));

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    let lines = vec![
        "🔋 Battery Health Dashboard",
        "",
        "• Edit cell voltages U1..U21 and predict SOH",
        "• Ask the assistant about predictions or batteries",
        "• Answers are labeled with their source",
        "",
        "v0.1.0",
    ];

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());
    for line in lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
        } else {
            let pad = banner_width.saturating_sub(line.chars().count() + 4);
            println!("{}", format!("│  {}{}│", line, " ".repeat(pad)).blue());
        }
    }
    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "💡 Tip: type a question in plain language, or 'help' for commands".dimmed()
    );
    println!();
}

fn redraw_prompt(input: &str) -> io::Result<()> {
    // Overdraw with blanks first so shrinking input leaves no residue
    print!("\r{} {}  \r{} {}", prompt(), " ".repeat(60), prompt(), input);
    io::stdout().flush()
}

fn prompt() -> ColoredString {
    "soh>".green().bold()
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    // Runs on error and panic unwinds too, so a failed read can never
    // strand the terminal in raw mode.
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Editing state for one prompt line. The cursor is a byte offset kept on
/// a char boundary, so multi-byte input edits stay valid.
#[derive(Debug, Default)]
struct LineEditor {
    input: String,
    cursor: usize,
    history_index: Option<usize>,
}

impl LineEditor {
    fn insert(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) -> bool {
        let Some(prev) = self.input[..self.cursor].chars().next_back() else {
            return false;
        };
        self.cursor -= prev.len_utf8();
        self.input.remove(self.cursor);
        true
    }

    fn recall_prev(&mut self, history: &[String]) -> bool {
        if history.is_empty() {
            return false;
        }
        let index = match self.history_index {
            None => history.len() - 1,
            Some(idx) if idx > 0 => idx - 1,
            Some(idx) => idx,
        };
        self.history_index = Some(index);
        self.input = history[index].clone();
        self.cursor = self.input.len();
        true
    }

    fn recall_next(&mut self, history: &[String]) -> bool {
        let Some(idx) = self.history_index else {
            return false;
        };
        if idx < history.len() - 1 {
            self.history_index = Some(idx + 1);
            self.input = history[idx + 1].clone();
        } else {
            self.history_index = None;
            self.input.clear();
        }
        self.cursor = self.input.len();
        true
    }
}

/// Read one line of input with arrow-key history navigation. Falls back to
/// plain line reading when stdin is piped.
pub async fn handle_input_with_history(history: &mut Vec<String>) -> Result<String> {
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(input);
    }

    let guard = RawModeGuard::enable()?;
    let mut editor = LineEditor::default();

    print!("{} ", prompt());
    io::stdout().flush()?;

    loop {
        if let Event::Key(key_event) = event::read()? {
            match key_event.code {
                KeyCode::Enter => {
                    drop(guard);
                    println!();
                    if !editor.input.is_empty() {
                        history.push(editor.input.clone());
                    }
                    return Ok(editor.input);
                }
                KeyCode::Char(c) => {
                    editor.insert(c);
                    redraw_prompt(&editor.input)?;
                }
                KeyCode::Backspace => {
                    if editor.backspace() {
                        redraw_prompt(&editor.input)?;
                    }
                }
                KeyCode::Up => {
                    if editor.recall_prev(history) {
                        redraw_prompt(&editor.input)?;
                    }
                }
                KeyCode::Down => {
                    if editor.recall_next(history) {
                        redraw_prompt(&editor.input)?;
                    }
                }
                KeyCode::Esc => {
                    drop(guard);
                    println!();
                    return Ok(String::new());
                }
                _ => {}
            }
        }
    }
}

/// Display help message
pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!(
        "  {} - Set cell voltage (slot is 1..21)",
        "set <slot> <voltage>".green()
    );
    println!("  {} - Show the vector and latest prediction", "show".green());
    println!("  {} - Submit the vector for an SOH prediction", "predict".green());
    println!(
        "  {} - Switch assistant mode (general or explain)",
        "mode <mode>".green()
    );
    println!("  {} - Show the conversation so far", "history".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Anything else is sent to the assistant:".bold());
    println!("  What is SOH?");
    println!("  check battery soh");
}

/// Render the current voltage vector as a U1..U21 grid
pub fn print_vector(manager: &VoltageInputManager) {
    println!("{}", "Input Voltages (U1–U21)".bold());
    for (i, value) in manager.vector().iter().enumerate() {
        let cell = if value.is_finite() {
            format!("U{:<2} {:>5.2}", i + 1, value)
        } else {
            format!("U{:<2} {}", i + 1, "  ?  ".red())
        };
        print!("  {}", cell);
        if (i + 1) % 7 == 0 {
            println!();
        }
    }
    println!();
}

/// Render the latest prediction, or an explicit absence before the first one
pub fn print_prediction(view: &PredictionResultView) {
    let Some(outcome) = view.outcome() else {
        println!("{}", "No prediction yet. Run `predict` first.".dimmed());
        return;
    };

    println!("{} {}", "Predicted SOH:".bold(), outcome.soh_display().bold());
    match outcome.status {
        HealthStatus::Healthy => println!("{}", "✅ Healthy".green()),
        HealthStatus::Unhealthy => println!("{}", "⚠️ Unhealthy".red()),
    }

    println!("{}", "📊 Model Metrics".bold());
    if outcome.metrics_summary().is_empty() {
        println!("  {}", "No metrics available yet.".dimmed());
    }
    for (name, value) in outcome.metrics_summary() {
        println!("  {}: {}", name, value);
    }

    println!("{}", "🔥 Top Feature Importances".bold());
    let top = outcome.top_importances(TOP_IMPORTANCE_COUNT);
    if top.is_empty() {
        println!("  {}", "No importance data yet.".dimmed());
    }
    for (name, weight) in top {
        println!("  {}: {}", name, format_weight(weight));
    }
}

/// Render one conversation entry
pub fn print_message(message: &ChatMessage) {
    match message.sender {
        Sender::User => println!("{} {}", "you>".green().bold(), message.text),
        Sender::Assistant => {
            if let Some(label) = &message.label {
                println!("{}", label.dimmed());
            }
            println!("{}", message.text);
        }
    }
}

/// Render the whole conversation, oldest first
pub fn print_history(session: &AssistantSession) {
    if session.history().is_empty() {
        println!("{}", "Type a question and press Enter.".dimmed());
        return;
    }
    for message in session.history() {
        println!(
            "{}",
            message.timestamp.format("%H:%M:%S").to_string().dimmed()
        );
        print_message(message);
    }
}
