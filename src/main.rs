use anyhow::{Result, bail};
use clap::Parser;
use colored::*;

// Import from our modular crates
use sohmon_cli::{
    AssistantSession, PredictionResultView, VoltageInputManager, display_banner,
    handle_input_with_history, print_help, print_history, print_message, print_prediction,
    print_vector,
};
use sohmon_client::{AnswerClient, PredictionClient, ServiceConfig};
use sohmon_core::{AssistantMode, CELL_COUNT, PredictionProvider};

#[derive(Parser)]
#[command(name = "sohmon")]
#[command(about = "Battery SOH dashboard client with an AI chat assistant", long_about = None)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Assistant mode for the next question (general or explain)
    #[arg(long, default_value = "general")]
    mode: String,

    /// Override the backend base URL
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }

    let prediction = PredictionClient::new(config.clone())?;
    let answers = AnswerClient::new(config)?;

    let mut manager = VoltageInputManager::new();
    let mut view = PredictionResultView::new();
    let mut session = AssistantSession::new();

    let Some(mode) = AssistantMode::from_str(&cli.mode) else {
        bail!("unknown assistant mode: {} (use general or explain)", cli.mode);
    };
    session.set_mode(mode);

    // Handle one-shot question
    if let Some(question) = cli.question {
        if let Some(message) = session.ask(&answers, &question).await {
            print_message(message);
        }
        return Ok(());
    }

    // Interactive mode
    display_banner();

    let mut input_history = Vec::new();

    loop {
        let input = handle_input_with_history(&mut input_history).await?;

        if input.is_empty() {
            continue;
        }

        let input_lower = input.to_lowercase();

        // Handle special commands
        if input_lower == "exit" || input_lower == "quit" {
            println!("{}", "👋 Goodbye!".green());
            break;
        }

        if input_lower == "help" {
            print_help();
            continue;
        }

        if input_lower == "show" {
            print_vector(&manager);
            print_prediction(&view);
            continue;
        }

        if input_lower == "history" {
            print_history(&session);
            continue;
        }

        if let Some(rest) = input_lower.strip_prefix("mode ") {
            match AssistantMode::from_str(rest.trim()) {
                Some(mode) => {
                    session.set_mode(mode);
                    println!("{} Mode set to {}", "✅".green(), mode);
                }
                None => println!("{} Unknown mode: {}", "❌".red(), rest.trim()),
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("set ") {
            handle_set(&mut manager, rest);
            continue;
        }

        if input_lower == "predict" {
            run_prediction(&mut manager, &mut view, &prediction).await;
            continue;
        }

        // Anything else goes to the assistant
        println!("{} Asking ({})...", "🤖".blue(), session.mode());
        if let Some(message) = session.ask(&answers, &input).await {
            print_message(message);
        }
    }

    Ok(())
}

async fn run_prediction<P: PredictionProvider>(
    manager: &mut VoltageInputManager,
    view: &mut PredictionResultView,
    provider: &P,
) {
    println!("{} Predicting...", "🔋".blue());
    match manager.submit(provider).await {
        Ok((seq, response)) => {
            if view.on_prediction_response(seq, response) {
                print_prediction(view);
            }
        }
        // Local errors are actionable; remote detail stays on stderr
        Err(err @ (sohmon_core::Error::Validation(_) | sohmon_core::Error::RequestInProgress)) => {
            println!("{} {}", "❌".red(), err)
        }
        Err(err) => {
            eprintln!("Warning: prediction request failed: {err}");
            println!("{} Could not reach the prediction service.", "❌".red());
        }
    }
}

/// Parse and apply `set <slot> <voltage>`; slots are 1-based like the
/// U1..U21 labels on the dashboard.
fn handle_set(manager: &mut VoltageInputManager, rest: &str) {
    let mut parts = rest.split_whitespace();
    let (Some(slot), Some(value)) = (parts.next(), parts.next()) else {
        println!("{} Usage: set <slot 1..21> <voltage>", "❌".red());
        return;
    };

    let Ok(slot) = slot.parse::<usize>() else {
        println!(
            "{} Slot must be a number between 1 and {}",
            "❌".red(),
            CELL_COUNT
        );
        return;
    };
    if slot == 0 || slot > CELL_COUNT {
        println!("{} Slot must be between 1 and {}", "❌".red(), CELL_COUNT);
        return;
    }

    match manager.set_reading(slot - 1, value) {
        Ok(()) => {
            let stored = manager.vector()[slot - 1];
            if stored.is_finite() {
                println!("{} U{} = {}", "✅".green(), slot, stored);
            } else {
                println!(
                    "{} U{} is not a number; fix it before predicting",
                    "⚠️".yellow(),
                    slot
                );
            }
        }
        Err(err) => println!("{} {}", "❌".red(), err),
    }
}
