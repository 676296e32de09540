//! Client components for the battery SOH dashboard
//!
//! Three independent pieces composed by the binary: the voltage input
//! manager, the prediction result view, and the assistant session. Each owns
//! its own state; they only communicate through the provider traits and the
//! values returned here.

mod result_view;
mod session;
mod ui;
mod voltage;


pub use result_view::{PredictionOutcome, PredictionResultView, format_weight};
pub use session::{AssistantSession, CONNECTIVITY_FALLBACK, SessionState};
pub use ui::{
    display_banner, handle_input_with_history, print_help, print_history, print_message,
    print_prediction, print_vector,
};
pub use voltage::{DEFAULT_CELL_VOLTAGE, SubmitTicket, VoltageInputManager};

// Re-export core types
pub use sohmon_core::{Error, Result};
