//! Assistant session: conversation state, mode selection, and the
//! request/fallback protocol around the answer service

use sohmon_core::{AnswerProvider, AnswerSource, AssistantMode, ChatMessage};

/// Fixed text shown in place of an answer on any transport failure. Raw
/// error detail stays on the diagnostic channel, never in the conversation.
pub const CONNECTIVITY_FALLBACK: &str = "⚠️ Error: Could not connect to backend.";

/// Where the session is in its request cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Owns conversational state: the mode selector, the append-only history,
/// the pending input buffer, and the request lifecycle for each question.
#[derive(Debug, Default)]
pub struct AssistantSession {
    mode: AssistantMode,
    state: SessionState,
    history: Vec<ChatMessage>,
    input: String,
}

impl AssistantSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AssistantMode {
        self.mode
    }

    /// Select how the next question is interpreted. Idempotent; never
    /// affects a request already in flight.
    pub fn set_mode(&mut self, mode: AssistantMode) {
        self.mode = mode;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Full conversation so far, oldest first. Entries are never reordered
    /// or removed.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Pending question input buffer
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send whatever is in the input buffer. See [`AssistantSession::ask`].
    pub async fn send<P: AnswerProvider>(&mut self, provider: &P) -> Option<&ChatMessage> {
        let question = self.input.clone();
        self.ask(provider, &question).await
    }

    /// Ask one question: optimistic User echo, exactly one request, one
    /// Assistant message appended, `Idle` again afterwards.
    ///
    /// A blank question is a silent no-op. The input buffer clears as soon
    /// as the echo lands, not when the network settles, so the next
    /// question can be typed while this one is pending. On failure the
    /// appended message carries [`CONNECTIVITY_FALLBACK`] with source
    /// `Error` instead of an answer.
    ///
    /// Returns the appended assistant message, or `None` for the blank
    /// no-op case.
    pub async fn ask<P: AnswerProvider>(
        &mut self,
        provider: &P,
        question: &str,
    ) -> Option<&ChatMessage> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.history.push(ChatMessage::user(question));
        self.input.clear();

        self.state = SessionState::AwaitingResponse;
        let reply = provider.ask(question, self.mode).await;
        self.state = SessionState::Idle;

        let message = match reply {
            Ok(reply) => {
                let source = AnswerSource::resolve(reply.source.as_deref());
                ChatMessage::assistant(reply.answer, source)
            }
            Err(err) => {
                eprintln!("Warning: answer service request failed: {err}");
                ChatMessage::assistant(CONNECTIVITY_FALLBACK, AnswerSource::Error)
            }
        };

        self.history.push(message);
        self.history.last()
    }
}
