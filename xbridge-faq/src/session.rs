//! One user's conversation with the router.

use std::sync::Arc;

use serde::Serialize;

use crate::canned::{STORAGE_SUGGESTION, TECHNOLOGY_SUGGESTION, WELCOME_MESSAGE};
use crate::router::{Answer, FaqRouter};

/// Number of FAQ questions offered as suggestions.
const SUGGESTED_FAQ_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// 1-based, sequential within a session.
    pub id: usize,
    pub text: String,
    pub origin: Origin,
}

/// Append-only message history plus the question awaiting a reply.
///
/// [`ChatSession::submit`] runs both halves at once. Callers that render a
/// loading state use [`ChatSession::ask`] then [`ChatSession::respond`], and
/// [`ChatSession::is_loading`] is true in between.
pub struct ChatSession {
    router: Arc<FaqRouter>,
    history: Vec<ChatMessage>,
    pending: Option<String>,
}

impl ChatSession {
    /// Start a session holding the welcome message.
    pub fn new(router: Arc<FaqRouter>) -> Self {
        let mut session = Self {
            router,
            history: Vec::new(),
            pending: None,
        };
        session.push(WELCOME_MESSAGE.to_string(), Origin::System);
        session
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Whether a question has been asked and not yet answered.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Append the question and enter the loading state.
    ///
    /// Returns `false` for blank input or while another question is pending.
    pub fn ask(&mut self, input: &str) -> bool {
        if input.trim().is_empty() || self.is_loading() {
            return false;
        }
        self.push(input.to_string(), Origin::User);
        self.pending = Some(input.to_string());
        true
    }

    /// Answer the pending question and leave the loading state.
    pub async fn respond(&mut self) -> Option<Answer> {
        let question = self.pending.as_deref()?;
        let answer = self.router.answer(question).await;
        self.pending = None;
        self.push(answer.text.clone(), Origin::System);
        Some(answer)
    }

    /// Submit a question. Blank input is ignored and returns `None`.
    pub async fn submit(&mut self, input: &str) -> Option<Answer> {
        if !self.ask(input) {
            return None;
        }
        self.respond().await
    }

    /// Suggestions offered before the first question.
    pub async fn suggested_questions(&self) -> Vec<String> {
        let mut questions: Vec<String> = self
            .router
            .faq()
            .questions()
            .take(SUGGESTED_FAQ_COUNT)
            .map(str::to_string)
            .collect();
        questions.push(STORAGE_SUGGESTION.to_string());
        if self.router.agent_available().await {
            questions.push(TECHNOLOGY_SUGGESTION.to_string());
        }
        questions
    }

    /// Submit the suggestion at `index` (0-based).
    pub async fn ask_suggested(&mut self, index: usize) -> Option<Answer> {
        let question = self.suggested_questions().await.into_iter().nth(index)?;
        self.submit(&question).await
    }

    fn push(&mut self, text: String, origin: Origin) {
        let id = self.history.len() + 1;
        self.history.push(ChatMessage { id, text, origin });
    }
}
