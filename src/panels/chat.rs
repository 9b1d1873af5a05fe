use crate::gateway::Gateway;
use crate::input::TextInput;
use crate::panel::{Panel, PanelStatus};
use crate::state::ChatMessage;

pub const GREETING: &str = "Hello! I am your AI coding assistant. Ask me anything about your code.";
pub const CHAT_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

pub struct ChatPanel {
    pub input: TextInput,
    messages: Vec<ChatMessage>,
    request: Panel<String>,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self {
            input: TextInput::new(),
            messages: vec![ChatMessage::model(GREETING)],
            request: Panel::new("chat", CHAT_FALLBACK),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_awaiting()
    }

    /// Send the current input with the conversation so far. Blank input or a turn already in
    /// flight makes this a no-op.
    pub fn submit(&mut self, gateway: &Gateway) -> bool {
        if self.input.is_blank() || self.request.is_awaiting() {
            return false;
        }

        let history = self.messages.clone();
        let message = self.input.take();
        self.messages.push(ChatMessage::user(message.clone()));

        let gateway = gateway.clone();
        self.request
            .submit(async move { gateway.chat(&history, &message).await })
    }

    /// Append the reply (or the fallback) once the turn completes
    pub async fn poll(&mut self) -> bool {
        if !self.request.poll().await {
            return false;
        }
        self.record_outcome();
        true
    }

    pub async fn wait(&mut self) {
        if self.request.is_awaiting() {
            self.request.wait().await;
            self.record_outcome();
        }
    }

    fn record_outcome(&mut self) {
        match self.request.status() {
            PanelStatus::Ready(reply) => self.messages.push(ChatMessage::model(reply.clone())),
            PanelStatus::Failed(message) => self.messages.push(ChatMessage::model(*message)),
            PanelStatus::Idle | PanelStatus::Awaiting => {}
        }
    }
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}
