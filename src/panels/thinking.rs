use crate::gateway::Gateway;
use crate::input::TextInput;
use crate::panel::Panel;

pub const THINKING_FALLBACK: &str = "Failed to process complex query. Please try again.";

/// Deep dive: one prompt to the high-capability tier with an extended reasoning budget
pub struct ThinkingPanel {
    pub input: TextInput,
    pub request: Panel<String>,
}

impl ThinkingPanel {
    pub fn new() -> Self {
        Self {
            input: TextInput::new(),
            request: Panel::new("thinking", THINKING_FALLBACK),
        }
    }

    pub fn submit(&mut self, gateway: &Gateway) -> bool {
        if self.input.is_blank() || self.request.is_awaiting() {
            return false;
        }

        let prompt = self.input.value().to_string();
        let gateway = gateway.clone();
        self.request
            .submit(async move { gateway.complex_query(&prompt).await })
    }
}

impl Default for ThinkingPanel {
    fn default() -> Self {
        Self::new()
    }
}
