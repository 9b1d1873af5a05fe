use crate::gateway::Gateway;
use crate::input::TextInput;
use crate::panel::Panel;
use crate::state::SearchResult;

pub const SEARCH_FALLBACK: &str = "Failed to fetch research. Please try again.";

/// Research assistant: web-grounded answers with their sources
pub struct SearchPanel {
    pub input: TextInput,
    pub request: Panel<SearchResult>,
}

impl SearchPanel {
    pub fn new() -> Self {
        Self {
            input: TextInput::new(),
            request: Panel::new("search", SEARCH_FALLBACK),
        }
    }

    pub fn submit(&mut self, gateway: &Gateway) -> bool {
        if self.input.is_blank() || self.request.is_awaiting() {
            return false;
        }

        let prompt = self.input.value().to_string();
        let gateway = gateway.clone();
        self.request
            .submit(async move { gateway.grounded_search(&prompt).await })
    }
}

impl Default for SearchPanel {
    fn default() -> Self {
        Self::new()
    }
}
