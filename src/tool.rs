use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Chat,
    Image,
    Search,
    Thinking,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Chat => "chat",
            Tool::Image => "image",
            Tool::Search => "search",
            Tool::Thinking => "thinking",
        }
    }

    pub fn all() -> Vec<Tool> {
        vec![Tool::Chat, Tool::Image, Tool::Search, Tool::Thinking]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Chat => "Chat",
            Tool::Image => "Image Analysis",
            Tool::Search => "Research Assistant",
            Tool::Thinking => "Deep Dive",
        }
    }

    pub fn index(&self) -> usize {
        Tool::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tool {
        let all = Tool::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> Tool {
        let all = Tool::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// Accepts the short name or the display name, case-insensitively
impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" => Ok(Tool::Chat),
            "image" | "image analysis" => Ok(Tool::Image),
            "search" | "research assistant" => Ok(Tool::Search),
            "thinking" | "deep dive" => Ok(Tool::Thinking),
            _ => Err(UnknownTool(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for tool in Tool::all() {
            assert_eq!(tool.as_str().parse::<Tool>(), Ok(tool));
            assert_eq!(tool.display_name().parse::<Tool>(), Ok(tool));
        }
        assert_eq!("DEEP DIVE".parse::<Tool>(), Ok(Tool::Thinking));
        assert_eq!("video".parse::<Tool>(), Err(UnknownTool("video".to_string())));
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Tool::Thinking.next(), Tool::Chat);
        assert_eq!(Tool::Chat.prev(), Tool::Thinking);
        assert_eq!(Tool::Image.next(), Tool::Search);
    }
}
