use thiserror::Error;

/// Startup configuration problems. Any of these aborts the process before the UI starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no Gemini API key found: set GEMINI_API_KEY (or API_KEY), or add api_key to {0}")]
    MissingApiKey(String),
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-correctable input problems, reported in the panel before any call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a prompt.")]
    EmptyPrompt,
    #[error("Please select an image first.")]
    NoImage,
    #[error("Image size should be less than 4MB.")]
    ImageTooLarge { size: u64 },
    #[error("Unsupported image type {mime}. Use PNG, JPG or WEBP.")]
    UnsupportedType { mime: String },
    #[error("Could not read image: {0}")]
    Unreadable(String),
}

/// Failures talking to the generative model service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Gemini error: {0}")]
    Service(String),
    #[error("Gemini returned no candidates")]
    EmptyResponse,
}
