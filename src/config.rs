use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// API key for the chat-completion model
    pub openai_api_key: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Model used for suggestions and intros
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// OMDb API key; poster lookup is skipped entirely when unset
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    pub twilio_account_sid: String,
    pub twilio_auth_token: String,

    /// Sender phone number for outbound SMS
    pub twilio_phone_number: String,

    /// Twilio REST API base URL
    #[serde(default = "default_twilio_api_url")]
    pub twilio_api_url: String,

    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username, also used as the From address
    pub smtp_user: String,
    pub smtp_pass: String,

    /// Directory holding reviews.json, registrations.json and weekly-movie.json
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Cap on chat-model calls per movie suggestion
    #[serde(default = "default_suggestion_max_attempts")]
    pub suggestion_max_attempts: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openai_api_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_twilio_api_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_suggestion_max_attempts() -> u32 {
    8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
