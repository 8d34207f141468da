/// External provider abstractions
///
/// Every outbound integration (chat model, poster metadata, SMS, email) sits
/// behind a trait injected through `AppState`, so handlers stay testable
/// against mocks and providers stay swappable.
use crate::error::AppResult;

pub mod omdb;
pub mod openai;
pub mod smtp;
pub mod twilio;

/// One chat-completion request. Token and temperature budgets differ per
/// caller: movie suggestions run longer and cooler than intro copy.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A chat-completion model.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the trimmed text of the first completion choice. An empty
    /// string is a valid (if useless) reply, not an error.
    async fn complete(&self, request: ChatRequest) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// A movie-metadata source used to find poster images.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterLookup: Send + Sync {
    /// Best-effort poster URL for a title; `Ok(None)` when nothing usable
    /// exists.
    async fn poster_url(&self, title: &str) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// An outbound SMS/MMS channel.
#[async_trait::async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, to: &str, body: &str, media_url: Option<&str>) -> AppResult<()>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// One outbound email, optionally carrying a single attachment.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub attachment: Option<EmailAttachment>,
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// An outbound email channel.
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, email: OutboundEmail) -> AppResult<()>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
