//! Weekly announcement job: generate a fresh pick, write an intro for it and
//! SMS every registered member. Run from cron; per-member send failures are
//! logged and skipped, everything earlier aborts the run.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_club_api::config::Config;
use movie_club_api::models::{CategorySelections, Registration};
use movie_club_api::services::intro;
use movie_club_api::services::providers::{
    omdb::OmdbPosters, openai::OpenAiChat, twilio::TwilioSms, ChatModel, PosterLookup, SmsSender,
};
use movie_club_api::services::suggestion::SuggestionService;
use movie_club_api::store::Stores;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let stores = Stores::open(Path::new(&config.data_dir));
    let registrations: Vec<Registration> = stores.registrations.read_array().await;
    if registrations.is_empty() {
        anyhow::bail!("no registrations found, nothing to send");
    }

    let chat: Arc<dyn ChatModel> = Arc::new(OpenAiChat::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
    ));
    let posters: Option<Arc<dyn PosterLookup>> = config.omdb_api_key.as_ref().map(|key| {
        Arc::new(OmdbPosters::new(key.clone(), config.omdb_api_url.clone()))
            as Arc<dyn PosterLookup>
    });
    let sms = TwilioSms::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_phone_number.clone(),
        config.twilio_api_url.clone(),
    );

    let suggestions =
        SuggestionService::new(chat.clone(), posters, config.suggestion_max_attempts);

    // Empty selections: every category is a random draw.
    let movie = suggestions
        .generate(&CategorySelections::default())
        .await
        .context("failed to generate a movie pick")?;
    let intro = intro::announcement_intro(chat.as_ref(), &movie)
        .await
        .context("failed to generate the announcement intro")?;

    let media_url = Some(movie.poster_url.as_str()).filter(|url| url.starts_with("https://"));
    let body = format!("{intro}\nWatch: {}", movie.watch_info);

    let mut sent = 0usize;
    let mut failed = 0usize;
    for user in &registrations {
        match sms.send_sms(&user.phone, &body, media_url).await {
            Ok(()) => {
                tracing::info!(name = %user.name, phone = %user.phone, "weekly pick sent");
                sent += 1;
            }
            Err(e) => {
                tracing::error!(phone = %user.phone, error = %e, "weekly pick send failed");
                failed += 1;
            }
        }
    }

    tracing::info!(title = %movie.title, sent, failed, "weekly announcement complete");
    Ok(())
}
