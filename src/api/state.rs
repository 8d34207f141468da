use std::path::Path;
use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        dispatch::Dispatcher,
        providers::{
            omdb::OmdbPosters, openai::OpenAiChat, smtp::SmtpMailer, twilio::TwilioSms, ChatModel,
            EmailSender, PosterLookup, SmsSender,
        },
        suggestion::SuggestionService,
    },
    store::Stores,
};

/// Shared application state: the provider seams plus the flat-file stores.
#[derive(Clone)]
pub struct AppState {
    pub suggestions: Arc<SuggestionService>,
    pub dispatcher: Arc<Dispatcher>,
    pub chat: Arc<dyn ChatModel>,
    pub sms: Arc<dyn SmsSender>,
    pub stores: Stores,
}

impl AppState {
    /// Wires the real providers from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let chat: Arc<dyn ChatModel> = Arc::new(OpenAiChat::new(
            config.openai_api_key.clone(),
            config.openai_api_url.clone(),
            config.openai_model.clone(),
        ));

        let posters: Option<Arc<dyn PosterLookup>> = config.omdb_api_key.as_ref().map(|key| {
            Arc::new(OmdbPosters::new(key.clone(), config.omdb_api_url.clone()))
                as Arc<dyn PosterLookup>
        });

        let sms: Arc<dyn SmsSender> = Arc::new(TwilioSms::new(
            config.twilio_account_sid.clone(),
            config.twilio_auth_token.clone(),
            config.twilio_phone_number.clone(),
            config.twilio_api_url.clone(),
        ));

        let email: Arc<dyn EmailSender> = Arc::new(SmtpMailer::new(
            &config.smtp_host,
            config.smtp_port,
            config.smtp_user.clone(),
            config.smtp_pass.clone(),
        )?);

        let stores = Stores::open(Path::new(&config.data_dir));

        Ok(Self::with_parts(
            chat,
            posters,
            sms,
            email,
            stores,
            config.suggestion_max_attempts,
        ))
    }

    /// Assembles state from explicit parts; lets tests inject mock providers
    /// and scratch stores.
    pub fn with_parts(
        chat: Arc<dyn ChatModel>,
        posters: Option<Arc<dyn PosterLookup>>,
        sms: Arc<dyn SmsSender>,
        email: Arc<dyn EmailSender>,
        stores: Stores,
        suggestion_max_attempts: u32,
    ) -> Self {
        Self {
            suggestions: Arc::new(SuggestionService::new(
                chat.clone(),
                posters,
                suggestion_max_attempts,
            )),
            dispatcher: Arc::new(Dispatcher::new(sms.clone(), email)),
            chat,
            sms,
            stores,
        }
    }
}
