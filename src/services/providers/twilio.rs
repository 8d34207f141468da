/// Twilio SMS provider
///
/// Plain REST: form-encoded POST to the Messages endpoint, basic auth with
/// account SID and auth token. `MediaUrl` turns the message into an MMS.
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    services::providers::SmsSender,
};

#[derive(Clone)]
pub struct TwilioSms {
    http_client: HttpClient,
    account_sid: String,
    auth_token: String,
    from_number: String,
    api_url: String,
}

impl TwilioSms {
    pub fn new(account_sid: String, auth_token: String, from_number: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            account_sid,
            auth_token,
            from_number,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl SmsSender for TwilioSms {
    async fn send_sms(&self, to: &str, body: &str, media_url: Option<&str>) -> AppResult<()> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url, self.account_sid
        );

        let mut form = vec![
            ("From", self.from_number.as_str()),
            ("To", to),
            ("Body", body),
        ];
        if let Some(media) = media_url {
            form.push(("MediaUrl", media));
        }

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Twilio API returned status {}: {}",
                status, body
            )));
        }

        tracing::info!(
            to = %to,
            mms = media_url.is_some(),
            provider = "twilio",
            "SMS dispatched"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}
