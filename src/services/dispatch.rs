//! Result fan-out: one rendered pick goes to a list of contacts, email for
//! addresses and SMS for phone numbers. Failures are recorded per contact and
//! never abort the rest of the list.

use std::sync::Arc;

use serde::Serialize;

use crate::services::providers::{EmailAttachment, EmailSender, OutboundEmail, SmsSender};

const EMAIL_SUBJECT: &str = "Movie Club Result";
const EMAIL_TEXT: &str = "Here is the movie pick result!";
const SMS_BODY: &str = "Check out our movie pick:";

/// Outcome for one contact in a fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchStatus {
    pub contact: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct Dispatcher {
    sms: Arc<dyn SmsSender>,
    email: Arc<dyn EmailSender>,
}

impl Dispatcher {
    pub fn new(sms: Arc<dyn SmsSender>, email: Arc<dyn EmailSender>) -> Self {
        Self { sms, email }
    }

    /// Sends the rendered result image to every contact. Contacts containing
    /// `@` get an email with the PNG attached; everyone else gets an SMS,
    /// with the poster as MMS media when its URL is https.
    pub async fn send_results(
        &self,
        contacts: &[String],
        image_png: Vec<u8>,
        poster_url: Option<&str>,
    ) -> Vec<DispatchStatus> {
        let media_url = poster_url.filter(|url| url.starts_with("https://"));

        let mut results = Vec::with_capacity(contacts.len());
        for contact in contacts {
            let outcome = if contact.contains('@') {
                self.email
                    .send_email(OutboundEmail {
                        to: contact.clone(),
                        subject: EMAIL_SUBJECT.to_string(),
                        text: EMAIL_TEXT.to_string(),
                        attachment: Some(EmailAttachment {
                            filename: "result.png".to_string(),
                            content_type: "image/png".to_string(),
                            data: image_png.clone(),
                        }),
                    })
                    .await
                    .map(|_| "email sent")
            } else {
                self.sms
                    .send_sms(contact, SMS_BODY, media_url)
                    .await
                    .map(|_| "sms sent")
            };

            match outcome {
                Ok(status) => results.push(DispatchStatus {
                    contact: contact.clone(),
                    status: status.to_string(),
                    error: None,
                }),
                Err(e) => {
                    tracing::error!(contact = %contact, error = %e, "dispatch failed");
                    results.push(DispatchStatus {
                        contact: contact.clone(),
                        status: "error".to_string(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let error_count = results.iter().filter(|r| r.status == "error").count();
        if error_count > 0 {
            tracing::warn!(
                success_count = results.len() - error_count,
                error_count,
                "partial dispatch failure"
            );
        }

        results
    }
}
