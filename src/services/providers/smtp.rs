/// SMTP email provider
///
/// Async lettre transport; the configured SMTP user doubles as the From
/// address, matching how the club mailbox is provisioned.
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    error::{AppError, AppResult},
    services::providers::{EmailSender, OutboundEmail},
};

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, user: String, pass: String) -> AppResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .port(port)
            .credentials(Credentials::new(user.clone(), pass))
            .build();

        Ok(Self {
            transport,
            from: user,
        })
    }
}

#[async_trait::async_trait]
impl EmailSender for SmtpMailer {
    async fn send_email(&self, email: OutboundEmail) -> AppResult<()> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::Internal(format!("invalid sender address: {e}")))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::InvalidInput(format!("invalid recipient address: {e}")))?;

        let builder = Message::builder().from(from).to(to).subject(email.subject);

        let message = match email.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                    AppError::Internal(format!("invalid attachment content type: {e}"))
                })?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(email.text))
                        .singlepart(
                            Attachment::new(attachment.filename).body(attachment.data, content_type),
                        ),
                )?
            }
            None => builder.body(email.text)?,
        };

        self.transport.send(message).await?;

        tracing::info!(to = %email.to, provider = "smtp", "email dispatched");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
