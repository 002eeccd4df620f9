use crate::error::{Result, SendError, TransportError};
use crate::transport::{OutgoingMessage, Transport};
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::Message;
use mailcamp_config::{SmtpConfig, SmtpTls};
use std::env;
use std::time::Duration;

/// SMTP delivery through a pooled lettre transport. Open connections are
/// closed when the mailer is dropped.
pub struct SmtpMailer {
    from: Mailbox,
    transport: lettre::SmtpTransport,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let from = config
            .from
            .parse()
            .map_err(|_| SendError::Setup("smtp.from must be a valid email address".to_string()))?;

        let mut builder = match config.tls {
            SmtpTls::Tls => lettre::SmtpTransport::relay(&config.host)
                .map_err(|err| SendError::Setup(format!("invalid smtp.host: {err}")))?,
            SmtpTls::StartTls => lettre::SmtpTransport::starttls_relay(&config.host)
                .map_err(|err| SendError::Setup(format!("invalid smtp.host: {err}")))?,
            SmtpTls::None => lettre::SmtpTransport::builder_dangerous(&config.host),
        };

        if let Some(port) = config.port {
            builder = builder.port(port);
        }
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Some(Duration::from_secs(seconds)));
        }
        if let (Some(username), Some(password_env)) =
            (config.username.as_deref(), config.password_env.as_deref())
        {
            let password = env::var(password_env)
                .map_err(|_| SendError::Setup(format!("missing env var {password_env}")))?;
            let password = password.trim();
            if password.is_empty() {
                return Err(SendError::Setup(format!("env var {password_env} is empty")));
            }
            builder = builder.credentials(Credentials::new(
                username.to_string(),
                password.to_string(),
            ));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }

    /// Opens a connection (and authenticates, when configured) without
    /// sending anything.
    pub fn test_connection(&self) -> Result<bool> {
        self.transport
            .test_connection()
            .map_err(|err| SendError::Setup(err.to_string()))
    }

    pub fn build_message(
        &self,
        message: &OutgoingMessage<'_>,
    ) -> std::result::Result<Message, TransportError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|err: lettre::address::AddressError| TransportError::InvalidAddress {
                address: message.to.to_string(),
                reason: err.to_string(),
            })?;
        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject);

        let text = message.body.to_string();
        let built = match (message.html_body, message.attachments.is_empty()) {
            (None, true) => builder.header(ContentType::TEXT_PLAIN).body(text),
            (Some(html), true) => {
                builder.multipart(MultiPart::alternative_plain_html(text, html.to_string()))
            }
            (html, false) => {
                let mut mixed = match html {
                    Some(html) => MultiPart::mixed()
                        .multipart(MultiPart::alternative_plain_html(text, html.to_string())),
                    None => MultiPart::mixed().singlepart(SinglePart::plain(text)),
                };
                for attachment in message.attachments {
                    let content_type = ContentType::parse(&attachment.content_type)
                        .map_err(|err| TransportError::Message(err.to_string()))?;
                    mixed = mixed.singlepart(
                        MailAttachment::new(attachment.filename.clone())
                            .body(attachment.content.clone(), content_type),
                    );
                }
                builder.multipart(mixed)
            }
        };
        built.map_err(|err| TransportError::Message(err.to_string()))
    }
}

impl Transport for SmtpMailer {
    fn send(&self, message: &OutgoingMessage<'_>) -> std::result::Result<(), TransportError> {
        let email = self.build_message(message)?;
        lettre::Transport::send(&self.transport, &email)
            .map(|_| ())
            .map_err(|err| TransportError::Smtp(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::SmtpMailer;
    use crate::error::TransportError;
    use crate::transport::{Attachment, OutgoingMessage};
    use mailcamp_config::{SmtpConfig, SmtpTls};

    fn base_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: Some(587),
            from: "Team <team@example.com>".to_string(),
            username: None,
            password_env: None,
            tls: SmtpTls::StartTls,
            timeout_seconds: Some(5),
        }
    }

    fn message<'a>(
        to: &'a str,
        html_body: Option<&'a str>,
        attachments: &'a [Attachment],
    ) -> OutgoingMessage<'a> {
        OutgoingMessage {
            to,
            subject: "Welcome Ada",
            body: "Hello Ada",
            html_body,
            attachments,
        }
    }

    fn formatted(mailer: &SmtpMailer, message: &OutgoingMessage<'_>) -> String {
        let built = mailer.build_message(message).expect("build message");
        String::from_utf8_lossy(&built.formatted()).into_owned()
    }

    #[test]
    fn from_config_fails_when_password_env_missing() {
        let mut config = base_config();
        config.username = Some("team@example.com".to_string());
        config.password_env = Some("MAILCAMP_TEST_SMTP_PASSWORD".to_string());
        std::env::remove_var("MAILCAMP_TEST_SMTP_PASSWORD");
        match SmtpMailer::from_config(&config) {
            Ok(_) => panic!("expected error"),
            Err(err) => assert!(err.to_string().contains("missing env var")),
        }
    }

    #[test]
    fn from_config_fails_when_password_env_empty() {
        let mut config = base_config();
        config.username = Some("team@example.com".to_string());
        config.password_env = Some("MAILCAMP_TEST_SMTP_PASSWORD_EMPTY".to_string());
        std::env::set_var("MAILCAMP_TEST_SMTP_PASSWORD_EMPTY", "   ");
        match SmtpMailer::from_config(&config) {
            Ok(_) => panic!("expected error"),
            Err(err) => assert!(err
                .to_string()
                .contains("env var MAILCAMP_TEST_SMTP_PASSWORD_EMPTY is empty")),
        }
        std::env::remove_var("MAILCAMP_TEST_SMTP_PASSWORD_EMPTY");
    }

    #[test]
    fn from_config_supports_tls_modes() {
        let mut config = base_config();
        for tls in [SmtpTls::None, SmtpTls::StartTls, SmtpTls::Tls] {
            config.tls = tls;
            assert!(SmtpMailer::from_config(&config).is_ok());
        }
    }

    #[test]
    fn build_message_plain_text_only() {
        let mailer = SmtpMailer::from_config(&base_config()).expect("mailer");
        let text = formatted(&mailer, &message("ada@example.com", None, &[]));
        assert!(text.contains("Subject: Welcome Ada"));
        assert!(text.contains("To: ada@example.com"));
        assert!(!text.contains("multipart/"));
    }

    #[test]
    fn build_message_with_html_and_attachment_is_mixed() {
        let mailer = SmtpMailer::from_config(&base_config()).expect("mailer");
        let attachments = [Attachment::new("report.pdf", b"%PDF-1.4".to_vec())];
        let text = formatted(
            &mailer,
            &message("ada@example.com", Some("<p>Hello Ada</p>"), &attachments),
        );
        assert!(text.contains("multipart/mixed"));
        assert!(text.contains("multipart/alternative"));
        assert!(text.contains("report.pdf"));
    }

    #[test]
    fn build_message_rejects_bad_recipient() {
        let mailer = SmtpMailer::from_config(&base_config()).expect("mailer");
        let err = mailer
            .build_message(&message("not an address", None, &[]))
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress { .. }));
    }
}
