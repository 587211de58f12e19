use rusoto_ses::{Body, Content, Message};

/// Text plus its declared character set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageContent {
    pub charset: String,
    pub data: String,
}

impl MessageContent {
    pub fn new(charset: &str, data: &str) -> Self {
        Self {
            charset: charset.to_string(),
            data: data.to_string(),
        }
    }

    fn to_ses_content(&self) -> Content {
        // A blank charset leaves the declaration to the provider default
        let charset = if self.charset.is_empty() {
            None
        } else {
            Some(self.charset.clone())
        };

        Content {
            charset,
            data: self.data.clone(),
        }
    }
}

/// An alert email, built once and reused for every recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: MessageContent,
    pub body: MessageContent,
}

impl EmailMessage {
    /// Build a plain-text message declaring `charset` for subject and body.
    pub fn new(charset: &str, subject: &str, body: &str) -> Self {
        Self {
            subject: MessageContent::new(charset, subject),
            body: MessageContent::new(charset, body),
        }
    }

    pub(crate) fn to_ses_message(&self) -> Message {
        Message {
            subject: self.subject.to_ses_content(),
            body: Body {
                text: Some(self.body.to_ses_content()),
                html: None,
            },
        }
    }
}
