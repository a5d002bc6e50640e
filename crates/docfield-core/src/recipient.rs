#![forbid(unsafe_code)]

//! Recipients as seen by the placement engine.
//!
//! Recipient management lives elsewhere; the engine only needs to know who a
//! field belongs to and whether that recipient may receive fields at all.

use serde::{Deserialize, Serialize};

/// What a recipient does with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipientRole {
    Signer,
    Approver,
    Cc,
    Viewer,
}

/// Whether the recipient has already been sent the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendStatus {
    #[default]
    NotSent,
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: i64,
    pub email: String,
    pub role: RecipientRole,
    #[serde(default)]
    pub send_status: SendStatus,
}

impl Recipient {
    #[must_use]
    pub fn new(id: i64, email: impl Into<String>, role: RecipientRole) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            send_status: SendStatus::NotSent,
        }
    }

    #[must_use]
    pub fn with_send_status(mut self, send_status: SendStatus) -> Self {
        self.send_status = send_status;
        self
    }

    /// Viewers and CC recipients never act on fields, and a recipient who was
    /// already sent the document cannot get new ones.
    #[must_use]
    pub fn can_receive_fields(&self) -> bool {
        self.send_status != SendStatus::Sent
            && !matches!(self.role, RecipientRole::Viewer | RecipientRole::Cc)
            && !self.email.is_empty()
    }

    /// Initial selection: the first recipient not yet sent, else the first.
    #[must_use]
    pub fn default_selection(recipients: &[Recipient]) -> Option<&Recipient> {
        recipients
            .iter()
            .find(|recipient| recipient.send_status != SendStatus::Sent)
            .or_else(|| recipients.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_cc_and_sent_recipients_cannot_receive_fields() {
        assert!(Recipient::new(1, "a@example.com", RecipientRole::Signer).can_receive_fields());
        assert!(Recipient::new(2, "b@example.com", RecipientRole::Approver).can_receive_fields());
        assert!(!Recipient::new(3, "c@example.com", RecipientRole::Viewer).can_receive_fields());
        assert!(!Recipient::new(4, "d@example.com", RecipientRole::Cc).can_receive_fields());
        assert!(
            !Recipient::new(5, "e@example.com", RecipientRole::Signer)
                .with_send_status(SendStatus::Sent)
                .can_receive_fields()
        );
        assert!(!Recipient::new(6, "", RecipientRole::Signer).can_receive_fields());
    }

    #[test]
    fn default_selection_skips_sent_recipients() {
        let recipients = vec![
            Recipient::new(1, "sent@example.com", RecipientRole::Signer)
                .with_send_status(SendStatus::Sent),
            Recipient::new(2, "fresh@example.com", RecipientRole::Signer),
        ];
        assert_eq!(Recipient::default_selection(&recipients).map(|r| r.id), Some(2));
    }

    #[test]
    fn default_selection_falls_back_to_first() {
        let recipients = vec![
            Recipient::new(1, "a@example.com", RecipientRole::Signer)
                .with_send_status(SendStatus::Sent),
            Recipient::new(2, "b@example.com", RecipientRole::Signer)
                .with_send_status(SendStatus::Sent),
        ];
        assert_eq!(Recipient::default_selection(&recipients).map(|r| r.id), Some(1));
        assert!(Recipient::default_selection(&[]).is_none());
    }

    #[test]
    fn send_status_defaults_when_missing() {
        let recipient: Recipient =
            serde_json::from_str(r#"{"id":9,"email":"x@example.com","role":"CC"}"#).unwrap();
        assert_eq!(recipient.send_status, SendStatus::NotSent);
        assert_eq!(recipient.role, RecipientRole::Cc);
    }
}
