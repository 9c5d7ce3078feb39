//! Contact form flow.
//!
//! [`ContactForm`] owns the four text fields and the submission status:
//!
//! ```text
//! Idle ──submit──▶ Sending ──ack──▶ Sent ──reset delay──▶ Idle
//!                     │
//!                     └──failure/timeout──▶ Error ──submit──▶ Sending
//! ```
//!
//! Submission is split in two phases so a host can keep handling input while
//! the relay call is pending: [`ContactForm::begin_submit`] validates,
//! snapshots the fields and hands back a ticket plus payload;
//! [`ContactForm::finish_submit`] applies the relay's answer for that ticket.
//! [`ContactForm::submit`] runs both phases around one relay call.
//!
//! Only one submission is in flight at a time. After [`ContactForm::unmount`]
//! every late completion and timer tick is ignored.

use crate::config::RelayConfig;
use crate::relay::{EmailPayload, EmailRelay, RelayAck, RelayError};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Message shown when the relay call fails.
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    /// Form control name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Email => "Email Address",
            Field::Subject => "Subject",
            Field::Message => "Message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
        }
    }

    /// First required field that is empty or whitespace.
    pub fn first_blank(&self) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| self.get(*f).trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|f| self.get(f).is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Sending,
    Sent,
    Error(String),
}

impl FormStatus {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FormStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormStatus::Idle => "idle",
            FormStatus::Sending => "sending",
            FormStatus::Sent => "sent",
            FormStatus::Error(_) => "error",
        }
    }
}

/// Why a submit was refused before any relay call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("A message is already being sent")]
    InFlight,
    #[error("The form is showing its confirmation")]
    AlreadySent,
    #[error("{0} is required")]
    MissingField(Field),
    #[error("The form is no longer mounted")]
    Unmounted,
}

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

/// Output of [`ContactForm::begin_submit`]: what to send and how to report back.
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    pub ticket: SubmitTicket,
    pub payload: EmailPayload,
}

/// Effect of a relay answer on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Sent,
    Failed,
    /// Stale ticket or torn-down form: nothing changed.
    Ignored,
}

#[derive(Debug)]
pub struct ContactForm {
    fields: ContactFields,
    status: FormStatus,
    recipient: String,
    reset_delay: Duration,
    send_timeout: Duration,
    reset_at: Option<Instant>,
    in_flight: Option<SubmitTicket>,
    next_ticket: u64,
    mounted: bool,
}

impl ContactForm {
    pub fn new(recipient: impl Into<String>, reset_delay: Duration, send_timeout: Duration) -> Self {
        Self {
            fields: ContactFields::default(),
            status: FormStatus::Idle,
            recipient: recipient.into(),
            reset_delay,
            send_timeout,
            reset_at: None,
            in_flight: None,
            next_ticket: 0,
            mounted: true,
        }
    }

    pub fn from_config(relay: &RelayConfig) -> Self {
        Self::new(relay.recipient.clone(), relay.reset_delay(), relay.timeout())
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// When a sent form will revert to idle.
    pub fn reset_deadline(&self) -> Option<Instant> {
        self.reset_at
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.mounted && !matches!(self.status, FormStatus::Sending | FormStatus::Sent)
    }

    /// Apply one edit. Returns `false` when the edit was dropped (torn down,
    /// or the confirmation panel is showing instead of the inputs).
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        if !self.mounted || self.status == FormStatus::Sent {
            return false;
        }
        *self.fields.get_mut(field) = value.into();
        true
    }

    /// Validate, move to `Sending`, and snapshot the fields into a payload.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, SubmitRejected> {
        if !self.mounted {
            return Err(SubmitRejected::Unmounted);
        }
        match self.status {
            FormStatus::Sending => return Err(SubmitRejected::InFlight),
            FormStatus::Sent => return Err(SubmitRejected::AlreadySent),
            FormStatus::Idle | FormStatus::Error(_) => {}
        }
        if let Some(field) = self.fields.first_blank() {
            return Err(SubmitRejected::MissingField(field));
        }

        let ticket = SubmitTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.status = FormStatus::Sending;

        Ok(PendingSubmit {
            ticket,
            payload: EmailPayload {
                recipient: self.recipient.clone(),
                sender_name: self.fields.name.clone(),
                sender_email: self.fields.email.clone(),
                subject: self.fields.subject.clone(),
                message: self.fields.message.clone(),
            },
        })
    }

    /// Apply the relay's answer for `ticket`.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<RelayAck, RelayError>,
    ) -> Completion {
        if !self.mounted || self.in_flight != Some(ticket) {
            return Completion::Ignored;
        }
        self.in_flight = None;
        match result {
            Ok(ack) => {
                log::info!("Contact message sent (relay status {})", ack.status);
                self.status = FormStatus::Sent;
                self.fields = ContactFields::default();
                self.reset_at = Some(Instant::now() + self.reset_delay);
                Completion::Sent
            }
            Err(err) => {
                log::error!("Email error: {}", err);
                self.status = FormStatus::Error(SEND_FAILED_MESSAGE.to_string());
                Completion::Failed
            }
        }
    }

    /// Advance the reset timer. Returns `true` when the form went back to idle.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.mounted || self.status != FormStatus::Sent {
            return false;
        }
        match self.reset_at {
            Some(at) if now >= at => {
                self.reset_at = None;
                self.status = FormStatus::Idle;
                true
            }
            _ => false,
        }
    }

    /// Tear the form down. Pending completions and the reset timer are dropped.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.in_flight = None;
        self.reset_at = None;
    }

    /// Submit through `relay`, bounded by the send timeout.
    pub async fn submit(&mut self, relay: &dyn EmailRelay) -> Result<Completion, SubmitRejected> {
        let pending = self.begin_submit()?;
        let result = match tokio::time::timeout(self.send_timeout, relay.send(&pending.payload)).await
        {
            Ok(result) => result,
            Err(_) => Err(RelayError::Timeout(self.send_timeout)),
        };
        Ok(self.finish_submit(pending.ticket, result))
    }

    /// Wait out the reset delay of a sent form, then revert it to idle.
    pub async fn settle(&mut self) -> bool {
        let Some(at) = self.reset_at else {
            return false;
        };
        tokio::time::sleep_until(at).await;
        self.tick(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Relay double: counts calls, answers with `ok` or a rejection.
    struct StubRelay {
        ok: bool,
        calls: AtomicUsize,
    }

    impl StubRelay {
        fn new(ok: bool) -> Self {
            Self {
                ok,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmailRelay for StubRelay {
        async fn send(&self, _payload: &EmailPayload) -> Result<RelayAck, RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.ok {
                Ok(RelayAck {
                    status: 200,
                    body: "OK".into(),
                })
            } else {
                Err(RelayError::Rejected {
                    status: 500,
                    body: "relay down".into(),
                })
            }
        }
    }

    /// Relay that never answers.
    struct HangingRelay;

    #[async_trait]
    impl EmailRelay for HangingRelay {
        async fn send(&self, _payload: &EmailPayload) -> Result<RelayAck, RelayError> {
            std::future::pending().await
        }
    }

    fn form() -> ContactForm {
        ContactForm::new("me@example.com", Duration::from_secs(5), Duration::from_secs(10))
    }

    fn filled() -> ContactForm {
        let mut form = form();
        form.set_field(Field::Name, "Grace Hopper");
        form.set_field(Field::Email, "grace@example.com");
        form.set_field(Field::Subject, "Compilers");
        form.set_field(Field::Message, "Let's talk.");
        form
    }

    fn ack() -> Result<RelayAck, RelayError> {
        Ok(RelayAck {
            status: 200,
            body: "OK".into(),
        })
    }

    #[test]
    fn starts_idle_and_empty() {
        let form = form();
        assert_eq!(form.status(), &FormStatus::Idle);
        assert!(form.fields().is_empty());
        assert!(form.can_submit());
        assert!(form.reset_deadline().is_none());
    }

    #[test]
    fn edits_apply_in_order() {
        let mut form = form();
        form.set_field(Field::Subject, "H");
        form.set_field(Field::Subject, "Hi");
        form.set_field(Field::Subject, "Hi there");
        assert_eq!(form.fields().get(Field::Subject), "Hi there");
    }

    #[test]
    fn blank_field_rejects_submit() {
        let mut form = filled();
        form.set_field(Field::Email, "   ");
        assert_eq!(
            form.begin_submit().unwrap_err(),
            SubmitRejected::MissingField(Field::Email)
        );
        assert_eq!(form.status(), &FormStatus::Idle);
    }

    #[test]
    fn begin_submit_snapshots_latest_values() {
        let mut form = filled();
        form.set_field(Field::Message, "Changed my mind.");
        let pending = form.begin_submit().unwrap();
        assert_eq!(form.status(), &FormStatus::Sending);
        assert!(!form.can_submit());
        assert_eq!(pending.payload.recipient, "me@example.com");
        assert_eq!(pending.payload.sender_name, "Grace Hopper");
        assert_eq!(pending.payload.sender_email, "grace@example.com");
        assert_eq!(pending.payload.message, "Changed my mind.");
    }

    #[test]
    fn second_submit_while_sending_is_rejected() {
        let mut form = filled();
        let first = form.begin_submit().unwrap();
        assert_eq!(form.begin_submit().unwrap_err(), SubmitRejected::InFlight);
        assert_eq!(form.finish_submit(first.ticket, ack()), Completion::Sent);
    }

    #[test]
    fn failure_keeps_fields_and_sets_message() {
        let mut form = filled();
        let before = form.fields().clone();
        let pending = form.begin_submit().unwrap();
        let completion = form.finish_submit(
            pending.ticket,
            Err(RelayError::Rejected {
                status: 400,
                body: "nope".into(),
            }),
        );
        assert_eq!(completion, Completion::Failed);
        assert_eq!(form.fields(), &before);
        let message = form.status().error_message().unwrap();
        assert!(!message.is_empty());
        assert_eq!(message, SEND_FAILED_MESSAGE);
        assert!(form.can_submit());
    }

    #[test]
    fn resubmit_from_error_goes_to_sending() {
        let mut form = filled();
        let pending = form.begin_submit().unwrap();
        form.finish_submit(pending.ticket, Err(RelayError::Timeout(Duration::from_secs(1))));
        let retry = form.begin_submit().unwrap();
        assert_eq!(form.status(), &FormStatus::Sending);
        assert_eq!(form.finish_submit(retry.ticket, ack()), Completion::Sent);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut form = filled();
        let first = form.begin_submit().unwrap();
        form.finish_submit(first.ticket, Err(RelayError::Timeout(Duration::from_secs(1))));
        let _second = form.begin_submit().unwrap();
        assert_eq!(form.finish_submit(first.ticket, ack()), Completion::Ignored);
        assert_eq!(form.status(), &FormStatus::Sending);
    }

    #[test]
    fn sent_form_refuses_edits_and_submits() {
        let mut form = filled();
        let pending = form.begin_submit().unwrap();
        form.finish_submit(pending.ticket, ack());
        assert!(!form.set_field(Field::Name, "Someone"));
        assert!(form.fields().is_empty());
        assert_eq!(form.begin_submit().unwrap_err(), SubmitRejected::AlreadySent);
    }

    #[test]
    fn unmount_mid_flight_suppresses_completion() {
        let mut form = filled();
        let pending = form.begin_submit().unwrap();
        form.unmount();
        assert_eq!(form.finish_submit(pending.ticket, ack()), Completion::Ignored);
        assert_eq!(form.status(), &FormStatus::Sending);
        assert_eq!(form.fields().name, "Grace Hopper");
        assert_eq!(form.begin_submit().unwrap_err(), SubmitRejected::Unmounted);
        assert!(!form.set_field(Field::Name, "late"));
    }

    #[tokio::test(start_paused = true)]
    async fn success_clears_fields_and_resets_after_delay() {
        let relay = StubRelay::new(true);
        let mut form = filled();
        let completion = form.submit(&relay).await.unwrap();
        assert_eq!(completion, Completion::Sent);
        assert_eq!(form.status(), &FormStatus::Sent);
        assert!(form.fields().is_empty());
        assert_eq!(relay.calls(), 1);

        tokio::time::advance(Duration::from_millis(4_900)).await;
        assert!(!form.tick(Instant::now()));
        assert_eq!(form.status(), &FormStatus::Sent);

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(form.tick(Instant::now()));
        assert_eq!(form.status(), &FormStatus::Idle);
        assert!(form.reset_deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn settle_waits_for_the_reset() {
        let relay = StubRelay::new(true);
        let mut form = filled();
        form.submit(&relay).await.unwrap();
        let start = Instant::now();
        assert!(form.settle().await);
        assert_eq!(form.status(), &FormStatus::Idle);
        let waited = Instant::now() - start;
        assert!(waited >= Duration::from_secs(5));
        assert!(waited < Duration::from_millis(5_010));
    }

    #[tokio::test(start_paused = true)]
    async fn failing_relay_yields_error() {
        let relay = StubRelay::new(false);
        let mut form = filled();
        let before = form.fields().clone();
        assert_eq!(form.submit(&relay).await.unwrap(), Completion::Failed);
        assert!(form.status().error_message().is_some());
        assert_eq!(form.fields(), &before);
        assert!(!form.settle().await);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_relay_times_out() {
        let mut form = filled();
        assert_eq!(form.submit(&HangingRelay).await.unwrap(), Completion::Failed);
        assert_eq!(form.status().label(), "error");
    }

    #[tokio::test]
    async fn rejected_submit_issues_no_call() {
        let relay = StubRelay::new(true);
        let mut form = form();
        assert_eq!(
            form.submit(&relay).await.unwrap_err(),
            SubmitRejected::MissingField(Field::Name)
        );
        assert_eq!(relay.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_with_pending_timer_stays_quiet() {
        let relay = StubRelay::new(true);
        let mut form = filled();
        form.submit(&relay).await.unwrap();
        form.unmount();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!form.tick(Instant::now()));
        assert_eq!(form.status(), &FormStatus::Sent);
        assert!(!form.settle().await);
    }

    #[test]
    fn rejection_messages_name_the_field() {
        assert_eq!(
            SubmitRejected::MissingField(Field::Email).to_string(),
            "Email Address is required"
        );
    }
}
