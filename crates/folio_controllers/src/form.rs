//! Contact form validation and submission
//!
//! [`validate`] is the pure rule set. [`ContactForm`] holds the field values,
//! per-field errors and the submission status, and runs the submit flow:
//!
//! ```text
//! Idle --begin_submit (valid)--> Submitting --finish_submit--> Success | Error
//!   ^                                                              |
//!   +------------- status reset timer or next edit ---------------+
//! ```
//!
//! `Submitting` doubles as the re-entrancy lock: a second submit while one is
//! in flight is rejected without touching the relay.

use std::cell::RefCell;
use std::sync::OnceLock;

use folio_animation::{AnimatedTimer, SchedulerHandle};
use folio_core::{Store, SubscriptionHandle};
use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{RelayError, SubmitError, ValidationError};
use crate::relay::{ContactPayload, MailRelay, RelayResponse};

/// Subject used when the sender leaves it empty
pub const DEFAULT_SUBJECT: &str = "Contact Form Message";

/// A contact form field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }
}

/// Raw field values as typed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
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

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Subject => self.subject = value,
            Field::Message => self.message = value,
        }
    }

    /// Template parameters for the relay, with the subject defaulted
    pub fn payload(&self, subject_placeholder: &str) -> ContactPayload {
        ContactPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: if self.subject.is_empty() {
                subject_placeholder.to_string()
            } else {
                self.subject.clone()
            },
            message: self.message.clone(),
        }
    }
}

/// Outcome of [`validate`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Validation {
    pub valid: bool,
    /// Failing fields in form order
    pub errors: IndexMap<Field, ValidationError>,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// Check the required fields and the email shape
pub fn validate(fields: &ContactFields) -> Validation {
    let mut errors = IndexMap::new();

    if fields.name.trim().is_empty() {
        errors.insert(
            Field::Name,
            ValidationError::Required("Name is required".to_string()),
        );
    }

    if fields.email.trim().is_empty() {
        errors.insert(
            Field::Email,
            ValidationError::Required("Email is required".to_string()),
        );
    } else if !email_pattern().is_match(&fields.email) {
        errors.insert(
            Field::Email,
            ValidationError::Format("Email is invalid".to_string()),
        );
    }

    if fields.message.trim().is_empty() {
        errors.insert(
            Field::Message,
            ValidationError::Required("Message is required".to_string()),
        );
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}

/// Submission status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Observable form state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub fields: ContactFields,
    pub errors: IndexMap<Field, ValidationError>,
    pub status: FormStatus,
}

/// Relay addressing and status timing
#[derive(Clone, Debug, PartialEq)]
pub struct ContactOptions {
    pub service_id: String,
    pub template_id: String,
    pub subject_placeholder: String,
    /// How long Success/Error stay visible
    pub status_reset_ms: f32,
}

impl Default for ContactOptions {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            subject_placeholder: DEFAULT_SUBJECT.to_string(),
            status_reset_ms: 5000.0,
        }
    }
}

/// Contact form controller
pub struct ContactForm {
    options: ContactOptions,
    handle: SchedulerHandle,
    state: Store<FormState>,
    status_timer: RefCell<Option<AnimatedTimer>>,
}

impl ContactForm {
    pub fn new(handle: SchedulerHandle, options: ContactOptions) -> Self {
        Self {
            options,
            handle,
            state: Store::new(FormState::default()),
            status_timer: RefCell::new(None),
        }
    }

    pub fn options(&self) -> &ContactOptions {
        &self.options
    }

    pub fn state(&self) -> FormState {
        self.state.get()
    }

    pub fn status(&self) -> FormStatus {
        self.state.read().status
    }

    pub fn fields(&self) -> ContactFields {
        self.state.read().fields.clone()
    }

    pub fn error(&self, field: Field) -> Option<ValidationError> {
        self.state.read().errors.get(&field).cloned()
    }

    pub fn is_submitting(&self) -> bool {
        self.status() == FormStatus::Submitting
    }

    /// Record an edit
    ///
    /// A non-blank value clears that field's error. Editing while a
    /// Success/Error status is shown returns the form to Idle.
    pub fn edit(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let mut dismissed = false;
        self.state.update(|s| {
            if !value.trim().is_empty() {
                s.errors.shift_remove(&field);
            }
            s.fields.set(field, value);
            if matches!(s.status, FormStatus::Success | FormStatus::Error) {
                s.status = FormStatus::Idle;
                dismissed = true;
            }
        });
        if dismissed {
            self.status_timer.borrow_mut().take();
        }
    }

    /// Validate and enter `Submitting`
    ///
    /// Returns the payload to hand to the relay.
    pub fn begin_submit(&self) -> Result<ContactPayload, SubmitError> {
        if self.is_submitting() {
            debug!("submit ignored, already in flight");
            return Err(SubmitError::InFlight);
        }

        let validation = validate(&self.state.read().fields);
        if !validation.valid {
            let errors = validation.errors.clone();
            self.state.update(|s| s.errors = errors);
            return Err(SubmitError::Invalid(validation));
        }

        self.status_timer.borrow_mut().take();
        let payload = self
            .state
            .read()
            .fields
            .payload(&self.options.subject_placeholder);
        self.state.update(|s| {
            s.errors.clear();
            s.status = FormStatus::Submitting;
        });
        info!(email = %payload.email, subject = %payload.subject, "contact submission started");
        Ok(payload)
    }

    /// Apply the relay's answer to a submission started with `begin_submit`
    ///
    /// Success clears the fields; failure keeps them. Either way the status
    /// reverts to Idle after `status_reset_ms`.
    pub fn finish_submit(
        &self,
        result: Result<RelayResponse, RelayError>,
    ) -> Result<RelayResponse, SubmitError> {
        if !self.is_submitting() {
            return Err(SubmitError::NotSubmitting);
        }

        let outcome = match result {
            Ok(response) => {
                info!(status = response.status, text = %response.text, "contact message sent");
                self.state.update(|s| {
                    s.fields = ContactFields::default();
                    s.status = FormStatus::Success;
                });
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "contact message failed");
                self.state.update(|s| s.status = FormStatus::Error);
                Err(SubmitError::Relay(err))
            }
        };

        *self.status_timer.borrow_mut() = Some(AnimatedTimer::once(
            self.handle.clone(),
            self.options.status_reset_ms,
        ));
        outcome
    }

    /// Validate, send through `relay` and apply the answer
    pub async fn submit<R>(&self, relay: &R) -> Result<RelayResponse, SubmitError>
    where
        R: MailRelay + ?Sized,
    {
        let payload = self.begin_submit()?;
        let result = relay
            .send(&self.options.service_id, &self.options.template_id, &payload)
            .await;
        self.finish_submit(result)
    }

    /// Apply an expired status timer; returns whether the status reset
    pub fn poll(&self) -> bool {
        let expired = self
            .status_timer
            .borrow()
            .as_ref()
            .is_some_and(|timer| timer.take_fired() > 0);
        if !expired {
            return false;
        }
        self.status_timer.borrow_mut().take();
        self.state.update(|s| s.status = FormStatus::Idle);
        debug!("contact status reset");
        true
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&FormState) + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.state.unsubscribe(handle)
    }
}
