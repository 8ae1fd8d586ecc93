//! Intake validation.
//!
//! Two entry points feed the `leads` table:
//!
//! - [`ContactForm`] - the six-field form on the contact page. Every field is
//!   checked; all failures are reported per field and the first one in
//!   display order becomes the top-level notice.
//! - [`LeadSubmission`] - the JSON body of the submission endpoint. Only
//!   presence is checked there; the form has already applied the content rules.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{LeadSource, NewLead};

/// Minimum length (in characters) of the phone field.
pub const MIN_PHONE_LEN: usize = 10;

/// Minimum length (in characters) of the message field.
pub const MIN_MESSAGE_LEN: usize = 10;

/// A validated field of the contact form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
    Interest,
    Message,
}

impl ContactField {
    /// Fields as they appear on the page, top to bottom.
    pub const DISPLAY_ORDER: [Self; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Interest,
        Self::Message,
    ];
}

/// One failed rule on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: ContactField,
    pub message: &'static str,
}

/// All field failures of one form submission, ordered by display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: ContactField, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The failure shown as the top-level notice.
    #[must_use]
    pub fn first(&self) -> Option<&FieldError> {
        ContactField::DISPLAY_ORDER
            .iter()
            .find_map(|field| self.errors.iter().find(|e| e.field == *field))
    }

    /// Message for one field, if it failed.
    #[must_use]
    pub fn get(&self, field: ContactField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    #[must_use]
    pub fn contains(&self, field: ContactField) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(e) => f.write_str(e.message),
            None => f.write_str("no validation errors"),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw contact-form input, exactly as posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub interest: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub company: String,
}

impl ContactForm {
    /// Check every rule and build the insert payload.
    ///
    /// On success `name` is `"<first> <last>"`, all values are trimmed and
    /// the source is [`LeadSource::ContactForm`].
    ///
    /// # Errors
    ///
    /// Returns every failing field; nothing should be sent to the store.
    pub fn validate(&self) -> Result<NewLead, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();
        let interest = self.interest.trim();
        let message = self.message.trim();
        let company = self.company.trim();

        if first_name.is_empty() {
            errors.push(ContactField::FirstName, "Please enter your first name.");
        }
        if last_name.is_empty() {
            errors.push(ContactField::LastName, "Please enter your last name.");
        }

        if email.is_empty() {
            errors.push(ContactField::Email, "Please enter your email address.");
        } else if !email.contains('@') {
            errors.push(ContactField::Email, "Please enter a valid email address.");
        }

        if phone.is_empty() {
            errors.push(ContactField::Phone, "Please enter your phone number.");
        } else if phone.chars().count() < MIN_PHONE_LEN {
            errors.push(
                ContactField::Phone,
                "Phone number must be at least 10 characters.",
            );
        }

        if interest.is_empty() {
            errors.push(
                ContactField::Interest,
                "Please tell us what you are interested in.",
            );
        }

        if message.is_empty() {
            errors.push(ContactField::Message, "Please enter a message.");
        } else if message.chars().count() < MIN_MESSAGE_LEN {
            errors.push(
                ContactField::Message,
                "Message must be at least 10 characters.",
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewLead {
            name: format!("{first_name} {last_name}"),
            email: email.to_owned(),
            phone: phone.to_owned(),
            interest: interest.to_owned(),
            message: message.to_owned(),
            company: (!company.is_empty()).then(|| company.to_owned()),
            source: Some(LeadSource::ContactForm),
            idempotency_key: None,
        })
    }
}

/// Required fields absent from an endpoint payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

/// JSON body of the submission endpoint.
///
/// Every field is optional at the type level so that a missing field is a
/// presence failure (400 with a generic message) rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub interest: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

impl LeadSubmission {
    /// Check that every required field is present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns the names of the missing fields.
    pub fn into_new_lead(self) -> Result<NewLead, MissingFields> {
        fn present(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        }

        let name = present(self.name);
        let email = present(self.email);
        let phone = present(self.phone);
        let interest = present(self.interest);
        let message = present(self.message);

        match (name, email, phone, interest, message) {
            (Some(name), Some(email), Some(phone), Some(interest), Some(message)) => Ok(NewLead {
                name,
                email,
                phone,
                interest,
                message,
                company: present(self.company),
                source: Some(LeadSource::Api),
                idempotency_key: None,
            }),
            (name, email, phone, interest, message) => {
                let missing = [
                    ("name", name.is_none()),
                    ("email", email.is_none()),
                    ("phone", phone.is_none()),
                    ("interest", interest.is_none()),
                    ("message", message.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, missing)| missing.then_some(field))
                .collect();
                Err(MissingFields(missing))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@x.com".into(),
            phone: "5551234567".into(),
            interest: "stocks".into(),
            message: "I want to learn more".into(),
            company: String::new(),
        }
    }

    #[test]
    fn test_valid_form_concatenates_name() {
        let lead = valid_form().validate().unwrap();
        assert_eq!(lead.name, "Jane Doe");
        assert_eq!(lead.email, "jane@x.com");
        assert_eq!(lead.phone, "5551234567");
        assert_eq!(lead.interest, "stocks");
        assert_eq!(lead.message, "I want to learn more");
        assert_eq!(lead.company, None);
        assert_eq!(lead.source, Some(LeadSource::ContactForm));
    }

    #[test]
    fn test_valid_form_trims_and_keeps_company() {
        let form = ContactForm {
            first_name: "  Jane ".into(),
            company: " Acme ".into(),
            ..valid_form()
        };
        let lead = form.validate().unwrap();
        assert_eq!(lead.name, "Jane Doe");
        assert_eq!(lead.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_each_empty_field_is_flagged() {
        for field in ContactField::DISPLAY_ORDER {
            let mut form = valid_form();
            match field {
                ContactField::FirstName => form.first_name.clear(),
                ContactField::LastName => form.last_name = "   ".into(),
                ContactField::Email => form.email.clear(),
                ContactField::Phone => form.phone.clear(),
                ContactField::Interest => form.interest.clear(),
                ContactField::Message => form.message.clear(),
            }
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.len(), 1, "{field:?}");
            assert!(errors.contains(field), "{field:?}");
        }
    }

    #[test]
    fn test_email_without_at_is_rejected() {
        let form = ContactForm {
            email: "jane.x.com".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(ContactField::Email),
            Some("Please enter a valid email address.")
        );
    }

    #[test]
    fn test_short_phone_is_rejected() {
        let form = ContactForm {
            phone: "555123456".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(ContactField::Phone),
            Some("Phone number must be at least 10 characters.")
        );
    }

    #[test]
    fn test_short_message_is_rejected() {
        let form = ContactForm {
            message: "Hi there".into(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(ContactField::Message),
            Some("Message must be at least 10 characters.")
        );
    }

    #[test]
    fn test_phone_length_counts_characters_not_bytes() {
        let form = ContactForm {
            phone: "５５５１２３４５６７".into(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_notice_is_first_failure_in_display_order() {
        let form = ContactForm {
            message: "short".into(),
            email: "nope".into(),
            last_name: String::new(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.first().unwrap().field, ContactField::LastName);
        assert_eq!(errors.to_string(), "Please enter your last name.");
    }

    #[test]
    fn test_empty_form_flags_every_field() {
        let errors = ContactForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), ContactField::DISPLAY_ORDER.len());
        assert_eq!(errors.first().unwrap().field, ContactField::FirstName);
    }

    #[test]
    fn test_submission_with_all_fields() {
        let submission: LeadSubmission = serde_json::from_str(
            r#"{"name":"Jane Doe","email":"jane@x.com","phone":"5551234567",
                "interest":"stocks","message":"I want to learn more"}"#,
        )
        .unwrap();
        let lead = submission.into_new_lead().unwrap();
        assert_eq!(lead.name, "Jane Doe");
        assert_eq!(lead.source, Some(LeadSource::Api));
    }

    #[test]
    fn test_submission_missing_phone() {
        let submission: LeadSubmission = serde_json::from_str(
            r#"{"name":"Jane Doe","email":"jane@x.com",
                "interest":"stocks","message":"I want to learn more"}"#,
        )
        .unwrap();
        let err = submission.into_new_lead().unwrap_err();
        assert_eq!(err.0, vec!["phone"]);
    }

    #[test]
    fn test_submission_treats_blank_and_null_as_missing() {
        let submission: LeadSubmission = serde_json::from_str(
            r#"{"name":"","email":null,"phone":"5551234567","interest":" ","message":"hello world"}"#,
        )
        .unwrap();
        let err = submission.into_new_lead().unwrap_err();
        assert_eq!(err.0, vec!["name", "email", "interest"]);
    }
}
