//! Add / edit / view form state and its transitions.
//!
//! Field validity flags are refreshed on blur and on submit; feedback is only
//! shown once a submission has been attempted.

use kontakt::validate::{self, check_submission};
use kontakt::{Contact, ContactDraft, ContactId, SubmissionPolicy};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
    View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Contact,
    Email,
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "contact" | "phone" => Ok(Field::Contact),
            "email" | "e-mail" => Ok(Field::Email),
            _ => Err(format!("unknown field '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    InvalidName,
    InvalidContact,
    ContactInUse,
    InvalidEmail,
    EmailInUse,
    MissingPicture,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Feedback::InvalidName => "Please enter a valid name.",
            Feedback::InvalidContact => "Please enter a valid contact number (9 digits).",
            Feedback::ContactInUse => "Contact number already in use.",
            Feedback::InvalidEmail => "Please enter a valid e-mail address.",
            Feedback::EmailInUse => "E-mail address is already in use.",
            Feedback::MissingPicture => "Picture is mandatory.",
        };
        f.write_str(message)
    }
}

/// What an accepted submission asks the driver to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A new record; the id is allocated when it is stored.
    Add(ContactDraft),
    Edit(Contact),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub mode: FormMode,
    pub id: ContactId,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub picture: String,
    pub is_submitted: bool,
    pub is_name_valid: bool,
    pub is_email_valid: bool,
    pub is_email_in_use: bool,
    pub is_contact_valid: bool,
    pub is_contact_in_use: bool,
}

impl FormState {
    pub fn new(mode: FormMode) -> Self {
        FormState {
            mode,
            id: 0,
            name: String::new(),
            contact: String::new(),
            email: String::new(),
            picture: String::new(),
            is_submitted: false,
            is_name_valid: false,
            is_email_valid: false,
            is_email_in_use: false,
            is_contact_valid: false,
            is_contact_in_use: false,
        }
    }

    /// A form prefilled from `contact`. Validity flags start out false, as
    /// they do for an empty form.
    pub fn for_contact(mode: FormMode, contact: &Contact) -> Self {
        FormState {
            id: contact.id,
            name: contact.name.clone(),
            contact: contact.contact.clone(),
            email: contact.email.clone(),
            picture: contact.picture.clone(),
            ..FormState::new(mode)
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == FormMode::View
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Contact => &self.contact,
            Field::Email => &self.email,
        }
    }

    pub fn change(self, field: Field, value: String) -> Self {
        match field {
            Field::Name => FormState { name: value, ..self },
            Field::Contact => FormState {
                contact: value,
                ..self
            },
            Field::Email => FormState { email: value, ..self },
        }
    }

    pub fn blur(self, field: Field, contacts: &[Contact]) -> Self {
        match field {
            Field::Name => FormState {
                is_name_valid: validate::is_name_valid(&self.name),
                ..self
            },
            Field::Contact => FormState {
                is_contact_valid: validate::is_contact_valid(&self.contact),
                is_contact_in_use: validate::is_contact_in_use(&self.contact, contacts),
                ..self
            },
            Field::Email => FormState {
                is_email_valid: validate::is_email_valid(&self.email),
                is_email_in_use: validate::is_email_in_use(&self.email, contacts),
                ..self
            },
        }
    }

    pub fn picture_loaded(self, data_uri: String) -> Self {
        FormState {
            picture: data_uri,
            ..self
        }
    }

    pub fn draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
            picture: self.picture.clone(),
        }
    }

    /// Runs the submission gate. The returned state carries the refreshed
    /// flags either way; the submission is present only when accepted.
    ///
    /// The contact format flag keeps its last blur value unless the policy
    /// enforces the format.
    pub fn submit(
        self,
        contacts: &[Contact],
        policy: &SubmissionPolicy,
    ) -> (Self, Option<Submission>) {
        let draft = self.draft();
        let editing = match self.mode {
            FormMode::Edit => Some(self.id),
            FormMode::Add | FormMode::View => None,
        };
        let verdict = check_submission(&draft, editing, contacts, policy);
        let state = FormState {
            is_submitted: true,
            is_name_valid: verdict.name_valid,
            is_email_valid: verdict.email_valid,
            is_email_in_use: verdict.email_in_use,
            is_contact_in_use: verdict.contact_in_use,
            is_contact_valid: if policy.enforce_contact_format {
                verdict.contact_valid
            } else {
                self.is_contact_valid
            },
            ..self
        };

        if !verdict.is_accepted() {
            return (state, None);
        }

        let submission = match state.mode {
            FormMode::Add => Some(Submission::Add(draft)),
            FormMode::Edit => Some(Submission::Edit(draft.into_contact(state.id))),
            FormMode::View => None,
        };
        (state, submission)
    }

    /// Inline messages, in field order. Empty until the first submit.
    pub fn feedback(&self) -> Vec<Feedback> {
        if !self.is_submitted {
            return Vec::new();
        }

        let checks = [
            (!self.is_name_valid, Feedback::InvalidName),
            (!self.is_contact_valid, Feedback::InvalidContact),
            (self.is_contact_in_use, Feedback::ContactInUse),
            (!self.is_email_valid, Feedback::InvalidEmail),
            (self.is_email_in_use, Feedback::EmailInUse),
            (self.picture.is_empty(), Feedback::MissingPicture),
        ];
        checks
            .iter()
            .filter(|(failed, _)| *failed)
            .map(|(_, feedback)| *feedback)
            .collect()
    }
}
