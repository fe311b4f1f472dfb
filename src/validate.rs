//! Field validation and the submission gate for contact forms.

use crate::contact::{Contact, ContactDraft, ContactId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").unwrap());
static CONTACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$").unwrap()
});

const MIN_NAME_LENGTH: usize = 5;
const CONTACT_LENGTH: usize = 9;

pub fn is_name_valid(name: &str) -> bool {
    NAME.is_match(name) && name.chars().count() >= MIN_NAME_LENGTH
}

/// Leading zeros are significant: the number is kept as text.
pub fn is_contact_valid(contact: &str) -> bool {
    CONTACT.is_match(contact) && contact.len() == CONTACT_LENGTH
}

pub fn is_email_valid(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn is_email_in_use<'a, I>(email: &str, contacts: I) -> bool
where
    I: IntoIterator<Item = &'a Contact>,
{
    contacts.into_iter().any(|contact| contact.email == email)
}

pub fn is_contact_in_use<'a, I>(contact: &str, contacts: I) -> bool
where
    I: IntoIterator<Item = &'a Contact>,
{
    contacts.into_iter().any(|other| other.contact == contact)
}

/// Which form value the "contact in use" check is fed on submit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactInUseSource {
    /// The e-mail value is compared against stored contact numbers, which
    /// never blocks a duplicate number. Stored data was accepted this way.
    Email,
    Contact,
}

impl Default for ContactInUseSource {
    fn default() -> Self {
        ContactInUseSource::Email
    }
}

/// Knobs of the submission gate. The defaults match the behavior existing
/// collections were built under.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SubmissionPolicy {
    pub contact_in_use_source: ContactInUseSource,
    /// Block submission on a malformed contact number. Off by default: the
    /// format is only reported.
    pub enforce_contact_format: bool,
    /// Leave the record being edited out of the uniqueness scans.
    pub ignore_self_on_edit: bool,
}

impl SubmissionPolicy {
    /// The policy with every known defect of the default gate fixed.
    pub fn strict() -> Self {
        SubmissionPolicy {
            contact_in_use_source: ContactInUseSource::Contact,
            enforce_contact_format: true,
            ignore_self_on_edit: true,
        }
    }
}

/// Outcome of every check run on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub name_valid: bool,
    pub contact_valid: bool,
    pub email_valid: bool,
    pub email_in_use: bool,
    pub contact_in_use: bool,
    pub has_picture: bool,
    contact_format_required: bool,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        self.name_valid
            && self.email_valid
            && !self.email_in_use
            && !self.contact_in_use
            && self.has_picture
            && (self.contact_valid || !self.contact_format_required)
    }
}

/// Runs the submission gate for `draft` against the stored `contacts`.
///
/// `editing` is the id of the record being replaced, if any.
pub fn check_submission(
    draft: &ContactDraft,
    editing: Option<ContactId>,
    contacts: &[Contact],
    policy: &SubmissionPolicy,
) -> Verdict {
    let others = || {
        contacts.iter().filter(move |contact| {
            !(policy.ignore_self_on_edit && Some(contact.id) == editing)
        })
    };
    let contact_probe = match policy.contact_in_use_source {
        ContactInUseSource::Email => &draft.email,
        ContactInUseSource::Contact => &draft.contact,
    };

    Verdict {
        name_valid: is_name_valid(&draft.name),
        contact_valid: is_contact_valid(&draft.contact),
        email_valid: is_email_valid(&draft.email),
        email_in_use: is_email_in_use(&draft.email, others()),
        contact_in_use: is_contact_in_use(contact_probe, others()),
        has_picture: !draft.picture.is_empty(),
        contact_format_required: policy.enforce_contact_format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Vec<Contact> {
        vec![Contact {
            id: 1,
            name: "John Smith".into(),
            contact: "987654321".into(),
            email: "x@y.com".into(),
            picture: "data:image/png;base64,AAAA".into(),
        }]
    }

    fn draft(contact: &str, email: &str) -> ContactDraft {
        ContactDraft {
            name: "Jane Doe".into(),
            contact: contact.into(),
            email: email.into(),
            picture: "data:image/png;base64,AAAA".into(),
        }
    }

    #[test]
    fn name_rules() {
        assert!(is_name_valid("Jane Doe"));
        assert!(is_name_valid("Alice"));
        assert!(!is_name_valid("Jane"));
        assert!(!is_name_valid("Jane Doe 2"));
        assert!(!is_name_valid("J4ne Doe"));
        assert!(!is_name_valid(""));
        assert!(!is_name_valid("Zoë Smith"));
    }

    #[quickcheck]
    fn short_names_are_rejected(name: String) -> bool {
        name.chars().count() >= MIN_NAME_LENGTH || !is_name_valid(&name)
    }

    #[quickcheck]
    fn names_with_digits_are_rejected(name: String, digit: u8) -> bool {
        let name = format!("{}{}", name, digit % 10);
        !is_name_valid(&name)
    }

    #[test]
    fn contact_rules() {
        assert!(is_contact_valid("123456789"));
        assert!(is_contact_valid("000000001"));
        assert!(!is_contact_valid("12345678"));
        assert!(!is_contact_valid("1234567890"));
        assert!(!is_contact_valid("12345678a"));
        assert!(!is_contact_valid("12345 678"));
        assert!(!is_contact_valid("١٢٣٤٥٦٧٨٩"));
    }

    #[test]
    fn email_rules() {
        assert!(is_email_valid("a.b@example.com"));
        assert!(is_email_valid("jane@doe.com"));
        assert!(is_email_valid("o'neil+tag@mail-host.co.uk"));
        assert!(is_email_valid("local@host"));
        assert!(!is_email_valid("not-an-email"));
        assert!(!is_email_valid("a@b@c.com"));
        assert!(!is_email_valid("jane@doe..com"));
        assert!(!is_email_valid("jane doe@doe.com"));
        assert!(!is_email_valid("@doe.com"));
    }

    #[test]
    fn uniqueness_scans() {
        let contacts = stored();
        assert!(is_email_in_use("x@y.com", &contacts));
        assert!(!is_email_in_use("X@y.com", &contacts));
        assert!(is_contact_in_use("987654321", &contacts));
        assert!(!is_contact_in_use("123456789", &contacts));
        assert!(!is_contact_in_use("123456789", &[]));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let verdict = check_submission(
            &draft("123456789", "x@y.com"),
            None,
            &stored(),
            &SubmissionPolicy::default(),
        );
        assert!(verdict.email_in_use);
        assert!(!verdict.is_accepted());
    }

    // The default gate feeds the e-mail into the contact-number check, so a
    // duplicate number slips through.
    #[test]
    fn duplicate_contact_is_accepted_by_default_gate() {
        let verdict = check_submission(
            &draft("987654321", "other@y.com"),
            None,
            &stored(),
            &SubmissionPolicy::default(),
        );
        assert!(!verdict.contact_in_use);
        assert!(verdict.is_accepted());
    }

    #[test]
    fn duplicate_contact_is_rejected_when_checking_contact() {
        let policy = SubmissionPolicy {
            contact_in_use_source: ContactInUseSource::Contact,
            ..SubmissionPolicy::default()
        };
        let verdict =
            check_submission(&draft("987654321", "other@y.com"), None, &stored(), &policy);
        assert!(verdict.contact_in_use);
        assert!(!verdict.is_accepted());
    }

    #[test]
    fn contact_format_only_blocks_when_enforced() {
        let draft = draft("12345", "other@y.com");
        let lenient = check_submission(&draft, None, &stored(), &SubmissionPolicy::default());
        assert!(!lenient.contact_valid);
        assert!(lenient.is_accepted());

        let strict = check_submission(&draft, None, &stored(), &SubmissionPolicy::strict());
        assert!(!strict.is_accepted());
    }

    #[test]
    fn missing_picture_is_rejected() {
        let mut draft = draft("123456789", "jane@doe.com");
        draft.picture.clear();
        let verdict = check_submission(&draft, None, &[], &SubmissionPolicy::default());
        assert!(!verdict.has_picture);
        assert!(!verdict.is_accepted());
    }

    #[test]
    fn editing_collides_with_itself_unless_ignored() {
        let unchanged = draft("987654321", "x@y.com");
        let default = check_submission(&unchanged, Some(1), &stored(), &SubmissionPolicy::default());
        assert!(default.email_in_use);
        assert!(!default.is_accepted());

        let strict = check_submission(&unchanged, Some(1), &stored(), &SubmissionPolicy::strict());
        assert!(!strict.email_in_use);
        assert!(!strict.contact_in_use);
        assert!(strict.is_accepted());
    }

    #[test]
    fn policy_parse_defaults_missing_fields() {
        let policy: SubmissionPolicy =
            serde_json::from_str(r#"{ "contact_in_use_source": "contact" }"#).unwrap();
        assert_eq!(policy.contact_in_use_source, ContactInUseSource::Contact);
        assert!(!policy.enforce_contact_format);
        assert!(!policy.ignore_self_on_edit);
    }
}
