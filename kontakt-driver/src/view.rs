//! View models derived from the current state after every change.

use crate::form::{Feedback, FormMode, FormState};
use crate::state::Session;
use kontakt::{Contact, ContactId};

pub const EMPTY_LIST: &str = "No contacts available. Please add new contact.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub id: ContactId,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub has_picture: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub signed_in_as: Option<String>,
    pub can_add: bool,
    pub cards: Vec<ContactCard>,
}

impl ListView {
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.cards.is_empty() {
            Some(EMPTY_LIST)
        } else {
            None
        }
    }
}

pub fn list_view(contacts: &[Contact], session: &Session) -> ListView {
    let signed_in = session.is_signed_in();
    ListView {
        signed_in_as: session.username().map(String::from),
        can_add: signed_in,
        cards: contacts
            .iter()
            .map(|contact| ContactCard {
                id: contact.id,
                name: contact.name.clone(),
                contact: contact.contact.clone(),
                email: contact.email.clone(),
                has_picture: !contact.picture.is_empty(),
                can_edit: signed_in,
                can_delete: signed_in,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub mode: FormMode,
    pub read_only: bool,
    pub can_submit: bool,
    pub name: String,
    pub contact: String,
    pub email: String,
    /// Length of the picture data URI, if one is attached.
    pub picture_len: Option<usize>,
    pub feedback: Vec<Feedback>,
}

pub fn form_view(form: &FormState) -> FormView {
    FormView {
        mode: form.mode,
        read_only: form.is_read_only(),
        can_submit: !form.is_read_only(),
        name: form.name.clone(),
        contact: form.contact.clone(),
        email: form.email.clone(),
        picture_len: if form.picture.is_empty() {
            None
        } else {
            Some(form.picture.len())
        },
        feedback: form.feedback(),
    }
}

pub fn delete_prompt(contact: &Contact) -> String {
    format!("Are you sure you want to delete: {}?", contact.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> Vec<Contact> {
        vec![Contact {
            id: 4,
            name: "Jane Doe".into(),
            contact: "123456789".into(),
            email: "jane@doe.com".into(),
            picture: "data:image/png;base64,AAAA".into(),
        }]
    }

    #[test]
    fn signed_out_list_has_no_controls() {
        let view = list_view(&contacts(), &Session::SignedOut);
        assert_eq!(view.signed_in_as, None);
        assert!(!view.can_add);
        assert!(!view.cards[0].can_edit);
        assert!(!view.cards[0].can_delete);
        assert!(view.cards[0].has_picture);
        assert_eq!(view.empty_message(), None);
    }

    #[test]
    fn signed_in_list_has_controls() {
        let view = list_view(&contacts(), &Session::SignedIn("jane".into()));
        assert_eq!(view.signed_in_as.as_deref(), Some("jane"));
        assert!(view.can_add);
        assert!(view.cards[0].can_edit && view.cards[0].can_delete);
    }

    #[test]
    fn empty_list_message() {
        let view = list_view(&[], &Session::SignedOut);
        assert_eq!(view.empty_message(), Some(EMPTY_LIST));
    }

    #[test]
    fn view_form_is_read_only() {
        let form = FormState::for_contact(FormMode::View, &contacts()[0]);
        let view = form_view(&form);
        assert!(view.read_only);
        assert!(!view.can_submit);
        assert_eq!(view.picture_len, Some(26));
        assert!(view.feedback.is_empty());
    }

    #[test]
    fn prompt_names_the_contact() {
        assert_eq!(
            delete_prompt(&contacts()[0]),
            "Are you sure you want to delete: Jane Doe?"
        );
    }
}
