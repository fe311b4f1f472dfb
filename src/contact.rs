use serde::{Deserialize, Serialize};

pub type ContactId = u32;

/// A single person record as it is persisted in the key-value store.
///
/// The serialized field names are part of the storage format and must not
/// change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub contact: String,
    pub email: String,
    /// Data URI of the contact's photo.
    pub picture: String,
}

/// The user-editable part of a contact, i.e. everything except the id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactDraft {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub picture: String,
}

impl ContactDraft {
    pub fn into_contact(self, id: ContactId) -> Contact {
        Contact {
            id,
            name: self.name,
            contact: self.contact,
            email: self.email,
            picture: self.picture,
        }
    }
}

impl From<Contact> for ContactDraft {
    fn from(contact: Contact) -> Self {
        ContactDraft {
            name: contact.name,
            contact: contact.contact,
            email: contact.email,
            picture: contact.picture,
        }
    }
}

pub fn find_by_id(contacts: &[Contact], id: ContactId) -> Option<&Contact> {
    contacts.iter().find(|contact| contact.id == id)
}
