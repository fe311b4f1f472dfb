//! Identifier allocation for new contacts.

use crate::contact::{Contact, ContactId};

fn is_taken(contacts: &[Contact], id: ContactId) -> bool {
    contacts.iter().any(|contact| contact.id == id)
}

/// Returns the identifier for the next contact to be added.
///
/// Walks the collection by position: at position `i` the candidates are
/// `i + 1` and then `contacts[i].id + 1`, and the first untaken one wins.
/// This is not a minimum-gap search; the result depends on the order of the
/// collection (`[1, 5, 2]` yields `6`, not `3`).
///
/// An empty collection yields `0`. Existing data was allocated this way, so
/// the behavior is kept as is.
pub fn available_id(contacts: &[Contact]) -> ContactId {
    for (i, current) in contacts.iter().enumerate() {
        let position_id = (i as ContactId).wrapping_add(1);
        if !is_taken(contacts, position_id) {
            return position_id;
        }

        if let Some(next_id) = current.id.checked_add(1) {
            if !is_taken(contacts, next_id) {
                return next_id;
            }
        }
    }

    0
}
