//! Dashboard-level state: who is signed in, which view is shown, and the
//! pending delete confirmation.

use kontakt::{Contact, ContactId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    SignedOut,
    /// No credentials are checked; the name is only displayed.
    SignedIn(String),
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Session::SignedIn(_))
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::SignedIn(name) => Some(name.as_str()),
            Session::SignedOut => None,
        }
    }
}

/// Views carry a contact id, never the contact itself; the record is
/// re-fetched from the store on navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    View(ContactId),
    Edit(ContactId),
    Add,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub session: Session,
    pub route: Route,
    pub delete_dialog: Option<Contact>,
}

impl Default for DashboardState {
    fn default() -> Self {
        DashboardState {
            session: Session::SignedOut,
            route: Route::List,
            delete_dialog: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SignIn(String),
    SignOut,
    Navigate(Route),
    OpenDelete(Contact),
    HideDelete,
    /// The pending contact was removed from the store.
    Deleted,
}

pub fn reduce(state: DashboardState, action: Action) -> DashboardState {
    log::debug!("dashboard action {:?}", action);

    match action {
        Action::SignIn(username) => DashboardState {
            session: Session::SignedIn(username),
            ..state
        },
        // an open delete dialog survives sign-out
        Action::SignOut => DashboardState {
            session: Session::SignedOut,
            ..state
        },
        Action::Navigate(route) => DashboardState { route, ..state },
        // the delete control only exists for signed-in users
        Action::OpenDelete(_) if !state.session.is_signed_in() => state,
        Action::OpenDelete(contact) => DashboardState {
            delete_dialog: Some(contact),
            ..state
        },
        Action::HideDelete | Action::Deleted => DashboardState {
            delete_dialog: None,
            ..state
        },
    }
}
