pub mod config;
pub mod form;
pub mod state;
pub mod store;
pub mod view;

use config::DashboardConfig;
use form::{Field, FormMode, FormState, Submission};
use kontakt::{available_id, picture, Contact, ContactId, KontaktError, SubmissionPolicy};
use kontakt_storage_interface::KeyValueStore;
use state::{Action, DashboardState, Route};
use std::fmt::{Debug, Display};
use std::path::Path;
use store::{ContactStore, Listener};
use thiserror::Error;
use view::{FormView, ListView};

#[derive(Debug, Error)]
pub enum DriverError<RE: Debug + Display, WE: Debug + Display> {
    #[error("failed to parse command: {0}")]
    ParseFail(String),
    #[error("something not found")]
    NotFound,
    #[error("no contact with id {0}")]
    UnknownContact(ContactId),
    #[error("sign in first")]
    NotSignedIn,
    #[error("no form is open")]
    NoForm,
    #[error("the form is read-only")]
    ReadOnly,
    #[error("no delete is pending")]
    NoPendingDelete,
    #[error("store read: {0}")]
    StoreRead(RE),
    #[error("store write: {0}")]
    StoreWrite(WE),
    #[error("serializing contacts: {0}")]
    Serialization(serde_json::Error),
    #[error("{0}")]
    Picture(KontaktError),
}

pub type DriverResult<S, A> =
    Result<A, DriverError<<S as KeyValueStore>::ReadError, <S as KeyValueStore>::WriteError>>;

/// Runs user actions against the contact store, one at a time.
///
/// Every action runs to completion, including the store write, before the
/// next one is accepted.
pub struct Driver<S> {
    store: ContactStore<S>,
    state: DashboardState,
    form: Option<FormState>,
    policy: SubmissionPolicy,
}

impl<S: KeyValueStore> Driver<S> {
    pub fn new(backend: S, config: &DashboardConfig) -> Self {
        Driver {
            store: ContactStore::with_key(backend, &config.storage_key),
            state: DashboardState::default(),
            form: None,
            policy: config.policy,
        }
    }

    pub fn store(&self) -> &ContactStore<S> {
        &self.store
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.store.subscribe(listener);
    }

    fn dispatch(&mut self, action: Action) {
        let current = std::mem::take(&mut self.state);
        self.state = state::reduce(current, action);
    }

    pub fn contacts(&self) -> DriverResult<S, Vec<Contact>> {
        self.store.load()
    }

    /// The password is accepted and ignored.
    pub fn sign_in(&mut self, username: &str, _password: &str) {
        log::info!("signed in as {}", username);
        self.dispatch(Action::SignIn(username.into()));
    }

    pub fn sign_out(&mut self) {
        self.dispatch(Action::SignOut);
    }

    /// Switches views and returns the route actually shown. Viewing or
    /// editing a contact that no longer exists lands on the list instead.
    pub fn navigate(&mut self, route: Route) -> DriverResult<S, Route> {
        let (route, form) = match route {
            Route::List => (Route::List, None),
            Route::Add => (Route::Add, Some(FormState::new(FormMode::Add))),
            Route::View(id) | Route::Edit(id) => {
                let mode = match route {
                    Route::Edit(_) => FormMode::Edit,
                    _ => FormMode::View,
                };
                match kontakt::contact::find_by_id(&self.contacts()?, id) {
                    Some(contact) => (route, Some(FormState::for_contact(mode, contact))),
                    None => {
                        log::warn!("contact {} not found, showing the list", id);
                        (Route::List, None)
                    }
                }
            }
        };

        self.form = form;
        self.dispatch(Action::Navigate(route));
        Ok(route)
    }

    /// Back to the list, discarding the open form.
    pub fn cancel(&mut self) {
        self.form = None;
        self.dispatch(Action::Navigate(Route::List));
    }

    fn editable_form(&mut self) -> DriverResult<S, FormState> {
        match self.form.take() {
            Some(form) if form.is_read_only() => {
                self.form = Some(form);
                Err(DriverError::ReadOnly)
            }
            Some(form) => Ok(form),
            None => Err(DriverError::NoForm),
        }
    }

    pub fn input(&mut self, field: Field, value: &str) -> DriverResult<S, ()> {
        let form = self.editable_form()?;
        self.form = Some(form.change(field, value.into()));
        Ok(())
    }

    pub fn blur(&mut self, field: Field) -> DriverResult<S, ()> {
        let contacts = self.contacts()?;
        let form = self.editable_form()?;
        self.form = Some(form.blur(field, &contacts));
        Ok(())
    }

    /// Reads an image file into the form's picture.
    pub fn attach_picture<P: AsRef<Path>>(&mut self, path: P) -> DriverResult<S, ()> {
        if self.form.is_none() {
            return Err(DriverError::NoForm);
        }
        let data_uri = picture::read_picture(path).map_err(DriverError::Picture)?;
        let form = self.editable_form()?;
        self.form = Some(form.picture_loaded(data_uri));
        Ok(())
    }

    /// Submits the open form. On acceptance the collection is written and
    /// the list is shown; the stored record is returned. On rejection the
    /// form stays open with its feedback and `None` is returned.
    pub fn submit(&mut self) -> DriverResult<S, Option<Contact>> {
        let mut contacts = self.contacts()?;
        let form = self.editable_form()?;
        let (form, submission) = form.submit(&contacts, &self.policy);

        let saved = match submission {
            None => {
                log::debug!("submission rejected: {:?}", form.feedback());
                self.form = Some(form);
                return Ok(None);
            }
            Some(Submission::Add(draft)) => {
                let contact = draft.into_contact(available_id(&contacts));
                contacts.push(contact.clone());
                contact
            }
            Some(Submission::Edit(contact)) => {
                match contacts.iter_mut().find(|current| current.id == contact.id) {
                    Some(current) => *current = contact.clone(),
                    None => {
                        log::warn!("contact {} vanished before the edit was saved", contact.id);
                        let id = contact.id;
                        self.form = Some(form);
                        return Err(DriverError::UnknownContact(id));
                    }
                }
                contact
            }
        };

        if let Err(e) = self.store.save(&contacts) {
            self.form = Some(form);
            return Err(e);
        }
        log::info!("saved contact {} ({})", saved.id, saved.name);
        self.form = None;
        self.dispatch(Action::Navigate(Route::List));
        Ok(Some(saved))
    }

    pub fn open_delete(&mut self, id: ContactId) -> DriverResult<S, ()> {
        if !self.state.session.is_signed_in() {
            return Err(DriverError::NotSignedIn);
        }
        let contact = kontakt::contact::find_by_id(&self.contacts()?, id)
            .cloned()
            .ok_or(DriverError::UnknownContact(id))?;
        self.dispatch(Action::OpenDelete(contact));
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.dispatch(Action::HideDelete);
    }

    /// Removes exactly the record pending in the delete dialog.
    pub fn confirm_delete(&mut self) -> DriverResult<S, Contact> {
        let target = self
            .state
            .delete_dialog
            .clone()
            .ok_or(DriverError::NoPendingDelete)?;
        let contacts: Vec<Contact> = self
            .contacts()?
            .into_iter()
            .filter(|contact| contact.id != target.id)
            .collect();

        self.store.save(&contacts)?;
        log::info!("deleted contact {} ({})", target.id, target.name);
        self.dispatch(Action::Deleted);
        Ok(target)
    }

    pub fn list_view(&self) -> DriverResult<S, ListView> {
        Ok(view::list_view(&self.contacts()?, &self.state.session))
    }

    pub fn form_view(&self) -> Option<FormView> {
        self.form.as_ref().map(view::form_view)
    }

    pub fn delete_prompt(&self) -> Option<String> {
        self.state.delete_dialog.as_ref().map(view::delete_prompt)
    }
}
