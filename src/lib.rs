#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod allocator;
pub mod contact;
pub mod error;
pub mod picture;
pub mod validate;

pub use allocator::available_id;
pub use contact::{Contact, ContactDraft, ContactId};
pub use error::KontaktError;
pub use validate::{SubmissionPolicy, Verdict};
