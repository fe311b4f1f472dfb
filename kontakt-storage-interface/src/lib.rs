use std::error::Error;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

struct Boxed<T>(T);

#[derive(Debug)]
pub struct BoxedError(pub Box<dyn Error + Send + Sync + 'static>);

pub fn into_boxed_error<E: Error + Send + Sync + 'static>(error: E) -> BoxedError {
    BoxedError(Box::new(error))
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for BoxedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

pub type BoxedStore<'a> = Box<dyn KeyValueStore<ReadError = BoxedError, WriteError = BoxedError> + 'a>;

/// A string key-value store holding whole serialized values under a key.
///
/// Writes replace the previous value entirely and complete before the call
/// returns.
pub trait KeyValueStore {
    type ReadError: Error + Send + Sync + 'static;
    type WriteError: Error + Send + Sync + 'static;

    fn boxed<'a>(self) -> BoxedStore<'a>
    where
        Self: Sized + 'a,
    {
        Box::new(Boxed(self))
    }

    // Read
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, Self::ReadError>;

    // Update
    fn set(&self, key: &str, value: &str) -> Result<(), Self::WriteError>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), Self::WriteError>;
}

impl<'a, T: KeyValueStore + ?Sized> KeyValueStore for &'a T {
    type ReadError = T::ReadError;
    type WriteError = T::WriteError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::ReadError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::WriteError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::WriteError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    type ReadError = T::ReadError;
    type WriteError = T::WriteError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::ReadError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::WriteError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::WriteError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    type ReadError = T::ReadError;
    type WriteError = T::WriteError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::ReadError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::WriteError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::WriteError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    type ReadError = T::ReadError;
    type WriteError = T::WriteError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::ReadError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::WriteError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::WriteError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore> KeyValueStore for Boxed<T> {
    type ReadError = BoxedError;
    type WriteError = BoxedError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::ReadError> {
        self.0.get(key).map_err(into_boxed_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::WriteError> {
        self.0.set(key, value).map_err(into_boxed_error)
    }

    fn remove(&self, key: &str) -> Result<(), Self::WriteError> {
        self.0.remove(key).map_err(into_boxed_error)
    }
}
