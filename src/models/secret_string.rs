//! A container for sensitive string data.
//!
//! `SecretString` keeps relayer private keys in locked memory and keeps them
//! out of logs and debug output. Content is zeroized when dropped; access
//! goes through scoped closures so no long-lived plaintext copies escape.
use std::{fmt, sync::Mutex};

use secrets::SecretVec;
use zeroize::Zeroizing;

pub struct SecretString(Mutex<SecretVec<u8>>);

impl Clone for SecretString {
    fn clone(&self) -> Self {
        let secret_vec = self.with_secret_vec(|secret_vec| secret_vec.clone());
        Self(Mutex::new(secret_vec))
    }
}

impl SecretString {
    /// Copies the input into protected memory.
    pub fn new(s: &str) -> Self {
        let bytes = Zeroizing::new(s.as_bytes().to_vec());
        let secret_vec = SecretVec::new(bytes.len(), |buffer| {
            buffer.copy_from_slice(&bytes);
        });
        Self(Mutex::new(secret_vec))
    }

    fn with_secret_vec<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SecretVec<u8>) -> R,
    {
        let guard = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        f(&guard)
    }

    /// Borrows the secret as `&str` for the duration of the closure.
    pub fn as_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        self.with_secret_vec(|secret_vec| {
            let bytes = secret_vec.borrow();
            // Contents were built from a &str in `new`, so this is valid UTF-8.
            let s = unsafe { std::str::from_utf8_unchecked(&bytes) };
            f(s)
        })
    }

    /// Creates a zeroizing copy of the content. Prefer `as_str` where a
    /// borrow suffices.
    pub fn to_str(&self) -> Zeroizing<String> {
        self.with_secret_vec(|secret_vec| {
            let bytes = secret_vec.borrow();
            let s = unsafe { std::str::from_utf8_unchecked(&bytes) };
            Zeroizing::new(s.to_string())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.with_secret_vec(|secret_vec| secret_vec.is_empty())
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.with_secret_vec(|self_vec| {
            other.with_secret_vec(|other_vec| {
                let self_bytes = self_vec.borrow();
                let other_bytes = other_vec.borrow();

                self_bytes.len() == other_bytes.len()
                    && subtle::ConstantTimeEq::ct_eq(&*self_bytes, &*other_bytes).into()
            })
        })
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SecretString(REDACTED)")
    }
}
