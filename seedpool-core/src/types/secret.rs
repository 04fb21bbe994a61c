// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! Scoped buffer for sensitive bytes
//!
//! The content is overwritten with zeros when the buffer goes out of scope, on
//! every exit path. This is best-effort: copies made before the value was
//! wrapped (or by `Vec` reallocation) are outside of its control.

use core::fmt;
use core::ops::Deref;

use zeroize::Zeroizing;

use crate::util::hex;

#[derive(Clone, PartialEq, Eq)]
pub struct SecretBytes(Zeroizing<Vec<u8>>);

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<sensitive>")
    }
}

impl Deref for SecretBytes {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

impl SecretBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Zeroizing::new(Vec::with_capacity(capacity)))
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::from(bytes.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        use zeroize::Zeroize;
        if len < self.0.len() {
            self.0[len..].zeroize();
            self.0.truncate(len);
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretBytes::from(vec![1, 2, 3]);
        assert_eq!(format!("{secret:?}"), "<sensitive>");
        assert_eq!(secret.to_hex(), "010203");
    }

    #[test]
    fn test_truncate() {
        let mut secret = SecretBytes::with_capacity(8);
        secret.extend_from_slice(&[9u8; 8]);
        secret.truncate(3);
        assert_eq!(&secret[..], &[9u8, 9, 9]);
        secret.truncate(10);
        assert_eq!(secret.len(), 3);
    }
}
