// src/config/secret.rs
use std::fmt;

/// A credential read from the environment.
///
/// `Debug` and `Display` never print the value and there is no `Serialize` impl,
/// so a `Secret` cannot leak through logs or dumped settings. Use [`Secret::expose`]
/// at the single point where the raw value is sent over the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
