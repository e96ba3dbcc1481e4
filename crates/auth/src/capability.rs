use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Capability label.
///
/// Capabilities are opaque names for a protected resource class (e.g.
/// `"user"`). Which role owns which label is decided by the role table in
/// [`crate::roles`], never by the label itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    /// Content anyone may see; gated routes with this label need no identity.
    pub const PUBLIC: Capability = Capability(Cow::Borrowed("public"));
    pub const USER: Capability = Capability(Cow::Borrowed("user"));
    pub const ADMIN: Capability = Capability(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_public(&self) -> bool {
        self.as_str() == Self::PUBLIC.as_str()
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Capability {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
