//! Permission strings granted to a session.

use std::collections::BTreeSet;

/// Create movies.
pub const MOVIES_CREATE: &str = "movies:create";
/// Edit movies and their cast.
pub const MOVIES_UPDATE: &str = "movies:update";
/// Delete movies.
pub const MOVIES_DELETE: &str = "movies:delete";
/// Create actors.
pub const ACTORS_CREATE: &str = "actors:create";
/// Edit actors.
pub const ACTORS_UPDATE: &str = "actors:update";
/// Delete actors.
pub const ACTORS_DELETE: &str = "actors:delete";

/// Opaque permission strings granted to the current session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    /// Whether `permission` was granted.
    #[must_use]
    pub fn can(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    /// Whether nothing was granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Granted permissions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}
