//! Error types for the access layer.

/// Errors produced when turning untyped names into roles or permissions.
///
/// The table itself can't fail: [`derive_permissions`](crate::derive_permissions)
/// only accepts a [`Role`](crate::Role), so an invalid role never reaches it.
/// These errors only show up at the edges, where strings come in from
/// config files, route declarations, or a login form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The string is not one of `super_admin`, `admin`, `broker`, `user`.
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// The string is not one of the 20 camelCase permission names.
    #[error("unknown permission: {0:?}")]
    UnknownPermission(String),
}
