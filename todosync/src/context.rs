//! Per-request caller identity.
//!
//! Every resolver and method takes a [`RequestContext`] explicitly; nothing
//! reads the caller from ambient state.

use crate::error::{Result, TaskError};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    /// A context with no authenticated caller.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                user_id: user_id.into(),
            }),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.user_id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The caller's user id, or [`TaskError::Unauthenticated`].
    pub fn require_user(&self) -> Result<&str> {
        self.user_id().ok_or(TaskError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_context_requires_login() {
        let ctx = RequestContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(matches!(ctx.require_user(), Err(TaskError::Unauthenticated)));
    }

    #[test]
    fn test_user_context_exposes_id() {
        let ctx = RequestContext::for_user("u1");
        assert_eq!(ctx.require_user().unwrap(), "u1");
        assert_eq!(ctx.identity().unwrap().user_id, "u1");
    }
}
