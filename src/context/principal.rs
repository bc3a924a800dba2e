use super::{Principal, USERNAME_KEY};
use std::collections::{HashMap, HashSet};

/// In-memory principal with a fixed identity and role set
///
/// A principal without a username is a guest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPrincipal {
    username: Option<String>,
    roles: HashSet<String>,
    attributes: HashMap<String, String>,
}

impl StaticPrincipal {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn user(username: impl Into<String>) -> Self {
        StaticPrincipal {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

impl Principal for StaticPrincipal {
    fn is_guest(&self) -> bool {
        self.username.is_none()
    }

    fn get(&self, key: &str) -> Option<String> {
        if key == USERNAME_KEY {
            return self.username.clone();
        }
        self.attributes.get(key).cloned()
    }

    fn check(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
