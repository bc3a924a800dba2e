//! Rule model
//!
//! A rule carries an `allow` flag and up to four optional conditions.
//! Rules are built in code or loaded from a [`RuleDocument`] (JSON or TOML),
//! in which case the custom condition names a predicate registered in a
//! [`PredicateRegistry`].

use crate::error::{AccessError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied custom condition
///
/// Receives the merged argument bag `{"owner": .., ..extra args}`.
pub trait Predicate: Send + Sync {
    fn call(&self, args: &Map<String, Value>) -> anyhow::Result<bool>;
}

impl<F> Predicate for F
where
    F: Fn(&Map<String, Value>) -> anyhow::Result<bool> + Send + Sync,
{
    fn call(&self, args: &Map<String, Value>) -> anyhow::Result<bool> {
        self(args)
    }
}

/// Predicate plus the extra arguments merged into its argument bag
#[derive(Clone)]
pub struct CustomCondition {
    pub predicate: Arc<dyn Predicate>,
    pub args: Map<String, Value>,
}

impl CustomCondition {
    pub fn new(predicate: Arc<dyn Predicate>, args: Map<String, Value>) -> Self {
        CustomCondition { predicate, args }
    }
}

impl fmt::Debug for CustomCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCondition")
            .field("predicate", &"<fn>")
            .field("args", &self.args)
            .finish()
    }
}

/// One allow/deny statement
///
/// `allow: None` means the rule has no allow key and restricts nothing.
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub allow: Option<bool>,
    pub users: Option<Vec<String>>,
    pub ips: Option<Vec<String>>,
    pub roles: Option<Vec<String>>,
    pub custom: Option<CustomCondition>,
}

impl Rule {
    /// Allow rule with no conditions yet
    pub fn allow() -> Self {
        Rule {
            allow: Some(true),
            ..Default::default()
        }
    }

    /// Deny rule with no conditions yet
    pub fn deny() -> Self {
        Rule {
            allow: Some(false),
            ..Default::default()
        }
    }

    pub fn users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users = Some(users.into_iter().map(Into::into).collect());
        self
    }

    pub fn ips<I, S>(mut self, ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ips = Some(ips.into_iter().map(Into::into).collect());
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn custom<F>(self, predicate: F, args: Map<String, Value>) -> Self
    where
        F: Fn(&Map<String, Value>) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.custom_predicate(Arc::new(predicate), args)
    }

    pub fn custom_predicate(
        mut self,
        predicate: Arc<dyn Predicate>,
        args: Map<String, Value>,
    ) -> Self {
        self.custom = Some(CustomCondition::new(predicate, args));
        self
    }

    /// True if at least one of users/ips/roles/custom is present
    pub fn has_conditions(&self) -> bool {
        self.users.is_some()
            || self.ips.is_some()
            || self.roles.is_some()
            || self.custom.is_some()
    }

    /// Parse a rule document from JSON and resolve its custom predicate
    pub fn from_json(json: &str, registry: &PredicateRegistry) -> Result<Self> {
        let doc: RuleDocument = serde_json::from_str(json)?;
        registry.resolve(doc)
    }

    /// Parse a rule document from TOML and resolve its custom predicate
    pub fn from_toml(source: &str, registry: &PredicateRegistry) -> Result<Self> {
        let doc: RuleDocument = toml::from_str(source)?;
        registry.resolve(doc)
    }
}

/// Serialized form of a custom condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSpec {
    /// Registry name of the predicate
    pub name: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub args: Map<String, Value>,
}

/// Serialized form of a [`Rule`]
///
/// List fields also accept a single string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<bool>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub users: Option<Vec<String>>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub ips: Option<Vec<String>>,

    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub roles: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(single) => vec![single],
            OneOrMany::Many(list) => list,
        }),
    )
}

/// Named predicates available to rule documents
#[derive(Default, Clone)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Arc<dyn Predicate>>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&Map<String, Value>) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(predicate))
    }

    pub fn insert(&mut self, name: impl Into<String>, predicate: Arc<dyn Predicate>) -> &mut Self {
        self.predicates.insert(name.into(), predicate);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Predicate>> {
        self.predicates.get(name).cloned()
    }

    /// Turn a document into a rule, looking up its custom predicate
    ///
    /// # Errors
    ///
    /// Returns `UnknownPredicate` if the document names an unregistered predicate.
    pub fn resolve(&self, doc: RuleDocument) -> Result<Rule> {
        let custom = match doc.custom {
            Some(spec) => {
                let predicate = self
                    .get(&spec.name)
                    .ok_or_else(|| AccessError::UnknownPredicate(spec.name.clone()))?;
                Some(CustomCondition::new(predicate, spec.args))
            }
            None => None,
        };

        Ok(Rule {
            allow: doc.allow,
            users: doc.users,
            ips: doc.ips,
            roles: doc.roles,
            custom,
        })
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.predicates.keys().collect();
        names.sort();
        f.debug_struct("PredicateRegistry")
            .field("predicates", &names)
            .finish()
    }
}
