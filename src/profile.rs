//! Profile-based selection of the primary chat model.
//!
//! Two bindings compete for the primary [`ChatModel`] slot, each gated by a
//! configuration profile:
//!
//! | profile  | delegate              |
//! |----------|-----------------------|
//! | `openai` | `openAiChatModel`     |
//! | `google` | `googleGenAiChatModel`|
//!
//! Delegates live in a [`ChatModelRegistry`] under their qualifier. The active
//! profile decides which one the rest of the application sees.

use crate::chat::ChatModel;
use crate::observation::{ChatRequest, ChatResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A profile that binds a primary chat model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Profile {
    OpenAi,
    Google,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::OpenAi, Profile::Google];

    pub const fn name(self) -> &'static str {
        match self {
            Profile::OpenAi => "openai",
            Profile::Google => "google",
        }
    }

    /// Registry qualifier of the delegate this profile forwards to.
    pub const fn delegate(self) -> &'static str {
        match self {
            Profile::OpenAi => "openAiChatModel",
            Profile::Google => "googleGenAiChatModel",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown profile '{s}'"))
    }
}

/// Set of enabled profile names.
///
/// Names that do not correspond to a [`Profile`] are kept; they simply never
/// match a binding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveProfiles {
    names: Vec<String>,
}

impl ActiveProfiles {
    /// Parses a comma-separated list such as `"openai, dev"`.
    pub fn parse(list: &str) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Self { names }
    }

    pub fn is_active(&self, profile: Profile) -> bool {
        self.names.iter().any(|n| n == profile.name())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ActiveProfiles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let joined: Vec<String> = iter.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse(&joined.join(","))
    }
}

/// Chat models registered under qualifier names.
#[derive(Clone, Default)]
pub struct ChatModelRegistry {
    models: HashMap<String, Arc<dyn ChatModel>>,
}

impl ChatModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `model` under `qualifier`, replacing any previous entry.
    pub fn register(&mut self, qualifier: impl Into<String>, model: Arc<dyn ChatModel>) -> &mut Self {
        self.models.insert(qualifier.into(), model);
        self
    }

    pub fn get(&self, qualifier: &str) -> Option<Arc<dyn ChatModel>> {
        self.models.get(qualifier).cloned()
    }

    pub fn contains(&self, qualifier: &str) -> bool {
        self.models.contains_key(qualifier)
    }

    /// The only registered model, if exactly one is registered.
    pub fn sole(&self) -> Option<Arc<dyn ChatModel>> {
        match self.models.len() {
            1 => self.models.values().next().cloned(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl fmt::Debug for ChatModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut qualifiers: Vec<&String> = self.models.keys().collect();
        qualifiers.sort();
        f.debug_struct("ChatModelRegistry")
            .field("qualifiers", &qualifiers)
            .finish()
    }
}

/// The chat model bound by the active profile. Forwards every call.
#[derive(Clone)]
pub struct PrimaryChatModel {
    profile: Profile,
    delegate: Arc<dyn ChatModel>,
}

impl PrimaryChatModel {
    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn delegate(&self) -> &Arc<dyn ChatModel> {
        &self.delegate
    }
}

impl fmt::Debug for PrimaryChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimaryChatModel")
            .field("profile", &self.profile)
            .field("delegate", &self.profile.delegate())
            .finish()
    }
}

#[async_trait]
impl ChatModel for PrimaryChatModel {
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.delegate.call(request).await
    }

    fn system(&self) -> &'static str {
        self.delegate.system()
    }

    fn default_model(&self) -> &str {
        self.delegate.default_model()
    }
}

/// Picks the primary chat model for the active profiles.
///
/// Returns `Ok(None)` when neither binding profile is active; the caller
/// decides what to fall back to.
///
/// # Errors
///
/// - [`Error::AmbiguousPrimary`] if both binding profiles are active.
/// - [`Error::MissingDelegate`] if the active profile's delegate is not registered.
pub fn select_primary(
    active: &ActiveProfiles,
    registry: &ChatModelRegistry,
) -> Result<Option<PrimaryChatModel>> {
    let enabled: Vec<Profile> = Profile::ALL
        .into_iter()
        .filter(|p| active.is_active(*p))
        .collect();

    let profile = match enabled.as_slice() {
        [] => {
            tracing::debug!(profiles = ?active.names(), "no chat model profile active");
            return Ok(None);
        }
        [profile] => *profile,
        [first, second, ..] => return Err(Error::AmbiguousPrimary(first.name(), second.name())),
    };

    let delegate = registry
        .get(profile.delegate())
        .ok_or(Error::MissingDelegate(profile.delegate()))?;

    tracing::info!(
        profile = profile.name(),
        delegate = profile.delegate(),
        "selected primary chat model"
    );

    Ok(Some(PrimaryChatModel { profile, delegate }))
}

/// Resolves the chat model the application should use.
///
/// The primary bound by the active profile wins. With no binding profile
/// active, the only registered delegate is used.
///
/// # Errors
///
/// Everything [`select_primary`] returns, plus
/// [`Error::MissingConfiguration`] when no profile is active and the registry
/// holds zero or several delegates.
pub fn resolve_chat_model(
    active: &ActiveProfiles,
    registry: &ChatModelRegistry,
) -> Result<Arc<dyn ChatModel>> {
    if let Some(primary) = select_primary(active, registry)? {
        return Ok(Arc::new(primary));
    }

    tracing::warn!(
        registered = registry.len(),
        "no chat model profile active, falling back to the only configured model"
    );
    registry
        .sole()
        .ok_or(Error::MissingConfiguration("CHAT_PROFILES_ACTIVE"))
}
