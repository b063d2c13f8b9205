//! Registry mapping type ids to capability handlers.

use std::sync::Arc;

use zia_core::{Capability, CapabilityHandler};

use crate::{Result, RoutingError};

/// Markers that would break the prompt structure if they appeared in a description.
const FORBIDDEN_DESCRIPTION_MARKERS: [&str; 2] = ["```", "~~~"];

/// One registered capability.
#[derive(Clone)]
pub struct RegistryEntry {
    type_id: String,
    description: String,
    handler: Arc<dyn CapabilityHandler>,
}

impl RegistryEntry {
    /// Type id the handler is registered under.
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Description shown to the oracle.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The handler itself.
    pub fn handler(&self) -> &Arc<dyn CapabilityHandler> {
        &self.handler
    }
}

/// Immutable set of handlers, safe to share across concurrent dispatches.
///
/// Built in one step by [`RegistryBuilder`]; entries keep registration order
/// so prompts and diagnostics list types consistently.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Arc<Vec<RegistryEntry>>,
}

impl Registry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Exact-match lookup.
    #[must_use]
    pub fn get(&self, type_id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.type_id == type_id)
    }

    /// Whether `type_id` is registered.
    #[must_use]
    pub fn contains(&self, type_id: &str) -> bool {
        self.get(type_id).is_some()
    }

    /// All registered type ids, in registration order.
    #[must_use]
    pub fn type_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.type_id.clone())
            .collect()
    }

    /// All entries, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Get number of registered handlers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects registrations and validates them before the registry is sealed.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
}

impl RegistryBuilder {
    /// Registers `handler` under `type_id`, using the handler's description.
    ///
    /// # Errors
    /// Returns an error if the type id is already taken, is empty or contains
    /// whitespace, or if the description is empty, spans several lines, or
    /// contains a code fence marker.
    pub fn register(
        mut self,
        type_id: impl Into<String>,
        handler: Arc<dyn CapabilityHandler>,
    ) -> Result<Self> {
        let type_id = type_id.into();
        let description = handler.description().trim().to_owned();

        validate_type_id(&type_id)?;
        validate_description(&type_id, &description)?;

        if self.entries.iter().any(|entry| entry.type_id == type_id) {
            return Err(RoutingError::DuplicateType(type_id));
        }

        self.entries.push(RegistryEntry {
            type_id,
            description,
            handler,
        });
        Ok(self)
    }

    /// Registers a built-in capability.
    ///
    /// # Errors
    /// Same conditions as [`RegistryBuilder::register`].
    pub fn register_capability(
        self,
        capability: Capability,
        handler: Arc<dyn CapabilityHandler>,
    ) -> Result<Self> {
        self.register(capability.as_str(), handler)
    }

    /// Seals the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            entries: Arc::new(self.entries),
        }
    }
}

fn validate_type_id(type_id: &str) -> Result<()> {
    if type_id.is_empty() || type_id.chars().any(char::is_whitespace) {
        return Err(RoutingError::InvalidRegistration {
            type_id: type_id.to_owned(),
            reason: "type id must be non-empty and contain no whitespace".to_owned(),
        });
    }
    Ok(())
}

fn validate_description(type_id: &str, description: &str) -> Result<()> {
    let reason = if description.is_empty() {
        Some("description is empty")
    } else if description.contains(['\n', '\r']) {
        Some("description must be a single line")
    } else if FORBIDDEN_DESCRIPTION_MARKERS
        .iter()
        .any(|marker| description.contains(marker))
    {
        Some("description contains a code fence marker")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RoutingError::InvalidRegistration {
            type_id: type_id.to_owned(),
            reason: reason.to_owned(),
        }),
        None => Ok(()),
    }
}
