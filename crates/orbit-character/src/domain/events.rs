//! Domain events for the character context.

use orbit_core::event::{DomainEvent, EventMetadata};
use orbit_core::mutation::Mutation;
use orbit_core::record::CharacterRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when a character is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterCreated {
    /// The character identifier.
    pub character_id: Uuid,
    /// The character's name.
    pub name: String,
    /// The initial record.
    pub record: CharacterRecord,
}

/// Emitted when validated narrator directives are applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectivesApplied {
    /// The character identifier.
    pub character_id: Uuid,
    /// The merged increments and sets.
    pub mutation: Mutation,
}

/// Event payload variants for the character context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CharacterEventKind {
    /// A character has been created.
    CharacterCreated(CharacterCreated),
    /// Directives have been applied to a character record.
    DirectivesApplied(DirectivesApplied),
}

/// Domain event envelope for the character context.
#[derive(Debug, Clone)]
pub struct CharacterEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: CharacterEventKind,
}

impl CharacterEventKind {
    /// Stable type name used for routing stored events.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CharacterCreated(_) => "character.character_created",
            Self::DirectivesApplied(_) => "character.directives_applied",
        }
    }
}

impl DomainEvent for CharacterEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("CharacterEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
