//! Commands for the character context.

use orbit_core::record::CharacterRecord;
use uuid::Uuid;

/// Command to create a new character.
#[derive(Debug, Clone)]
pub struct CreateCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character identifier.
    pub character_id: Uuid,
    /// The character's name.
    pub name: String,
    /// The initial record.
    pub record: CharacterRecord,
}

/// Whether validation errors block applying the accepted operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyPolicy {
    /// Apply only when the outcome has no errors.
    #[default]
    RejectOnError,
    /// Apply whatever passed validation, even if other keys were rejected.
    BestEffort,
}

/// Command to run narrator text through the directive pipeline and apply
/// the result to a character.
#[derive(Debug, Clone)]
pub struct ApplyNarration {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character identifier.
    pub character_id: Uuid,
    /// Raw narrator text, directive blocks included.
    pub text: String,
    /// How to treat a partially rejected outcome.
    pub policy: ApplyPolicy,
}
