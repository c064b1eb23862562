//! Command handlers for the character context.
//!
//! Each handler loads the aggregate, executes the command, and persists the
//! resulting events.

use orbit_core::aggregate::AggregateRoot;
use orbit_core::error::DomainError;
use orbit_core::event::Clock;
use orbit_core::repository::{EventRepository, StoredEvent};
use orbit_directives::{NarrationValidator, ValidationOutcome};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::aggregates::Character;
use crate::domain::commands::{ApplyNarration, ApplyPolicy, CreateCharacter};
use crate::domain::events::{CharacterEvent, CharacterEventKind};

/// What handling an `ApplyNarration` command produced.
#[derive(Debug)]
pub struct NarrationResult {
    /// The full pipeline outcome, cleaned text included.
    pub outcome: ValidationOutcome,
    /// Whether the merged operations were applied to the record.
    pub applied: bool,
    /// Events persisted by this command.
    pub stored_events: Vec<StoredEvent>,
}

impl NarrationResult {
    /// The narrator text with every directive block removed.
    #[must_use]
    pub fn cleaned_text(&self) -> &str {
        &self.outcome.cleaned_text
    }
}

/// Reconstitutes a `Character` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    character_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Character, DomainError> {
    let mut character = Character::new(character_id);
    for stored in existing_events {
        let kind: CharacterEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = CharacterEvent {
            metadata: stored.metadata(),
            kind,
        };
        character.apply(&event);
    }
    Ok(character)
}

/// Loads a character, failing when its stream is empty.
pub(crate) async fn load_character(
    character_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Character, DomainError> {
    let stored_events = repo.load_events(character_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(character_id));
    }
    reconstitute(character_id, &stored_events)
}

async fn persist(
    character: &mut Character,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = character
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_event)
        .collect();

    repo.append_events(character.id, character.version(), &stored_events)
        .await?;
    character.clear_uncommitted_events();

    Ok(stored_events)
}

/// Handles the `CreateCharacter` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty name, otherwise any error
/// from appending events.
#[instrument(skip_all, fields(character_id = %command.character_id))]
pub async fn handle_create_character(
    command: &CreateCharacter,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    if command.name.trim().is_empty() {
        return Err(DomainError::Validation(
            "character name must not be empty".into(),
        ));
    }

    let mut character = Character::new(command.character_id);
    character.create(
        command.name.clone(),
        command.record.clone(),
        command.correlation_id,
        clock,
    );

    let stored_events = persist(&mut character, repo).await?;
    info!(name = %command.name, "character created");
    Ok(stored_events)
}

/// Handles the `ApplyNarration` command: validates the narrator text against
/// the character's current record and applies the merged operations when the
/// apply policy allows it.
///
/// A `DirectivesApplied` event is only persisted when there is something to
/// apply; pipeline errors and warnings are reported in the returned outcome.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown character,
/// `DomainError::Validation` if the record cannot take the mutation,
/// `DomainError::ConcurrencyConflict` if the stream moved underneath us, and
/// any other repository error.
#[instrument(skip_all, fields(character_id = %command.character_id))]
pub async fn handle_apply_narration(
    command: &ApplyNarration,
    validator: &NarrationValidator,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<NarrationResult, DomainError> {
    let mut character = load_character(command.character_id, repo).await?;

    let outcome = validator.validate(&command.text, Some(character.record()));

    for warning in &outcome.warnings {
        warn!(%warning, "directive clamped");
    }
    for error in &outcome.errors {
        warn!(%error, "directive rejected");
    }

    let allowed = match command.policy {
        ApplyPolicy::RejectOnError => outcome.ok,
        ApplyPolicy::BestEffort => true,
    };
    let mutation = outcome.mutation();

    if !allowed || mutation.is_empty() {
        info!(
            ok = outcome.ok,
            paths = mutation.len(),
            "narration left record unchanged"
        );
        return Ok(NarrationResult {
            outcome,
            applied: false,
            stored_events: Vec::new(),
        });
    }

    let paths = mutation.len();
    character.apply_directives(mutation, command.correlation_id, clock)?;
    let stored_events = persist(&mut character, repo).await?;
    info!(paths, "narration applied");

    Ok(NarrationResult {
        outcome,
        applied: true,
        stored_events,
    })
}
