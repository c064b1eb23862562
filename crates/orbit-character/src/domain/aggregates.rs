//! Aggregate roots for the character context.

use orbit_core::aggregate::AggregateRoot;
use orbit_core::error::DomainError;
use orbit_core::event::{Clock, EventMetadata};
use orbit_core::mutation::Mutation;
use orbit_core::record::CharacterRecord;
use tracing::warn;
use uuid::Uuid;

use super::events::{CharacterCreated, CharacterEvent, CharacterEventKind, DirectivesApplied};

/// The aggregate root for a character.
#[derive(Debug)]
pub struct Character {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// The character's name, set on creation.
    pub(crate) name: Option<String>,
    /// The character record as of the last applied event.
    pub(crate) record: CharacterRecord,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<CharacterEvent>,
}

impl Character {
    /// Creates an empty, not yet created character.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            name: None,
            record: CharacterRecord::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// The current record.
    #[must_use]
    pub fn record(&self) -> &CharacterRecord {
        &self.record
    }

    /// The character's name, if created.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Creates the character, producing a `CharacterCreated` event.
    pub fn create(
        &mut self,
        name: String,
        record: CharacterRecord,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        let kind = CharacterEventKind::CharacterCreated(CharacterCreated {
            character_id: self.id,
            name,
            record,
        });
        self.record_event(kind, correlation_id, clock);
    }

    /// Applies a validated mutation, producing a `DirectivesApplied` event.
    ///
    /// The mutation is tried against a copy of the record first, so an event
    /// is only produced for a mutation that replays cleanly.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the record cannot take the
    /// mutation, such as an increment on a text field.
    pub fn apply_directives(
        &mut self,
        mutation: Mutation,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let mut staged = self.record.clone();
        staged
            .apply(&mutation)
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        let kind = CharacterEventKind::DirectivesApplied(DirectivesApplied {
            character_id: self.id,
            mutation,
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    fn record_event(&mut self, kind: CharacterEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let metadata = EventMetadata::for_command(
            kind.event_type(),
            self.id,
            self.next_sequence_number(),
            correlation_id,
            clock,
        );
        self.uncommitted_events
            .push(CharacterEvent { metadata, kind });
    }
}

impl AggregateRoot for Character {
    type Event = CharacterEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            CharacterEventKind::CharacterCreated(payload) => {
                self.name = Some(payload.name.clone());
                self.record = payload.record.clone();
            }
            CharacterEventKind::DirectivesApplied(payload) => {
                if let Err(e) = self.record.apply(&payload.mutation) {
                    warn!(
                        character_id = %self.id,
                        sequence_number = event.metadata.sequence_number,
                        error = %e,
                        "skipping directives that no longer fit the record"
                    );
                }
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use orbit_core::event::DomainEvent;
    use orbit_test_support::{FixedClock, starter_record};
    use serde_json::json;

    fn created(id: Uuid) -> Character {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let mut character = Character::new(id);
        character.create("Kerman".to_owned(), starter_record(), Uuid::new_v4(), &clock);
        let event = character.uncommitted_events()[0].clone();
        character.apply(&event);
        character.clear_uncommitted_events();
        character
    }

    #[test]
    fn test_create_produces_character_created_event() {
        // Arrange
        let character_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let clock = FixedClock(fixed_now);
        let mut character = Character::new(character_id);

        // Act
        character.create("Kerman".to_owned(), starter_record(), correlation_id, &clock);

        // Assert
        let events = character.uncommitted_events();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.event_type(), "character.character_created");

        let meta = event.metadata();
        assert_eq!(meta.aggregate_id, character_id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.causation_id, correlation_id);
        assert_eq!(meta.occurred_at, fixed_now);

        match &event.kind {
            CharacterEventKind::CharacterCreated(payload) => {
                assert_eq!(payload.character_id, character_id);
                assert_eq!(payload.name, "Kerman");
            }
            other => panic!("expected CharacterCreated, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_directives_produces_event_and_replays() {
        // Arrange
        let mut character = created(Uuid::new_v4());
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 11, 0, 0).unwrap());
        let mut mutation = Mutation::default();
        mutation.increments.insert("status.integrity".to_owned(), -25.0);
        mutation
            .sets
            .insert("status.location".to_owned(), json!("Squin"));

        // Act
        character
            .apply_directives(mutation, Uuid::new_v4(), &clock)
            .unwrap();
        let event = character.uncommitted_events()[0].clone();
        character.apply(&event);

        // Assert
        assert_eq!(event.event_type(), "character.directives_applied");
        assert_eq!(event.metadata().sequence_number, 2);
        assert_eq!(character.version(), 2);
        assert_eq!(character.record().number_at("status.integrity"), Some(75.0));
        assert_eq!(
            character.record().lookup("status.location"),
            Some(&json!("Squin"))
        );
    }

    #[test]
    fn test_apply_directives_rejects_shape_conflict_without_event() {
        // Arrange
        let mut character = created(Uuid::new_v4());
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 11, 0, 0).unwrap());
        let mut mutation = Mutation::default();
        mutation.increments.insert("name.length".to_owned(), 1.0);

        // Act
        let result = character.apply_directives(mutation, Uuid::new_v4(), &clock);

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(character.uncommitted_events().is_empty());
    }
}
