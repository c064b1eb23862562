//! Query handlers for the character context.
//!
//! Queries reconstitute the aggregate from stored events and return
//! read-only view DTOs.

use orbit_core::error::DomainError;
use orbit_core::repository::EventRepository;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::application::command_handlers;

/// Location shown when the record has none.
pub const UNKNOWN_LOCATION: &str = "Unknown Sector";

/// Read-only view of a character aggregate.
#[derive(Debug, Serialize)]
pub struct CharacterView {
    /// The character identifier.
    pub character_id: Uuid,
    /// The character's name.
    pub name: String,
    /// The full record.
    pub record: Value,
    /// Current version (event count).
    pub version: i64,
}

/// The summary shown when a game screen first loads.
#[derive(Debug, Serialize)]
pub struct CharacterOverview {
    /// The character identifier.
    pub character_id: Uuid,
    /// The `stats` subtree, or an empty object.
    pub stats: Value,
    /// `status.location` when it is a string.
    pub location: String,
    /// The `identity` subtree, or an empty object.
    pub identity: Value,
}

/// Retrieves a character by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_character_by_id(
    character_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<CharacterView, DomainError> {
    let character = command_handlers::load_character(character_id, repo).await?;
    Ok(CharacterView {
        character_id,
        name: character.name().unwrap_or_default().to_owned(),
        record: character.record().to_value(),
        version: character.version,
    })
}

/// Retrieves the overview of a character.
///
/// # Errors
///
/// As [`get_character_by_id`].
pub async fn get_character_overview(
    character_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<CharacterOverview, DomainError> {
    let character = command_handlers::load_character(character_id, repo).await?;
    let record = character.record();
    let subtree = |path: &str| {
        record
            .lookup(path)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    };
    Ok(CharacterOverview {
        character_id,
        stats: subtree("stats"),
        location: record
            .lookup("status.location")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_LOCATION)
            .to_owned(),
        identity: subtree("identity"),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use orbit_core::error::DomainError;
    use orbit_core::record::CharacterRecord;
    use orbit_core::repository::StoredEvent;
    use serde_json::json;
    use uuid::Uuid;

    use crate::application::query_handlers::{
        UNKNOWN_LOCATION, get_character_by_id, get_character_overview,
    };
    use crate::domain::events::{CharacterCreated, CharacterEventKind, DirectivesApplied};
    use orbit_core::mutation::Mutation;
    use orbit_test_support::{EmptyEventRepository, RecordingEventRepository, starter_record};

    fn stored(character_id: Uuid, sequence_number: i64, kind: &CharacterEventKind) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: character_id,
            event_type: kind.event_type().to_owned(),
            payload: serde_json::to_value(kind).unwrap(),
            sequence_number,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    fn created(character_id: Uuid, record: CharacterRecord) -> StoredEvent {
        stored(
            character_id,
            1,
            &CharacterEventKind::CharacterCreated(CharacterCreated {
                character_id,
                name: "Kerman".to_owned(),
                record,
            }),
        )
    }

    #[tokio::test]
    async fn test_get_character_by_id_replays_directives() {
        // Arrange
        let character_id = Uuid::new_v4();
        let mut mutation = Mutation::default();
        mutation.increments.insert("stats.combat.strength".to_owned(), 2.0);
        let events = vec![
            created(character_id, starter_record()),
            stored(
                character_id,
                2,
                &CharacterEventKind::DirectivesApplied(DirectivesApplied {
                    character_id,
                    mutation,
                }),
            ),
        ];
        let repo = RecordingEventRepository::new(events);

        // Act
        let view = get_character_by_id(character_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.character_id, character_id);
        assert_eq!(view.name, "Kerman");
        assert_eq!(view.version, 2);
        assert_eq!(view.record["stats"]["combat"]["strength"], json!(7.0));
    }

    #[tokio::test]
    async fn test_get_character_by_id_returns_not_found_when_no_events() {
        // Arrange
        let character_id = Uuid::new_v4();

        // Act
        let result = get_character_by_id(character_id, &EmptyEventRepository).await;

        // Assert
        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, character_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_character_overview_reads_subtrees() {
        // Arrange
        let character_id = Uuid::new_v4();
        let repo = RecordingEventRepository::new(vec![created(character_id, starter_record())]);

        // Act
        let overview = get_character_overview(character_id, &repo).await.unwrap();

        // Assert
        assert_eq!(overview.location, "The city of Stout");
        assert_eq!(overview.stats["utility"]["stealth"], json!(25.0));
        assert_eq!(overview.identity["age"], json!(19));
    }

    #[tokio::test]
    async fn test_get_character_overview_defaults_missing_fields() {
        // Arrange
        let character_id = Uuid::new_v4();
        let bare = CharacterRecord::from_value(json!({"name": "Kerman"})).unwrap();
        let repo = RecordingEventRepository::new(vec![created(character_id, bare)]);

        // Act
        let overview = get_character_overview(character_id, &repo).await.unwrap();

        // Assert
        assert_eq!(overview.location, UNKNOWN_LOCATION);
        assert_eq!(overview.stats, json!({}));
        assert_eq!(overview.identity, json!({}));
    }
}
