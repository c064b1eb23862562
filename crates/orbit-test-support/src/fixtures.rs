//! Character fixtures.

use orbit_core::record::CharacterRecord;
use serde_json::json;

/// Name of the starter character.
pub const STARTER_NAME: &str = "Kerman";

/// The starter character's full record.
///
/// # Panics
///
/// Panics if the literal below stops being a JSON object.
#[must_use]
pub fn starter_record() -> CharacterRecord {
    CharacterRecord::from_value(json!({
        "name": STARTER_NAME,
        "identity": {
            "gender": "Male",
            "age": 19,
            "appearance": "Rusted cybernetic plating, dusty cloak",
            "personality": "Stoic, analytical, dark humor.",
            "background": "Unknown, for memories are lost",
            "description": "A nobody carrying the weight of the Old World in his chest."
        },
        "stats": {
            "combat": {
                "strength": 5.0,
                "agility": 25.0,
                "athletics": 25.0,
                "melee_attack": 5.0,
                "melee_defence": 5.0,
                "toughness": 10.0,
                "ranged": 2.0
            },
            "utility": {
                "engineer": 20.0,
                "field_medic": 15.0,
                "stealth": 25.0
            }
        },
        "status": {
            "location": "The city of Stout",
            "integrity": 100.0,
            "core_stability": 100.0
        },
        "possession": {
            "inventory": [
                {"item": "Rusted Katana", "type": "Weapon", "weight": 2.0},
                {"item": "Emergency Medkit", "type": "Consumable", "weight": 1.0}
            ]
        }
    }))
    .expect("starter record is an object")
}
