use serde::{Deserialize, Serialize};

use crate::{
    domain::{Card, CardColor, ConnectionId, RoomId},
    error::ApiError,
};

/// Client → authority intents. Snake-cased variant names are the wire event
/// names (`create_room`, `join_room`, `start_game`, `play_card`,
/// `draw_card`).
///
/// The client performs no legality checks beyond local gating; the authority
/// is free to reject any of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientIntent {
    CreateRoom {
        username: String,
    },
    JoinRoom {
        username: String,
        room_id: RoomId,
    },
    StartGame {
        room_id: RoomId,
    },
    PlayCard {
        room_id: RoomId,
        card: Card,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chosen_color: Option<CardColor>,
    },
    DrawCard {
        room_id: RoomId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub connection_id: ConnectionId,
    pub username: String,
    pub card_count: usize,
}

/// Complete authoritative description of one room at one point in time.
/// Always replaces, never patches, the client's prior render state.
///
/// Waiting-room snapshots omit the in-game fields, exactly as the authority
/// sends them before the game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub players: Vec<PlayerSummary>,
    pub host_connection_id: ConnectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_turn_connection_id: Option<ConnectionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discard_top: Option<Card>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub player_hand: Vec<Card>,
    pub game_started: bool,
    #[serde(default)]
    pub draw_pile_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// Authority → client messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected { connection_id: ConnectionId },
    RoomCreated { room_id: RoomId },
    RoomJoined { room_id: RoomId },
    UpdateGameState { snapshot: GameStateSnapshot },
    Error(ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intents_serialize_with_wire_event_names() {
        let intent = ClientIntent::JoinRoom {
            username: "Bob".to_string(),
            room_id: RoomId::new("4242"),
        };
        let value = serde_json::to_value(&intent).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "join_room",
                "payload": { "username": "Bob", "room_id": "4242" }
            })
        );
    }

    #[test]
    fn play_card_omits_absent_chosen_color() {
        let intent = ClientIntent::PlayCard {
            room_id: RoomId::new("4242"),
            card: Card::new(CardColor::Red, "5"),
            chosen_color: None,
        };
        let value = serde_json::to_value(&intent).expect("serialize");
        assert!(value["payload"].get("chosen_color").is_none());
    }

    #[test]
    fn waiting_room_snapshot_deserializes_without_in_game_fields() {
        let value = json!({
            "type": "update_game_state",
            "payload": {
                "snapshot": {
                    "players": [
                        { "connection_id": "c-1", "username": "Alice", "card_count": 0 }
                    ],
                    "host_connection_id": "c-1",
                    "game_started": false
                }
            }
        });
        let message: ServerMessage = serde_json::from_value(value).expect("deserialize");
        let ServerMessage::UpdateGameState { snapshot } = message else {
            panic!("expected update_game_state");
        };
        assert!(!snapshot.game_started);
        assert!(snapshot.discard_top.is_none());
        assert!(snapshot.current_turn_connection_id.is_none());
        assert!(snapshot.player_hand.is_empty());
        assert_eq!(snapshot.draw_pile_count, 0);
    }
}
