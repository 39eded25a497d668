//! Protocol Messages
//!
//! Wire format for client-server communication over WebSocket. All
//! messages are JSON envelopes tagged by a `type` field, matching the
//! server's original camelCase names (`newPlayer`, `move`,
//! `updateGameState`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire value for a join sent before the local player has a cell.
pub const UNPLACED_POSITION: i64 = -1;

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join announcement: sent once on channel open, and again on a
    /// fresh join flow once a username is confirmed.
    NewPlayer {
        /// Claimed player name.
        username: String,
        /// Current cell, or [`UNPLACED_POSITION`] when unspawned.
        position: i64,
        /// Chosen color identifier.
        color: String,
    },

    /// Claim of a new position after a locally accepted move.
    Move {
        /// Moving player's name.
        username: String,
        /// The new position being claimed.
        position: u32,
    },
}

impl ClientMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// One player's entry in an authoritative snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Cell index.
    pub position: u32,
    /// Color identifier.
    pub color: String,
}

/// Full authoritative game state.
///
/// An absent or null `ballPosition` means the ball is off-board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    /// All players, keyed by username. Absence means departure.
    #[serde(default)]
    pub players: BTreeMap<String, PlayerSnapshot>,
    /// The ball's cell, if on-board.
    #[serde(default)]
    pub ball_position: Option<u32>,
}

/// Messages received from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full snapshot replacing the local players collection and ball.
    UpdateGameState(GameStateSnapshot),
}

impl ServerMessage {
    /// The `type` values this client understands.
    pub const KNOWN_TYPES: &'static [&'static str] = &["updateGameState"];

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse an inbound envelope, distinguishing unknown message types
    /// (forward-compatible no-op) from malformed payloads.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        match serde_json::from_str::<ServerMessage>(text) {
            Ok(message) => Ok(message),
            Err(err) => {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
                    if let Some(kind) = value.get("type").and_then(serde_json::Value::as_str) {
                        if !Self::KNOWN_TYPES.contains(&kind) {
                            return Err(ProtocolError::UnknownType(kind.to_owned()));
                        }
                    }
                }
                Err(ProtocolError::Malformed(err))
            }
        }
    }
}

/// Why an inbound payload was not applied.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Valid envelope with a `type` this client does not recognize.
    /// Non-fatal: logged and ignored.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// Payload failed to parse. Non-fatal: logged, prior state retained.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_wire_shape() {
        let msg = ClientMessage::NewPlayer {
            username: "alice".into(),
            position: 42,
            color: "#a1b2c3".into(),
        };
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"newPlayer\""));
        assert!(json.contains("\"username\":\"alice\""));
        assert!(json.contains("\"position\":42"));
        assert!(json.contains("\"color\":\"#a1b2c3\""));
    }

    #[test]
    fn test_new_player_placeholder_position() {
        let msg = ClientMessage::NewPlayer {
            username: "alice".into(),
            position: UNPLACED_POSITION,
            color: "#fff".into(),
        };
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"position\":-1"));
    }

    #[test]
    fn test_move_wire_shape() {
        let msg = ClientMessage::Move {
            username: "alice".into(),
            position: 17,
        };
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"move\""));
        assert!(json.contains("\"position\":17"));
    }

    #[test]
    fn test_parse_update_game_state() {
        let text = r##"{"type":"updateGameState","players":{"alice":{"position":3,"color":"#fff"}},"ballPosition":7}"##;
        let ServerMessage::UpdateGameState(snapshot) = ServerMessage::parse(text).unwrap();
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.players["alice"].position, 3);
        assert_eq!(snapshot.players["alice"].color, "#fff");
        assert_eq!(snapshot.ball_position, Some(7));
    }

    #[test]
    fn test_parse_absent_ball_position_is_off_board() {
        let text = r#"{"type":"updateGameState","players":{}}"#;
        let ServerMessage::UpdateGameState(snapshot) = ServerMessage::parse(text).unwrap();
        assert_eq!(snapshot.ball_position, None);

        let text = r#"{"type":"updateGameState","players":{},"ballPosition":null}"#;
        let ServerMessage::UpdateGameState(snapshot) = ServerMessage::parse(text).unwrap();
        assert_eq!(snapshot.ball_position, None);
    }

    #[test]
    fn test_parse_absent_players_is_empty() {
        let text = r#"{"type":"updateGameState"}"#;
        let ServerMessage::UpdateGameState(snapshot) = ServerMessage::parse(text).unwrap();
        assert!(snapshot.players.is_empty());
    }

    #[test]
    fn test_parse_unknown_type() {
        let text = r#"{"type":"ballMoving","moving":true}"#;
        match ServerMessage::parse(text) {
            Err(ProtocolError::UnknownType(kind)) => assert_eq!(kind, "ballMoving"),
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed_payloads() {
        // Invalid JSON.
        assert!(matches!(
            ServerMessage::parse("{not json"),
            Err(ProtocolError::Malformed(_))
        ));
        // Valid JSON without a type tag.
        assert!(matches!(
            ServerMessage::parse(r#"{"players":{}}"#),
            Err(ProtocolError::Malformed(_))
        ));
        // Known type with fields of the wrong shape.
        assert!(matches!(
            ServerMessage::parse(r#"{"type":"updateGameState","players":3}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn test_server_message_roundtrip() {
        let mut players = BTreeMap::new();
        players.insert(
            "bob".to_owned(),
            PlayerSnapshot {
                position: 9,
                color: "#0f0".into(),
            },
        );
        let msg = ServerMessage::UpdateGameState(GameStateSnapshot {
            players,
            ball_position: Some(5),
        });

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"ballPosition\":5"));
        let parsed = ServerMessage::parse(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
