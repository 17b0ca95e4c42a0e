use serde::{Deserialize, Deserializer, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::error::ProtocolError;


// Wire format: a JSON object discriminated by the `type` field. Server and client share the
// tag names ("init", "play") but not the payloads, hence two separate enums.

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    // Game created. The creating client gets the ID to share with the second player.
    Init {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        join: Option<String>,
    },
    // A piece has landed. Coordinates are the resolved placement, row 0 being the bottom.
    Play {
        #[serde(deserialize_with = "player_id")]
        player: String,
        column: u32,
        row: u32,
    },
    Win {
        #[serde(deserialize_with = "player_id")]
        player: String,
    },
    Error {
        message: String,
    },
    #[serde(rename = "player joined")]
    PlayerJoined,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientEvent {
    Init {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        join: Option<String>,
    },
    Play {
        column: u32,
    },
}

// Servers differ in whether player IDs are strings ("1") or numbers (1). Both mean the same
// player and are kept as text.
fn player_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PlayerId {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match PlayerId::deserialize(deserializer)? {
        PlayerId::Text(id) => id,
        PlayerId::Number(id) => id.to_string(),
    })
}

// All tags a server is allowed to send. Checked before payload decoding so that an unknown
// `type` is reported as such rather than as a generic serde error.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumString, IntoStaticStr)]
pub enum ServerEventKind {
    #[strum(serialize = "init")]
    Init,
    #[strum(serialize = "play")]
    Play,
    #[strum(serialize = "win")]
    Win,
    #[strum(serialize = "error")]
    Error,
    #[strum(serialize = "player joined")]
    PlayerJoined,
}

impl ServerEvent {
    pub fn kind(&self) -> ServerEventKind {
        match self {
            ServerEvent::Init { .. } => ServerEventKind::Init,
            ServerEvent::Play { .. } => ServerEventKind::Play,
            ServerEvent::Win { .. } => ServerEventKind::Win,
            ServerEvent::Error { .. } => ServerEventKind::Error,
            ServerEvent::PlayerJoined => ServerEventKind::PlayerJoined,
        }
    }

    pub fn from_json(s: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|err| ProtocolError::Decode(err.to_string()))?;
        let Some(tag) = value.get("type") else {
            return Err(ProtocolError::Decode("missing \"type\" field".to_owned()));
        };
        let Some(tag) = tag.as_str() else {
            return Err(ProtocolError::Decode(format!("\"type\" is not a string: {tag}")));
        };
        if tag.parse::<ServerEventKind>().is_err() {
            return Err(ProtocolError::UnsupportedEventType(tag.to_owned()));
        }
        serde_json::from_value(value).map_err(|err| ProtocolError::Decode(err.to_string()))
    }

    pub fn to_json(&self) -> String {
        // Serializing a tagged enum of strings and integers cannot fail.
        serde_json::to_string(self).unwrap()
    }
}

impl ClientEvent {
    pub fn from_json(s: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(s).map_err(|err| ProtocolError::Decode(err.to_string()))
    }

    pub fn to_json(&self) -> String { serde_json::to_string(self).unwrap() }
}

impl ServerEventKind {
    pub fn tag(self) -> &'static str { self.into() }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn client_init_omits_absent_join() {
        assert_eq!(ClientEvent::Init { join: None }.to_json(), r#"{"type":"init"}"#);
        assert_eq!(
            ClientEvent::Init { join: Some("abc".to_owned()) }.to_json(),
            r#"{"type":"init","join":"abc"}"#
        );
    }

    #[test]
    fn client_play_shape() {
        assert_eq!(ClientEvent::Play { column: 3 }.to_json(), r#"{"type":"play","column":3}"#);
    }

    #[test]
    fn player_joined_tag_has_a_space() {
        assert_eq!(ServerEvent::PlayerJoined.to_json(), r#"{"type":"player joined"}"#);
        assert_eq!(
            ServerEvent::from_json(r#"{"type":"player joined"}"#).unwrap(),
            ServerEvent::PlayerJoined
        );
    }

    #[test]
    fn kind_matches_tag() {
        for event in [
            ServerEvent::Init { join: None },
            ServerEvent::Play { player: "1".to_owned(), column: 0, row: 0 },
            ServerEvent::Win { player: "1".to_owned() },
            ServerEvent::Error { message: "oops".to_owned() },
            ServerEvent::PlayerJoined,
        ] {
            let value: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
            assert_eq!(value["type"], event.kind().tag());
        }
    }

    #[test]
    fn unknown_tag_is_not_a_decode_error() {
        assert_eq!(
            ServerEvent::from_json(r#"{"type":"bogus"}"#),
            Err(ProtocolError::UnsupportedEventType("bogus".to_owned()))
        );
    }

    #[test]
    fn malformed_messages() {
        for message in [
            "not json",
            "[1, 2]",
            r#"{"column": 2}"#,
            r#"{"type": 5}"#,
            r#"{"type":"play","player":"1","column":"two","row":0}"#,
            r#"{"type":"win"}"#,
            r#"{"type":"play","player":"1","column":-1,"row":0}"#,
            r#"{"type":"win","player":true}"#,
            r#"{"type":"win","player":null}"#,
        ] {
            assert!(
                matches!(ServerEvent::from_json(message), Err(ProtocolError::Decode(_))),
                "{message}"
            );
        }
    }

    #[test]
    fn extra_fields_are_tolerated() {
        assert_eq!(
            ServerEvent::from_json(r#"{"type":"win","player":"2","reason":"four in a row"}"#)
                .unwrap(),
            ServerEvent::Win { player: "2".to_owned() }
        );
    }

    #[test]
    fn numeric_player_ids_are_accepted() {
        assert_eq!(
            ServerEvent::from_json(r#"{"type":"win","player":2}"#).unwrap(),
            ServerEvent::Win { player: "2".to_owned() }
        );
        assert_eq!(
            ServerEvent::from_json(r#"{"type":"play","player":1,"column":3,"row":0}"#).unwrap(),
            ServerEvent::Play { player: "1".to_owned(), column: 3, row: 0 }
        );
    }
}
