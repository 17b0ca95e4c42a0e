use std::time::Duration;

use serde::{Deserialize, Serialize};


pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8001/";
pub const DEFAULT_JOIN_LINK_HOST: &str = "197.163.56.124";
pub const DEFAULT_JOIN_LINK_PORT: u16 = 8000;
pub const DEFAULT_NOTICE_DELAY: Duration = Duration::from_millis(50);

// What a joining client does with an "init" it receives. Servers differ here: some only answer
// the creating client, others acknowledge the joining one with the same event.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum InitAckPolicy {
    // Treat it exactly like the creating client would: show the join link.
    #[default]
    ShowJoinLink,
    // Acknowledge silently.
    Ignore,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    // Websocket endpoint of the game server.
    pub server_url: String,
    // Where the page is served from. Used only to build the link for the second player, which is
    // why it is separate from `server_url`.
    pub join_link_host: String,
    pub join_link_port: u16,
    // Notices are deferred a little so that the board update triggered by the same message gets
    // painted before a modal alert blocks the page.
    #[serde(with = "humantime_serde")]
    pub notice_delay: Duration,
    pub init_ack_policy: InitAckPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            join_link_host: DEFAULT_JOIN_LINK_HOST.to_owned(),
            join_link_port: DEFAULT_JOIN_LINK_PORT,
            notice_delay: DEFAULT_NOTICE_DELAY,
            init_ack_policy: InitAckPolicy::default(),
        }
    }
}

impl ClientConfig {
    // The ID is embedded verbatim: it is issued by the server and is expected to be URL-safe.
    pub fn join_link(&self, join_id: &str) -> String {
        format!("{}:{}/?join={}", self.join_link_host, self.join_link_port, join_id)
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_join_link() {
        assert_eq!(
            ClientConfig::default().join_link("abc123"),
            "197.163.56.124:8000/?join=abc123"
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"join_link_host": "example.org", "notice_delay": "1s"}"#)
                .unwrap();
        assert_eq!(config, ClientConfig {
            join_link_host: "example.org".to_owned(),
            notice_delay: Duration::from_secs(1),
            ..ClientConfig::default()
        });
        assert_eq!(config.join_link("q"), "example.org:8000/?join=q");
    }

    #[test]
    fn policy_by_name() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"init_ack_policy": "Ignore"}"#).unwrap();
        assert_eq!(config.init_ack_policy, InitAckPolicy::Ignore);
    }
}
