use url::form_urlencoded;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlayerRole {
    // Player 1: opens the connection without a join ID and receives one from the server.
    Creator,
    // Player 2: came in through a join link.
    Joiner,
}

// Parameters the page was loaded with. Read once when connecting, never updated.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SessionParams {
    join: Option<String>,
}

impl SessionParams {
    pub fn new(join: Option<String>) -> Self { SessionParams { join } }

    // Accepts `window.location.search` as is, i.e. with or without the leading '?'.
    // Anything that does not decode into a `join` pair means "no join ID"; this never fails.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let join = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "join")
            .map(|(_, value)| value.into_owned());
        SessionParams { join }
    }

    // Same as `from_query`, but for a full page URL. Unparseable URLs carry no join ID.
    pub fn from_page_url(page_url: &str) -> Self {
        match url::Url::parse(page_url) {
            Ok(url) => Self::from_query(url.query().unwrap_or("")),
            Err(err) => {
                log::warn!("Ignoring malformed page URL {page_url:?}: {err}");
                Self::default()
            }
        }
    }

    pub fn join(&self) -> Option<&str> { self.join.as_deref() }

    pub fn role(&self) -> PlayerRole {
        if self.join.is_some() { PlayerRole::Joiner } else { PlayerRole::Creator }
    }
}
