//! Player Identity
//!
//! Username validation plus the two identity collaborator seams: the
//! one-shot identity input (fresh join) and the persisted identity used
//! when rejoining after a dropped channel.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Environment variable consulted by [`EnvIdentity`].
pub const USERNAME_ENV_VAR: &str = "GRIDBALL_USERNAME";

/// A validated player name: non-empty after trimming.
///
/// Players are keyed by username, so `Ord` is derived for use in the
/// store's `BTreeMap`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// The validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rejection of an empty or whitespace-only username.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("username must be non-empty after trimming")]
pub struct InvalidUsername;

impl FromStr for Username {
    type Err = InvalidUsername;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(InvalidUsername)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }
}

impl TryFrom<String> for Username {
    type Error = InvalidUsername;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies a validated username and a freshly chosen color, exactly
/// once per session. Returns `None` after the first call.
pub trait IdentityProvider {
    /// The one-shot identity, or `None` if unavailable or already supplied.
    fn identity(&mut self) -> Option<(Username, String)>;
}

/// Persistence collaborator: a previously chosen username, available
/// synchronously before a rejoin message is sent.
pub trait StoredIdentity {
    /// The persisted username, if any.
    fn stored_username(&self) -> Option<Username>;
}

/// Identity backed by the `GRIDBALL_USERNAME` environment variable.
#[derive(Debug, Default)]
pub struct EnvIdentity {
    supplied: bool,
}

impl EnvIdentity {
    /// Create a fresh provider.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityProvider for EnvIdentity {
    fn identity(&mut self) -> Option<(Username, String)> {
        if self.supplied {
            return None;
        }
        self.supplied = true;
        let username = self.stored_username()?;
        let color = random_color(&mut rand::thread_rng());
        Some((username, color))
    }
}

impl StoredIdentity for EnvIdentity {
    fn stored_username(&self) -> Option<Username> {
        std::env::var(USERNAME_ENV_VAR).ok()?.parse().ok()
    }
}

/// Pick a random `#rrggbb` color identifier.
pub fn random_color<R: Rng>(rng: &mut R) -> String {
    let rgb: [u8; 3] = rng.gen();
    format!("#{}", hex::encode(rgb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_trims_whitespace() {
        let username: Username = "  alice  ".parse().unwrap();
        assert_eq!(username.as_str(), "alice");
    }

    #[test]
    fn test_username_rejects_empty() {
        assert_eq!("".parse::<Username>(), Err(InvalidUsername));
        assert_eq!("   ".parse::<Username>(), Err(InvalidUsername));
        assert_eq!("\t\n".parse::<Username>(), Err(InvalidUsername));
    }

    #[test]
    fn test_username_serde_enforces_validation() {
        let ok: Result<Username, _> = serde_json::from_str("\"bob\"");
        assert_eq!(ok.unwrap().as_str(), "bob");

        let bad: Result<Username, _> = serde_json::from_str("\"  \"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_random_color_format() {
        let mut rng = rand::thread_rng();
        for _ in 0..16 {
            let color = random_color(&mut rng);
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
