//! Acting users and their authorization ranks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordered authorization level of a user.
///
/// The derived `Ord` follows declaration order, so privilege checks
/// reduce to `user.rank >= required_rank`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// Unauthenticated visitor.
    #[default]
    Anonymous,
    /// Authenticated but limited account.
    Restricted,
    /// Ordinary authenticated user.
    Regular,
    /// Trusted user with extended edit rights.
    Power,
    /// Moderation staff.
    Moderator,
    /// Full administrative access.
    Administrator,
}

impl Rank {
    /// Returns the canonical lowercase name of the rank.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Restricted => "restricted",
            Self::Regular => "regular",
            Self::Power => "power",
            Self::Moderator => "moderator",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "anonymous" => Ok(Self::Anonymous),
            "restricted" => Ok(Self::Restricted),
            "regular" => Ok(Self::Regular),
            "power" => Ok(Self::Power),
            "moderator" => Ok(Self::Moderator),
            "administrator" => Ok(Self::Administrator),
            other => Err(format!("unknown rank: {other}")),
        }
    }
}

/// The user a request acts on behalf of.
///
/// Read-only from this service's perspective: account management lives
/// in a separate subsystem. Only the rank participates in authorization;
/// the name is recorded on audit snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account name, or `"anonymous"` for unauthenticated requests.
    pub name: String,
    /// Authorization rank.
    pub rank: Rank,
}

impl User {
    /// Creates a user with the given name and rank.
    #[must_use]
    pub fn new(name: impl Into<String>, rank: Rank) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }

    /// Returns the anonymous user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new("anonymous", Rank::Anonymous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_ordered() {
        assert!(Rank::Anonymous < Rank::Regular);
        assert!(Rank::Regular < Rank::Administrator);
        assert!(Rank::Power < Rank::Moderator);
    }

    #[test]
    fn rank_round_trips_through_str() {
        for rank in [
            Rank::Anonymous,
            Rank::Restricted,
            Rank::Regular,
            Rank::Power,
            Rank::Moderator,
            Rank::Administrator,
        ] {
            assert_eq!(rank.as_str().parse::<Rank>(), Ok(rank));
        }
    }

    #[test]
    fn rank_parse_is_case_insensitive() {
        assert_eq!("REGULAR".parse::<Rank>(), Ok(Rank::Regular));
    }

    #[test]
    fn unknown_rank_is_rejected() {
        assert!("overlord".parse::<Rank>().is_err());
    }

    #[test]
    fn anonymous_user_has_lowest_rank() {
        let user = User::anonymous();
        assert_eq!(user.rank, Rank::Anonymous);
        assert_eq!(user.name, "anonymous");
    }
}
