//! Platform identifiers.
//!
//! Chat platforms hand out opaque 64-bit snowflakes for users, groups and
//! channels. Each gets its own newtype so a group id can never be passed
//! where a user id is expected.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

snowflake! {
    /// Identifier of a platform user.
    UserId
}

snowflake! {
    /// Identifier of a group (guild / server).
    GroupId
}

snowflake! {
    /// Identifier of a channel.
    ChannelId
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channels display as a platform mention so they stay recognisable when no
/// name is known.
impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<#{}>", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(" 42 ".parse::<GroupId>().unwrap(), GroupId(42));
        assert!("abc".parse::<GroupId>().is_err());
    }

    #[test]
    fn test_channel_display_is_mention() {
        assert_eq!(ChannelId(7).to_string(), "<#7>");
        assert_eq!(UserId(7).to_string(), "7");
    }
}
