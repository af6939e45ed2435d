//! Integer identifiers assigned by the backend

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw backend id
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw backend id
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(i64::from(id))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifies a project (the owner of a board)
    ProjectId
);
define_id!(
    /// Identifies a status, i.e. a board column
    StatusId
);
define_id!(
    /// Identifies a task, i.e. a board card
    TaskId
);
define_id!(
    /// Identifies a user
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_bare_integer() {
        let id = StatusId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: StatusId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "7");
    }
}
