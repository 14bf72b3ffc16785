use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(TodoId);

/// PostgREST ordering for the initial listing: newest rows first.
pub const LISTING_ORDER: &str = "created_at.desc";

/// Default table holding task rows.
pub const TODOS_TABLE: &str = "todos";

/// Shown in place of the list when there are no tasks.
pub const EMPTY_STATE_MESSAGE: &str = "No tasks yet";

/// Placeholder of the new-task text input.
pub const INPUT_PLACEHOLDER: &str = "new task text";
