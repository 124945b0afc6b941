//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash`; ordering by id is the canonical
//! iteration order everywhere determinism matters.  The inner integer is
//! `pub` so arenas can index with `id.0 as usize`, but prefer `.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Stable handle of an agent in the environment arena.  Never reused
    /// after removal, so a handle can't silently alias a newer agent.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a convex room in a navigation graph.
    pub struct RoomId(u32);
}

typed_id! {
    /// Index of a directed door (room-to-room crossing) in a navigation graph.
    pub struct DoorId(u32);
}
