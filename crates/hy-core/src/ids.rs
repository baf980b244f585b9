//! Typed handles for automaton objects.
//!
//! Each handle wraps a `NonZeroU32` holding `slot + 1`, so `Option<ModeId>`
//! costs no more than `ModeId` and a mode handle can never be passed where a
//! transition handle is expected.

use core::fmt;
use core::num::NonZeroU32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Handle for the object stored at `slot` (0-based).
            pub fn from_index(slot: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(slot))
            }

            /// 0-based position in declaration order.
            pub fn index(self) -> u32 {
                self.0.get() - 1
            }

            /// Same as [`Self::index`], ready for slice indexing.
            pub fn slot(self) -> usize {
                self.index() as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{}"), self.index())
            }
        }
    };
}

define_id!(
    /// Handle of a mode inside one automaton.
    ModeId,
    "mode"
);

define_id!(
    /// Handle of a transition inside one automaton; also its firing priority
    /// among the transitions sharing a source mode.
    TransitionId,
    "transition"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_survive_the_offset_encoding() {
        for slot in [0_u32, 3, 77, u32::MAX - 1] {
            let mode = ModeId::from_index(slot);
            assert_eq!(mode.index(), slot);
            assert_eq!(mode.slot(), slot as usize);
        }
        assert!(TransitionId::from_index(1) > TransitionId::from_index(0));
    }

    #[test]
    fn handles_render_with_their_kind() {
        assert_eq!(ModeId::from_index(2).to_string(), "mode #2");
        assert_eq!(format!("{:?}", TransitionId::from_index(0)), "TransitionId(0)");
    }

    #[test]
    fn optional_handles_are_niche_packed() {
        assert_eq!(size_of::<Option<ModeId>>(), size_of::<u32>());
    }
}
