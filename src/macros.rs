#![allow(unused_macros)]

/// Declares a typed arena index.
///
/// Each identifier is a `u32` newtype that is only ever minted by the arena owning the
/// corresponding elements, so two ids of different kinds can never be mixed up.
///
/// ```rust, ignore
///  arena_id!(
///      /// Identifies a method definition
///      MethodId
///  );
/// ```
macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Returns the position of the element inside its arena.
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl crate::metadata::typesystem::arena::ArenaId for $name {
            fn from_index(index: usize) -> Self {
                $name(u32::try_from(index).unwrap_or(u32::MAX))
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

/// Reads a big-endian value from a [`crate::file::Buffer`] or [`crate::file::Parser`] and
/// converts it to `usize`.
///
/// ```rust, ignore
///  let count = read_count!(buffer, u16);
/// ```
macro_rules! read_count {
    ($reader:expr, $ty:ty) => {
        usize::from($reader.read_be::<$ty>()?)
    };
}
