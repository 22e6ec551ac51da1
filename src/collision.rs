use core::fmt;

/// Collision-resolution scheme a table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionStrategy {
    /// Each bucket heads a singly linked chain of colliding entries.
    SeparateChaining,
}

impl CollisionStrategy {
    /// Numeric scheme code (1..=9) of the legacy table interface.
    pub const fn code(self) -> u8 {
        match self {
            CollisionStrategy::SeparateChaining => 5,
        }
    }
}

impl fmt::Display for CollisionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionStrategy::SeparateChaining => f.write_str("separate chaining"),
        }
    }
}
