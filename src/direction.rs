//! The six neighbour directions of a pointy-top hexagon.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the six directions from a cell to its neighbours
///
/// Variants are ordered clockwise starting at north-east. The discriminant is
/// also the index of the direction's first corner in the hexagon corner table.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HexDirection {
    NE = 0,
    E = 1,
    SE = 2,
    SW = 3,
    W = 4,
    NW = 5,
}

impl HexDirection {
    /// All directions in canonical processing order
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    /// Direction from its index, wrapping modulo 6
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing the other way
    #[inline]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Counter-clockwise neighbour direction
    #[inline]
    pub fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    /// Clockwise neighbour direction
    #[inline]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    #[inline]
    pub fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    #[inline]
    pub fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
        assert_eq!(HexDirection::NE.opposite(), HexDirection::SW);
        assert_eq!(HexDirection::W.opposite(), HexDirection::E);
    }

    #[test]
    fn test_next_previous_wrap() {
        assert_eq!(HexDirection::NW.next(), HexDirection::NE);
        assert_eq!(HexDirection::NE.previous(), HexDirection::NW);
        assert_eq!(HexDirection::NE.next2(), HexDirection::SE);
        assert_eq!(HexDirection::NE.previous2(), HexDirection::W);
        for d in HexDirection::ALL {
            assert_eq!(d.next().previous(), d);
            assert_eq!(d.next2(), d.next().next());
            assert_eq!(d.previous2(), d.previous().previous());
        }
    }

    #[test]
    fn test_canonical_order() {
        let indices: Vec<usize> = HexDirection::ALL.iter().map(|d| d.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(HexDirection::SE < HexDirection::SW);
    }
}
