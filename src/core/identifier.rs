//! Deterministic 128-bit target identifiers.
//!
//! Identifiers are GUID-shaped so that descriptor serializers can embed them
//! directly. They come from an [`IdAllocator`] that treats a fixed seed as a
//! counter: for a given seed and a given number of calls the sequence is
//! always the same, which keeps regenerated output diff-friendly.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Seed used when the configuration does not provide one.
pub const DEFAULT_SEED: &str = "7c9e667a-7425-30de-944b-f07fc1f90ae8";

/// Byte positions touched by an increment, least significant first.
///
/// Indices refer to the mixed-endian GUID byte layout (the first three
/// fields stored little-endian), so walking them in this order advances the
/// identifier exactly as it reads in canonical text form.
const INCREMENT_ORDER: [usize; 16] = [15, 14, 13, 12, 11, 10, 9, 8, 6, 7, 4, 5, 0, 1, 2, 3];

/// A 128-bit identifier assigned to a target.
///
/// Ordering follows the canonical text form, which is also the order in
/// which an [`IdAllocator`] produces identifiers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(Uuid);

impl Identifier {
    /// The all-zero identifier, produced when the counter wraps.
    pub const NIL: Identifier = Identifier(Uuid::nil());

    /// Build an identifier from its mixed-endian byte layout.
    pub fn from_bytes_le(bytes: [u8; 16]) -> Self {
        Identifier(Uuid::from_bytes_le(bytes))
    }

    /// Bytes in mixed-endian layout.
    pub fn to_bytes_le(self) -> [u8; 16] {
        self.0.to_bytes_le()
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:X}}}", self.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self)
    }
}

impl FromStr for Identifier {
    type Err = uuid::Error;

    /// Accepts plain, braced, and urn forms in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Identifier)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Stateful identifier generator.
///
/// There is one allocator per generation run. It is passed by mutable
/// reference to whatever assigns identifiers, which keeps allocation order
/// explicit: callers that classify targets concurrently must still allocate
/// sequentially in a canonical order.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    current: [u8; 16],
}

impl IdAllocator {
    /// Create an allocator whose first identifier follows `seed`.
    pub fn new(seed: Identifier) -> Self {
        IdAllocator {
            current: seed.to_bytes_le(),
        }
    }

    /// The most recently produced identifier (the seed before any call).
    pub fn current(&self) -> Identifier {
        Identifier::from_bytes_le(self.current)
    }

    /// Advance the counter and return the new identifier.
    ///
    /// Increments stop at the first byte that does not wrap. When every byte
    /// wraps the counter is exhausted and restarts at [`Identifier::NIL`].
    pub fn next_id(&mut self) -> Identifier {
        let exhausted = INCREMENT_ORDER.iter().all(|&i| {
            self.current[i] = self.current[i].wrapping_add(1);
            self.current[i] == 0
        });
        if exhausted {
            self.current = [0; 16];
        }
        self.current()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        IdAllocator::new(DEFAULT_SEED.parse().unwrap_or(Identifier::NIL))
    }
}

impl Iterator for IdAllocator {
    type Item = Identifier;

    fn next(&mut self) -> Option<Identifier> {
        Some(self.next_id())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_id_follows_seed() {
        let mut alloc = IdAllocator::default();
        assert_eq!(
            alloc.next_id().to_string(),
            "{7C9E667A-7425-30DE-944B-F07FC1F90AE9}"
        );
        assert_eq!(
            alloc.next_id().to_string(),
            "{7C9E667A-7425-30DE-944B-F07FC1F90AEA}"
        );
    }

    #[test]
    fn test_carry_crosses_field_boundaries() {
        let mut alloc = IdAllocator::new(id("00000000-0000-0000-0000-0000000000ff"));
        assert_eq!(alloc.next_id(), id("00000000-0000-0000-0000-000000000100"));

        let mut alloc = IdAllocator::new(id("00000000-0000-0000-ffff-ffffffffffff"));
        assert_eq!(alloc.next_id(), id("00000000-0000-0001-0000-000000000000"));

        let mut alloc = IdAllocator::new(id("00000000-00ff-ffff-ffff-ffffffffffff"));
        assert_eq!(alloc.next_id(), id("00000000-0100-0000-0000-000000000000"));

        let mut alloc = IdAllocator::new(id("000000ff-ffff-ffff-ffff-ffffffffffff"));
        assert_eq!(alloc.next_id(), id("00000100-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_exhausted_counter_wraps_to_nil() {
        let mut alloc = IdAllocator::new(id("ffffffff-ffff-ffff-ffff-ffffffffffff"));
        let wrapped = alloc.next_id();
        assert!(wrapped.is_nil());
        assert_eq!(alloc.next_id(), id("00000000-0000-0000-0000-000000000001"));
    }

    #[test]
    fn test_sequence_is_unique_increasing_and_reproducible() {
        let first: Vec<_> = IdAllocator::default().take(300).collect();
        let second: Vec<_> = IdAllocator::default().take(300).collect();

        assert_eq!(first, second);
        assert_eq!(first.iter().collect::<HashSet<_>>().len(), 300);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parse_braced_and_display_round_trip() {
        let parsed = id("{7C9E667A-7425-30DE-944B-F07FC1F90AE8}");
        assert_eq!(parsed, id(DEFAULT_SEED));
        assert_eq!(parsed.to_string().parse::<Identifier>().unwrap(), parsed);
        assert!("not-a-guid".parse::<Identifier>().is_err());
    }

    #[test]
    fn test_serializes_as_braced_string() {
        let json = serde_json::to_string(&id(DEFAULT_SEED)).unwrap();
        assert_eq!(json, "\"{7C9E667A-7425-30DE-944B-F07FC1F90AE8}\"");
    }
}
