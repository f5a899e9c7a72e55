//! Named collision tags and the bitmask they resolve to.

use crate::error::{CollisionError, Result};
use fnv::FnvHashMap;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of tag bits. A shape matches a filter when they share at least one bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagMask(pub u64);

impl TagMask {
    /// Matches every tag, including the ones not defined yet
    pub const ALL: TagMask = TagMask(u64::MAX);
    pub const NONE: TagMask = TagMask(0);
    /// Number of distinct tags a world can define
    pub const CAPACITY: u32 = u64::BITS;

    pub const fn bit(n: u32) -> Self {
        TagMask(1 << n)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn matches(self, other: TagMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for TagMask {
    fn default() -> Self {
        TagMask::ALL
    }
}

impl BitOr for TagMask {
    type Output = TagMask;

    fn bitor(self, rhs: TagMask) -> TagMask {
        TagMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for TagMask {
    fn bitor_assign(&mut self, rhs: TagMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for TagMask {
    type Output = TagMask;

    fn bitand(self, rhs: TagMask) -> TagMask {
        TagMask(self.0 & rhs.0)
    }
}

/// Anything that names zero, one or several tags.
///
/// No names at all resolves to [`TagMask::ALL`].
pub trait TagNames {
    fn tag_names(&self) -> Vec<&str>;
}

impl TagNames for str {
    fn tag_names(&self) -> Vec<&str> {
        vec![self]
    }
}

impl TagNames for String {
    fn tag_names(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl<S: AsRef<str>> TagNames for [S] {
    fn tag_names(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<S: AsRef<str>, const N: usize> TagNames for [S; N] {
    fn tag_names(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<S: AsRef<str>> TagNames for Vec<S> {
    fn tag_names(&self) -> Vec<&str> {
        self.iter().map(AsRef::as_ref).collect()
    }
}

impl<T: TagNames + ?Sized> TagNames for &T {
    fn tag_names(&self) -> Vec<&str> {
        (**self).tag_names()
    }
}

impl<T: TagNames> TagNames for Option<T> {
    fn tag_names(&self) -> Vec<&str> {
        match self {
            Some(t) => t.tag_names(),
            None => vec![],
        }
    }
}

impl TagNames for () {
    fn tag_names(&self) -> Vec<&str> {
        vec![]
    }
}

/// Assigns bits to tag names, lazily and in order starting at bit 0.
///
/// A bit never changes once assigned.
#[derive(Clone, Debug, Default)]
pub struct TagRegistry {
    bits: FnvHashMap<String, TagMask>,
    next_bit: u32,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next free bit to `name`
    pub fn define(&mut self, name: &str) -> Result<TagMask> {
        if self.bits.contains_key(name) {
            return Err(CollisionError::DuplicateRegistration(format!(
                "collision tag '{}' already exists",
                name
            )));
        }
        if self.next_bit >= TagMask::CAPACITY {
            return Err(CollisionError::TagLimitReached {
                name: name.to_string(),
                limit: TagMask::CAPACITY,
            });
        }
        let mask = TagMask::bit(self.next_bit);
        self.next_bit += 1;
        self.bits.insert(name.to_string(), mask);
        log::debug!("collision tag '{}' assigned to {:#x}", name, mask.0);
        Ok(mask)
    }

    pub fn get(&self, name: &str) -> Option<TagMask> {
        self.bits.get(name).copied()
    }

    /// Bit of `name`, defining it if unseen
    pub fn get_or_define(&mut self, name: &str) -> Result<TagMask> {
        match self.get(name) {
            Some(mask) => Ok(mask),
            None => self.define(name),
        }
    }

    pub fn resolve(&mut self, names: impl TagNames) -> Result<TagMask> {
        let names = names.tag_names();
        if names.is_empty() {
            return Ok(TagMask::ALL);
        }
        let mut mask = TagMask::NONE;
        for name in names {
            mask |= self.get_or_define(name)?;
        }
        Ok(mask)
    }

    /// Like `resolve` but never defines. An unknown name stands for every bit
    /// not assigned yet, so it matches the shapes still carrying
    /// [`TagMask::ALL`] and no explicitly tagged shape, as if it were defined now.
    pub fn lookup(&self, names: impl TagNames) -> TagMask {
        let names = names.tag_names();
        if names.is_empty() {
            return TagMask::ALL;
        }
        names
            .into_iter()
            .map(|name| self.get(name).unwrap_or_else(|| self.unassigned()))
            .fold(TagMask::NONE, |acc, bit| acc | bit)
    }

    /// Bits no name owns yet
    pub fn unassigned(&self) -> TagMask {
        match u64::MAX.checked_shl(self.next_bit) {
            Some(bits) => TagMask(bits),
            None => TagMask::NONE,
        }
    }

    /// Names whose bit is set in `mask`, in bit order
    pub fn names(&self, mask: TagMask) -> Vec<&str> {
        let mut ret: Vec<_> = self
            .bits
            .iter()
            .filter(|&(_, &bit)| bit.matches(mask))
            .map(|(name, &bit)| (bit.0, name.as_str()))
            .collect();
        ret.sort_unstable_by_key(|&(bit, _)| bit);
        ret.into_iter().map(|(_, name)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}
