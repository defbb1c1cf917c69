use std::{
    fmt,
    ops::{BitOr, Sub},
};

/// Maximum number of polynomials, decomposition levels or fan-out tracks a
/// [TagSet] can name.
pub const MAX_TRACKS: usize = 16;

const POLY_SHIFT: u32 = 8;
const LEVEL_SHIFT: u32 = POLY_SHIFT + MAX_TRACKS as u32;
const FANOUT_SHIFT: u32 = LEVEL_SHIFT + MAX_TRACKS as u32;

/// Provenance label carried by a point through the network.
///
/// Track indices must be below [MAX_TRACKS]: adding `Poly(i)`, `Level(i)` or
/// `Fanout(i)` with `i >= MAX_TRACKS` to a [TagSet] panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Forward,
    Backward,
    Done,
    /// GLWE polynomial index.
    Poly(usize),
    /// Decomposition level.
    Level(usize),
    /// Backward track spawned by the forward pass boundary.
    Fanout(usize),
}

impl Tag {
    #[inline]
    fn bit(self) -> u64 {
        match self {
            Tag::Forward => 1,
            Tag::Backward => 1 << 1,
            Tag::Done => 1 << 2,
            Tag::Poly(i) => 1 << (POLY_SHIFT + track(i)),
            Tag::Level(i) => 1 << (LEVEL_SHIFT + track(i)),
            Tag::Fanout(i) => 1 << (FANOUT_SHIFT + track(i)),
        }
    }
}

#[inline]
fn track(i: usize) -> u32 {
    assert!(i < MAX_TRACKS, "invalid argument: track index {} >= {}", i, MAX_TRACKS);
    i as u32
}

/// Fixed-width set of [Tag]s.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TagSet(u64);

impl TagSet {
    #[inline]
    pub const fn empty() -> Self {
        TagSet(0)
    }

    #[inline]
    pub fn bits(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(&self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    #[inline]
    pub fn with(self, tag: Tag) -> Self {
        TagSet(self.0 | tag.bit())
    }

    #[inline]
    pub fn without(self, tag: Tag) -> Self {
        TagSet(self.0 & !tag.bit())
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        let bits: u64 = self.0;
        (0..u64::BITS).filter(move |i| bits >> i & 1 == 1).map(|i| match i {
            0 => Tag::Forward,
            1 => Tag::Backward,
            2 => Tag::Done,
            i if i >= FANOUT_SHIFT => Tag::Fanout((i - FANOUT_SHIFT) as usize),
            i if i >= LEVEL_SHIFT => Tag::Level((i - LEVEL_SHIFT) as usize),
            i => Tag::Poly((i - POLY_SHIFT) as usize),
        })
    }
}

impl BitOr for TagSet {
    type Output = TagSet;
    #[inline]
    fn bitor(self, rhs: TagSet) -> TagSet {
        TagSet(self.0 | rhs.0)
    }
}

impl Sub for TagSet {
    type Output = TagSet;
    #[inline]
    fn sub(self, rhs: TagSet) -> TagSet {
        TagSet(self.0 & !rhs.0)
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        TagSet(tag.bit())
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        iter.into_iter().fold(TagSet::empty(), TagSet::with)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, tag) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match tag {
                Tag::Forward => write!(f, "FWD")?,
                Tag::Backward => write!(f, "BWD")?,
                Tag::Done => write!(f, "DONE")?,
                Tag::Poly(i) => write!(f, "P{}", i)?,
                Tag::Level(i) => write!(f, "D{}", i)?,
                Tag::Fanout(i) => write!(f, "PP{}", i)?,
            }
        }
        write!(f, "}}")
    }
}
