//! Fixed-width block bitsets
//!
//! Sets of vertices are stored as slices of blocks. Inside each block
//! the element with the smallest index occupies the most significant
//! bit. With that layout comparing two sets block by block as unsigned
//! integers gives the same result as comparing the bit strings
//! lexicographically, whatever the block width.
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Unsigned integer usable as a bitset block
pub trait Block:
    Copy
    + Debug
    + Default
    + Eq
    + Ord
    + Hash
    + Send
    + Sync
    + 'static
    + BitAnd<Output = Self>
    + BitAndAssign
    + BitOr<Output = Self>
    + BitOrAssign
    + Not<Output = Self>
{
    /// Number of bits per block
    const BITS: usize;
    const ZERO: Self;

    /// Block with only the bit for element `i` set, `i < Self::BITS`
    fn bit(i: usize) -> Self;

    fn count_ones(self) -> u32;

    fn leading_zeros(self) -> u32;
}

macro_rules! impl_block {
    ( $( $t:ty ),* ) => {
        $(
            impl Block for $t {
                const BITS: usize = <$t>::BITS as usize;
                const ZERO: Self = 0;

                #[inline(always)]
                fn bit(i: usize) -> Self {
                    debug_assert!(i < <Self as Block>::BITS);
                    (1 as $t) << (<Self as Block>::BITS - 1 - i)
                }

                #[inline(always)]
                fn count_ones(self) -> u32 {
                    <$t>::count_ones(self)
                }

                #[inline(always)]
                fn leading_zeros(self) -> u32 {
                    <$t>::leading_zeros(self)
                }
            }
        )*
    };
}

impl_block!(u8, u16, u32, u64, u128, usize);

/// Number of blocks needed for a set over `n` elements
pub const fn words_needed(n: usize, bits: usize) -> usize {
    (n + bits - 1) / bits
}

#[inline(always)]
pub fn contains<B: Block>(set: &[B], i: usize) -> bool {
    set[i / B::BITS] & B::bit(i % B::BITS) != B::ZERO
}

#[inline(always)]
pub fn insert<B: Block>(set: &mut [B], i: usize) {
    set[i / B::BITS] |= B::bit(i % B::BITS);
}

#[inline(always)]
pub fn remove<B: Block>(set: &mut [B], i: usize) {
    set[i / B::BITS] &= !B::bit(i % B::BITS);
}

pub fn clear<B: Block>(set: &mut [B]) {
    set.fill(B::ZERO)
}

pub fn count<B: Block>(set: &[B]) -> usize {
    set.iter().map(|b| b.count_ones() as usize).sum()
}

/// Size of the intersection of two sets of equal length
pub fn intersection_count<B: Block>(a: &[B], b: &[B]) -> usize {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&a, &b)| (a & b).count_ones() as usize)
        .sum()
}

/// Iterate over the elements of a set in ascending order
pub fn iter_ones<B: Block>(set: &[B]) -> Ones<'_, B> {
    Ones {
        set,
        word: 0,
        current: set.first().copied().unwrap_or(B::ZERO),
    }
}

pub struct Ones<'a, B> {
    set: &'a [B],
    word: usize,
    current: B,
}

impl<'a, B: Block> Iterator for Ones<'a, B> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != B::ZERO {
                let pos = self.current.leading_zeros() as usize;
                self.current &= !B::bit(pos);
                return Some(self.word * B::BITS + pos);
            }
            self.word += 1;
            self.current = *self.set.get(self.word)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_first() {
        assert_eq!(<u8 as Block>::bit(0), 0b1000_0000);
        assert_eq!(<u8 as Block>::bit(7), 0b0000_0001);
        assert_eq!(<u64 as Block>::bit(0), 1 << 63);
    }

    #[test]
    fn last_bit_every_width() {
        fn last<B: Block>() -> B {
            B::bit(B::BITS - 1)
        }
        assert_eq!(last::<u8>(), 1);
        assert_eq!(last::<u16>(), 1);
        assert_eq!(last::<u32>(), 1);
        assert_eq!(last::<u64>(), 1);
        assert_eq!(last::<u128>(), 1);
        assert_eq!(last::<usize>(), 1);
        assert_eq!(<u128 as Block>::bit(0), 1 << 127);
    }

    #[test]
    fn insert_remove() {
        let mut set = vec![0u16; words_needed(40, 16)];
        assert_eq!(set.len(), 3);
        for i in [0, 15, 16, 39] {
            insert(&mut set, i);
        }
        assert!(contains(&set, 15));
        assert!(contains(&set, 16));
        assert!(!contains(&set, 17));
        assert_eq!(count(&set), 4);
        remove(&mut set, 15);
        assert!(!contains(&set, 15));
        assert_eq!(Vec::from_iter(iter_ones(&set)), [0, 16, 39]);
        clear(&mut set);
        assert_eq!(iter_ones(&set).next(), None);
    }

    #[test]
    fn lexicographic_order_independent_of_width() {
        // {1, 9} vs {2, 3}: as bit strings 0100000001 > 0011000000
        let mut a8 = vec![0u8; 2];
        let mut b8 = vec![0u8; 2];
        let mut a64 = vec![0u64; 1];
        let mut b64 = vec![0u64; 1];
        for i in [1, 9] {
            insert(&mut a8, i);
            insert(&mut a64, i);
        }
        for i in [2, 3] {
            insert(&mut b8, i);
            insert(&mut b64, i);
        }
        assert!(a8 > b8);
        assert!(a64 > b64);
    }

    #[test]
    fn intersection() {
        let mut a = vec![0u32; 2];
        let mut b = vec![0u32; 2];
        for i in [0, 5, 33, 40] {
            insert(&mut a, i);
        }
        for i in [5, 33, 41] {
            insert(&mut b, i);
        }
        assert_eq!(intersection_count(&a, &b), 2);
    }
}
