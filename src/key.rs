//! Ordering keys.
//!
//! A skip list only ever asks one question of its keys: how do two of them
//! compare. [`Key`] answers it with a total order, which rules out the
//! `PartialOrd` holes that floating point would otherwise leave in the
//! level chains.

use std::cmp::Ordering;
use std::fmt::Debug;

/// A numeric key with a total order.
///
/// Integers use their natural order. Floats use IEEE-754 `totalOrder`
/// (see [`f64::total_cmp`]): `-0.0` sorts before `+0.0`, and `NaN` is a
/// legal key that sorts after every other value of the same sign.
pub trait Key: Copy + Debug {
    /// Compare two keys.
    fn order(&self, other: &Self) -> Ordering;

    /// `true` if `self` sorts strictly before `other`.
    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        return self.order(other) == Ordering::Less;
    }

    /// `true` if the two keys are the same position in the order.
    #[inline]
    fn same(&self, other: &Self) -> bool {
        return self.order(other) == Ordering::Equal;
    }
}

macro_rules! impl_key_ord {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn order(&self, other: &Self) -> Ordering {
                    return Ord::cmp(self, other);
                }
            }
        )*
    };
}

macro_rules! impl_key_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Key for $t {
                #[inline]
                fn order(&self, other: &Self) -> Ordering {
                    return self.total_cmp(other);
                }
            }
        )*
    };
}

impl_key_ord!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_key_float!(f32, f64);
