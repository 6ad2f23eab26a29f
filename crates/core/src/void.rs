//! The `Void` marker and the `IsVoid` absence check

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::task::Poll;

/// A zero-information value used wherever a success carries no payload.
///
/// Every `Void` equals every other `Void`, the unit value `()` and any
/// `Option` in the `None` state. This lets polymorphic code treat
/// "no value" uniformly regardless of where the absence came from.
#[derive(Debug, Clone, Copy, Default, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Void;

impl Void {
    /// The canonical instance
    pub const VALUE: Void = Void;

    /// Returns `true` when `value` represents absence
    pub fn is_void(value: &dyn IsVoid) -> bool {
        value.is_void()
    }
}

impl PartialEq for Void {
    fn eq(&self, _other: &Void) -> bool {
        true
    }
}

impl PartialEq<()> for Void {
    fn eq(&self, _other: &()) -> bool {
        true
    }
}

impl<T> PartialEq<Option<T>> for Void {
    fn eq(&self, other: &Option<T>) -> bool {
        other.is_none()
    }
}

impl Hash for Void {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(0);
    }
}

impl fmt::Display for Void {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("void")
    }
}

impl From<()> for Void {
    fn from(_: ()) -> Self {
        Void
    }
}

impl From<Void> for () {
    fn from(_: Void) -> Self {}
}

/// Values that can represent "nothing".
///
/// Rust has no null, but several types carry an absent state of their own:
/// `None`, a null pointer, JSON `null`, or a poll that completed without a
/// payload. `IsVoid` folds all of them into one question.
pub trait IsVoid {
    /// Returns `true` if this value represents absence
    fn is_void(&self) -> bool;
}

impl IsVoid for Void {
    fn is_void(&self) -> bool {
        true
    }
}

impl IsVoid for () {
    fn is_void(&self) -> bool {
        true
    }
}

impl<T> IsVoid for Option<T> {
    fn is_void(&self) -> bool {
        self.is_none()
    }
}

impl<T: ?Sized> IsVoid for *const T {
    fn is_void(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> IsVoid for *mut T {
    fn is_void(&self) -> bool {
        self.is_null()
    }
}

impl IsVoid for serde_json::Value {
    fn is_void(&self) -> bool {
        self.is_null()
    }
}

impl IsVoid for Poll<()> {
    fn is_void(&self) -> bool {
        self.is_ready()
    }
}

impl<T: IsVoid + ?Sized> IsVoid for &T {
    fn is_void(&self) -> bool {
        (**self).is_void()
    }
}

impl<T: IsVoid + ?Sized> IsVoid for Box<T> {
    fn is_void(&self) -> bool {
        (**self).is_void()
    }
}

macro_rules! never_void {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IsVoid for $ty {
                fn is_void(&self) -> bool {
                    false
                }
            }
        )*
    };
}

never_void!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, str,
);

impl<T> IsVoid for Vec<T> {
    fn is_void(&self) -> bool {
        false
    }
}
