//! Tags, tagged values and the dynamic [`Envelope`].
//!
//! A [`Tag`] is a field-less enum naming every variant of a tagged union. The
//! usual way to get one is to let `strum` generate it next to the union:
//!
//! ```
//! use enum_map::Enum;
//! use strum::{EnumDiscriminants, EnumString, IntoStaticStr};
//! use tagtable::{Tag, Tagged};
//!
//! #[derive(Debug, EnumDiscriminants, Tagged)]
//! #[strum_discriminants(derive(Enum, IntoStaticStr, EnumString))]
//! #[strum_discriminants(strum(serialize_all = "snake_case"))]
//! enum Action {
//!     Increment,
//!     Add { amount: i64 },
//! }
//!
//! let action = Action::Add { amount: 3 };
//! assert_eq!(action.discriminant(), "add");
//! assert_eq!(action.tag(), Some(ActionDiscriminants::Add));
//! assert_eq!(ActionDiscriminants::names(), ["increment", "add"]);
//! ```
use std::{fmt, marker::PhantomData, str::FromStr};

use enum_map::Enum;

/// A closed, field-less enumeration of discriminants.
///
/// Implemented for every enum deriving `enum_map::Enum`, `strum::IntoStaticStr`
/// and `strum::EnumString`. The static string is the discriminant as it appears
/// on the wire; `from_name` is its inverse.
pub trait Tag: Enum + Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The discriminant literal for this tag.
    fn name(self) -> &'static str;

    /// Resolve a raw discriminant, `None` if it names no variant.
    fn from_name(name: &str) -> Option<Self>;

    /// Every tag in declaration order.
    fn all() -> Tags<Self> {
        Tags {
            next: 0,
            _marker: PhantomData,
        }
    }

    /// Every discriminant literal in declaration order.
    fn names() -> Vec<&'static str> {
        Self::all().map(Self::name).collect()
    }
}

impl<T> Tag for T
where
    T: Enum + Copy + Eq + fmt::Debug + Send + Sync + 'static,
    T: Into<&'static str> + FromStr,
{
    fn name(self) -> &'static str {
        self.into()
    }

    fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

/// Iterator over all variants of a [`Tag`], see [`Tag::all`].
#[derive(Debug, Clone)]
pub struct Tags<K> {
    next: usize,
    _marker: PhantomData<fn() -> K>,
}

impl<K: Tag> Iterator for Tags<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        if self.next >= K::LENGTH {
            return None;
        }
        let tag = K::from_usize(self.next);
        self.next += 1;
        Some(tag)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = K::LENGTH.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<K: Tag> ExactSizeIterator for Tags<K> {}

/// A value exposing a discriminant (its `type` field).
///
/// Both actions and states implement this. Enums normally get it from
/// `#[derive(Tagged)]`; values whose discriminant is only known at run time
/// (see [`Envelope`]) rely on the default [`Tagged::tag`], which resolves the
/// raw discriminant and may fail.
///
/// The derive only accepts a value enum and a tag enum that declare the same
/// variants. A tag variant with no counterpart is rejected:
///
/// ```compile_fail
/// # use enum_map::Enum;
/// # use strum::{EnumString, IntoStaticStr};
/// # use tagtable::Tagged;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, IntoStaticStr, EnumString)]
/// enum Light { Red, Green, Blue }
///
/// #[derive(Debug, Tagged)]
/// #[tagged(tag = Light)]
/// enum Signal { Red, Green }
/// ```
///
/// and so is a value variant the tag enum lacks:
///
/// ```compile_fail
/// # use enum_map::Enum;
/// # use strum::{EnumString, IntoStaticStr};
/// # use tagtable::Tagged;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, IntoStaticStr, EnumString)]
/// enum Light { Red, Green }
///
/// #[derive(Debug, Tagged)]
/// #[tagged(tag = Light)]
/// enum Signal { Red, Green, Off }
/// ```
///
/// With matching variants it compiles:
///
/// ```
/// # use enum_map::Enum;
/// # use strum::{EnumString, IntoStaticStr};
/// # use tagtable::Tagged;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, IntoStaticStr, EnumString)]
/// enum Light { Red, Green }
///
/// #[derive(Debug, Tagged)]
/// #[tagged(tag = Light)]
/// enum Signal { Red, Green(u8) }
///
/// assert_eq!(Signal::Green(3).tag(), Some(Light::Green));
/// ```
///
/// Structs and unknown `tagged` options are refused:
///
/// ```compile_fail
/// # use tagtable::Tagged;
/// #[derive(Tagged)]
/// struct Beacon { on: bool }
/// ```
///
/// ```compile_fail
/// # use enum_map::Enum;
/// # use strum::{EnumString, IntoStaticStr};
/// # use tagtable::Tagged;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, IntoStaticStr, EnumString)]
/// enum Light { Red, Green }
///
/// #[derive(Debug, Tagged)]
/// #[tagged(name = Light)]
/// enum Signal { Red, Green }
/// ```
pub trait Tagged {
    type Tag: Tag;

    /// The raw discriminant.
    fn discriminant(&self) -> &str;

    /// The resolved tag, `None` when the discriminant is foreign to `Self::Tag`.
    fn tag(&self) -> Option<Self::Tag> {
        Self::Tag::from_name(self.discriminant())
    }
}

impl<T: Tagged + ?Sized> Tagged for &T {
    type Tag = T::Tag;

    fn discriminant(&self) -> &str {
        (**self).discriminant()
    }

    fn tag(&self) -> Option<T::Tag> {
        (**self).tag()
    }
}

/// A tagged value whose discriminant is carried as a string.
///
/// This is the shape values have when they cross the program boundary: the
/// discriminant is whatever the producer wrote, which may not be a variant of
/// `K`. Tables resolve it on every call and report foreign discriminants as
/// [`Error::Unhandled`](crate::Error::Unhandled).
///
/// With the `serde` feature an envelope reads and writes as a flat object,
/// `{ "type": "<discriminant>", ...payload }`.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "P: serde::Serialize", deserialize = "P: serde::Deserialize<'de>"))
)]
pub struct Envelope<K, P = ()> {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    discriminant: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    payload: P,
    #[cfg_attr(feature = "serde", serde(skip))]
    _tag: PhantomData<fn() -> K>,
}

impl<K: Tag, P> Envelope<K, P> {
    /// Envelope for a known tag.
    pub fn new(tag: K, payload: P) -> Self {
        Self::raw(tag.name(), payload)
    }

    /// Envelope with an unchecked discriminant.
    pub fn raw(discriminant: impl Into<String>, payload: P) -> Self {
        Envelope {
            discriminant: discriminant.into(),
            payload,
            _tag: PhantomData,
        }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<K: Tag> Envelope<K, ()> {
    /// Envelope without payload.
    pub fn bare(tag: K) -> Self {
        Self::new(tag, ())
    }
}

impl<K: Tag, P> Tagged for Envelope<K, P> {
    type Tag = K;

    fn discriminant(&self) -> &str {
        &self.discriminant
    }
}

impl<K, P: fmt::Debug> fmt::Debug for Envelope<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("type", &self.discriminant)
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use strum::{EnumString, IntoStaticStr};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, IntoStaticStr, EnumString)]
    #[strum(serialize_all = "snake_case")]
    enum Light {
        Red,
        Amber,
        Green,
    }

    #[test]
    fn all_follows_declaration_order() {
        let tags: Vec<Light> = Light::all().collect();
        assert_eq!(tags, [Light::Red, Light::Amber, Light::Green]);
        assert_eq!(Light::all().len(), 3);
        assert_eq!(Light::names(), ["red", "amber", "green"]);
    }

    #[test]
    fn name_and_from_name_are_inverse() {
        for tag in Light::all() {
            assert_eq!(Light::from_name(tag.name()), Some(tag));
        }
        assert_eq!(Light::from_name("blue"), None);
        assert_eq!(Light::from_name("Red"), None);
    }

    #[test]
    fn envelope_resolves_known_discriminant() {
        let env = Envelope::new(Light::Amber, 7u8);
        assert_eq!(env.discriminant(), "amber");
        assert_eq!(env.tag(), Some(Light::Amber));
        assert_eq!(*env.payload(), 7);
    }

    #[test]
    fn envelope_keeps_foreign_discriminant() {
        let env: Envelope<Light> = Envelope::raw("blue", ());
        assert_eq!(env.discriminant(), "blue");
        assert_eq!(env.tag(), None);
        assert_eq!((&env).tag(), None);
    }
}
