//! State-gated reducer handlers.
//!
//! A [`Gate`] declares which source states a transition may fire from. The inner
//! handler receives an [`Admitted`] view, which only the gate can construct and
//! only after the state's tag passed the allow-list, so the handler never sees a
//! state outside it.
//!
//! ```
//! use enum_map::Enum;
//! use strum::{EnumDiscriminants, EnumString, IntoStaticStr};
//! use tagtable::{Admitted, Error, ReducerHandler, Tagged, gate};
//!
//! #[derive(Debug, Clone, PartialEq, EnumDiscriminants, Tagged)]
//! #[strum_discriminants(derive(Enum, IntoStaticStr, EnumString))]
//! enum Player { Idle, Paused, Running }
//!
//! struct Play;
//!
//! let play = gate(
//!     [PlayerDiscriminants::Idle, PlayerDiscriminants::Paused],
//!     |_: Admitted<'_, Player>, _: &Play| Ok(Player::Running),
//! );
//!
//! assert_eq!(play.handle(&Player::Idle, &Play), Ok(Player::Running));
//! assert_eq!(
//!     play.handle(&Player::Running, &Play),
//!     Err(Error::IllegalTransition {
//!         state: "Running".to_string(),
//!         allowed: vec!["Idle", "Paused"],
//!     })
//! );
//! ```
use std::{fmt, ops::Deref};

use log::warn;

use crate::{
    error::{Error, Result},
    reducer::ReducerHandler,
    tagged::{Tag, Tagged},
};

/// A state whose tag is one of the gate's allowed tags.
pub struct Admitted<'a, S: Tagged> {
    state: &'a S,
    tag: S::Tag,
    allowed: &'a [S::Tag],
}

impl<'a, S: Tagged> Admitted<'a, S> {
    pub fn state(&self) -> &'a S {
        self.state
    }

    /// The state's tag; always a member of [`Admitted::allowed`].
    pub fn tag(&self) -> S::Tag {
        self.tag
    }

    pub fn allowed(&self) -> &'a [S::Tag] {
        self.allowed
    }
}

impl<S: Tagged> Deref for Admitted<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.state
    }
}

impl<S: Tagged> Clone for Admitted<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Tagged> Copy for Admitted<'_, S> {}

impl<S: Tagged + fmt::Debug> fmt::Debug for Admitted<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Admitted").field(self.state).finish()
    }
}

/// A reducer handler restricted to a set of source states, see [`gate`].
pub struct Gate<S: Tagged, F, const N: usize> {
    allowed: [S::Tag; N],
    inner: F,
}

/// Restrict `inner` to states whose tag is in `allowed`.
///
/// The returned gate fails with [`Error::IllegalTransition`] for any other
/// state, without calling `inner`. An empty allow-list does not compile:
///
/// ```compile_fail
/// # use enum_map::Enum;
/// # use strum::{EnumDiscriminants, EnumString, IntoStaticStr};
/// # use tagtable::{Admitted, Tagged, gate};
/// #[derive(Debug, Clone, EnumDiscriminants, Tagged)]
/// #[strum_discriminants(derive(Enum, IntoStaticStr, EnumString))]
/// enum Player { Idle, Running }
///
/// struct Play;
///
/// let play = gate::<Player, _, 0>(
///     [],
///     |_: Admitted<'_, Player>, _: &Play| -> tagtable::Result<Player> { Ok(Player::Running) },
/// );
/// ```
pub fn gate<S, F, const N: usize>(allowed: [S::Tag; N], inner: F) -> Gate<S, F, N>
where
    S: Tagged,
{
    const { assert!(N > 0, "a gate must allow at least one state") };
    Gate { allowed, inner }
}

impl<S: Tagged, F, const N: usize> Gate<S, F, N> {
    pub fn allowed(&self) -> &[S::Tag] {
        &self.allowed
    }

    /// Whether `state` may pass the gate.
    pub fn admits(&self, state: &S) -> bool {
        self.admit(state).is_some()
    }

    fn admit<'a>(&'a self, state: &'a S) -> Option<Admitted<'a, S>> {
        let tag = state.tag().filter(|tag| self.allowed.contains(tag))?;
        Some(Admitted {
            state,
            tag,
            allowed: &self.allowed,
        })
    }
}

impl<S, A, F, const N: usize> ReducerHandler<S, A> for Gate<S, F, N>
where
    S: Tagged,
    F: Fn(Admitted<'_, S>, &A) -> Result<S> + Send + Sync,
{
    fn handle(&self, state: &S, action: &A) -> Result<S> {
        match self.admit(state) {
            Some(admitted) => (self.inner)(admitted, action),
            None => {
                let allowed: Vec<&'static str> = self.allowed.iter().map(|&tag| tag.name()).collect();
                warn!(
                    "Transition refused from state `{}`, allowed: {}",
                    state.discriminant(),
                    allowed.join(", ")
                );
                Err(Error::IllegalTransition {
                    state: state.discriminant().to_owned(),
                    allowed,
                })
            }
        }
    }
}

impl<S: Tagged, F, const N: usize> fmt::Debug for Gate<S, F, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("allowed", &self.allowed)
            .finish_non_exhaustive()
    }
}
