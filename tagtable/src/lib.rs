//! Tagtable: exhaustive, type-checked dispatch tables over tagged values.
//!
//! A tagged value carries a discriminant naming its variant. Instead of writing a
//! `match` (or a chain of `if`s on a string field) at every call site, a table maps
//! each discriminant to a handler once, and the returned function routes every
//! value to the handler registered for its discriminant.
//!
//! Three shapes are provided:
//! - reducers (via [`reducer`]): `(state, action) -> state`
//! - dispatchers (via [`dispatch`]): `(action) -> ()`, run for effects
//! - gates (via [`gate`]): decorate a reducer handler so it only fires from a
//!   declared set of source states
//!
//! Exhaustiveness is checked twice
//!  - At compile time: tables are keyed by a field-less tag enum and built from an
//!    exhaustive `match` ([`HandlerTable::from_fn`], [`reducer!`], [`dispatcher!`]),
//!    or checked when the table is finalized ([`TableBuilder::build`]).
//!  - At run time: values whose discriminant arrives as a string (see
//!    [`Envelope`]) are resolved on every call, and a discriminant with no
//!    handler fails with [`Error::Unhandled`] before any handler runs.
//!
//! Example
//! ```
//! use enum_map::Enum;
//! use strum::{EnumDiscriminants, EnumString, IntoStaticStr};
//! use tagtable::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Counter { count: i64 }
//!
//! #[derive(Debug, EnumDiscriminants, Tagged)]
//! #[strum_discriminants(derive(Enum, IntoStaticStr, EnumString))]
//! #[strum_discriminants(strum(serialize_all = "snake_case"))]
//! enum Action { Increment, Decrement }
//!
//! let reduce = Reducer::<Counter, Action>::from_fn(|tag| match tag {
//!     ActionDiscriminants::Increment => pure(|s: &Counter, _: &Action| Counter { count: s.count + 1 }),
//!     ActionDiscriminants::Decrement => pure(|s: &Counter, _: &Action| Counter { count: s.count - 1 }),
//! });
//!
//! assert_eq!(reduce.reduce(&Counter { count: 5 }, &Action::Increment), Ok(Counter { count: 6 }));
//!
//! // The same tag enum resolves discriminants coming from outside the program.
//! let from_wire = Reducer::<Counter, Envelope<ActionDiscriminants>>::from_fn(|tag| match tag {
//!     ActionDiscriminants::Increment => {
//!         pure(|s: &Counter, _: &Envelope<ActionDiscriminants>| Counter { count: s.count + 1 })
//!     },
//!     ActionDiscriminants::Decrement => {
//!         pure(|s: &Counter, _: &Envelope<ActionDiscriminants>| Counter { count: s.count - 1 })
//!     },
//! });
//! let err = from_wire.reduce(&Counter { count: 5 }, &Envelope::raw("reset", ())).unwrap_err();
//! assert_eq!(err.to_string(), "Non-exhaustive switch. Unhandled case: reset");
//! ```

// Lets `#[derive(Tagged)]` expand to `::tagtable::...` inside this crate's own tests.
extern crate self as tagtable;

/// Dispatch tables: side-effecting handlers keyed by tag.
pub mod dispatch;
mod error;
/// State-gated reducer handlers.
pub mod gate;
/// Reducer tables: state transitions keyed by tag.
pub mod reducer;
/// Handler tables and their run-time checked builder.
pub mod table;
/// Tags, tagged values and dynamic envelopes.
pub mod tagged;

pub use dispatch::{DispatchHandler, Dispatcher, build_dispatch};
pub use error::{Error, Result};
pub use gate::{Admitted, Gate, gate};
pub use reducer::{ReducerHandler, Reducer, build_reducer};
pub use table::{HandlerTable, TableBuilder};
pub use tagged::{Envelope, Tag, Tagged, Tags};

#[cfg(feature = "derive")]
pub use tagtable_derive::Tagged;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - Table builders and the functions they return
    //! - Entry helpers (`transition`, `pure`, `effect`)
    //! - `Tag` / `Tagged` and the derive macro
    pub use crate::dispatch::{DispatchHandler, Dispatcher, build_dispatch, effect};
    pub use crate::error::Error;
    pub use crate::gate::{Admitted, Gate, gate};
    pub use crate::reducer::{Reducer, ReducerHandler, build_reducer, pure, transition};
    pub use crate::table::{HandlerTable, TableBuilder};
    pub use crate::tagged::{Envelope, Tag};
    pub use crate::{Tagged, dispatcher, reducer};
}
