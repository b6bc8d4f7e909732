//! Reducer tables: `(state, action) -> state` keyed by the action's tag.
use std::{fmt, sync::Arc};

use log::{trace, warn};

use crate::{
    error::{Error, Result},
    table::{HandlerTable, TableBuilder},
    tagged::Tagged,
};

/// A handler producing the next state from the current one and an action.
///
/// Handlers receive the state by reference and return a new value; they never
/// mutate in place, so a failed call leaves the caller's state untouched.
pub trait ReducerHandler<S, A>: Send + Sync {
    fn handle(&self, state: &S, action: &A) -> Result<S>;
}

impl<S, A, F> ReducerHandler<S, A> for F
where
    F: Fn(&S, &A) -> Result<S> + Send + Sync,
{
    fn handle(&self, state: &S, action: &A) -> Result<S> {
        self(state, action)
    }
}

/// Shared, type-erased reducer handler as stored in a table.
pub type ReducerEntry<S, A> = Arc<dyn ReducerHandler<S, A>>;

/// Table of reducer handlers keyed by the action's tag.
pub type ReducerTable<S, A> = HandlerTable<<A as Tagged>::Tag, dyn ReducerHandler<S, A>>;

/// Turn any reducer handler (a closure, a [`Gate`](crate::Gate), ...) into a
/// table entry.
///
/// Closures need annotated parameters, e.g. `|s: &Counter, a: &Action|`.
pub fn transition<S, A, H>(handler: H) -> ReducerEntry<S, A>
where
    H: ReducerHandler<S, A> + 'static,
{
    Arc::new(handler)
}

/// Table entry for a handler that cannot fail.
pub fn pure<S, A, F>(f: F) -> ReducerEntry<S, A>
where
    S: 'static,
    A: 'static,
    F: Fn(&S, &A) -> S + Send + Sync + 'static,
{
    Arc::new(move |state: &S, action: &A| -> Result<S> { Ok(f(state, action)) })
}

/// The function returned by [`build_reducer`].
///
/// Looks up the handler registered for the action's tag and runs it. An action
/// whose discriminant is absent from the table fails with [`Error::Unhandled`]
/// and runs no handler.
pub struct Reducer<S, A: Tagged> {
    table: ReducerTable<S, A>,
}

/// Build a reducer from a table covering every tag of `A`.
pub fn build_reducer<S, A: Tagged>(table: ReducerTable<S, A>) -> Reducer<S, A> {
    Reducer { table }
}

impl<S, A: Tagged> Reducer<S, A> {
    /// Build a reducer whose table is filled by an exhaustive `match` on the tag.
    pub fn from_fn(f: impl FnMut(A::Tag) -> ReducerEntry<S, A>) -> Self {
        build_reducer(HandlerTable::from_fn(f))
    }

    /// Register handlers one by one; see [`TableBuilder::build`].
    pub fn builder() -> TableBuilder<A::Tag, dyn ReducerHandler<S, A>> {
        TableBuilder::new()
    }

    /// Compute the state following `action`.
    pub fn reduce(&self, state: &S, action: &A) -> Result<S> {
        let Some(handler) = action.tag().and_then(|tag| self.table.get(tag)) else {
            warn!("No reducer handler for action `{}`", action.discriminant());
            return Err(Error::Unhandled {
                discriminant: action.discriminant().to_owned(),
            });
        };

        trace!("Reducing action `{}`", action.discriminant());
        handler.handle(state, action)
    }

    /// Fold a sequence of actions into `state`, stopping at the first failure.
    pub fn reduce_all<'a>(&self, state: S, actions: impl IntoIterator<Item = &'a A>) -> Result<S>
    where
        A: 'a,
    {
        actions
            .into_iter()
            .try_fold(state, |state, action| self.reduce(&state, action))
    }

    /// Borrow the reducer as a plain function.
    pub fn as_fn(&self) -> impl Fn(&S, &A) -> Result<S> + '_ {
        move |state: &S, action: &A| self.reduce(state, action)
    }

    pub fn table(&self) -> &ReducerTable<S, A> {
        &self.table
    }
}

impl<S, A: Tagged> Clone for Reducer<S, A> {
    fn clone(&self) -> Self {
        Reducer {
            table: self.table.clone(),
        }
    }
}

impl<S, A: Tagged> fmt::Debug for Reducer<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("table", &self.table)
            .finish()
    }
}

/// Build a [`Reducer`] from `tag => handler` arms.
///
/// The arms expand into a `match` on the action's tag, so leaving a tag out is a
/// compile error. Each handler goes through [`transition`]; closures need
/// annotated parameters.
///
/// ```
/// use enum_map::Enum;
/// use strum::{EnumDiscriminants, EnumString, IntoStaticStr};
/// use tagtable::{Tagged, reducer};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Counter { count: i64 }
///
/// #[derive(Debug, EnumDiscriminants, Tagged)]
/// #[strum_discriminants(derive(Enum, IntoStaticStr, EnumString))]
/// enum Action { Increment, Decrement }
///
/// let reduce = reducer! {
///     Counter, Action;
///     ActionDiscriminants::Increment => |s: &Counter, _: &Action| Ok(Counter { count: s.count + 1 }),
///     ActionDiscriminants::Decrement => |s: &Counter, _: &Action| Ok(Counter { count: s.count - 1 }),
/// };
///
/// let state = reduce.reduce(&Counter { count: 5 }, &Action::Increment).unwrap();
/// assert_eq!(state, Counter { count: 6 });
/// ```
///
/// Leaving out `Decrement` is rejected:
///
/// ```compile_fail
/// # use enum_map::Enum;
/// # use strum::{EnumDiscriminants, EnumString, IntoStaticStr};
/// # use tagtable::{Tagged, reducer};
/// # #[derive(Debug, Clone, PartialEq)]
/// # struct Counter { count: i64 }
/// #[derive(Debug, EnumDiscriminants, Tagged)]
/// #[strum_discriminants(derive(Enum, IntoStaticStr, EnumString))]
/// enum Action { Increment, Decrement }
///
/// let reduce = reducer! {
///     Counter, Action;
///     ActionDiscriminants::Increment => |s: &Counter, _: &Action| Ok(Counter { count: s.count + 1 }),
/// };
/// ```
#[macro_export]
macro_rules! reducer {
    ($state:ty, $action:ty; $($tag:pat => $handler:expr),+ $(,)?) => {
        $crate::Reducer::<$state, $action>::from_fn(|tag| match tag {
            $( $tag => $crate::reducer::transition($handler), )+
        })
    };
}

#[cfg(test)]
mod tests {
    use enum_map::Enum;
    use parking_lot::Mutex;
    use strum::{EnumDiscriminants, EnumString, IntoStaticStr};

    use super::*;
    use crate::tagged::Envelope;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        count: i64,
    }

    #[derive(Debug, EnumDiscriminants, tagtable_derive::Tagged)]
    #[strum_discriminants(derive(Enum, IntoStaticStr, EnumString))]
    #[strum_discriminants(strum(serialize_all = "snake_case"))]
    enum CounterAction {
        Increment,
        Decrement,
        Add(i64),
    }

    fn counter_reducer() -> Reducer<Counter, CounterAction> {
        reducer! {
            Counter, CounterAction;
            CounterActionDiscriminants::Increment => |s: &Counter, _: &CounterAction| {
                Ok(Counter { count: s.count + 1 })
            },
            CounterActionDiscriminants::Decrement => |s: &Counter, _: &CounterAction| {
                Ok(Counter { count: s.count - 1 })
            },
            CounterActionDiscriminants::Add => |s: &Counter, a: &CounterAction| match a {
                CounterAction::Add(n) => Ok(Counter { count: s.count + n }),
                _ => Ok(s.clone()),
            },
        }
    }

    #[test]
    fn reduce_selects_handler_by_tag() {
        let reduce = counter_reducer();
        let state = Counter { count: 5 };
        assert_eq!(reduce.reduce(&state, &CounterAction::Increment), Ok(Counter { count: 6 }));
        assert_eq!(reduce.reduce(&state, &CounterAction::Decrement), Ok(Counter { count: 4 }));
        assert_eq!(reduce.reduce(&state, &CounterAction::Add(10)), Ok(Counter { count: 15 }));
    }

    #[test]
    fn reduce_all_folds_in_order() {
        let reduce = counter_reducer();
        let actions = [
            CounterAction::Add(3),
            CounterAction::Increment,
            CounterAction::Decrement,
            CounterAction::Decrement,
        ];
        let state = reduce.reduce_all(Counter { count: 0 }, &actions).unwrap();
        assert_eq!(state, Counter { count: 2 });
    }

    #[test]
    fn foreign_discriminant_is_unhandled() {
        let calls = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&calls);
        let reduce = Reducer::<Counter, Envelope<CounterActionDiscriminants>>::from_fn(move |_| {
            let seen = Arc::clone(&seen);
            transition(move |s: &Counter, _: &Envelope<CounterActionDiscriminants>| {
                *seen.lock() += 1;
                Ok(s.clone())
            })
        });

        let err = reduce
            .reduce(&Counter { count: 5 }, &Envelope::raw("reset", ()))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Unhandled {
                discriminant: "reset".to_string()
            }
        );
        assert_eq!(*calls.lock(), 0);

        reduce
            .reduce(&Counter { count: 5 }, &Envelope::raw("increment", ()))
            .unwrap();
        assert_eq!(*calls.lock(), 1);
    }

    #[test]
    fn partial_table_reports_gap_at_dispatch() {
        let reduce = build_reducer(
            Reducer::<Counter, CounterAction>::builder()
                .on(
                    CounterActionDiscriminants::Increment,
                    pure(|s: &Counter, _: &CounterAction| Counter { count: s.count + 1 }),
                )
                .build_partial(),
        );
        assert!(reduce.reduce(&Counter { count: 0 }, &CounterAction::Increment).is_ok());
        let err = reduce
            .reduce(&Counter { count: 0 }, &CounterAction::Add(1))
            .unwrap_err();
        assert!(err.is_unhandled());
        assert_eq!(err.discriminant(), "add");
    }

    #[test]
    fn as_fn_matches_reduce() {
        let reduce = counter_reducer();
        let f = reduce.as_fn();
        assert_eq!(f(&Counter { count: 1 }, &CounterAction::Increment), Ok(Counter { count: 2 }));
    }
}
