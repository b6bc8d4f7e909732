//! Dispatch tables: side-effecting `(action) -> ()` handlers keyed by tag.
use std::{fmt, sync::Arc};

use log::{trace, warn};

use crate::{
    error::{Error, Result},
    table::{HandlerTable, TableBuilder},
    tagged::Tagged,
};

/// A handler run for its effects.
pub trait DispatchHandler<A>: Send + Sync {
    fn handle(&self, action: &A);
}

impl<A, F> DispatchHandler<A> for F
where
    F: Fn(&A) + Send + Sync,
{
    fn handle(&self, action: &A) {
        self(action)
    }
}

pub type DispatchEntry<A> = Arc<dyn DispatchHandler<A>>;

pub type DispatchTable<A> = HandlerTable<<A as Tagged>::Tag, dyn DispatchHandler<A>>;

/// Turn a dispatch handler into a table entry.
pub fn effect<A, H>(handler: H) -> DispatchEntry<A>
where
    H: DispatchHandler<A> + 'static,
{
    Arc::new(handler)
}

/// The function returned by [`build_dispatch`].
///
/// Exactly one handler fires per successful call. Effects of different tags are
/// not ordered with respect to each other beyond the order of the calls.
pub struct Dispatcher<A: Tagged> {
    table: DispatchTable<A>,
}

/// Build a dispatcher from a table covering every tag of `A`.
pub fn build_dispatch<A: Tagged>(table: DispatchTable<A>) -> Dispatcher<A> {
    Dispatcher { table }
}

impl<A: Tagged> Dispatcher<A> {
    pub fn from_fn(f: impl FnMut(A::Tag) -> DispatchEntry<A>) -> Self {
        build_dispatch(HandlerTable::from_fn(f))
    }

    pub fn builder() -> TableBuilder<A::Tag, dyn DispatchHandler<A>> {
        TableBuilder::new()
    }

    /// Run the handler registered for the action's tag.
    ///
    /// Fails with [`Error::Unhandled`] without running anything when the
    /// discriminant has no handler.
    pub fn dispatch(&self, action: &A) -> Result<()> {
        let Some(handler) = action.tag().and_then(|tag| self.table.get(tag)) else {
            warn!("No dispatch handler for action `{}`", action.discriminant());
            return Err(Error::Unhandled {
                discriminant: action.discriminant().to_owned(),
            });
        };

        trace!("Dispatching action `{}`", action.discriminant());
        handler.handle(action);
        Ok(())
    }

    pub fn as_fn(&self) -> impl Fn(&A) -> Result<()> + '_ {
        move |action: &A| self.dispatch(action)
    }

    pub fn table(&self) -> &DispatchTable<A> {
        &self.table
    }
}

impl<A: Tagged> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Dispatcher {
            table: self.table.clone(),
        }
    }
}

impl<A: Tagged> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .finish()
    }
}

/// Build a [`Dispatcher`] from `tag => handler` arms, see [`reducer!`](crate::reducer).
#[macro_export]
macro_rules! dispatcher {
    ($action:ty; $($tag:pat => $handler:expr),+ $(,)?) => {
        $crate::Dispatcher::<$action>::from_fn(|tag| match tag {
            $( $tag => $crate::dispatch::effect($handler), )+
        })
    };
}
