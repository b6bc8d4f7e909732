//! Handler tables keyed by a [`Tag`].
//!
//! A [`HandlerTable`] holds one slot per tag. [`HandlerTable::from_fn`] fills every
//! slot from a closure over the tag, so the compiler's exhaustiveness check on the
//! closure's `match` is what makes the table total. [`TableBuilder`] registers
//! handlers one by one and checks totality when it is finalized instead.
use std::{any::type_name, fmt, marker::PhantomData, sync::Arc};

use log::debug;

use crate::{
    error::{Error, Result},
    tagged::Tag,
};

/// Immutable mapping from every tag of `K` to a handler `H`.
///
/// Cloning is cheap: handlers are reference counted and shared between clones.
pub struct HandlerTable<K, H: ?Sized> {
    slots: Box<[Option<Arc<H>>]>,
    _tag: PhantomData<fn() -> K>,
}

impl<K: Tag, H: ?Sized> HandlerTable<K, H> {
    /// Build a total table by asking `f` for the handler of every tag.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enum_map::Enum;
    /// use strum::{EnumString, IntoStaticStr};
    /// use tagtable::HandlerTable;
    ///
    /// #[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, IntoStaticStr, EnumString)]
    /// enum Op { Push, Pop }
    ///
    /// let table = HandlerTable::<Op, dyn Fn() -> &'static str>::from_fn(|op| match op {
    ///     Op::Push => Arc::new(|| "push"),
    ///     Op::Pop => Arc::new(|| "pop"),
    /// });
    /// assert_eq!(table.get(Op::Pop).map(|h| h()), Some("pop"));
    /// ```
    pub fn from_fn(mut f: impl FnMut(K) -> Arc<H>) -> Self {
        let slots: Box<[Option<Arc<H>>]> = K::all().map(|tag| Some(f(tag))).collect();
        debug!(
            "Built total handler table for `{}` ({} handlers)",
            type_name::<K>(),
            slots.len()
        );
        HandlerTable {
            slots,
            _tag: PhantomData,
        }
    }

    /// Start a run-time checked table, see [`TableBuilder`].
    pub fn builder() -> TableBuilder<K, H> {
        TableBuilder::new()
    }

    /// The handler registered for `tag`.
    ///
    /// Always `Some` for tables returned by [`HandlerTable::from_fn`] and
    /// [`TableBuilder::build`]; only [`TableBuilder::build_partial`] leaves gaps.
    pub fn get(&self, tag: K) -> Option<&H> {
        self.slots.get(tag.into_usize())?.as_deref()
    }

    pub fn contains(&self, tag: K) -> bool {
        self.get(tag).is_some()
    }

    /// Tags with a registered handler, in declaration order.
    pub fn tags(&self) -> impl Iterator<Item = K> + '_ {
        K::all().filter(|&tag| self.contains(tag))
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every tag of `K` has a handler.
    pub fn is_total(&self) -> bool {
        self.len() == K::LENGTH
    }
}

impl<K, H: ?Sized> Clone for HandlerTable<K, H> {
    fn clone(&self) -> Self {
        HandlerTable {
            slots: self.slots.clone(),
            _tag: PhantomData,
        }
    }
}

impl<K: Tag, H: ?Sized> fmt::Debug for HandlerTable<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tags().map(Tag::name)).finish()
    }
}

/// Registers handlers one tag at a time.
///
/// [`TableBuilder::build`] fails unless the registered tags are exactly the full
/// set of `K`, so a missing handler surfaces when the table is built rather than
/// when the first value of that tag arrives.
pub struct TableBuilder<K, H: ?Sized> {
    slots: Vec<Option<Arc<H>>>,
    duplicate: Option<K>,
}

impl<K: Tag, H: ?Sized> TableBuilder<K, H> {
    pub fn new() -> Self {
        TableBuilder {
            slots: K::all().map(|_| None).collect(),
            duplicate: None,
        }
    }

    /// Register `handler` for `tag`.
    pub fn on(mut self, tag: K, handler: Arc<H>) -> Self {
        let slot = &mut self.slots[tag.into_usize()];
        if slot.is_some() && self.duplicate.is_none() {
            self.duplicate = Some(tag);
        }
        *slot = Some(handler);
        self
    }

    /// Register the same `handler` for several tags.
    pub fn on_many(self, tags: impl IntoIterator<Item = K>, handler: Arc<H>) -> Self {
        tags.into_iter()
            .fold(self, |builder, tag| builder.on(tag, Arc::clone(&handler)))
    }

    /// Tags still waiting for a handler, in declaration order.
    pub fn missing(&self) -> impl Iterator<Item = K> + '_ {
        K::all().filter(|tag| self.slots[tag.into_usize()].is_none())
    }

    /// Finalize the table, checking that every tag has exactly one handler.
    pub fn build(self) -> Result<HandlerTable<K, H>> {
        if let Some(tag) = self.duplicate {
            return Err(Error::DuplicateHandler {
                table: type_name::<K>(),
                tag: tag.name(),
            });
        }

        let missing: Vec<&'static str> = self.missing().map(Tag::name).collect();
        if !missing.is_empty() {
            return Err(Error::IncompleteTable {
                table: type_name::<K>(),
                missing,
            });
        }

        Ok(self.finish())
    }

    /// Finalize without the totality check.
    ///
    /// Tags left unregistered are reported as [`Error::Unhandled`] when a value
    /// carrying them is dispatched. Useful when a consumer knows fewer variants
    /// than the producer declares.
    pub fn build_partial(self) -> HandlerTable<K, H> {
        self.finish()
    }

    fn finish(self) -> HandlerTable<K, H> {
        let table = HandlerTable {
            slots: self.slots.into_boxed_slice(),
            _tag: PhantomData,
        };
        debug!(
            "Built handler table for `{}` ({}/{} handlers)",
            type_name::<K>(),
            table.len(),
            K::LENGTH
        );
        table
    }
}

impl<K: Tag, H: ?Sized> Default for TableBuilder<K, H> {
    fn default() -> Self {
        Self::new()
    }
}
