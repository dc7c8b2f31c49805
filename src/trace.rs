//! Observation hooks for thunk evaluation.
//!
//! Every time a [`Thunk`](crate::control::Thunk) is forced, and every time a
//! lazy right fold takes a step or resumes its continuation, a [`ForceEvent`]
//! is reported to the observers installed on the current thread. A
//! visualizer can replay these events to animate which suspensions were
//! evaluated and which were never touched.
//!
//! Observation is read-only: installing an observer never changes what gets
//! evaluated or in which order.
//!
//! # Examples
//!
//! ```rust
//! use lazylist::persistent::LazyList;
//! use lazylist::trace::{Recorder, observe};
//!
//! let recorder = Recorder::new();
//! let found = observe(recorder.clone(), || {
//!     LazyList::count_from(1_u32).exists(|value| *value == 3)
//! });
//!
//! assert!(found);
//! // Three heads were evaluated; nothing past the match was touched.
//! assert_eq!(recorder.heads_evaluated().len(), 3);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Identifier of a cons cell, unique per thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn fresh() -> Self {
        NEXT_NODE_ID.with(|next| {
            let id = next.get();
            next.set(id.wrapping_add(1));
            Self(id)
        })
    }

    /// Returns the raw identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// What a thunk computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ThunkRole {
    /// The element of a cons cell.
    ///
    /// Lists that share a head thunk, like the result of `take` and its
    /// source, report it under the cell that first created it.
    Head(NodeId),
    /// The remainder of the sequence after a cons cell.
    Tail(NodeId),
    /// A free-standing thunk not attached to any list.
    Value,
}

impl ThunkRole {
    /// Returns the cell this thunk belongs to, if any.
    pub const fn node(self) -> Option<NodeId> {
        match self {
            Self::Head(node) | Self::Tail(node) => Some(node),
            Self::Value => None,
        }
    }
}

impl fmt::Display for ThunkRole {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head(node) => write!(formatter, "head{node}"),
            Self::Tail(node) => write!(formatter, "tail{node}"),
            Self::Value => write!(formatter, "value"),
        }
    }
}

/// A single step in the evaluation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum ForceEvent {
    /// The thunk ran its computation and cached the result.
    Evaluated {
        /// The forced thunk.
        role: ThunkRole,
    },
    /// The thunk was forced again and answered from its cache.
    Cached {
        /// The forced thunk.
        role: ThunkRole,
    },
    /// The computation failed; the thunk stays unevaluated.
    Failed {
        /// The forced thunk.
        role: ThunkRole,
    },
    /// A right fold applied its step function at this depth.
    FoldStep {
        /// Number of cells already passed.
        depth: usize,
    },
    /// The step function at `depth - 1` forced its continuation.
    Resumed {
        /// Depth of the fold that is being resumed.
        depth: usize,
    },
    /// A right fold reached the end of the list and produced its seed.
    FoldEnd {
        /// Length of the traversed prefix.
        depth: usize,
    },
}

impl ForceEvent {
    /// Returns the thunk this event concerns, if it concerns one.
    pub const fn role(&self) -> Option<ThunkRole> {
        match self {
            Self::Evaluated { role } | Self::Cached { role } | Self::Failed { role } => Some(*role),
            Self::FoldStep { .. } | Self::Resumed { .. } | Self::FoldEnd { .. } => None,
        }
    }
}

/// Receives [`ForceEvent`]s from the current thread.
pub trait ForceObserver {
    /// Called once per event, in evaluation order.
    fn on_event(&self, event: &ForceEvent);
}

impl<F: Fn(&ForceEvent)> ForceObserver for F {
    fn on_event(&self, event: &ForceEvent) {
        self(event);
    }
}

thread_local! {
    static OBSERVERS: RefCell<Vec<Rc<dyn ForceObserver>>> = const { RefCell::new(Vec::new()) };
    static NEXT_NODE_ID: Cell<u64> = const { Cell::new(0) };
}

/// Pops the observer it was created for, even if the body panics.
struct Installed;

impl Drop for Installed {
    fn drop(&mut self) {
        OBSERVERS.with_borrow_mut(|observers| {
            observers.pop();
        });
    }
}

/// Runs `body` with `observer` receiving every event raised on this thread.
///
/// Calls can be nested; all installed observers see every event.
///
/// # Examples
///
/// ```rust
/// use lazylist::control::Thunk;
/// use lazylist::trace::{ForceEvent, ThunkRole, observe};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let thunk = Thunk::new(|| 42);
///
/// observe(move |event: &ForceEvent| sink.borrow_mut().push(*event), || {
///     thunk.force();
///     thunk.force();
/// });
///
/// assert_eq!(
///     *seen.borrow(),
///     vec![
///         ForceEvent::Evaluated { role: ThunkRole::Value },
///         ForceEvent::Cached { role: ThunkRole::Value },
///     ]
/// );
/// ```
pub fn observe<O, R, B>(observer: O, body: B) -> R
where
    O: ForceObserver + 'static,
    B: FnOnce() -> R,
{
    OBSERVERS.with_borrow_mut(|observers| observers.push(Rc::new(observer)));
    let _installed = Installed;
    body()
}

/// Returns whether any observer is installed on this thread.
pub fn is_observed() -> bool {
    OBSERVERS.with_borrow(|observers| !observers.is_empty())
}

pub(crate) fn emit(event: ForceEvent) {
    // Observers may themselves call `observe`, so the list is not borrowed
    // while they run.
    let observers = OBSERVERS.with_borrow(|observers| {
        if observers.is_empty() {
            None
        } else {
            Some(observers.clone())
        }
    });
    if let Some(observers) = observers {
        for observer in &observers {
            observer.on_event(&event);
        }
    }
}

/// An observer that stores every event it receives.
///
/// Clones share the same storage, so one clone can be handed to
/// [`observe`] while another is inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<ForceEvent>>>,
}

impl Recorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<ForceEvent> {
        self.events.borrow().clone()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Counts the events matching `predicate`.
    pub fn count<P>(&self, predicate: P) -> usize
    where
        P: Fn(&ForceEvent) -> bool,
    {
        self.events
            .borrow()
            .iter()
            .filter(|event| predicate(event))
            .count()
    }

    /// Number of computations that actually ran to completion.
    pub fn evaluations(&self) -> usize {
        self.count(|event| matches!(event, ForceEvent::Evaluated { .. }))
    }

    /// Cells whose head was evaluated, in evaluation order.
    pub fn heads_evaluated(&self) -> Vec<NodeId> {
        self.evaluated_nodes(|role| match role {
            ThunkRole::Head(node) => Some(node),
            _ => None,
        })
    }

    /// Cells whose tail was evaluated, in evaluation order.
    pub fn tails_evaluated(&self) -> Vec<NodeId> {
        self.evaluated_nodes(|role| match role {
            ThunkRole::Tail(node) => Some(node),
            _ => None,
        })
    }

    /// Depths at which a fold continuation was resumed.
    pub fn resumed_depths(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ForceEvent::Resumed { depth } => Some(*depth),
                _ => None,
            })
            .collect()
    }

    fn evaluated_nodes<F>(&self, select: F) -> Vec<NodeId>
    where
        F: Fn(ThunkRole) -> Option<NodeId>,
    {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ForceEvent::Evaluated { role } => select(*role),
                _ => None,
            })
            .collect()
    }
}

impl ForceObserver for Recorder {
    fn on_event(&self, event: &ForceEvent) {
        self.events.borrow_mut().push(*event);
    }
}
