//! Selection change notifications.
//!
//! Handlers only see the event arguments, never the engine, so a handler
//! cannot start a nested selection change while one is in flight.

use crate::types::{CellRange, CellType};

/// Arguments of the cancelable "selection changing" notification.
///
/// The proposed range is read-only; a handler can only accept or veto it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChangingArgs {
    panel: CellType,
    range: CellRange,
    cancel: bool,
}

impl SelectionChangingArgs {
    pub fn new(panel: CellType, range: CellRange) -> Self {
        Self {
            panel,
            range,
            cancel: false,
        }
    }

    pub fn panel(&self) -> CellType {
        self.panel
    }

    /// The proposed selection
    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Veto the change; the current selection is kept.
    pub fn cancel(&mut self) {
        self.cancel = true;
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel
    }
}

/// Arguments of the "selection changed" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChangedArgs {
    pub panel: CellType,
    /// The committed selection
    pub range: CellRange,
}

/// Handle returned when registering a listener, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ChangingHandler = Box<dyn FnMut(&mut SelectionChangingArgs)>;
type ChangedHandler = Box<dyn FnMut(&SelectionChangedArgs)>;

/// Listener registry for selection notifications.
#[derive(Default)]
pub struct SelectionEvents {
    changing: Vec<(ListenerId, ChangingHandler)>,
    changed: Vec<(ListenerId, ChangedHandler)>,
    next_id: u64,
}

impl std::fmt::Debug for SelectionEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEvents")
            .field("changing", &self.changing.len())
            .field("changed", &self.changed.len())
            .finish()
    }
}

impl SelectionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    /// Register a handler run before every selection change.
    pub fn on_changing(
        &mut self,
        handler: impl FnMut(&mut SelectionChangingArgs) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.changing.push((id, Box::new(handler)));
        id
    }

    /// Register a handler run after every committed selection change.
    pub fn on_changed(&mut self, handler: impl FnMut(&SelectionChangedArgs) + 'static) -> ListenerId {
        let id = self.next_id();
        self.changed.push((id, Box::new(handler)));
        id
    }

    /// Remove a listener of either kind. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.changing.len() + self.changed.len();
        self.changing.retain(|(listener, _)| *listener != id);
        self.changed.retain(|(listener, _)| *listener != id);
        before != self.changing.len() + self.changed.len()
    }

    /// Run every changing handler. Returns false if any of them canceled.
    pub(crate) fn raise_changing(&mut self, args: &mut SelectionChangingArgs) -> bool {
        for (_, handler) in &mut self.changing {
            handler(args);
        }
        !args.is_canceled()
    }

    pub(crate) fn raise_changed(&mut self, args: &SelectionChangedArgs) {
        for (_, handler) in &mut self.changed {
            handler(args);
        }
    }
}
