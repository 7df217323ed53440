//! Dismissal wiring shared by every overlay kind.
//!
//! Each overlay carries a [`TriggerTable`] that says what happens for every
//! way it can be dismissed. Triggers that arrive through the shared document
//! (Escape, clicks outside the overlay, pointer motion for drags) need a
//! document-level listener; [`DismissalController`] owns those listeners and
//! drops all of an overlay's listeners in one call during teardown.

use crate::overlay::OverlayId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    CloseButton,
    Escape,
    OutsideClick,
    ItemSelected,
    Cancel,
    Confirm,
    /// Enter pressed inside a prompt's input.
    InputEnter,
}

impl Trigger {
    /// Document-level listener this trigger needs, if any. Other triggers are
    /// delivered to the overlay's own controls.
    pub const fn listener(self) -> Option<ListenerKind> {
        match self {
            Trigger::Escape => Some(ListenerKind::KeyDown),
            Trigger::OutsideClick => Some(ListenerKind::Click),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Close,
    /// Tear the menu down, then run the selected item's action.
    CloseThenRunItem,
    /// Run the cancel callback, then tear down.
    CancelThenClose,
    /// Tear down, then run the confirm callback.
    CloseThenConfirm,
    /// Validate the input; on success tear down, then run the submit callback.
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arming {
    /// Registered while the overlay is built.
    Immediate,
    /// Registered on the next tick, after the event that opened the overlay
    /// has finished dispatching.
    NextTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    trigger: Trigger,
    response: Response,
    arming: Arming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerTable {
    rows: Vec<Row>,
}

impl TriggerTable {
    fn new() -> Self {
        Self { rows: Vec::new() }
    }

    fn row(mut self, trigger: Trigger, response: Response, arming: Arming) -> Self {
        self.rows.push(Row {
            trigger,
            response,
            arming,
        });
        self
    }

    pub fn for_window_popup(close_on_escape: bool) -> Self {
        let table = Self::new().row(Trigger::CloseButton, Response::Close, Arming::Immediate);
        if close_on_escape {
            table.row(Trigger::Escape, Response::Close, Arming::Immediate)
        } else {
            table
        }
    }

    pub fn for_context_menu() -> Self {
        Self::new()
            .row(Trigger::OutsideClick, Response::Close, Arming::NextTick)
            .row(Trigger::Escape, Response::Close, Arming::NextTick)
            .row(
                Trigger::ItemSelected,
                Response::CloseThenRunItem,
                Arming::Immediate,
            )
    }

    pub fn for_confirm_dialog() -> Self {
        Self::new()
            .row(Trigger::Escape, Response::Close, Arming::Immediate)
            .row(Trigger::Cancel, Response::CancelThenClose, Arming::Immediate)
            .row(Trigger::Confirm, Response::CloseThenConfirm, Arming::Immediate)
    }

    pub fn for_prompt_dialog() -> Self {
        Self::new()
            .row(Trigger::Escape, Response::Close, Arming::Immediate)
            .row(Trigger::Cancel, Response::CancelThenClose, Arming::Immediate)
            .row(Trigger::Confirm, Response::Submit, Arming::Immediate)
            .row(Trigger::InputEnter, Response::Submit, Arming::Immediate)
    }

    pub fn lookup(&self, trigger: Trigger) -> Option<Response> {
        self.rows
            .iter()
            .find(|row| row.trigger == trigger)
            .map(|row| row.response)
    }

    pub fn handles(&self, trigger: Trigger) -> bool {
        self.lookup(trigger).is_some()
    }

    /// Document listeners to register at the given arming stage.
    pub fn listeners(&self, arming: Arming) -> Vec<ListenerKind> {
        let mut kinds = Vec::new();
        for row in self.rows.iter().filter(|row| row.arming == arming) {
            if let Some(kind) = row.trigger.listener()
                && !kinds.contains(&kind)
            {
                kinds.push(kind);
            }
        }
        kinds
    }

    pub fn has_deferred_listeners(&self) -> bool {
        !self.listeners(Arming::NextTick).is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    KeyDown,
    Click,
    PointerMove,
    PointerUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy)]
struct Listener {
    id: ListenerId,
    owner: OverlayId,
    kind: ListenerKind,
}

/// Registry of document-level listeners, keyed by the overlay that owns them.
#[derive(Debug, Default)]
pub struct DismissalController {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl DismissalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one document listener for `owner`. Registering the same kind
    /// twice for one owner returns the existing listener.
    pub fn listen(&mut self, owner: OverlayId, kind: ListenerKind) -> ListenerId {
        if let Some(existing) = self
            .listeners
            .iter()
            .find(|l| l.owner == owner && l.kind == kind)
        {
            return existing.id;
        }
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push(Listener { id, owner, kind });
        id
    }

    /// Register the listeners `table` needs at `arming`. Returns how many were
    /// added.
    pub fn wire(&mut self, owner: OverlayId, table: &TriggerTable, arming: Arming) -> usize {
        let before = self.listeners.len();
        for kind in table.listeners(arming) {
            self.listen(owner, kind);
        }
        self.listeners.len() - before
    }

    /// Remove every listener owned by `owner`. Returns how many were removed.
    pub fn unwire(&mut self, owner: OverlayId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.owner != owner);
        before - self.listeners.len()
    }

    /// Snapshot of listeners of `kind`, in registration order.
    pub fn snapshot(&self, kind: ListenerKind) -> Vec<(ListenerId, OverlayId)> {
        self.listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| (l.id, l.owner))
            .collect()
    }

    /// Whether `id` is still registered. Dispatch checks this before each
    /// call because an earlier listener may have torn a later one down.
    pub fn is_live(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn count_for(&self, owner: OverlayId) -> usize {
        self.listeners.iter().filter(|l| l.owner == owner).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_escape_is_configurable() {
        let with = TriggerTable::for_window_popup(true);
        let without = TriggerTable::for_window_popup(false);
        assert_eq!(with.lookup(Trigger::Escape), Some(Response::Close));
        assert_eq!(without.lookup(Trigger::Escape), None);
        assert!(with.handles(Trigger::CloseButton));
        assert!(!with.handles(Trigger::OutsideClick));
    }

    #[test]
    fn context_menu_listeners_are_deferred() {
        let table = TriggerTable::for_context_menu();
        assert!(table.listeners(Arming::Immediate).is_empty());
        assert_eq!(
            table.listeners(Arming::NextTick),
            vec![ListenerKind::Click, ListenerKind::KeyDown]
        );
        assert!(table.has_deferred_listeners());
    }

    #[test]
    fn prompt_enter_and_confirm_share_submit() {
        let table = TriggerTable::for_prompt_dialog();
        assert_eq!(table.lookup(Trigger::Confirm), Some(Response::Submit));
        assert_eq!(table.lookup(Trigger::InputEnter), Some(Response::Submit));
        assert_eq!(
            TriggerTable::for_confirm_dialog().lookup(Trigger::Confirm),
            Some(Response::CloseThenConfirm)
        );
    }

    #[test]
    fn dialogs_ignore_outside_clicks() {
        for table in [
            TriggerTable::for_confirm_dialog(),
            TriggerTable::for_prompt_dialog(),
        ] {
            assert!(!table.handles(Trigger::OutsideClick));
        }
    }

    #[test]
    fn unwire_removes_everything_for_owner() {
        let mut ctl = DismissalController::new();
        let a = OverlayId(1);
        let b = OverlayId(2);
        ctl.wire(a, &TriggerTable::for_window_popup(true), Arming::Immediate);
        ctl.listen(a, ListenerKind::PointerMove);
        ctl.listen(a, ListenerKind::PointerUp);
        ctl.wire(b, &TriggerTable::for_confirm_dialog(), Arming::Immediate);
        assert_eq!(ctl.count_for(a), 3);
        assert_eq!(ctl.unwire(a), 3);
        assert_eq!(ctl.len(), 1);
        assert_eq!(ctl.unwire(a), 0);
    }

    #[test]
    fn listen_is_deduplicated_per_owner() {
        let mut ctl = DismissalController::new();
        let owner = OverlayId(7);
        let first = ctl.listen(owner, ListenerKind::KeyDown);
        let second = ctl.listen(owner, ListenerKind::KeyDown);
        assert_eq!(first, second);
        assert_eq!(ctl.len(), 1);
        assert!(ctl.is_live(first));
        ctl.unwire(owner);
        assert!(!ctl.is_live(first));
    }

    #[test]
    fn snapshot_keeps_registration_order() {
        let mut ctl = DismissalController::new();
        ctl.listen(OverlayId(3), ListenerKind::KeyDown);
        ctl.listen(OverlayId(1), ListenerKind::Click);
        ctl.listen(OverlayId(2), ListenerKind::KeyDown);
        let owners: Vec<_> = ctl
            .snapshot(ListenerKind::KeyDown)
            .into_iter()
            .map(|(_, o)| o)
            .collect();
        assert_eq!(owners, vec![OverlayId(3), OverlayId(2)]);
    }
}
