//! Single owner of every open overlay.
//!
//! `OverlayManager` composes the registry, position resolver, drag and
//! dismissal controllers around a host [`Surface`]. The four factory entry
//! points live in [`factory`]; this module holds the shared teardown path,
//! deferred work, and event dispatch.
//!
//! Dispatch mirrors a document event model: an input event first reaches the
//! control under the pointer (or the focused input), then every document-level
//! listener in registration order. A listener removed by an earlier handler in
//! the same dispatch is skipped.

pub mod factory;
pub mod input;

pub use factory::{ConfirmOptions, MenuItem, PopupContent, PopupOptions, PromptOptions};
pub use input::InputState;

use std::collections::{BTreeMap, VecDeque};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tracing::{debug, trace};

use crate::config::OverlayConfig;
use crate::dismissal::{
    Arming, DismissalController, ListenerKind, Response, Trigger, TriggerTable,
};
use crate::drag::DragController;
use crate::element::{Element, Role};
use crate::geometry::Point;
use crate::keybindings::{Action, KeyBindings};
use crate::overlay::{CloseHandle, OverlayId, OverlayKind};
use crate::position::PositionResolver;
use crate::registry::{self, OverlayRegistry};
use crate::surface::{NodeId, Placement, Surface};

/// Caller-supplied reaction. Receives the manager so it can open or close
/// other overlays.
pub type Callback<S> = Box<dyn FnOnce(&mut OverlayManager<S>)>;

/// Prompt submission; receives the trimmed input.
pub type SubmitCallback<S> = Box<dyn FnOnce(&mut OverlayManager<S>, String)>;

enum State<S: Surface> {
    Popup {
        drag: DragController,
        on_close: Option<Callback<S>>,
    },
    Menu {
        actions: Vec<Option<Callback<S>>>,
    },
    Confirm {
        on_confirm: Option<Callback<S>>,
        on_cancel: Option<Callback<S>>,
    },
    Prompt {
        input: InputState,
        allow_empty: bool,
        on_confirm: Option<SubmitCallback<S>>,
        on_cancel: Option<Callback<S>>,
    },
}

struct Instance<S: Surface> {
    kind: OverlayKind,
    node: NodeId,
    /// Requested top-left, clamped on placement. `None` for centered dialogs.
    anchor: Option<Point>,
    triggers: TriggerTable,
    state: State<S>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Measure, clamp into the viewport, then show.
    Place(OverlayId),
    /// Register listeners that must not see the event that opened the overlay.
    Arm(OverlayId),
    /// Focus and select the prompt input.
    Focus(OverlayId),
}

impl Deferred {
    fn overlay(self) -> OverlayId {
        match self {
            Deferred::Place(id) | Deferred::Arm(id) | Deferred::Focus(id) => id,
        }
    }
}

pub struct OverlayManager<S: Surface> {
    surface: S,
    config: OverlayConfig,
    resolver: PositionResolver,
    keys: KeyBindings,
    registry: OverlayRegistry,
    dismissal: DismissalController,
    instances: BTreeMap<OverlayId, Instance<S>>,
    deferred: VecDeque<Deferred>,
    focused: Option<OverlayId>,
    next_id: u64,
}

impl<S: Surface> OverlayManager<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, OverlayConfig::default())
    }

    pub fn with_config(surface: S, config: OverlayConfig) -> Self {
        Self {
            surface,
            resolver: PositionResolver::new(config.margin),
            config,
            keys: KeyBindings::default(),
            registry: OverlayRegistry::new(),
            dismissal: DismissalController::new(),
            instances: BTreeMap::new(),
            deferred: VecDeque::new(),
            focused: None,
            next_id: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn key_bindings(&self) -> &KeyBindings {
        &self.keys
    }

    pub fn is_open(&self, kind: OverlayKind) -> bool {
        self.registry.is_open(kind)
    }

    /// Handle of the registered overlay of `kind`, if any.
    pub fn handle_for(&self, kind: OverlayKind) -> Option<CloseHandle> {
        self.registry.get(kind)
    }

    pub fn is_alive(&self, handle: CloseHandle) -> bool {
        self.instances.contains_key(&handle.id)
    }

    /// Number of live overlays, including popups left open beside a newer one.
    pub fn live_count(&self) -> usize {
        self.instances.len()
    }

    /// Number of document-level listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.dismissal.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    pub fn node_of(&self, handle: CloseHandle) -> Option<NodeId> {
        self.instances.get(&handle.id).map(|i| i.node)
    }

    /// Current text of a prompt dialog's input.
    pub fn prompt_value(&self, handle: CloseHandle) -> Option<&str> {
        match self.instances.get(&handle.id).map(|i| &i.state) {
            Some(State::Prompt { input, .. }) => Some(input.value()),
            _ => None,
        }
    }

    pub fn is_dragging(&self, handle: CloseHandle) -> bool {
        matches!(
            self.instances.get(&handle.id).map(|i| &i.state),
            Some(State::Popup { drag, .. }) if drag.is_dragging()
        )
    }

    /// Tear down the overlay behind `handle`. A second call is a no-op.
    pub fn close(&mut self, handle: CloseHandle) -> bool {
        self.teardown(handle.id)
    }

    /// Tear down the registered overlay of `kind`, if any.
    pub fn close_kind(&mut self, kind: OverlayKind) -> bool {
        match self.registry.close(kind) {
            Some(handle) => self.teardown(handle.id),
            None => false,
        }
    }

    /// Close everything, dialogs and menus before the popup. Also reaches
    /// popups that were opened beside another with `close_existing = false`.
    pub fn close_all(&mut self) -> usize {
        let mut closed = 0;
        for handle in self.registry.close_all() {
            if self.teardown(handle.id) {
                closed += 1;
            }
        }
        let leftovers: Vec<OverlayId> = self.instances.keys().copied().collect();
        for id in leftovers {
            if self.teardown(id) {
                closed += 1;
            }
        }
        self.deferred.clear();
        debug!(closed, "closed all overlays");
        closed
    }

    /// Run deferred work queued before this call. Work queued while ticking
    /// waits for the next tick.
    pub fn tick(&mut self) -> usize {
        let pending: Vec<Deferred> = self.deferred.drain(..).collect();
        let mut ran = 0;
        for task in pending {
            let id = task.overlay();
            if let Deferred::Focus(_) = task
                && self.is_covered(id)
            {
                continue;
            }
            let Some(instance) = self.instances.get_mut(&id) else {
                continue;
            };
            match task {
                Deferred::Place(_) => {
                    let node = instance.node;
                    if let Some(anchor) = instance.anchor
                        && let Some(size) = self.surface.measure(node)
                    {
                        let position = self.resolver.resolve(anchor, size, self.surface.viewport());
                        self.surface.set_position(node, position);
                        trace!(id = id.raw(), ?anchor, ?position, "placed overlay");
                    }
                    self.surface.set_visible(node, true);
                }
                Deferred::Arm(_) => {
                    let added = self.dismissal.wire(id, &instance.triggers, Arming::NextTick);
                    trace!(id = id.raw(), added, "armed deferred listeners");
                }
                Deferred::Focus(_) => {
                    if let State::Prompt { input, .. } = &mut instance.state {
                        input.select_all();
                        self.surface.focus(instance.node, Role::Input, true);
                        self.focused = Some(id);
                    }
                }
            }
            ran += 1;
        }
        ran
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) => self.edit_focused_input(|input| input.insert_str(text)),
            _ => false,
        }
    }

    fn next_overlay_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Shared tail of every factory routine: mount hidden, wire immediate
    /// listeners, queue placement (and deferred listeners), register.
    fn install(
        &mut self,
        kind: OverlayKind,
        root: Element,
        placement: Placement,
        triggers: TriggerTable,
        state: State<S>,
        close_existing: bool,
    ) -> CloseHandle {
        if close_existing && self.close_kind(kind) {
            debug!(%kind, "replaced previous overlay");
        }
        let id = self.next_overlay_id();
        let node = self.surface.mount(root, kind.layer(), placement);
        let anchor = match placement {
            Placement::Anchored(point) => Some(point),
            Placement::Fill => None,
        };
        self.dismissal.wire(id, &triggers, Arming::Immediate);
        if triggers.has_deferred_listeners() {
            self.deferred.push_back(Deferred::Arm(id));
        }
        self.deferred.push_back(Deferred::Place(id));
        self.instances.insert(
            id,
            Instance {
                kind,
                node,
                anchor,
                triggers,
                state,
            },
        );
        if let Some(focused) = self.focused
            && self.is_covered(focused)
        {
            self.focused = None;
            self.surface.blur();
            debug!(id = focused.raw(), "input covered, focus released");
        }
        let handle = CloseHandle { id, kind };
        if let Some(previous) = self.registry.open(handle) {
            debug!(%kind, previous = previous.id.raw(), "previous overlay left open");
        }
        debug!(%kind, id = id.raw(), "opened overlay");
        handle
    }

    /// The single teardown path. Returns `false` if the overlay was already
    /// gone.
    fn teardown(&mut self, id: OverlayId) -> bool {
        let Some(instance) = self.instances.remove(&id) else {
            return false;
        };
        let listeners = self.dismissal.unwire(id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        let was_mounted = self.surface.unmount(instance.node);
        self.registry.forget(instance.kind, id);
        debug!(kind = %instance.kind, id = id.raw(), listeners, was_mounted, "closed overlay");

        for dependent in registry::dependents(instance.kind) {
            if let Some(handle) = self.registry.get(*dependent) {
                debug!(parent = %instance.kind, kind = %dependent, "cascade close");
                self.teardown(handle.id);
            }
        }

        if let State::Popup {
            on_close: Some(on_close),
            ..
        } = instance.state
            && was_mounted
        {
            on_close(self);
        }
        true
    }

    fn owner_of(&self, node: NodeId) -> Option<OverlayId> {
        self.instances
            .iter()
            .find(|(_, instance)| instance.node == node)
            .map(|(id, _)| *id)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let mut handled = self.handle_input_key(key);
        if self.keys.matches(Action::Dismiss, key) {
            handled |= self.broadcast(ListenerKind::KeyDown, |_| Some(Trigger::Escape));
        }
        handled
    }

    /// Target phase for keys: the focused prompt input.
    fn handle_input_key(&mut self, key: &KeyEvent) -> bool {
        let Some(id) = self.focused else {
            return false;
        };
        if self.keys.matches(Action::Submit, key) {
            return self.fire(id, Trigger::InputEnter, None);
        }
        if self.keys.matches(Action::DeleteBackward, key) {
            return self.edit_focused_input(InputState::delete_backward);
        }
        if self.keys.matches(Action::SelectAll, key) {
            return self.edit_focused_input(InputState::select_all);
        }
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.edit_focused_input(|input| input.insert(c))
            }
            _ => false,
        }
    }

    fn edit_focused_input(&mut self, edit: impl FnOnce(&mut InputState)) -> bool {
        let Some(id) = self.focused else {
            return false;
        };
        let Some(Instance {
            node,
            state: State::Prompt { input, .. },
            ..
        }) = self.instances.get_mut(&id)
        else {
            return false;
        };
        edit(input);
        self.surface.set_text(*node, Role::Input, input.value());
        self.surface.focus(*node, Role::Input, input.selected_all());
        true
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        let point = Point::from((mouse.column, mouse.row));
        match mouse.kind {
            MouseEventKind::Down(_) => {
                let target = self
                    .surface
                    .hit_test(point)
                    .and_then(|hit| self.owner_of(hit.node).map(|owner| (owner, hit.role)));
                let mut handled = false;
                if let Some((owner, role)) = target {
                    handled |= self.press(owner, role, point);
                }
                let target_owner = target.map(|(owner, _)| owner);
                handled |= self.broadcast(ListenerKind::Click, |owner| {
                    (Some(owner) != target_owner).then_some(Trigger::OutsideClick)
                });
                handled
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => self.drag_to(point),
            MouseEventKind::Up(_) => self.end_drags(),
            _ => false,
        }
    }

    /// Target phase for a pointer-down on one of an overlay's own elements.
    fn press(&mut self, owner: OverlayId, role: Role, point: Point) -> bool {
        match role {
            Role::CloseButton => self.fire(owner, Trigger::CloseButton, None),
            Role::MenuItem(index) => self.fire(owner, Trigger::ItemSelected, Some(index)),
            Role::CancelButton => self.fire(owner, Trigger::Cancel, None),
            Role::ConfirmButton => self.fire(owner, Trigger::Confirm, None),
            Role::Input => self.focus_input(owner),
            role if role.is_drag_handle() => self.begin_drag(owner, point),
            _ => false,
        }
    }

    /// Whether an overlay opened after `id` sits on the same layer or above.
    fn is_covered(&self, id: OverlayId) -> bool {
        let Some(layer) = self.instances.get(&id).map(|i| i.kind.layer()) else {
            return false;
        };
        self.instances
            .iter()
            .any(|(other, i)| *other > id && i.kind.layer() >= layer)
    }

    fn focus_input(&mut self, owner: OverlayId) -> bool {
        let Some(Instance {
            node,
            state: State::Prompt { input, .. },
            ..
        }) = self.instances.get_mut(&owner)
        else {
            return false;
        };
        input.clear_selection();
        self.surface.focus(*node, Role::Input, false);
        self.focused = Some(owner);
        true
    }

    fn begin_drag(&mut self, owner: OverlayId, point: Point) -> bool {
        let Some(Instance {
            node,
            state: State::Popup { drag, .. },
            ..
        }) = self.instances.get_mut(&owner)
        else {
            return false;
        };
        let Some(top_left) = self.surface.position(*node) else {
            return false;
        };
        let session = drag.begin(point, top_left);
        trace!(id = owner.raw(), ?session, "drag started");
        true
    }

    fn drag_to(&mut self, point: Point) -> bool {
        let mut moved = false;
        for (listener, owner) in self.dismissal.snapshot(ListenerKind::PointerMove) {
            if !self.dismissal.is_live(listener) {
                continue;
            }
            if let Some(Instance {
                node,
                state: State::Popup { drag, .. },
                ..
            }) = self.instances.get(&owner)
                && let Some(position) = drag.update(point)
            {
                self.surface.set_position(*node, position);
                trace!(id = owner.raw(), ?position, "drag moved");
                moved = true;
            }
        }
        moved
    }

    fn end_drags(&mut self) -> bool {
        let mut ended = false;
        for (listener, owner) in self.dismissal.snapshot(ListenerKind::PointerUp) {
            if !self.dismissal.is_live(listener) {
                continue;
            }
            if let Some(Instance {
                state: State::Popup { drag, .. },
                ..
            }) = self.instances.get_mut(&owner)
                && drag.end()
            {
                trace!(id = owner.raw(), "drag ended");
                ended = true;
            }
        }
        ended
    }

    /// Deliver a document-level event to every live listener of `kind`.
    /// `trigger_for` maps a listener's owner to the trigger it should see.
    fn broadcast(
        &mut self,
        kind: ListenerKind,
        trigger_for: impl Fn(OverlayId) -> Option<Trigger>,
    ) -> bool {
        let mut handled = false;
        for (listener, owner) in self.dismissal.snapshot(kind) {
            if !self.dismissal.is_live(listener) {
                continue;
            }
            if let Some(trigger) = trigger_for(owner) {
                handled |= self.fire(owner, trigger, None);
            }
        }
        handled
    }

    /// Look up `trigger` in the owner's table and carry out the response.
    fn fire(&mut self, owner: OverlayId, trigger: Trigger, item: Option<usize>) -> bool {
        let Some(response) = self
            .instances
            .get(&owner)
            .and_then(|instance| instance.triggers.lookup(trigger))
        else {
            return false;
        };
        debug!(id = owner.raw(), ?trigger, ?response, "dismissal trigger");
        match response {
            Response::Close => {
                self.teardown(owner);
                true
            }
            Response::CloseThenRunItem => {
                let action = item.and_then(|index| self.take_item_action(owner, index));
                self.teardown(owner);
                if let Some(action) = action {
                    action(self);
                }
                true
            }
            Response::CancelThenClose => {
                if let Some(on_cancel) = self.take_on_cancel(owner) {
                    on_cancel(self);
                }
                self.teardown(owner);
                true
            }
            Response::CloseThenConfirm => {
                let on_confirm = match self.instances.get_mut(&owner).map(|i| &mut i.state) {
                    Some(State::Confirm { on_confirm, .. }) => on_confirm.take(),
                    _ => None,
                };
                self.teardown(owner);
                if let Some(on_confirm) = on_confirm {
                    on_confirm(self);
                }
                true
            }
            Response::Submit => self.submit(owner),
        }
    }

    /// Validate and submit a prompt. Rejected input leaves the dialog open
    /// and the callback untouched.
    fn submit(&mut self, owner: OverlayId) -> bool {
        let Some(State::Prompt {
            input,
            allow_empty,
            on_confirm,
            ..
        }) = self.instances.get_mut(&owner).map(|i| &mut i.state)
        else {
            return false;
        };
        let value = input.value().trim().to_string();
        if value.is_empty() && !*allow_empty {
            debug!(id = owner.raw(), "rejected empty prompt submission");
            return false;
        }
        let on_confirm = on_confirm.take();
        self.teardown(owner);
        if let Some(on_confirm) = on_confirm {
            on_confirm(self, value);
        }
        true
    }

    fn take_item_action(&mut self, owner: OverlayId, index: usize) -> Option<Callback<S>> {
        match self.instances.get_mut(&owner).map(|i| &mut i.state) {
            Some(State::Menu { actions }) => actions.get_mut(index).and_then(Option::take),
            _ => None,
        }
    }

    fn take_on_cancel(&mut self, owner: OverlayId) -> Option<Callback<S>> {
        match self.instances.get_mut(&owner).map(|i| &mut i.state) {
            Some(State::Confirm { on_cancel, .. }) | Some(State::Prompt { on_cancel, .. }) => {
                on_cancel.take()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Size;

    use super::*;
    use crate::surface::CellSurface;

    fn manager() -> OverlayManager<CellSurface> {
        OverlayManager::new(CellSurface::new(Size::new(80, 24)))
    }

    #[test]
    fn tick_skips_work_for_closed_overlays() {
        let mut m = manager();
        let h = m.open_context_menu(Point::new(1, 1), [MenuItem::new("A")]);
        assert_eq!(m.pending_tasks(), 2);
        m.close(h);
        assert_eq!(m.tick(), 0);
        assert_eq!(m.listener_count(), 0);
        assert_eq!(m.pending_tasks(), 0);
    }

    #[test]
    fn tick_runs_each_task_once() {
        let mut m = manager();
        let h = m.open_prompt_dialog("Name", "x", None, PromptOptions::default());
        m.deferred.clear();
        m.deferred.push_back(Deferred::Place(h.id));
        assert_eq!(m.tick(), 1);
        assert_eq!(m.tick(), 0);
        assert!(m.focused.is_none());
    }

    #[test]
    fn replacing_overlay_drops_old_listeners() {
        let mut m = manager();
        m.open_window_popup("a", Point::new(0, 0), PopupOptions::default());
        assert_eq!(m.listener_count(), 3);
        m.open_window_popup("b", Point::new(0, 0), PopupOptions::default());
        assert_eq!(m.listener_count(), 3);
        assert_eq!(m.live_count(), 1);
    }

    #[test]
    fn callbacks_are_consumed_once() {
        let mut m = manager();
        let h = m.open_confirm_dialog(
            "Sure?",
            Some(Box::new(|m: &mut OverlayManager<CellSurface>| {
                m.open_context_menu(Point::new(2, 2), [MenuItem::new("after")]);
            })),
            ConfirmOptions::default(),
        );
        assert!(m.fire(h.id, Trigger::Confirm, None));
        assert!(m.is_open(OverlayKind::ContextMenu));
        assert!(!m.fire(h.id, Trigger::Confirm, None));
    }
}
