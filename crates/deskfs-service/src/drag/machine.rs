//! Pointer-driven drag-and-drop and marquee selection.
//!
//! ```text
//! Idle --down--> Armed --moved past threshold / long press--> Dragging --up--> Idle
//!                  |                                              (Dropped | Cancelled)
//!                  +--moved before long press (touch) / down on empty space--> Marquee
//! ```
//!
//! The machine performs no I/O. It returns [`DragEffect`]s for the host
//! to carry out: start or cancel the long-press timer, repaint the
//! selection or drop highlight, and run the move on drop.

use std::collections::BTreeSet;

use deskfs_core::config::drag::DragConfig;
use deskfs_entity::id::ItemId;

use super::geometry::{Point, Rect};

/// Input device of a pointer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Mouse or pen.
    Mouse,
    /// Finger.
    Touch,
}

/// Input to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// Pointer pressed, on an item or on empty space.
    PointerDown {
        /// Item under the pointer.
        item: Option<ItemId>,
        /// Press position.
        at: Point,
        /// Input device.
        kind: PointerKind,
    },
    /// Pointer moved.
    PointerMove {
        /// New position.
        at: Point,
    },
    /// Pointer released.
    PointerUp {
        /// Release position.
        at: Point,
    },
    /// The long-press timer fired.
    LongPressFired,
    /// The host aborted the gesture (Escape, pointer capture lost).
    Cancel,
}

/// Output of the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEffect {
    /// Start the long-press timer.
    StartLongPressTimer(std::time::Duration),
    /// Cancel a running long-press timer.
    CancelLongPressTimer,
    /// The selection changed.
    SelectionChanged(Vec<ItemId>),
    /// Dragging began with these items.
    DragStarted(Vec<ItemId>),
    /// The highlighted drop target changed.
    HighlightTarget(Option<ItemId>),
    /// Move `ids` into `target`.
    Drop {
        /// The whole selection at drop time.
        ids: Vec<ItemId>,
        /// Destination folder.
        target: ItemId,
    },
    /// The drag ended without a valid target.
    Cancelled,
    /// A press and release without a gesture.
    Tapped(Option<ItemId>),
}

/// Current gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    /// No pointer pressed.
    Idle,
    /// Pressed, waiting to see what the gesture is.
    Armed {
        /// Item pressed, if any.
        item: Option<ItemId>,
        /// Press position.
        origin: Point,
        /// Input device.
        kind: PointerKind,
        /// Whether a long-press timer is running.
        timer: bool,
    },
    /// Items follow the pointer.
    Dragging {
        /// Item the drag started from.
        item: ItemId,
        /// Pointer position.
        pointer: Point,
        /// Valid folder under the pointer.
        target: Option<ItemId>,
    },
    /// Rectangular selection.
    Marquee {
        /// Fixed corner.
        origin: Point,
        /// Corner under the pointer.
        current: Point,
    },
}

/// Spatial queries answered by whatever draws the items.
pub trait HitTester {
    /// Folder item under a point, if any.
    fn folder_at(&self, point: Point) -> Option<ItemId>;

    /// Items whose bounds intersect a rectangle.
    fn items_in_rect(&self, rect: Rect) -> Vec<ItemId>;
}

/// The drag state machine.
#[derive(Debug, Clone)]
pub struct DragMachine {
    state: DragState,
    selection: BTreeSet<ItemId>,
    config: DragConfig,
    system_folder_id: ItemId,
}

impl DragMachine {
    /// Create an idle machine.
    pub fn new(config: DragConfig, system_folder_id: ItemId) -> Self {
        Self {
            state: DragState::Idle,
            selection: BTreeSet::new(),
            config,
            system_folder_id,
        }
    }

    /// Current gesture.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Current selection, in id order.
    pub fn selection(&self) -> Vec<ItemId> {
        self.selection.iter().cloned().collect()
    }

    /// Replace the selection (e.g. after a click in the host).
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.selection = ids.into_iter().collect();
    }

    /// Feed one event and return the effects to perform.
    pub fn handle(&mut self, event: DragEvent, hits: &dyn HitTester) -> Vec<DragEffect> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let (next, effects) = self.transition(state, event, hits);
        self.state = next;
        effects
    }

    fn transition(
        &mut self,
        state: DragState,
        event: DragEvent,
        hits: &dyn HitTester,
    ) -> (DragState, Vec<DragEffect>) {
        match (state, event) {
            (_, DragEvent::Cancel) => self.cancel_any(),

            (DragState::Idle, DragEvent::PointerDown { item, at, kind }) => {
                let mut effects = Vec::new();
                if let Some(id) = &item {
                    if !self.selection.contains(id) {
                        self.selection = BTreeSet::from([id.clone()]);
                        effects.push(DragEffect::SelectionChanged(self.selection()));
                    }
                }
                let timer = kind == PointerKind::Touch && item.is_some();
                if timer {
                    effects.push(DragEffect::StartLongPressTimer(self.config.long_press()));
                }
                (
                    DragState::Armed {
                        item,
                        origin: at,
                        kind,
                        timer,
                    },
                    effects,
                )
            }

            (
                DragState::Armed {
                    item,
                    origin,
                    kind,
                    timer,
                },
                DragEvent::PointerMove { at },
            ) => self.armed_move(item, origin, kind, timer, at, hits),

            (
                DragState::Armed {
                    item: Some(item),
                    origin,
                    timer: true,
                    ..
                },
                DragEvent::LongPressFired,
            ) => self.start_drag(item, origin, hits, Vec::new()),

            (DragState::Armed { item, timer, .. }, DragEvent::PointerUp { .. }) => {
                let mut effects = Vec::new();
                if timer {
                    effects.push(DragEffect::CancelLongPressTimer);
                }
                if item.is_none() && !self.selection.is_empty() {
                    self.selection.clear();
                    effects.push(DragEffect::SelectionChanged(Vec::new()));
                }
                effects.push(DragEffect::Tapped(item));
                (DragState::Idle, effects)
            }

            (DragState::Dragging { item, target, .. }, DragEvent::PointerMove { at }) => {
                let next_target = self.drop_target(at, hits);
                let mut effects = Vec::new();
                if next_target != target {
                    effects.push(DragEffect::HighlightTarget(next_target.clone()));
                }
                (
                    DragState::Dragging {
                        item,
                        pointer: at,
                        target: next_target,
                    },
                    effects,
                )
            }

            (DragState::Dragging { .. }, DragEvent::PointerUp { at }) => {
                let effect = match self.drop_target(at, hits) {
                    Some(target) => DragEffect::Drop {
                        ids: self.selection(),
                        target,
                    },
                    None => DragEffect::Cancelled,
                };
                (
                    DragState::Idle,
                    vec![DragEffect::HighlightTarget(None), effect],
                )
            }

            (DragState::Marquee { origin, .. }, DragEvent::PointerMove { at }) => {
                let effects = self.marquee_select(origin, at, hits);
                (DragState::Marquee { origin, current: at }, effects)
            }

            (DragState::Marquee { .. }, DragEvent::PointerUp { .. }) => (DragState::Idle, Vec::new()),

            // Late timer firings, stray presses, and releases while idle.
            (state, _) => (state, Vec::new()),
        }
    }

    fn armed_move(
        &mut self,
        item: Option<ItemId>,
        origin: Point,
        kind: PointerKind,
        timer: bool,
        at: Point,
        hits: &dyn HitTester,
    ) -> (DragState, Vec<DragEffect>) {
        let distance = origin.distance_to(at);

        match (&item, kind) {
            (Some(id), PointerKind::Mouse) if distance > self.config.drag_threshold_px => {
                let id = id.clone();
                let (state, effects) = self.start_drag(id, origin, hits, Vec::new());
                self.continue_drag(state, effects, at, hits)
            }
            (Some(_), PointerKind::Touch) if distance > self.config.long_press_tolerance_px => {
                let mut effects = Vec::new();
                if timer {
                    effects.push(DragEffect::CancelLongPressTimer);
                }
                effects.extend(self.marquee_select(origin, at, hits));
                (DragState::Marquee { origin, current: at }, effects)
            }
            (None, _) if distance > self.config.drag_threshold_px => {
                let effects = self.marquee_select(origin, at, hits);
                (DragState::Marquee { origin, current: at }, effects)
            }
            _ => (
                DragState::Armed {
                    item,
                    origin,
                    kind,
                    timer,
                },
                Vec::new(),
            ),
        }
    }

    fn start_drag(
        &mut self,
        item: ItemId,
        at: Point,
        hits: &dyn HitTester,
        mut effects: Vec<DragEffect>,
    ) -> (DragState, Vec<DragEffect>) {
        self.selection.insert(item.clone());
        effects.push(DragEffect::DragStarted(self.selection()));
        let target = self.drop_target(at, hits);
        if target.is_some() {
            effects.push(DragEffect::HighlightTarget(target.clone()));
        }
        (
            DragState::Dragging {
                item,
                pointer: at,
                target,
            },
            effects,
        )
    }

    fn continue_drag(
        &mut self,
        state: DragState,
        mut effects: Vec<DragEffect>,
        at: Point,
        hits: &dyn HitTester,
    ) -> (DragState, Vec<DragEffect>) {
        let (next, more) = self.transition(state, DragEvent::PointerMove { at }, hits);
        effects.extend(more);
        (next, effects)
    }

    fn marquee_select(&mut self, origin: Point, at: Point, hits: &dyn HitTester) -> Vec<DragEffect> {
        let selected: BTreeSet<ItemId> = hits
            .items_in_rect(Rect::from_corners(origin, at))
            .into_iter()
            .collect();
        if selected == self.selection {
            return Vec::new();
        }
        self.selection = selected;
        vec![DragEffect::SelectionChanged(self.selection())]
    }

    fn cancel_any(&mut self) -> (DragState, Vec<DragEffect>) {
        (DragState::Idle, vec![DragEffect::CancelLongPressTimer, DragEffect::Cancelled])
    }

    /// Folder under the pointer that may receive the selection.
    fn drop_target(&self, at: Point, hits: &dyn HitTester) -> Option<ItemId> {
        hits.folder_at(at)
            .filter(|id| !self.selection.contains(id) && id != &self.system_folder_id)
    }
}
