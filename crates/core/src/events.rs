//! Events emitted by the core
//!
//! The core never consumes its own events except through [`crate::Stats`].
//! Presentation and persistence collaborators subscribe a [`Listener`] to the
//! session's [`EventBus`]; listeners are called in subscription order.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::types::{PieceType, Position};

/// A single piece leaving the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopEvent {
    pub piece: PieceType,
    pub position: Position,
    pub combo: u32,
    pub is_special: bool,
    /// True if an area effect removed the piece rather than a plain match
    pub caused_by_special: bool,
}

/// Everything the core reports to the outside world
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// A swap was requested; `valid` tells whether it was committed
    Move {
        from: Position,
        to: Position,
        valid: bool,
    },
    /// A resolution cycle began
    ProcessStart,
    /// One detection pass found these groups
    Match {
        matches: Vec<Vec<Position>>,
        combo: u32,
    },
    /// A match shape produced a special piece
    SpecialCreated {
        piece: PieceType,
        position: Position,
        combo: u32,
    },
    Pop(PopEvent),
    /// The board is stable again; `combo` is the last level reached
    ProcessComplete { combo: u32 },
    /// The session timer expired
    TimesUp,
}

/// Receives events from the core
///
/// Override [`Listener::on_event`] to see every event, or any of the
/// individual hooks.
pub trait Listener {
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::Move { from, to, valid } => self.on_move(*from, *to, *valid),
            Event::ProcessStart => self.on_process_start(),
            Event::Match { matches, combo } => self.on_match(matches, *combo),
            Event::SpecialCreated {
                piece,
                position,
                combo,
            } => self.on_special_created(*piece, *position, *combo),
            Event::Pop(pop) => self.on_pop(pop),
            Event::ProcessComplete { combo } => self.on_process_complete(*combo),
            Event::TimesUp => self.on_times_up(),
        }
    }

    fn on_move(&mut self, _from: Position, _to: Position, _valid: bool) {}
    fn on_match(&mut self, _matches: &[Vec<Position>], _combo: u32) {}
    fn on_pop(&mut self, _pop: &PopEvent) {}
    fn on_special_created(&mut self, _piece: PieceType, _position: Position, _combo: u32) {}
    fn on_process_start(&mut self) {}
    fn on_process_complete(&mut self, _combo: u32) {}
    fn on_times_up(&mut self) {}
}

/// Where core components write their events
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Ordered fan-out of events to subscribed listeners
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Box<dyn Listener>)>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; it is called after every listener subscribed before it
    pub fn subscribe<L: Listener + 'static>(&mut self, listener: L) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not subscribed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&mut self, event: &Event) {
        for (_, listener) in &mut self.listeners {
            listener.on_event(event);
        }
    }
}

impl EventSink for EventBus {
    fn emit(&mut self, event: Event) {
        self.dispatch(&event);
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Recording listener; clones share one buffer so a host (or test) can keep a
/// handle after subscribing a copy.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every recorded event, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Recorded pop events
    pub fn pops(&self) -> Vec<PopEvent> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Pop(pop) => Some(*pop),
                _ => None,
            })
            .collect()
    }

    /// Count recorded events accepted by `pred`
    pub fn count<F: Fn(&Event) -> bool>(&self, pred: F) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl Listener for EventLog {
    fn on_event(&mut self, event: &Event) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tagger {
        tag: &'static str,
        out: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Listener for Tagger {
        fn on_times_up(&mut self) {
            self.out.borrow_mut().push(self.tag);
        }
    }

    #[test]
    fn test_bus_preserves_subscription_order() {
        let out = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second", "third"] {
            bus.subscribe(Tagger {
                tag,
                out: out.clone(),
            });
        }
        bus.emit(Event::TimesUp);
        assert_eq!(*out.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let log = EventLog::new();
        let mut bus = EventBus::new();
        let id = bus.subscribe(log.clone());
        bus.emit(Event::ProcessStart);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(Event::ProcessStart);
        assert_eq!(log.len(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_hooks_receive_fields() {
        #[derive(Default)]
        struct Moves(Vec<(Position, Position, bool)>);
        impl Listener for Moves {
            fn on_move(&mut self, from: Position, to: Position, valid: bool) {
                self.0.push((from, to, valid));
            }
        }

        let mut moves = Moves::default();
        let from = Position::new(0, 0);
        let to = Position::new(0, 1);
        moves.on_event(&Event::Move {
            from,
            to,
            valid: false,
        });
        moves.on_event(&Event::TimesUp);
        assert_eq!(moves.0, vec![(from, to, false)]);
    }

    #[test]
    fn test_event_log_shares_buffer() {
        let log = EventLog::new();
        let mut handle = log.clone();
        handle.on_event(&Event::Pop(PopEvent {
            piece: PieceType::Frog,
            position: Position::new(1, 1),
            combo: 1,
            is_special: false,
            caused_by_special: false,
        }));
        assert_eq!(log.pops().len(), 1);
        assert_eq!(log.take().len(), 1);
        assert!(handle.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(Event::Pop(PopEvent {
            piece: PieceType::Row,
            position: Position::new(2, 3),
            combo: 2,
            is_special: true,
            caused_by_special: true,
        }))
        .unwrap();
        assert_eq!(json["type"], "pop");
        assert_eq!(json["piece"], "row");
        assert_eq!(json["causedBySpecial"], true);
        assert_eq!(json["position"]["column"], 3);

        let json = serde_json::to_value(Event::ProcessComplete { combo: 3 }).unwrap();
        assert_eq!(json["type"], "processComplete");
        assert_eq!(json["combo"], 3);
    }
}
