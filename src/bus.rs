//! Publish/subscribe event bus
//!
//! One bus instance glues the session's components together. Subscribers are
//! keyed by [`EventKind`]; dispatch is synchronous and re-entrant-safe:
//! publish snapshots the kind's handler list under the table lock, releases
//! it, then invokes the snapshot, so handlers may subscribe or unsubscribe
//! (including themselves) without corrupting the in-flight delivery.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::ball::BallType;
use crate::sim::stump::StumpId;

/// A mutable session parameter carried by [`Event::ParamUpdated`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionParam {
    BallSpeed(f32),
    BallType(BallType),
    BatSpeed(f32),
    BatElevation(f32),
}

/// Everything the simulation publishes, with compile-checked payload shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Restore every stateful component to initial conditions
    Reset,
    /// The pitch marker moved (also announced once at session start)
    DragMarker { position: Vec3 },
    /// The delivery has been released toward the marker
    BallBowled,
    /// The player's one swing for this delivery was consumed.
    /// `angle` is the world-frame swipe yaw in degrees.
    BatSwingArmed { angle: f32 },
    /// An armed swing connected inside the hit window
    BatSwingApplied { direction: Vec3, bat_speed: f32 },
    /// The ball crossed into the bat's hit window
    BallEnteredHitZone,
    /// The ball left the hit window
    BallExitedHitZone,
    /// First ground contact of the delivery was consumed by bounce physics
    BallBounced,
    /// The ball touched a stump (never gated on whether the bat connected)
    StumpHit { stump: StumpId },
    /// A session parameter changed (speed sliders, delivery type, elevation)
    ParamUpdated { param: SessionParam },
}

/// Payload-free discriminant of [`Event`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Reset,
    DragMarker,
    BallBowled,
    BatSwingArmed,
    BatSwingApplied,
    BallEnteredHitZone,
    BallExitedHitZone,
    BallBounced,
    StumpHit,
    ParamUpdated,
}

impl EventKind {
    /// Every event kind, for taps that observe the whole stream.
    pub const ALL: [EventKind; 10] = [
        EventKind::Reset,
        EventKind::DragMarker,
        EventKind::BallBowled,
        EventKind::BatSwingArmed,
        EventKind::BatSwingApplied,
        EventKind::BallEnteredHitZone,
        EventKind::BallExitedHitZone,
        EventKind::BallBounced,
        EventKind::StumpHit,
        EventKind::ParamUpdated,
    ];
}

impl Event {
    /// The subscription key this event dispatches under
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Reset => EventKind::Reset,
            Event::DragMarker { .. } => EventKind::DragMarker,
            Event::BallBowled => EventKind::BallBowled,
            Event::BatSwingArmed { .. } => EventKind::BatSwingArmed,
            Event::BatSwingApplied { .. } => EventKind::BatSwingApplied,
            Event::BallEnteredHitZone => EventKind::BallEnteredHitZone,
            Event::BallExitedHitZone => EventKind::BallExitedHitZone,
            Event::BallBounced => EventKind::BallBounced,
            Event::StumpHit { .. } => EventKind::StumpHit,
            Event::ParamUpdated { .. } => EventKind::ParamUpdated,
        }
    }
}

/// Shared subscriber callback. Handlers execute inline on the publishing
/// call's stack and must return promptly.
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Proof of subscription; pass back to [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberToken {
    kind: EventKind,
    id: u64,
}

struct Entry {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct Table {
    next_id: u64,
    subscribers: HashMap<EventKind, Vec<Entry>>,
}

/// The event bus. Subscriber-table mutation is serialized under a single
/// lock; publish dispatches outside it.
#[derive(Default)]
pub struct EventBus {
    table: Mutex<Table>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_table(&self) -> std::sync::MutexGuard<'_, Table> {
        // A panicking handler must not wedge the whole session
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handler` for `kind`. Handlers for one kind run in
    /// subscription order.
    pub fn subscribe(&self, kind: EventKind, handler: Handler) -> SubscriberToken {
        let mut table = self.lock_table();
        let id = table.next_id;
        table.next_id += 1;
        table
            .subscribers
            .entry(kind)
            .or_default()
            .push(Entry { id, handler });
        SubscriberToken { kind, id }
    }

    /// Convenience wrapper taking a plain closure
    pub fn subscribe_fn<F>(&self, kind: EventKind, f: F) -> SubscriberToken
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.subscribe(kind, Arc::new(f))
    }

    /// Remove a subscription. Unsubscribing a token that is not currently
    /// subscribed is a no-op.
    pub fn unsubscribe(&self, token: SubscriberToken) {
        let mut table = self.lock_table();
        if let Some(entries) = table.subscribers.get_mut(&token.kind) {
            entries.retain(|e| e.id != token.id);
        }
    }

    /// Deliver `event` to every handler subscribed to its kind at the moment
    /// of this call. Handlers added during dispatch do not receive the
    /// in-flight event; handlers removed during dispatch still complete this
    /// delivery.
    pub fn publish(&self, event: &Event) {
        let snapshot: Vec<Handler> = {
            let table = self.lock_table();
            table
                .subscribers
                .get(&event.kind())
                .map(|entries| entries.iter().map(|e| Arc::clone(&e.handler)).collect())
                .unwrap_or_default()
        };

        log::trace!("publish {:?} -> {} handler(s)", event.kind(), snapshot.len());
        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of live subscriptions for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.lock_table()
            .subscribers
            .get(&kind)
            .map_or(0, Vec::len)
    }
}
