use crate::events::stateintent::{IntentBuffer, StateIntent};
use crate::resources::gameinfo::GameInfo;
use crate::resources::snapshot::TickSnapshot;

/// Everything a step may read or write during one tick.
///
/// Built fresh by the driver every tick. The snapshot and game info are
/// already up to date when the context is created; intents queued here are
/// forwarded to the world once the tick's steps have run.
pub struct TickContext<'a> {
    pub snapshot: &'a TickSnapshot,
    pub game_info: &'a GameInfo,
    pub intents: &'a mut IntentBuffer,
}

impl<'a> TickContext<'a> {
    pub fn new(
        snapshot: &'a TickSnapshot,
        game_info: &'a GameInfo,
        intents: &'a mut IntentBuffer,
    ) -> Self {
        Self {
            snapshot,
            game_info,
            intents,
        }
    }

    /// Simulation time of this tick in seconds.
    pub fn time(&self) -> f32 {
        self.snapshot.time
    }

    /// Queue a world-state write for this tick.
    pub fn set_state(&mut self, intent: StateIntent) {
        self.intents.push(intent);
    }
}
