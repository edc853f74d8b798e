//! Per-tick snapshot capture.
//!
//! Copies the arena into the [`TickSnapshot`] resource and refreshes
//! [`GameInfo`] from it. Must run after spawning and before the
//! choreography is ticked.

use bevy_ecs::prelude::*;

use crate::resources::arena::Arena;
use crate::resources::gameinfo::GameInfo;
use crate::resources::snapshot::TickSnapshot;
use crate::resources::worldtime::WorldTime;

pub fn capture_snapshot_system(
    arena: Res<Arena>,
    time: Res<WorldTime>,
    mut snapshot: ResMut<TickSnapshot>,
    mut game_info: ResMut<GameInfo>,
) {
    *snapshot = arena.snapshot(&time);
    game_info.read_snapshot(&snapshot);
}
