//! Choreography driver system.
//!
//! Ticks the [`ActiveChoreography`] once per schedule run. On the first tick
//! the roster is built from the arena's agent slots, capped at the number of
//! bots the routine is written for. Intents queued by steps are forwarded as
//! [`StateIntent`] messages.
//!
//! Progress is published through [`WorldSignals`]: `choreography_done` when
//! the root sequence ends, `choreography_error` (flag and string) when a step
//! fails. Both also raise `quit_game`.

use bevy_ecs::prelude::*;
use log::error;

use crate::choreography::context::TickContext;
use crate::choreography::drone::roster;
use crate::choreography::error::ChoreographyError;
use crate::events::stateintent::{IntentBuffer, StateIntent};
use crate::resources::arena::Arena;
use crate::resources::choreography::ActiveChoreography;
use crate::resources::gameinfo::GameInfo;
use crate::resources::snapshot::TickSnapshot;
use crate::resources::worldsignals::WorldSignals;

fn fail(active: &mut ActiveChoreography, signals: &mut WorldSignals, e: &ChoreographyError) {
    error!(
        "Choreography '{}' failed: {}",
        active.choreography.name(),
        e
    );
    active.failed = true;
    signals.set_flag("choreography_error");
    signals.set_string("choreography_error", e.to_string());
    signals.set_flag("quit_game");
}

pub fn choreography_system(
    mut active: ResMut<ActiveChoreography>,
    arena: Res<Arena>,
    snapshot: Res<TickSnapshot>,
    game_info: Res<GameInfo>,
    mut signals: ResMut<WorldSignals>,
    mut writer: MessageWriter<StateIntent>,
) {
    if active.is_stopped() {
        return;
    }

    if !active.choreography.has_drones() {
        let count = active.choreography.num_bots().min(arena.agents.len());
        if let Err(e) = active.choreography.set_drones(roster(count)) {
            fail(&mut active, &mut signals, &e);
            return;
        }
    }

    let mut intents = IntentBuffer::new();
    let result = {
        let mut ctx = TickContext::new(&snapshot, &game_info, &mut intents);
        active.choreography.step(&mut ctx)
    };
    writer.write_batch(intents.drain());

    match result {
        Ok(_) if active.choreography.is_finished() => {
            signals.set_flag("choreography_done");
            signals.set_flag("quit_game");
        }
        Ok(_) => {}
        Err(e) => fail(&mut active, &mut signals, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreography::drone::Drone;
    use crate::choreography::error::Result;
    use crate::choreography::step::{BoxedStep, GroupStep, StepResult};
    use crate::choreography::{Choreography, Routine};
    use crate::events::stateintent::DesiredState;
    use glam::Vec3;

    struct Raise {
        fail_on_second: bool,
    }

    impl Routine for Raise {
        fn name(&self) -> &str {
            "raise"
        }
        fn num_bots(&self) -> usize {
            2
        }
        fn generate_sequence(&mut self, _drones: &[Drone]) -> Result<Vec<BoxedStep>> {
            let fail_on_second = self.fail_on_second;
            Ok(vec![
                GroupStep::new(|ctx, drones: &mut [Drone], _| {
                    let mut intent = StateIntent::new();
                    for d in drones.iter() {
                        intent.set_agent(d.index, DesiredState::at(Vec3::Z * 100.0));
                    }
                    ctx.set_state(intent);
                    Ok(StepResult::finished())
                })
                .boxed(),
                GroupStep::new(move |_, _, _| {
                    if fail_on_second {
                        Err(ChoreographyError::MissingSlot(7))
                    } else {
                        Ok(StepResult::finished())
                    }
                })
                .boxed(),
            ])
        }
    }

    fn make_world(fail_on_second: bool) -> World {
        let mut world = World::new();
        world.insert_resource(ActiveChoreography::new(Choreography::new(Raise {
            fail_on_second,
        })));
        world.insert_resource(Arena::spawned(5));
        world.insert_resource(TickSnapshot::default());
        world.insert_resource(GameInfo::new());
        world.insert_resource(WorldSignals::default());
        world.insert_resource(Messages::<StateIntent>::default());
        world
    }

    #[test]
    fn test_roster_capped_at_routine_size() {
        let mut world = make_world(false);
        let mut schedule = Schedule::default();
        schedule.add_systems(choreography_system);
        schedule.run(&mut world);
        let active = world.resource::<ActiveChoreography>();
        assert_eq!(active.choreography.drones().len(), 2);
        assert_eq!(world.resource::<Messages<StateIntent>>().len(), 1);
    }

    #[test]
    fn test_done_raises_flags() {
        let mut world = make_world(false);
        let mut schedule = Schedule::default();
        schedule.add_systems(choreography_system);
        schedule.run(&mut world);
        assert!(!world.resource::<WorldSignals>().has_flag("quit_game"));
        schedule.run(&mut world);
        let signals = world.resource::<WorldSignals>();
        assert!(signals.has_flag("choreography_done"));
        assert!(signals.has_flag("quit_game"));
    }

    #[test]
    fn test_step_error_stops_choreography() {
        let mut world = make_world(true);
        let mut schedule = Schedule::default();
        schedule.add_systems(choreography_system);
        schedule.run(&mut world);
        schedule.run(&mut world);
        let signals = world.resource::<WorldSignals>();
        assert!(signals.has_flag("choreography_error"));
        assert!(signals.has_flag("quit_game"));
        assert!(!signals.has_flag("choreography_done"));
        assert_eq!(
            signals.get_string("choreography_error").map(String::as_str),
            Some(ChoreographyError::MissingSlot(7).to_string().as_str())
        );
        assert!(world.resource::<ActiveChoreography>().failed);
    }
}
