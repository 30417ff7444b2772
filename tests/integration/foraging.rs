//! Foraging scenario
//!
//! Agents perceive food through the spatial index during EPISTEMIC, then
//! walk toward it and eat during DYNAMICS. Perception relies on the
//! positions synced at the start of the tick.

use rpe::engine::{Engine, keys};
use rpe::foundation::Vec2;
use rpe::storage::World;

const TARGET: &str = "target";
const SPEED: f32 = 10.0;

fn position(world: &World, id: &str) -> Option<Vec2> {
    let entity = world.entity(id)?;
    Some(Vec2::new(entity.get_state(keys::X, 0.0_f32), entity.get_state(keys::Y, 0.0_f32)))
}

fn seek_food(world: &mut World) {
    let mut choices = Vec::new();
    for agent in world.entities().filter(|e| e.kind() == "agent") {
        let Some(here) = position(world, agent.id().as_str()) else {
            continue;
        };
        let vision = agent.get_state("vision_range", 80.0_f32);

        let closest = world
            .spatial_index()
            .query_radius(here, vision)
            .into_iter()
            .filter(|id| {
                world.entity(id.as_str()).is_some_and(|food| {
                    food.kind() == "resource"
                        && food.get_state("active", false)
                        && food.get_state("amount", 0) > 0
                })
            })
            .filter_map(|id| Some((world.spatial_index().position(id.as_str())?.distance_to(here), id)))
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        if let Some((_, food)) = closest {
            choices.push((agent.id().clone(), food));
        }
    }

    for (agent, food) in choices {
        if let Some(agent) = world.entity_mut(agent.as_str()) {
            agent.set_state(TARGET, food.as_str());
        }
    }
}

fn walk_and_eat(world: &mut World) {
    for id in world.entity_ids() {
        let Some(agent) = world.entity(id.as_str()) else {
            continue;
        };
        let food = agent.get_state(TARGET, String::new());
        if food.is_empty() {
            continue;
        }
        let (Some(here), Some(there)) = (position(world, id.as_str()), position(world, &food)) else {
            continue;
        };

        let distance = here.distance_to(there);
        let step = if distance <= SPEED {
            there
        } else {
            let t = SPEED / distance;
            Vec2::new(here.x + (there.x - here.x) * t, here.y + (there.y - here.y) * t)
        };

        let agent = world.entity_mut(id.as_str()).expect("agent exists");
        agent.set_state(keys::X, step.x);
        agent.set_state(keys::Y, step.y);

        if step.distance_to(there) <= f32::EPSILON {
            let energy = agent.get_state(keys::ENERGY, 0.0_f64);
            agent.set_state(keys::ENERGY, energy + 10.0);
            if let Some(stock) = world.entity_mut(&food) {
                let amount = stock.get_state("amount", 0);
                stock.set_state("amount", amount - 1);
            }
        }
    }
}

fn place(world: &mut World, id: &str, kind: &str, x: f32, y: f32) {
    let entity = world.create_entity(id, kind);
    entity.set_state(keys::X, x);
    entity.set_state(keys::Y, y);
}

fn meadow() -> Engine {
    let mut world = World::new();
    place(&mut world, "forager", "agent", 0.0, 0.0);
    world
        .entity_mut("forager")
        .unwrap()
        .set_state(keys::ENERGY, 50.0_f64);

    place(&mut world, "berries", "resource", 30.0, 0.0);
    place(&mut world, "rotten", "resource", 10.0, 0.0);
    place(&mut world, "orchard", "resource", 200.0, 0.0);
    for (id, active, amount) in [("berries", true, 5), ("rotten", false, 5), ("orchard", true, 50)] {
        let food = world.entity_mut(id).unwrap();
        food.set_state("active", active);
        food.set_state("amount", amount);
    }

    let mut engine = Engine::new(world);
    engine.register_epistemic_rule("seek_food", seek_food);
    engine.register_dynamics_rule("walk_and_eat", walk_and_eat);
    engine
}

#[test]
fn forager_picks_closest_active_food_in_range() {
    let mut engine = meadow();
    engine.tick().unwrap();

    let forager = engine.world().entity("forager").unwrap();
    assert_eq!(forager.get_state(TARGET, String::new()), "berries");
    assert_eq!(forager.get_state(keys::X, 0.0_f32), 10.0);
}

#[test]
fn forager_reaches_and_eats() {
    let mut engine = meadow();
    for _ in 0..3 {
        engine.tick().unwrap();
    }

    let world = engine.world();
    assert_eq!(world.entity("forager").unwrap().get_state(keys::X, 0.0_f32), 30.0);
    assert_eq!(world.entity("forager").unwrap().number(keys::ENERGY), Some(60.0));
    assert_eq!(world.entity("berries").unwrap().get_state("amount", 0), 4);
    assert_eq!(world.entity("orchard").unwrap().get_state("amount", 0), 50);
}

#[test]
fn index_lags_one_sync_behind_movement() {
    let mut engine = meadow();
    engine.tick().unwrap();

    let world = engine.world();
    assert_eq!(world.spatial_index().position("forager"), Some(Vec2::new(0.0, 0.0)));
    assert_eq!(position(world, "forager"), Some(Vec2::new(10.0, 0.0)));
}
