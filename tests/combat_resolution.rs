use common::{AnimalBuilder, Leader, WorldBuilder};
use rand::rngs::mock::StepRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wildlands_data::{Animal, Formation, NaturalWeapon, TeamId, TerrainType};
use wildlands_lib::model::combat::{BattleContext, BattleOutcome, BattleResult, CombatStatus};
use wildlands_lib::model::team::ROBOT_SPECIES;
use wildlands_lib::model::world::World;

mod common;

fn fight<R: rand::Rng>(world: &mut World, first: TeamId, second: TeamId, rng: &mut R) -> BattleResult {
    let mut ctx = BattleContext {
        world: &mut world.ecs,
        teams: &mut world.teams,
        terrain: Some(&world.terrain),
        now: world.time,
    };
    world
        .combat
        .resolve_battle(&mut ctx, first, second, rng)
        .expect("both teams exist")
}

fn lions_and_mice(lion: AnimalBuilder, mouse: AnimalBuilder) -> (World, Vec<hecs::Entity>, Vec<TeamId>) {
    let mut builder = WorldBuilder::new().with_uniform_terrain(TerrainType::Grassland);
    for seed in 0..3 {
        builder = builder.with_animal(lion.clone_with_seed(seed), 5.0, 5.0);
    }
    for seed in 3..6 {
        builder = builder.with_animal(mouse.clone_with_seed(seed), 6.0, 5.0);
    }
    builder
        .with_team(&[0, 1, 2], Formation::Aggressive, Leader::FirstMember)
        .with_team(&[3, 4, 5], Formation::Loose, Leader::FirstMember)
        .build()
}

fn health(world: &World, entity: hecs::Entity) -> f64 {
    world.ecs.get::<&Animal>(entity).map(|a| a.health).unwrap()
}

#[test]
fn test_overwhelming_victory_removes_casualties() {
    let lion = AnimalBuilder::new("Lion").predator().attack(2.0);
    let mouse = AnimalBuilder::new("Mouse").attack(0.1).max_health(10.0);
    let (mut world, animals, teams) = lions_and_mice(lion, mouse);

    let result = fight(&mut world, teams[0], teams[1], &mut ChaCha8Rng::seed_from_u64(1));

    let BattleOutcome::Victory {
        winner,
        loser,
        loser_casualties,
        ..
    } = &result.outcome
    else {
        panic!("expected a victory, got {:?}", result.outcome);
    };
    assert_eq!((*winner, *loser), (teams[0], teams[1]));
    assert_eq!(loser_casualties.len(), 3);
    assert!(loser_casualties.iter().all(|c| c.name == "Mouse"));
    assert!(result.team1_strength > result.team2_strength);

    assert_team_size!(world, teams[1], 0);
    assert_team_size!(world, teams[0], 3);
    let mice = world.teams.get(teams[1]).unwrap();
    assert_eq!(mice.battle_stats.losses, 1);
    assert_eq!(mice.battle_stats.members_lost, 3);
    assert_eq!(world.teams.get(teams[0]).unwrap().battle_stats.wins, 1);
    for mouse in &animals[3..] {
        assert_eq!(health(&world, *mouse), 0.0);
        assert!(world.ecs.get::<&Animal>(*mouse).unwrap().team.is_none());
    }
    assert_population!(world, 3);

    // the emptied team is disbanded on the next prune
    let disbanded = world.teams.prune(&mut world.ecs);
    assert_eq!(disbanded, vec![teams[1]]);
}

#[test]
fn test_avoided_battle_changes_nothing() {
    let wolf = AnimalBuilder::new("Wolf").attack(1.2);
    let (mut world, animals, _) = WorldBuilder::new()
        .with_animal(wolf.clone_with_seed(1), 4.0, 4.0)
        .with_animal(wolf.clone_with_seed(2), 4.0, 4.0)
        .with_animal(wolf.clone_with_seed(3), 5.0, 4.0)
        .with_animal(wolf.clone_with_seed(4), 5.0, 4.0)
        .with_team(&[0, 1], Formation::Defensive, Leader::FirstMember)
        .with_team(&[2, 3], Formation::Defensive, Leader::FirstMember)
        .build();
    let ids = world.teams.ids();
    let before: Vec<f64> = animals.iter().map(|a| health(&world, *a)).collect();

    let result = fight(&mut world, ids[0], ids[1], &mut StepRng::new(u64::MAX, 0));

    assert!(result.is_avoided());
    assert!(result.outcome.casualties().is_empty());
    let after: Vec<f64> = animals.iter().map(|a| health(&world, *a)).collect();
    assert_eq!(before, after);
    for id in ids {
        let team = world.teams.get(id).unwrap();
        assert_eq!(team.battle_stats.battles(), 0);
        assert!(team.last_battle.is_none());
    }
}

#[test]
fn test_draw_damages_both_sides() {
    let bison = AnimalBuilder::new("Bison");
    let (mut world, animals, teams) = WorldBuilder::new()
        .with_config(|c| c.combat.draw_threshold = 10.0)
        .with_uniform_terrain(TerrainType::Grassland)
        .with_animal(bison.clone_with_seed(1), 3.0, 3.0)
        .with_animal(bison.clone_with_seed(2), 3.0, 3.0)
        .with_animal(bison.clone_with_seed(3), 4.0, 3.0)
        .with_animal(bison.clone_with_seed(4), 4.0, 3.0)
        .with_team(&[0, 1], Formation::Aggressive, Leader::FirstMember)
        .with_team(&[2, 3], Formation::Loose, Leader::FirstMember)
        .build();

    let result = fight(&mut world, teams[0], teams[1], &mut ChaCha8Rng::seed_from_u64(9));

    assert_eq!(result.outcome.as_str(), "draw");
    // draws deal 15 to 35, scaled by the aggressive formation
    for bison in &animals[..2] {
        assert_in_range!(100.0 - health(&world, *bison), 15.0 * 1.3 * 0.5, 35.0 * 1.3);
    }
    for bison in &animals[2..] {
        assert_in_range!(100.0 - health(&world, *bison), 15.0 * 0.5, 35.0);
    }
    for id in teams {
        let team = world.teams.get(id).unwrap();
        assert_eq!(team.battle_stats.wins + team.battle_stats.losses, 0);
        assert_eq!(team.last_battle, Some(world.time));
    }
}

#[test]
fn test_venomous_victors_poison_survivors() {
    let cobra = AnimalBuilder::new("Cobra")
        .predator()
        .attack(2.0)
        .weapon(NaturalWeapon::Venom);
    let tortoise = AnimalBuilder::new("Tortoise")
        .attack(0.1)
        .max_health(1000.0);
    let (mut world, animals, teams) = lions_and_mice(cobra, tortoise);

    let result = fight(&mut world, teams[0], teams[1], &mut ChaCha8Rng::seed_from_u64(4));
    assert_eq!(result.outcome.as_str(), "victory");

    for survivor in &animals[3..] {
        assert!(world.combat.has_status(*survivor, CombatStatus::Poisoned));
        assert!(!world.combat.has_status(*survivor, CombatStatus::Bleeding));
    }
    let before = health(&world, animals[3]);
    let deaths = world.combat.update(1.0, &mut world.ecs);
    assert!(deaths.is_empty());
    assert!(health(&world, animals[3]) < before);
}

#[test]
fn test_robot_leader_commands_without_fighting() {
    let hyena = AnimalBuilder::new("Hyena");
    let (world, animals, teams) = WorldBuilder::new()
        .with_animal(hyena.clone_with_seed(1), 8.0, 8.0)
        .with_animal(hyena.clone_with_seed(2), 8.0, 9.0)
        .with_team(&[0, 1], Formation::Scout, Leader::Robot("Steel"))
        .build();

    let team = world.teams.get(teams[0]).unwrap();
    assert_eq!(team.size(), 2);
    assert!(!team.members.contains(&team.leader));
    assert!(world.ecs.get::<&wildlands_data::Robot>(team.leader).is_ok());
    assert_eq!(team.leader_species(&world.ecs).as_deref(), Some(ROBOT_SPECIES));
    for member in animals {
        assert_eq!(world.ecs.get::<&Animal>(member).unwrap().team, Some(teams[0]));
    }
}
