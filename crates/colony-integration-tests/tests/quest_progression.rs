//! Quest and tech progression across whole runs.

use std::sync::Arc;

use colony_core::test_utils::*;
use colony_core::world::World;
use colony_game::{Game, GameConfig, GameEvent, Outcome};
use colony_quest::{ComparisonOp, QuestCatalog, QuestCatalogBuilder, QuestCondition, StageSpec};
use colony_tech_tree::{TechCatalog, TechCatalogBuilder, TechSpec};

/// unpack --(habitat exists)--> settled (win)
fn lander_quests() -> Arc<QuestCatalog> {
    let mut b = QuestCatalogBuilder::new();
    let unpack = b
        .declare(StageSpec::new("unpack", "Unpack the lander.").hint("Click the lander."))
        .unwrap();
    let settled = b
        .declare(StageSpec::new("settled", "The colony is settled.").win())
        .unwrap();
    b.transition(unpack, QuestCondition::tile_exists("habitat"), settled)
        .unwrap();
    Arc::new(b.build().unwrap())
}

fn chain_techs() -> Arc<TechCatalog> {
    let mut b = TechCatalogBuilder::new();
    let a = b.register(TechSpec::new("A")).unwrap();
    let bb = b.register(TechSpec::new("B").requires(a)).unwrap();
    b.register(TechSpec::new("C").requires(bb)).unwrap();
    Arc::new(b.build())
}

fn option_names(game: &Game) -> Vec<String> {
    game.research_options().iter().map(|t| t.name.clone()).collect()
}

#[test]
fn lander_quest_wins_once_habitat_exists() {
    let mut game = Game::from_parts(
        World::new(4, 4, "wasteland"),
        static_stockpile(3),
        chain_techs(),
        lander_quests(),
        1,
    );

    assert!(game.update_quest_state().is_none());
    assert_eq!(game.current_quest_description(), "Unpack the lander.");
    assert_eq!(game.current_quest_hint(), Some("Click the lander."));
    assert!(!game.has_won());

    game.world_mut().set_tile_kind(1, 1, "habitat").unwrap();
    assert!(game.update_quest_state().is_some());

    assert_eq!(game.current_quest_description(), "The colony is settled.");
    assert_eq!(game.previous_quest_description(), "Unpack the lander.");
    assert!(!game.quest_completion_shown());
    assert!(game.has_won());
    assert_eq!(game.outcome(), Outcome::Won);

    // Further turns keep the run won.
    game.complete_turn().unwrap();
    assert!(game.has_won());
}

#[test]
fn research_options_walk_the_chain() {
    let techs = chain_techs();
    let mut game = Game::from_parts(
        World::new(1, 1, "wasteland"),
        static_stockpile(1),
        Arc::clone(&techs),
        lander_quests(),
        1,
    );
    let id = |name: &str| techs.id(name).unwrap();

    assert_eq!(option_names(&game), vec!["A"]);
    game.unlock_technology(id("A"));
    assert_eq!(option_names(&game), vec!["B"]);
    game.unlock_technology(id("A"));
    assert_eq!(game.unlocked_technologies(), &[id("A")]);
    game.unlock_technology(id("B"));
    assert_eq!(option_names(&game), vec!["C"]);
    game.unlock_technology(id("C"));
    assert!(option_names(&game).is_empty());
}

#[test]
fn standard_run_records_progression_events() {
    let techs = TechCatalog::standard();
    let quests = QuestCatalog::standard(&techs).unwrap();
    let config = GameConfig {
        population: 20,
        growth_rate: colony_core::fixed::Fixed64::ZERO,
        ..GameConfig::default()
    };
    let mut game = Game::new(&config, Arc::new(techs), Arc::new(quests)).unwrap();
    let (x, y) = config.lander.unwrap();

    game.world_mut().set_tile_kind(x, y, "habitat").unwrap();
    game.complete_turn().unwrap();
    let engineering = game.techs().catalog().id("Engineering01").unwrap();
    game.unlock_technology(engineering);
    game.complete_turn().unwrap();
    game.complete_turn().unwrap();

    let events = game.drain_events();
    let progression: Vec<_> = events
        .iter()
        .filter(|e| !matches!(e, GameEvent::TurnCompleted { .. }))
        .copied()
        .collect();
    assert_eq!(progression.len(), 5);
    assert!(matches!(progression[0], GameEvent::QuestAdvanced { turn: 2, .. }));
    assert_eq!(
        progression[1],
        GameEvent::TechnologyUnlocked {
            tech: engineering,
            turn: 2
        }
    );
    assert!(matches!(progression[2], GameEvent::QuestAdvanced { turn: 3, .. }));
    assert!(matches!(progression[3], GameEvent::QuestAdvanced { turn: 4, .. }));
    assert_eq!(progression[4], GameEvent::RunWon { turn: 4 });
    assert_eq!(game.outcome().header(), Some("YOU WIN!"));
}

#[test]
fn resource_goal_drives_a_custom_quest() {
    let mut b = QuestCatalogBuilder::new();
    let gather = b
        .declare(StageSpec::new("gather", "Stockpile 5 metal."))
        .unwrap();
    let done = b
        .declare(StageSpec::new("done", "Enough metal.").win().ending("Forged", "Done."))
        .unwrap();
    let late = b
        .declare(StageSpec::new("late", "Too slow.").lose())
        .unwrap();
    b.transition(
        gather,
        QuestCondition::Turn {
            op: ComparisonOp::Gt,
            value: 10,
        },
        late,
    )
    .unwrap();
    b.transition(
        gather,
        QuestCondition::Resource {
            resource: metal(),
            op: ComparisonOp::Gte,
            value: 5,
        },
        done,
    )
    .unwrap();
    let quests = Arc::new(b.build().unwrap());

    let run = |with_mine: bool| {
        let mut world = World::new(1, 1, "wasteland");
        if with_mine {
            world.add_conversion(0, 0, free_conversion("mine")).unwrap();
        }
        world.add_conversion(0, 0, costly_conversion("smelter")).unwrap();
        let mut game = Game::from_parts(
            world,
            static_stockpile(0),
            chain_techs(),
            Arc::clone(&quests),
            1,
        );
        while !game.outcome().is_over() {
            game.complete_turn().unwrap();
        }
        game
    };

    let fast = run(true);
    assert_eq!(fast.outcome(), Outcome::Won);
    assert_eq!(fast.turn(), 6);
    assert_eq!(fast.ending().unwrap().title, "Forged");

    let slow = run(false);
    assert_eq!(slow.outcome(), Outcome::Lost);
    assert_eq!(slow.turn(), 11);
    assert!(slow.ending().is_none());
}
