//! Headless run: build a small colony and play it to the end.
//!
//! Sets up the standard tech tree and quest line, unpacks the lander, adds
//! a few conversions and completes turns until the run is won.
//!
//! Run with: `RUST_LOG=colony=debug cargo run -p colony-game --example headless_turns`

use colony_core::conversion::Conversion;
use colony_core::fixed::f64_to_fixed64;
use colony_core::id::ResourceId;
use colony_core::inventory::Inventory;
use colony_game::{Game, GameConfig, GameEvent, LANDER_TILE};
use colony_quest::QuestCatalog;
use colony_tech_tree::TechCatalog;
use std::sync::Arc;

const FOOD: ResourceId = ResourceId(0);
const ORE: ResourceId = ResourceId(1);
const METAL: ResourceId = ResourceId(2);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let techs = TechCatalog::standard();
    let quests = QuestCatalog::standard(&techs).unwrap();
    let config = GameConfig {
        population: 8,
        growth_rate: f64_to_fixed64(0.25),
        food: Some(FOOD),
        ..GameConfig::default()
    };
    let mut game = Game::new(&config, Arc::new(techs), Arc::new(quests)).unwrap();

    println!("Turn {}: {}", game.turn(), game.current_quest_description());

    // Unpack the lander into a habitat with a farm, a mine and a smelter.
    let (x, y) = config.lander.unwrap();
    let world = game.world_mut();
    world.set_tile_kind(x, y, "habitat").unwrap();
    world
        .add_conversion(x, y, Conversion::new("farm").with_output(FOOD, 3).with_workers(2))
        .unwrap();
    world
        .add_conversion(x, y, Conversion::new("mine").with_output(ORE, 2).with_workers(1))
        .unwrap();
    world
        .add_conversion(
            x,
            y,
            Conversion::new("smelter")
                .with_input(ORE, 2)
                .with_output(METAL, 1)
                .with_workers(1),
        )
        .unwrap();
    assert_eq!(game.world().tile_count(LANDER_TILE), 0);

    let engineering = game.techs().catalog().id("Engineering01").unwrap();

    while !game.outcome().is_over() && game.turn() < 50 {
        let summary = game.complete_turn().unwrap();
        if summary.stage_change.is_some() {
            println!("Turn {}: {}", summary.turn, game.current_quest_description());
            game.set_quest_completion_shown(true);
        }
        if !game.has_unlocked_technology(engineering) && game.inventory().quantity(METAL) >= 3 {
            game.unlock_technology(engineering);
        }

        for event in game.drain_events() {
            if let GameEvent::TechnologyUnlocked { tech, turn } = event {
                let name = &game.techs().catalog().get(tech).unwrap().name;
                println!("Turn {turn}: researched {name}");
            }
        }
    }

    let inventory = game.inventory();
    println!(
        "Turn {}: population {}, food {}, ore {}, metal {}",
        game.turn(),
        inventory.population(),
        inventory.quantity(FOOD),
        inventory.quantity(ORE),
        inventory.quantity(METAL),
    );
    if let (Some(header), Some(ending)) = (game.outcome().header(), game.ending()) {
        println!("{header} {}: {}", ending.title, ending.description);
    }
}
