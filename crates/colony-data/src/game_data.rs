//! Loading pipeline: read the data directory, resolve names, build the
//! configuration and catalogs.

use crate::loader::{
    DataLoadError, check_duplicate, deserialize_file, deserialize_list, find_data_file,
    require_data_file, resolve_with,
};
use crate::schema::{ConditionData, ConfigData, QuestStageData, TechData};
use colony_core::fixed::Fixed64;
use colony_core::resource::ResourceRegistry;
use colony_game::{Game, GameConfig, GameError};
use colony_quest::{ComparisonOp, QuestCatalog, QuestCatalogBuilder, QuestCondition, StageSpec};
use colony_tech_tree::{TechCatalog, TechCatalogBuilder, TechSpec};
use std::path::Path;
use std::sync::Arc;

/// Everything needed to start runs, loaded from one data directory.
#[derive(Debug, Clone)]
pub struct GameData {
    pub config: GameConfig,
    pub resources: ResourceRegistry,
    pub techs: Arc<TechCatalog>,
    pub quests: Arc<QuestCatalog>,
}

impl GameData {
    /// Start a fresh run from the loaded data.
    pub fn new_game(&self) -> Result<Game, GameError> {
        Game::new(&self.config, Arc::clone(&self.techs), Arc::clone(&self.quests))
    }
}

/// Load `config` (required), `technologies` and `quests` (optional) from
/// `dir`. Missing catalogs fall back to the standard ones.
pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    let config_path = require_data_file(dir, "config")?;
    let config_data: ConfigData = deserialize_file(&config_path)?;
    let (config, resources) = resolve_config(config_data, &config_path)?;

    let techs = match find_data_file(dir, "technologies")? {
        Some(path) => {
            let data: Vec<TechData> = deserialize_list(&path, "technologies")?;
            resolve_techs(&data, &path)?
        }
        None => {
            tracing::info!(target: "colony::data", "technologies.defaulted");
            TechCatalog::standard()
        }
    };

    let quests = match find_data_file(dir, "quests")? {
        Some(path) => {
            let data: Vec<QuestStageData> = deserialize_list(&path, "stages")?;
            resolve_quests(&data, &resources, &techs, &path)?
        }
        None => {
            tracing::info!(target: "colony::data", "quests.defaulted");
            QuestCatalog::standard(&techs)?
        }
    };

    tracing::info!(
        target: "colony::data",
        dir = %dir.display(),
        resources = resources.len(),
        technologies = techs.len(),
        stages = quests.len(),
        "data.loaded"
    );

    Ok(GameData {
        config,
        resources,
        techs: Arc::new(techs),
        quests: Arc::new(quests),
    })
}

// ===========================================================================
// Resolution
// ===========================================================================

/// Register resource names and resolve the config's references to them.
pub fn resolve_config(
    data: ConfigData,
    path: &Path,
) -> Result<(GameConfig, ResourceRegistry), DataLoadError> {
    let mut resources = ResourceRegistry::new();
    for name in &data.resources {
        check_duplicate(resources.id(name).is_some(), name, path)?;
        resources.register(name);
    }

    let growth_rate = Fixed64::checked_from_num(data.growth_rate)
        .filter(|rate| *rate >= Fixed64::ZERO)
        .ok_or_else(|| DataLoadError::InvalidValue {
            file: path.to_path_buf(),
            field: "growth_rate",
            detail: format!("expected a non-negative number, got {}", data.growth_rate),
        })?;
    if data.first_turn == u32::MAX {
        return Err(DataLoadError::InvalidValue {
            file: path.to_path_buf(),
            field: "first_turn",
            detail: format!("a run starting at {} could never complete a turn", u32::MAX),
        });
    }
    if data.width == 0 || data.height == 0 {
        tracing::warn!(
            target: "colony::data",
            width = data.width,
            height = data.height,
            "config.empty_world"
        );
    }

    let food = data
        .food
        .as_deref()
        .map(|name| resolve_with(|n| resources.id(n), name, path, "resource"))
        .transpose()?;
    let starting_resources = data
        .starting_resources
        .iter()
        .map(|(name, quantity)| {
            resolve_with(|n| resources.id(n), name, path, "resource").map(|id| (id, *quantity))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let config = GameConfig {
        width: data.width,
        height: data.height,
        terrain: data.terrain,
        lander: data.lander,
        first_turn: data.first_turn,
        population: data.population,
        workers: data.workers,
        growth_rate,
        food,
        starting_resources,
    };
    Ok((config, resources))
}

/// Build a tech catalog. Prerequisites must name technologies declared
/// earlier in the list.
pub fn resolve_techs(data: &[TechData], path: &Path) -> Result<TechCatalog, DataLoadError> {
    let mut builder = TechCatalogBuilder::new();
    for tech in data {
        check_duplicate(builder.id(&tech.name).is_some(), &tech.name, path)?;

        let mut spec = TechSpec::new(&tech.name);
        for prereq in &tech.prerequisites {
            spec = spec.requires(resolve_with(|n| builder.id(n), prereq, path, "technology")?);
        }
        if let Some(costs) = &tech.costs {
            spec = spec.costs(costs.clone());
        }
        if !tech.visible {
            spec = spec.hidden();
        }
        builder.register(spec)?;
    }
    Ok(builder.build())
}

/// Build a quest catalog. Stages are declared first so that transitions
/// may refer to stages later in the list.
pub fn resolve_quests(
    data: &[QuestStageData],
    resources: &ResourceRegistry,
    techs: &TechCatalog,
    path: &Path,
) -> Result<QuestCatalog, DataLoadError> {
    let mut builder = QuestCatalogBuilder::new();
    for stage in data {
        check_duplicate(builder.id(&stage.name).is_some(), &stage.name, path)?;

        let mut spec = StageSpec::new(&stage.name, &stage.description);
        if let Some(hint) = &stage.hint {
            spec = spec.hint(hint);
        }
        if stage.win {
            spec = spec.win();
        }
        if stage.lose {
            spec = spec.lose();
        }
        if let Some(ending) = &stage.ending {
            spec = spec.ending(&ending.title, &ending.description);
        }
        builder.declare(spec)?;
    }

    for stage in data {
        let from = resolve_with(|n| builder.id(n), &stage.name, path, "stage")?;
        for transition in &stage.transitions {
            let to = resolve_with(|n| builder.id(n), &transition.to, path, "stage")?;
            let when = resolve_condition(&transition.when, resources, techs, path)?;
            builder.transition(from, when, to)?;
        }
    }

    Ok(builder.build()?)
}

fn resolve_condition(
    data: &ConditionData,
    resources: &ResourceRegistry,
    techs: &TechCatalog,
    path: &Path,
) -> Result<QuestCondition, DataLoadError> {
    let all = |items: &[ConditionData]| {
        items
            .iter()
            .map(|c| resolve_condition(c, resources, techs, path))
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(match data {
        ConditionData::Always => QuestCondition::Always,
        ConditionData::Turn { op, value } => QuestCondition::Turn {
            op: *op,
            value: *value,
        },
        ConditionData::Population { op, value } => QuestCondition::Population {
            op: *op,
            value: *value,
        },
        ConditionData::Resource {
            resource,
            op,
            value,
        } => QuestCondition::Resource {
            resource: resolve_with(|n| resources.id(n), resource, path, "resource")?,
            op: *op,
            value: *value,
        },
        ConditionData::TileCount { kind, op, value } => QuestCondition::TileCount {
            kind: kind.clone(),
            op: *op,
            value: *value,
        },
        ConditionData::TileExists(kind) => QuestCondition::TileCount {
            kind: kind.clone(),
            op: ComparisonOp::Gte,
            value: 1,
        },
        ConditionData::TechUnlocked(name) => {
            QuestCondition::TechUnlocked(resolve_with(|n| techs.id(n), name, path, "technology")?)
        }
        ConditionData::All(items) => QuestCondition::All(all(items)?),
        ConditionData::Any(items) => QuestCondition::Any(all(items)?),
        ConditionData::Not(inner) => {
            QuestCondition::Not(Box::new(resolve_condition(inner, resources, techs, path)?))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::ScratchDir;
    use colony_quest::StageId;

    const CONFIG: &str = r#"(
        width: 6,
        height: 4,
        lander: Some((1, 1)),
        population: 3,
        growth_rate: 0.5,
        resources: ["food", "ore", "metal"],
        food: Some("food"),
        starting_resources: [("ore", 4)],
    )"#;

    #[test]
    fn loads_config_and_falls_back_to_standard_catalogs() {
        let scratch = ScratchDir::new("gd_defaults");
        scratch.write("config.ron", CONFIG);

        let data = load_game_data(&scratch.0).unwrap();

        assert_eq!(data.config.width, 6);
        assert_eq!(data.config.lander, Some((1, 1)));
        let ore = data.resources.id("ore").unwrap();
        assert_eq!(data.config.starting_resources, vec![(ore, 4)]);
        assert_eq!(data.config.food, data.resources.id("food"));
        assert_eq!(data.techs.len(), TechCatalog::standard().len());
        assert!(data.quests.id("colony_thriving").is_some());

        let game = data.new_game().unwrap();
        assert_eq!(game.world().width(), 6);
    }

    #[test]
    fn config_is_required() {
        let scratch = ScratchDir::new("gd_no_config");
        assert!(matches!(
            load_game_data(&scratch.0),
            Err(DataLoadError::MissingRequired { .. })
        ));
    }

    #[test]
    fn unknown_resource_in_config() {
        let data = ConfigData {
            resources: vec!["ore".to_string()],
            starting_resources: vec![("slag".to_string(), 1)],
            ..ConfigData::default()
        };
        let err = resolve_config(data, Path::new("config.ron")).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnresolvedRef { ref name, expected_kind: "resource", .. } if name == "slag"
        ));
    }

    #[test]
    fn duplicate_resource_in_config() {
        let data = ConfigData {
            resources: vec!["ore".to_string(), "ore".to_string()],
            ..ConfigData::default()
        };
        assert!(matches!(
            resolve_config(data, Path::new("config.ron")),
            Err(DataLoadError::DuplicateName { .. })
        ));
    }

    #[test]
    fn negative_growth_rate_is_rejected() {
        let data = ConfigData {
            growth_rate: -0.1,
            ..ConfigData::default()
        };
        assert!(matches!(
            resolve_config(data, Path::new("config.ron")),
            Err(DataLoadError::InvalidValue { field: "growth_rate", .. })
        ));
    }

    #[test]
    fn out_of_range_growth_rate_is_rejected() {
        for growth_rate in [1e12, f64::NAN, f64::INFINITY] {
            let data = ConfigData {
                growth_rate,
                ..ConfigData::default()
            };
            assert!(matches!(
                resolve_config(data, Path::new("config.ron")),
                Err(DataLoadError::InvalidValue { field: "growth_rate", .. })
            ));
        }
    }

    #[test]
    fn last_turn_cannot_be_the_first() {
        let data = ConfigData {
            first_turn: u32::MAX,
            ..ConfigData::default()
        };
        assert!(matches!(
            resolve_config(data, Path::new("config.ron")),
            Err(DataLoadError::InvalidValue { field: "first_turn", .. })
        ));

        let data = ConfigData {
            first_turn: u32::MAX - 1,
            ..ConfigData::default()
        };
        assert!(resolve_config(data, Path::new("config.ron")).is_ok());
    }

    fn tech(name: &str, prerequisites: &[&str]) -> TechData {
        TechData {
            name: name.to_string(),
            prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
            costs: None,
            visible: true,
        }
    }

    #[test]
    fn techs_resolve_prerequisites_by_name() {
        let data = vec![tech("Root", &[]), tech("Left", &["Root"]), tech("Both", &["Root", "Left"])];
        let catalog = resolve_techs(&data, Path::new("technologies.ron")).unwrap();
        let both = catalog.get(catalog.id("Both").unwrap()).unwrap();
        assert_eq!(
            both.prerequisites,
            vec![catalog.id("Root").unwrap(), catalog.id("Left").unwrap()]
        );
    }

    #[test]
    fn tech_prerequisite_must_come_first() {
        let data = vec![tech("Left", &["Root"]), tech("Root", &[])];
        assert!(matches!(
            resolve_techs(&data, Path::new("technologies.ron")),
            Err(DataLoadError::UnresolvedRef { expected_kind: "technology", .. })
        ));
    }

    #[test]
    fn duplicate_tech_name() {
        let data = vec![tech("Root", &[]), tech("Root", &[])];
        assert!(matches!(
            resolve_techs(&data, Path::new("technologies.ron")),
            Err(DataLoadError::DuplicateName { .. })
        ));
    }

    fn stage(name: &str, transitions: Vec<(&str, ConditionData)>) -> QuestStageData {
        QuestStageData {
            name: name.to_string(),
            description: format!("{name} description"),
            hint: None,
            win: false,
            lose: false,
            ending: None,
            transitions: transitions
                .into_iter()
                .map(|(to, when)| crate::schema::TransitionData {
                    to: to.to_string(),
                    when,
                })
                .collect(),
        }
    }

    #[test]
    fn quests_allow_forward_references() {
        let mut registry = ResourceRegistry::new();
        let ore = registry.register("ore");
        let techs = TechCatalog::standard();
        let mut done = stage("done", vec![]);
        done.win = true;
        let data = vec![
            stage(
                "start",
                vec![(
                    "done",
                    ConditionData::All(vec![
                        ConditionData::Resource {
                            resource: "ore".to_string(),
                            op: ComparisonOp::Gte,
                            value: 10,
                        },
                        ConditionData::TechUnlocked("Engineering0".to_string()),
                    ]),
                )],
            ),
            done,
        ];

        let catalog = resolve_quests(&data, &registry, &techs, Path::new("quests.ron")).unwrap();

        let start = catalog.get(catalog.entry()).unwrap();
        assert_eq!(start.name, "start");
        assert_eq!(start.transitions[0].to, StageId(1));
        assert_eq!(
            start.transitions[0].when,
            QuestCondition::All(vec![
                QuestCondition::Resource {
                    resource: ore,
                    op: ComparisonOp::Gte,
                    value: 10,
                },
                QuestCondition::TechUnlocked(techs.id("Engineering0").unwrap()),
            ])
        );
        assert!(catalog.get(StageId(1)).unwrap().is_win_state);
    }

    #[test]
    fn quest_references_must_resolve() {
        let registry = ResourceRegistry::new();
        let techs = TechCatalog::standard();
        let path = Path::new("quests.ron");

        let to_nowhere = vec![stage("start", vec![("nowhere", ConditionData::Always)])];
        assert!(matches!(
            resolve_quests(&to_nowhere, &registry, &techs, path),
            Err(DataLoadError::UnresolvedRef { expected_kind: "stage", .. })
        ));

        let unknown_tech = vec![
            stage("start", vec![("start", ConditionData::TechUnlocked("Warp".to_string()))]),
        ];
        assert!(matches!(
            resolve_quests(&unknown_tech, &registry, &techs, path),
            Err(DataLoadError::UnresolvedRef { expected_kind: "technology", .. })
        ));
    }

    #[test]
    fn quest_catalog_rules_still_apply() {
        let registry = ResourceRegistry::new();
        let techs = TechCatalog::standard();
        let mut both = stage("both", vec![]);
        both.win = true;
        both.lose = true;

        assert!(matches!(
            resolve_quests(&[both], &registry, &techs, Path::new("quests.ron")),
            Err(DataLoadError::QuestCatalog(_))
        ));
        assert!(matches!(
            resolve_quests(&[], &registry, &techs, Path::new("quests.ron")),
            Err(DataLoadError::QuestCatalog(_))
        ));
    }
}
