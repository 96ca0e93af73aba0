//! Runs an AI-driven skirmish from a TOML encounter file.
//!
//! Every combatant with a behavior is driven by the AI engine; party members
//! without one stand their ground. Set `RUST_LOG=debug` to see the scoring.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use combat_core::{
    factory::{sync_to_character, EntityFactory, Placement},
    query, CombatConfig, Encounter, EncounterOutcome, RandomRoller, StandardRules,
};
use game_rules::{
    Ability, AbilityScores, Behavior, Character, MonsterTemplate, SpellCatalog, SpellDefinition,
    Weapon,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Run an AI-driven skirmish from an encounter file", long_about = None)]
#[command(version)]
struct Args {
    /// Encounter definition (TOML)
    #[arg(value_name = "ENCOUNTER")]
    path: PathBuf,

    /// Seed for reproducible dice
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct EncounterFile {
    #[serde(default)]
    config: CombatConfig,
    #[serde(default)]
    spells: Vec<SpellDefinition>,
    #[serde(default)]
    party: Vec<PartyEntry>,
    #[serde(default)]
    monsters: Vec<MonsterEntry>,
}

#[derive(Debug, Deserialize)]
struct PartyEntry {
    character: CharacterSheet,
    /// Party members with a behavior are AI-driven companions.
    #[serde(default)]
    behavior: Option<Behavior>,
    placement: Placement,
}

#[derive(Debug, Deserialize)]
struct MonsterEntry {
    template: MonsterTemplate,
    placement: Placement,
}

/// The subset of a character an encounter file spells out.
#[derive(Debug, Deserialize)]
struct CharacterSheet {
    name: String,
    #[serde(default = "default_level")]
    level: u32,
    max_hp: i32,
    armor_class: i32,
    #[serde(default = "default_speed")]
    speed: u32,
    #[serde(default)]
    abilities: AbilityScores,
    #[serde(default)]
    weapons: Vec<Weapon>,
    #[serde(default)]
    spells: Vec<String>,
    #[serde(default)]
    spellcasting_ability: Option<Ability>,
}

fn default_level() -> u32 {
    1
}

fn default_speed() -> u32 {
    30
}

impl CharacterSheet {
    fn into_character(self) -> Character {
        let mut character = Character::new(self.name).with_hp(self.max_hp);
        character.level = self.level;
        character.armor_class = self.armor_class;
        character.speed = self.speed;
        character.abilities = self.abilities;
        character.weapons = self.weapons;
        character.known_spells = self.spells;
        character.spellcasting_ability = self.spellcasting_ability;
        character
    }
}

fn load(path: &Path) -> Result<EncounterFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse(text: &str) -> Result<EncounterFile> {
    Ok(toml::from_str(text)?)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let file = load(&args.path)?;
    let roller = match args.seed {
        Some(seed) => RandomRoller::seeded(seed),
        None => RandomRoller::from_entropy(),
    };

    let catalog: SpellCatalog = file.spells.into_iter().collect();
    let factory = EntityFactory::with_catalog(&catalog);

    let mut party = Vec::with_capacity(file.party.len());
    let mut entities = Vec::new();
    for entry in file.party {
        let character = entry.character.into_character();
        entities.push(match entry.behavior {
            Some(behavior) => factory.companion(&character, behavior, entry.placement),
            None => factory.player(&character, entry.placement),
        });
        party.push(character);
    }
    for entry in &file.monsters {
        entities.push(factory.monster(&entry.template, entry.placement));
    }

    let mut encounter = Encounter::new(file.config, StandardRules::new(roller, catalog));
    encounter.create_encounter(entities);
    let outcome = encounter.run_until_resolved();

    let verdict = match outcome {
        EncounterOutcome::Victory => "The party is victorious",
        EncounterOutcome::Defeat => "The party has fallen",
        EncounterOutcome::Ongoing => "The fight is abandoned",
    };
    println!("{} after {} rounds.", verdict, encounter.round() - 1);
    if let Some(hero) = query::player(encounter.store()) {
        tracing::info!("{} is still standing", hero.name());
    }

    for view in encounter.snapshot() {
        let state = if view.is_dead { "dead" } else { "standing" };
        println!(
            "  {:<16} {:>3}/{:<3} HP  {}",
            view.name, view.current_hp, view.max_hp, state
        );
    }

    for character in &mut party {
        if let Some(entity) = encounter.store().get(character.id) {
            sync_to_character(entity, character);
            tracing::info!(
                "{} leaves the fight with {}/{} HP",
                character.name,
                character.current_hp,
                character.max_hp
            );
        }
    }

    if args.json {
        println!("{}", encounter.snapshot_json()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMBUSH: &str = include_str!("../../../demos/goblin_ambush.toml");

    #[test]
    fn test_parse_demo_encounter() {
        let file = parse(AMBUSH).unwrap();
        assert_eq!(file.config.max_rounds, 30);
        assert_eq!(file.config.ai.heal_self_threshold, 0.6);
        assert_eq!(file.config.ai.reach_slack, 1);
        assert_eq!(file.spells.len(), 2);
        assert_eq!(file.party.len(), 2);
        assert_eq!(file.monsters.len(), 3);
        assert_eq!(file.party[1].behavior, Some(Behavior::Defensive));
        assert_eq!(file.monsters[1].template.behavior, Behavior::Tactical);
    }

    #[test]
    fn test_character_sheet_defaults() {
        let file = parse(AMBUSH).unwrap();
        let ilse = file.party.into_iter().nth(1).unwrap().character.into_character();
        assert_eq!(ilse.speed, 25);
        assert_eq!(ilse.abilities.wisdom, 16);
        assert_eq!(ilse.abilities.strength, 10);
        assert_eq!(ilse.known_spells, vec!["cure_wounds", "sacred_flame"]);
    }
}
