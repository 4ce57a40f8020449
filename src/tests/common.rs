use crate::catalog::{Catalog, ReferenceDataProvider};
use crate::errors::{CatalogError, CatalogResult};
use schema::{
    Ability, Attributes, Creature, CreatureAbility, EvolutionCondition, EvolutionEdge, MoveData,
    MovePower, MoveTable, Nature, PokemonType, DEFAULT_DURATION,
};
use serde_json::json;
use std::path::PathBuf;

/// A builder for creating test creatures with catalog-load defaults.
///
/// # Example
/// ```
/// let creature = TestCreatureBuilder::new("charmander")
///     .with_types(&[PokemonType::Fire])
///     .with_moves("start", &["scratch", "growl"])
///     .build();
/// ```
pub struct TestCreatureBuilder {
    id: String,
    name: Option<String>,
    number: u32,
    types: Vec<PokemonType>,
    attributes: Attributes,
    hp: i32,
    ac: i32,
    hit_dice: String,
    sr: Option<f64>,
    moves: MoveTable,
    abilities: Vec<CreatureAbility>,
}

impl TestCreatureBuilder {
    /// Starts from the defaults a bare catalog record would get: scores of
    /// 10, a d6, number 1 and sr 0.5.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            number: 1,
            types: vec![PokemonType::Normal],
            attributes: Attributes::default(),
            hp: 10,
            ac: 10,
            hit_dice: "d6".to_string(),
            sr: Some(0.5),
            moves: MoveTable::new(),
            abilities: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }

    pub fn with_types(mut self, types: &[PokemonType]) -> Self {
        self.types = types.to_vec();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_hp_ac(mut self, hp: i32, ac: i32) -> Self {
        self.hp = hp;
        self.ac = ac;
        self
    }

    pub fn with_hit_dice(mut self, hit_dice: &str) -> Self {
        self.hit_dice = hit_dice.to_string();
        self
    }

    pub fn with_sr(mut self, sr: f64) -> Self {
        self.sr = Some(sr);
        self
    }

    pub fn unrated(mut self) -> Self {
        self.sr = None;
        self
    }

    /// Adds a move-table source, e.g. `("level6", &["ember"])`.
    pub fn with_moves(mut self, source: &str, moves: &[&str]) -> Self {
        self.moves.insert(
            source.to_string(),
            moves.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn with_ability(mut self, id: &str, hidden: bool) -> Self {
        self.abilities.push(CreatureAbility {
            id: id.to_string(),
            hidden,
            description: None,
        });
        self
    }

    /// A normal ability that carries its own description.
    pub fn with_described_ability(mut self, id: &str, description: &str) -> Self {
        self.abilities.push(CreatureAbility {
            id: id.to_string(),
            hidden: false,
            description: Some(description.to_string()),
        });
        self
    }

    pub fn build(self) -> Creature {
        Creature {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            number: self.number,
            types: self.types,
            attributes: self.attributes,
            hp: self.hp,
            ac: self.ac,
            hit_dice: self.hit_dice,
            sr: self.sr,
            moves: self.moves,
            abilities: self.abilities,
            description: None,
            size: None,
            min_level: None,
            evolution: None,
            speed: Vec::new(),
            skills: Vec::new(),
            saving_throws: Vec::new(),
        }
    }
}

fn attributes(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Attributes {
    Attributes {
        str,
        dex,
        con,
        int,
        wis,
        cha,
    }
}

fn fixture_creatures() -> Vec<Creature> {
    vec![
        TestCreatureBuilder::new("bulbasaur")
            .with_name("Bulbasaur")
            .with_number(1)
            .with_types(&[PokemonType::Grass, PokemonType::Poison])
            .with_attributes(attributes(13, 12, 14, 10, 11, 10))
            .with_hp_ac(19, 13)
            .with_hit_dice("d8")
            .with_sr(0.5)
            .with_moves("start", &["tackle", "growl"])
            .with_moves("level2", &["leech-seed"])
            .with_moves("level6", &["vine-whip"])
            .with_moves("level9", &["sleep-powder"])
            .with_moves("level10", &["poison-powder"])
            .with_moves("level14", &["razor-leaf"])
            .with_moves("tm", &["6", "21"])
            .with_moves("egg", &["petal-dance"])
            .with_ability("overgrow", false)
            .with_ability("chlorophyll", true)
            .build(),
        TestCreatureBuilder::new("ivysaur")
            .with_name("Ivysaur")
            .with_number(2)
            .with_types(&[PokemonType::Grass, PokemonType::Poison])
            .with_attributes(attributes(15, 12, 15, 11, 12, 10))
            .with_hp_ac(38, 14)
            .with_hit_dice("d10")
            .with_sr(2.0)
            .with_moves("start", &["tackle", "growl", "leech-seed"])
            .with_moves("level6", &["vine-whip"])
            .with_ability("overgrow", false)
            .with_ability("chlorophyll", true)
            .build(),
        TestCreatureBuilder::new("venusaur")
            .with_name("Venusaur")
            .with_number(3)
            .with_types(&[PokemonType::Grass, PokemonType::Poison])
            .with_attributes(attributes(18, 12, 17, 12, 13, 11))
            .with_hp_ac(95, 16)
            .with_hit_dice("d12")
            .with_sr(8.0)
            .with_moves("start", &["tackle", "vine-whip", "razor-leaf"])
            .with_ability("overgrow", false)
            .build(),
        TestCreatureBuilder::new("charmander")
            .with_name("Charmander")
            .with_number(4)
            .with_types(&[PokemonType::Fire])
            .with_attributes(attributes(12, 14, 12, 10, 11, 10))
            .with_hp_ac(17, 13)
            .with_hit_dice("d6")
            .with_sr(0.5)
            .with_moves("start", &["scratch", "growl"])
            .with_moves("level6", &["ember"])
            .with_moves("level10", &["smokescreen"])
            .with_ability("blaze", false)
            .with_ability("solar-power", true)
            .build(),
        TestCreatureBuilder::new("pikachu")
            .with_name("Pikachu")
            .with_number(25)
            .with_types(&[PokemonType::Electric])
            .with_attributes(attributes(10, 16, 11, 12, 12, 13))
            .with_hp_ac(15, 13)
            .with_hit_dice("d6")
            .with_sr(0.25)
            .with_moves("start", &["thunder-shock", "growl"])
            .with_moves("level2", &["tail-whip"])
            .with_ability("static", false)
            .with_ability("lightning-rod", true)
            .build(),
        TestCreatureBuilder::new("ditto")
            .with_name("Ditto")
            .with_number(132)
            .with_types(&[PokemonType::Normal])
            .with_hp_ac(21, 11)
            .with_sr(1.0)
            .with_moves("start", &["transform"])
            .with_ability("limber", false)
            .build(),
        TestCreatureBuilder::new("placeholder")
            .with_number(0)
            .with_sr(0.125)
            .build(),
    ]
}

fn fixture_move(id: &str, name: &str, move_type: PokemonType, power: MovePower, description: &str) -> MoveData {
    MoveData {
        id: id.to_string(),
        name: name.to_string(),
        move_type,
        power,
        pp: 10,
        casting_time: Some("1 action".to_string()),
        range: Some("Melee".to_string()),
        duration: DEFAULT_DURATION.to_string(),
        description: description.to_string(),
        higher_levels: None,
    }
}

fn dice(text: &str) -> MovePower {
    MovePower::Single(text.to_string())
}

fn fixture_moves() -> Vec<MoveData> {
    use PokemonType::*;
    vec![
        fixture_move("tackle", "Tackle", Normal, dice("STR"), "A full-body charge."),
        fixture_move("growl", "Growl", Normal, MovePower::None, "Lowers the target's attack."),
        fixture_move("scratch", "Scratch", Normal, dice("STR/DEX"), "Rakes the target with claws."),
        fixture_move("leech-seed", "Leech Seed", Grass, MovePower::None, "Plants a draining seed."),
        fixture_move("vine-whip", "Vine Whip", Grass, dice("STR/DEX"), "Strikes with slender vines."),
        fixture_move("sleep-powder", "Sleep Powder", Grass, MovePower::None, "Puts the target to sleep."),
        fixture_move("poison-powder", "Poison Powder", Poison, MovePower::None, "Poisons the target."),
        fixture_move("razor-leaf", "Razor Leaf", Grass, dice("DEX"), "Launches sharp leaves."),
        fixture_move("ember", "Ember", Fire, dice("SPE"), "A small flame."),
        fixture_move("smokescreen", "Smokescreen", Normal, MovePower::None, "Obscures the target's vision."),
        fixture_move("thunder-shock", "Thunder Shock", Electric, dice("SPE"), "A jolt of electricity."),
        fixture_move("tail-whip", "Tail Whip", Normal, MovePower::None, "Lowers the target's AC."),
        fixture_move("transform", "Transform", Normal, MovePower::None, "Copies the target."),
    ]
}

fn fixture_abilities() -> Vec<Ability> {
    [
        ("overgrow", "Overgrow", "Grass moves gain a bonus while at low HP."),
        ("chlorophyll", "Chlorophyll", "Speed doubles in harsh sunlight."),
        ("blaze", "Blaze", "Fire moves gain a bonus while at low HP."),
        ("solar-power", "Solar Power", "Special moves hit harder in sunlight."),
        ("static", "Static", "Contact may paralyze the attacker."),
        ("lightning-rod", "Lightning Rod", "Draws in electric moves."),
        ("limber", "Limber", "Cannot be paralyzed."),
    ]
    .into_iter()
    .map(|(id, name, description)| Ability {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

/// The 25 standard natures, five of them neutral.
pub fn standard_natures() -> Vec<Nature> {
    let table = [
        ("hardy", "Hardy", "str", "str"),
        ("lonely", "Lonely", "str", "con"),
        ("brave", "Brave", "str", "dex"),
        ("adamant", "Adamant", "str", "int"),
        ("naughty", "Naughty", "str", "wis"),
        ("bold", "Bold", "con", "str"),
        ("docile", "Docile", "con", "con"),
        ("relaxed", "Relaxed", "con", "dex"),
        ("impish", "Impish", "con", "int"),
        ("lax", "Lax", "con", "wis"),
        ("timid", "Timid", "dex", "str"),
        ("hasty", "Hasty", "dex", "con"),
        ("serious", "Serious", "dex", "dex"),
        ("jolly", "Jolly", "dex", "int"),
        ("naive", "Naive", "dex", "wis"),
        ("modest", "Modest", "int", "str"),
        ("mild", "Mild", "int", "con"),
        ("quiet", "Quiet", "int", "dex"),
        ("bashful", "Bashful", "int", "int"),
        ("rash", "Rash", "int", "wis"),
        ("calm", "Calm", "wis", "str"),
        ("gentle", "Gentle", "wis", "con"),
        ("sassy", "Sassy", "wis", "dex"),
        ("careful", "Careful", "wis", "int"),
        ("quirky", "Quirky", "wis", "wis"),
    ];
    table
        .into_iter()
        .map(|(id, name, up, down)| Nature {
            id: id.to_string(),
            name: name.to_string(),
            effect: if up == down {
                "Neutral".to_string()
            } else {
                format!("+1 {}, -1 {}", up.to_uppercase(), down.to_uppercase())
            },
            increased_stat: up.to_string(),
            decreased_stat: down.to_string(),
        })
        .collect()
}

fn level_edge(from: &str, to: &str, level: u32) -> EvolutionEdge {
    EvolutionEdge {
        from: from.to_string(),
        to: to.to_string(),
        conditions: vec![EvolutionCondition {
            kind: "level".to_string(),
            value: json!(level),
        }],
    }
}

fn fixture_evolutions() -> Vec<EvolutionEdge> {
    vec![
        level_edge("bulbasaur", "ivysaur", 16),
        level_edge("ivysaur", "venusaur", 32),
        EvolutionEdge {
            from: "pikachu".to_string(),
            to: "raichu".to_string(),
            conditions: vec![EvolutionCondition {
                kind: "item".to_string(),
                value: json!("thunder-stone"),
            }],
        },
    ]
}

/// A small in-memory catalog covering every engine path.
pub fn fixture_catalog() -> Catalog {
    Catalog::from_records(
        fixture_creatures(),
        fixture_moves(),
        fixture_abilities(),
        standard_natures(),
        fixture_evolutions(),
    )
}

/// Serves the fixture catalog, except that the chosen by-id lookups fail as
/// if the backing store had gone away.
#[derive(Default)]
pub struct UnreliableCatalog {
    pub catalog: Catalog,
    pub fail_moves: bool,
    pub fail_abilities: bool,
    pub fail_creatures: bool,
}

impl UnreliableCatalog {
    pub fn new() -> Self {
        Self {
            catalog: fixture_catalog(),
            ..Self::default()
        }
    }

    fn outage<T>(fail: bool, lookup: CatalogResult<T>) -> CatalogResult<T> {
        if fail {
            return Err(CatalogError::Unavailable {
                path: PathBuf::from("fixture"),
                reason: "connection reset".to_string(),
            });
        }
        lookup
    }
}

impl ReferenceDataProvider for UnreliableCatalog {
    fn all_creatures(&self) -> CatalogResult<&[Creature]> {
        self.catalog.all_creatures()
    }
    fn creature_by_id(&self, id: &str) -> CatalogResult<&Creature> {
        Self::outage(self.fail_creatures, self.catalog.creature_by_id(id))
    }
    fn all_moves(&self) -> CatalogResult<&[MoveData]> {
        self.catalog.all_moves()
    }
    fn move_by_id(&self, id: &str) -> CatalogResult<&MoveData> {
        Self::outage(self.fail_moves, self.catalog.move_by_id(id))
    }
    fn all_abilities(&self) -> CatalogResult<&[Ability]> {
        self.catalog.all_abilities()
    }
    fn ability_by_id(&self, id: &str) -> CatalogResult<&Ability> {
        Self::outage(self.fail_abilities, self.catalog.ability_by_id(id))
    }
    fn all_natures(&self) -> CatalogResult<&[Nature]> {
        self.catalog.all_natures()
    }
    fn all_evolution_edges(&self) -> CatalogResult<&[EvolutionEdge]> {
        self.catalog.all_evolution_edges()
    }
}
