use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CardDetail: common record plus one category extension
// ---------------------------------------------------------------------------

/// Full record returned by the card detail endpoint.
///
/// Built by [`decode_card_detail`](crate::decoder::decode_card_detail); the
/// populated [`CardExtension`] always matches `category`.
#[derive(Debug, Clone, Serialize)]
pub struct CardDetail {
    /// Raw discriminator as sent by the server (case preserved).
    pub category: String,
    pub id: String,
    pub illustrator: Option<String>,
    pub image: Option<String>,
    pub local_id: String,
    pub name: String,
    pub rarity: Option<String>,
    pub set: CardSetInfo,
    pub variants: Variants,
    pub legal: Option<Legal>,
    pub description: Option<String>,
    pub extension: CardExtension,
}

impl CardDetail {
    pub fn kind(&self) -> CardCategory {
        match self.extension {
            CardExtension::Pokemon(_) => CardCategory::Pokemon,
            CardExtension::Trainer(_) => CardCategory::Trainer,
            CardExtension::Energy(_) => CardCategory::Energy,
        }
    }

    pub fn pokemon(&self) -> Option<&PokemonExtension> {
        match &self.extension {
            CardExtension::Pokemon(p) => Some(p),
            _ => None,
        }
    }

    pub fn trainer(&self) -> Option<&TrainerExtension> {
        match &self.extension {
            CardExtension::Trainer(t) => Some(t),
            _ => None,
        }
    }

    pub fn energy(&self) -> Option<&EnergyExtension> {
        match &self.extension {
            CardExtension::Energy(e) => Some(e),
            _ => None,
        }
    }
}

/// The three detail shapes selected by the `category` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardCategory {
    Pokemon,
    Trainer,
    Energy,
}

impl CardCategory {
    /// Case-insensitive match against the wire discriminator.
    pub fn from_discriminator(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "pokemon" => Some(CardCategory::Pokemon),
            "trainer" => Some(CardCategory::Trainer),
            "energy" => Some(CardCategory::Energy),
            _ => None,
        }
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardCategory::Pokemon => f.write_str("pokemon"),
            CardCategory::Trainer => f.write_str("trainer"),
            CardCategory::Energy => f.write_str("energy"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum CardExtension {
    Pokemon(PokemonExtension),
    Trainer(TrainerExtension),
    Energy(EnergyExtension),
}

// ---------------------------------------------------------------------------
// Set descriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSetInfo {
    pub id: String,
    pub name: String,
    #[serde(alias = "cardCount")]
    pub card_count: CardCount,
    pub logo: Option<String>,
    pub symbol: Option<String>,
}

impl CardSetInfo {
    pub fn logo_url(&self) -> Option<String> {
        self.logo.as_deref().map(|logo| format!("{}.webp", logo))
    }

    pub fn symbol_url(&self) -> Option<String> {
        self.symbol.as_deref().map(|symbol| format!("{}.webp", symbol))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCount {
    pub official: u32,
    pub total: u32,
}

// ---------------------------------------------------------------------------
// Variants / Legal flag sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variants {
    #[serde(default, alias = "firstEdition")]
    pub first_edition: bool,
    #[serde(default)]
    pub holo: bool,
    #[serde(default)]
    pub normal: bool,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default, alias = "wPromo")]
    pub w_promo: bool,
}

impl Variants {
    /// Labels of the set flags, in declaration order.
    pub fn labels(&self) -> Vec<&'static str> {
        [
            (self.first_edition, "First Edition"),
            (self.holo, "Holo"),
            (self.normal, "Normal"),
            (self.reverse, "Reverse"),
            (self.w_promo, "W Promo"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }
}

impl fmt::Display for Variants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels().join(", "))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legal {
    #[serde(default)]
    pub standard: bool,
    #[serde(default)]
    pub expanded: bool,
}

impl Legal {
    pub fn labels(&self) -> Vec<&'static str> {
        [(self.standard, "Standard"), (self.expanded, "Expanded")]
            .into_iter()
            .filter_map(|(set, label)| set.then_some(label))
            .collect()
    }
}

impl fmt::Display for Legal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.labels();
        if labels.is_empty() {
            return f.write_str("none");
        }
        f.write_str(&labels.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Category extensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonExtension {
    #[serde(alias = "dexId")]
    pub dex_id: Option<Vec<u32>>,
    pub hp: Option<u32>,
    pub types: Option<Vec<String>>,
    #[serde(alias = "evolveFrom")]
    pub evolve_from: Option<String>,
    pub stage: Option<String>,
    pub level: Option<String>,
    pub suffix: Option<String>,
    pub attacks: Option<Vec<Attack>>,
    pub weaknesses: Option<Vec<Weakness>>,
    pub retreat: Option<u32>,
    pub abilities: Option<Vec<Ability>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    #[serde(default)]
    pub cost: Vec<String>,
    /// Normalized display string; the wire may carry an integer or a string.
    #[serde(default, deserialize_with = "crate::decoder::damage_from_wire")]
    pub damage: Option<String>,
    pub effect: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weakness {
    #[serde(rename = "type")]
    pub type_field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(rename = "type")]
    pub type_field: String,
    pub effect: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerExtension {
    pub effect: Option<String>,
    #[serde(alias = "trainerType")]
    pub trainer_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyExtension {
    pub effect: Option<String>,
    #[serde(alias = "energyType")]
    pub energy_type: String,
}
