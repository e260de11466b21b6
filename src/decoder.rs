//! Decoding of the polymorphic card detail record.
//!
//! The detail endpoint returns one flat JSON object whose shape depends on
//! its `category` field. Decoding reads the discriminator first, then the
//! common fields, then the extension matching the discriminator from the
//! same payload. Wire keys are snake_case; the camelCase spellings some API
//! versions emit are accepted as aliases on the model fields.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Result, TcgError};
use crate::models::{
    CardCategory, CardDetail, CardExtension, CardSetInfo, EnergyExtension, Legal,
    PokemonExtension, TrainerExtension, Variants,
};

#[derive(Deserialize)]
struct Discriminator {
    category: String,
}

#[derive(Deserialize)]
struct CommonRecord {
    id: String,
    illustrator: Option<String>,
    image: Option<String>,
    #[serde(alias = "localId")]
    local_id: String,
    name: String,
    rarity: Option<String>,
    set: CardSetInfo,
    variants: Variants,
    legal: Option<Legal>,
    description: Option<String>,
}

/// Decode a card detail payload into a [`CardDetail`].
///
/// Fails with [`TcgError::UnknownCategory`] (carrying the raw value) when the
/// discriminator is not one of `pokemon`, `trainer` or `energy`, and with
/// [`TcgError::Json`] when the payload does not match the expected shape.
pub fn decode_card_detail(bytes: &[u8]) -> Result<CardDetail> {
    let Discriminator { category } = serde_json::from_slice(bytes)?;

    let kind = CardCategory::from_discriminator(&category)
        .ok_or_else(|| TcgError::UnknownCategory(category.clone()))?;

    let common: CommonRecord = serde_json::from_slice(bytes)?;

    let extension = match kind {
        CardCategory::Pokemon => {
            CardExtension::Pokemon(serde_json::from_slice::<PokemonExtension>(bytes)?)
        }
        CardCategory::Trainer => {
            CardExtension::Trainer(serde_json::from_slice::<TrainerExtension>(bytes)?)
        }
        CardCategory::Energy => {
            CardExtension::Energy(serde_json::from_slice::<EnergyExtension>(bytes)?)
        }
    };

    Ok(CardDetail {
        category,
        id: common.id,
        illustrator: common.illustrator,
        image: common.image,
        local_id: common.local_id,
        name: common.name,
        rarity: common.rarity,
        set: common.set,
        variants: common.variants,
        legal: common.legal,
        description: common.description,
        extension,
    })
}

/// Normalize an attack's `damage` to its display string.
///
/// Integers and strings are accepted; `null` means no damage. Any other
/// shape is a decoding error.
pub(crate) fn damage_from_wire<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    match raw {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i.to_string()))
            } else if let Some(u) = n.as_u64() {
                Ok(Some(u.to_string()))
            } else {
                Err(serde::de::Error::custom(format!(
                    "attack damage must be an integer or a string, got {}",
                    n
                )))
            }
        }
        other => Err(serde::de::Error::custom(format!(
            "attack damage must be an integer or a string, got {}",
            other
        ))),
    }
}
