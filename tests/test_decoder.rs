//! Detail decoding: discriminator handling, extensions, wire-name normalization.

mod common;

use tcgdex_client::models::CardCategory;
use tcgdex_client::{decode_card_detail, ErrorKind, TcgError};

fn decode(value: &serde_json::Value) -> tcgdex_client::Result<tcgdex_client::CardDetail> {
    decode_card_detail(value.to_string().as_bytes())
}

// ---------------------------------------------------------------------------
// Category dispatch
// ---------------------------------------------------------------------------

#[test]
fn pokemon_payload_populates_only_pokemon_extension() {
    let detail = decode(&common::pokemon_detail_json()).unwrap();

    assert_eq!(detail.kind(), CardCategory::Pokemon);
    assert!(detail.trainer().is_none());
    assert!(detail.energy().is_none());

    let pokemon = detail.pokemon().unwrap();
    assert_eq!(pokemon.dex_id, Some(vec![162]));
    assert_eq!(pokemon.hp, Some(110));
    assert_eq!(pokemon.evolve_from.as_deref(), Some("Sentret"));
    assert_eq!(pokemon.stage.as_deref(), Some("Stage1"));
    assert_eq!(pokemon.retreat, Some(1));
    assert!(pokemon.abilities.is_none());

    let weaknesses = pokemon.weaknesses.as_ref().unwrap();
    assert_eq!(weaknesses[0].type_field, "Fighting");
    assert_eq!(weaknesses[0].value, "×2");
}

#[test]
fn common_fields_are_decoded() {
    let detail = decode(&common::pokemon_detail_json()).unwrap();

    assert_eq!(detail.category, "Pokemon");
    assert_eq!(detail.id, "swsh3-136");
    assert_eq!(detail.local_id, "136");
    assert_eq!(detail.name, "Furret");
    assert_eq!(detail.illustrator.as_deref(), Some("tetsuya koizumi"));
    assert_eq!(detail.rarity.as_deref(), Some("Uncommon"));
    assert_eq!(detail.set.id, "swsh3");
    assert_eq!(detail.set.card_count.official, 189);
    assert_eq!(detail.set.card_count.total, 201);
    assert_eq!(
        detail.set.logo_url().as_deref(),
        Some("https://assets.tcgdex.net/en/swsh/swsh3/logo.webp")
    );
    assert!(detail.variants.normal && detail.variants.reverse);
    assert_eq!(detail.legal.unwrap().to_string(), "Expanded");
    assert!(detail.description.is_some());
}

#[test]
fn mixed_case_trainer_category_is_accepted() {
    let detail = decode(&common::trainer_detail_json()).unwrap();

    assert_eq!(detail.kind(), CardCategory::Trainer);
    let trainer = detail.trainer().unwrap();
    assert_eq!(trainer.trainer_type.as_deref(), Some("Item"));
    assert!(trainer.effect.is_some());
    assert!(detail.pokemon().is_none());
    assert!(detail.energy().is_none());
}

#[test]
fn energy_payload_populates_energy_extension() {
    let detail = decode(&common::energy_detail_json()).unwrap();

    let energy = detail.energy().unwrap();
    assert_eq!(energy.energy_type, "Special");
    assert!(detail.legal.is_none());
    assert!(detail.set.logo_url().is_none());
}

#[test]
fn upper_case_category_is_accepted() {
    let mut payload = common::energy_detail_json();
    payload["category"] = "ENERGY".into();
    let detail = decode(&payload).unwrap();
    assert_eq!(detail.kind(), CardCategory::Energy);
    assert_eq!(detail.category, "ENERGY");
}

#[test]
fn unknown_category_is_rejected_with_raw_value() {
    let mut payload = common::trainer_detail_json();
    payload["category"] = "item".into();

    let err = decode(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownCategory);
    match err {
        TcgError::UnknownCategory(raw) => assert_eq!(raw, "item"),
        other => panic!("expected UnknownCategory, got {other:?}"),
    }
}

#[test]
fn missing_category_is_a_decoding_error() {
    let mut payload = common::trainer_detail_json();
    payload.as_object_mut().unwrap().remove("category");

    let err = decode(&payload).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decoding);
}

#[test]
fn energy_without_energy_type_is_a_decoding_error() {
    let mut payload = common::energy_detail_json();
    payload.as_object_mut().unwrap().remove("energy_type");

    assert!(matches!(decode(&payload), Err(TcgError::Json(_))));
}

#[test]
fn malformed_bytes_are_a_decoding_error() {
    let err = decode_card_detail(b"{\"category\": ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decoding);
}

// ---------------------------------------------------------------------------
// Wire naming
// ---------------------------------------------------------------------------

#[test]
fn camel_case_keys_are_accepted() {
    let payload = serde_json::json!({
        "category": "pokemon",
        "id": "base1-4",
        "localId": "4",
        "name": "Charizard",
        "set": {
            "cardCount": { "official": 102, "total": 102 },
            "id": "base1",
            "name": "Base Set"
        },
        "variants": { "firstEdition": true, "holo": true, "normal": false, "reverse": false, "wPromo": false },
        "dexId": [6],
        "evolveFrom": "Charmeleon"
    });

    let detail = decode(&payload).unwrap();
    assert_eq!(detail.local_id, "4");
    assert_eq!(detail.set.card_count.total, 102);
    assert_eq!(detail.variants.to_string(), "First Edition, Holo");
    let pokemon = detail.pokemon().unwrap();
    assert_eq!(pokemon.dex_id, Some(vec![6]));
    assert_eq!(pokemon.evolve_from.as_deref(), Some("Charmeleon"));
}

// ---------------------------------------------------------------------------
// Attack damage
// ---------------------------------------------------------------------------

fn with_attack(attack: serde_json::Value) -> serde_json::Value {
    let mut payload = common::pokemon_detail_json();
    payload["attacks"] = serde_json::json!([attack]);
    payload
}

fn first_damage(payload: &serde_json::Value) -> Option<String> {
    let detail = decode(payload).unwrap();
    detail.pokemon().unwrap().attacks.as_ref().unwrap()[0]
        .damage
        .clone()
}

#[test]
fn integer_and_string_damage_normalize_identically() {
    let from_int = first_damage(&with_attack(serde_json::json!({ "name": "Tackle", "damage": 40 })));
    let from_str = first_damage(&with_attack(serde_json::json!({ "name": "Tackle", "damage": "40" })));
    assert_eq!(from_int.as_deref(), Some("40"));
    assert_eq!(from_int, from_str);
}

#[test]
fn free_text_damage_is_kept() {
    let damage = first_damage(&with_attack(serde_json::json!({ "name": "Fury", "damage": "30×" })));
    assert_eq!(damage.as_deref(), Some("30×"));
}

#[test]
fn missing_or_null_damage_is_none() {
    assert_eq!(first_damage(&with_attack(serde_json::json!({ "name": "Growl" }))), None);
    assert_eq!(
        first_damage(&with_attack(serde_json::json!({ "name": "Growl", "damage": null }))),
        None
    );
}

#[test]
fn other_damage_shapes_are_rejected() {
    for damage in [serde_json::json!(40.5), serde_json::json!(true), serde_json::json!([40])] {
        let payload = with_attack(serde_json::json!({ "name": "Tackle", "damage": damage }));
        assert!(matches!(decode(&payload), Err(TcgError::Json(_))));
    }
}

#[test]
fn missing_cost_defaults_to_empty() {
    let payload = with_attack(serde_json::json!({ "name": "Tackle", "damage": 10 }));
    let detail = decode(&payload).unwrap();
    let attack = &detail.pokemon().unwrap().attacks.as_ref().unwrap()[0];
    assert!(attack.cost.is_empty());
    assert!(attack.effect.is_none());
}

#[test]
fn fixture_attacks_decode_in_order() {
    let detail = common::pokemon_detail();
    let attacks = detail.pokemon().unwrap().attacks.as_ref().unwrap();
    assert_eq!(attacks.len(), 2);
    assert_eq!(attacks[0].name, "Feelin' Fine");
    assert_eq!(attacks[0].damage, None);
    assert_eq!(attacks[1].cost.len(), 3);
    assert_eq!(attacks[1].damage.as_deref(), Some("90"));
}
