use tcgdex_client::models::CardExtension;
use tcgdex_client::{DetailController, ListState};

pub fn print_list(state: &ListState) {
    let criteria = &state.committed;
    println!(
        "{} card(s) for {:?}, sorted by {} {}, page {}{}",
        state.cards.len(),
        criteria.query,
        criteria.sort_field,
        criteria.sort_order,
        state.current_page,
        if state.has_more_pages { " (m for more)" } else { "" }
    );
    for (i, card) in state.cards.iter().enumerate() {
        println!("{:>4}. {:<32} {}", i + 1, card.name, card.id);
    }
}

pub fn print_detail(controller: &DetailController) {
    let state = controller.state();
    let Some(detail) = &state.detail else {
        if let Some(message) = &state.error_message {
            println!("! {}", message);
        }
        return;
    };

    println!("== {} ({}) ==", controller.card_name(), detail.id);
    if let Some(url) = controller.image_url() {
        println!("image:       {}", url);
    }
    println!("category:    {}", detail.category);
    println!(
        "set:         {} #{} of {}",
        detail.set.name, detail.local_id, detail.set.card_count.official
    );
    if let Some(rarity) = &detail.rarity {
        println!("rarity:      {}", rarity);
    }
    if let Some(illustrator) = &detail.illustrator {
        println!("illustrator: {}", illustrator);
    }
    println!("variants:    {}", detail.variants);
    if let Some(legal) = &detail.legal {
        println!("legal:       {}", legal);
    }

    match &detail.extension {
        CardExtension::Pokemon(p) => {
            if let Some(hp) = p.hp {
                println!("hp:          {}", hp);
            }
            if let Some(types) = &p.types {
                println!("types:       {}", types.join(", "));
            }
            if let Some(stage) = &p.stage {
                println!("stage:       {}", stage);
            }
            if let Some(from) = &p.evolve_from {
                println!("evolves from {}", from);
            }
            for ability in p.abilities.iter().flatten() {
                println!("  [{}] {}: {}", ability.type_field, ability.name, ability.effect);
            }
            for attack in p.attacks.iter().flatten() {
                println!(
                    "  {} [{}] {}",
                    attack.name,
                    attack.cost.join(" "),
                    attack.damage.as_deref().unwrap_or("")
                );
                if let Some(effect) = &attack.effect {
                    println!("      {}", effect);
                }
            }
            for weakness in p.weaknesses.iter().flatten() {
                println!("weakness:    {} {}", weakness.type_field, weakness.value);
            }
            if let Some(retreat) = p.retreat {
                println!("retreat:     {}", retreat);
            }
        }
        CardExtension::Trainer(t) => {
            if let Some(kind) = &t.trainer_type {
                println!("trainer:     {}", kind);
            }
            if let Some(effect) = &t.effect {
                println!("{}", effect);
            }
        }
        CardExtension::Energy(e) => {
            println!("energy:      {}", e.energy_type);
            if let Some(effect) = &e.effect {
                println!("{}", effect);
            }
        }
    }
    if let Some(description) = &detail.description {
        println!("{}", description);
    }
}
