//! Shared test fixtures for the tcgdex-client integration tests.
//!
//! Provides JSON payload builders for the list and detail endpoints and a
//! scriptable [`FakeCatalog`] standing in for the HTTP client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tcgdex_client::{
    decode_card_detail, CatalogApi, Card, CardDetail, PaginatedResult, PaginationRequest, Result,
    SortField, SortOrder, TcgError,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// `n` cards with ids `{prefix}-1` .. `{prefix}-n`.
pub fn cards(prefix: &str, n: usize) -> Vec<Card> {
    (1..=n)
        .map(|i| {
            Card::new(
                format!("{}-{}", prefix, i),
                format!("{} {}", prefix, i),
                Some(format!("https://assets.tcgdex.net/en/{}/{}", prefix, i)),
            )
        })
        .collect()
}

pub fn card_list_json(cards: &[Card]) -> String {
    serde_json::to_string(cards).unwrap()
}

pub fn pokemon_detail_json() -> serde_json::Value {
    serde_json::json!({
        "category": "Pokemon",
        "id": "swsh3-136",
        "illustrator": "tetsuya koizumi",
        "image": "https://assets.tcgdex.net/en/swsh/swsh3/136",
        "local_id": "136",
        "name": "Furret",
        "rarity": "Uncommon",
        "set": {
            "card_count": { "official": 189, "total": 201, "reverse": 189 },
            "id": "swsh3",
            "logo": "https://assets.tcgdex.net/en/swsh/swsh3/logo",
            "name": "Darkness Ablaze",
            "symbol": "https://assets.tcgdex.net/univ/swsh/swsh3/symbol"
        },
        "variants": {
            "first_edition": false,
            "holo": false,
            "normal": true,
            "reverse": true,
            "w_promo": false
        },
        "dex_id": [162],
        "hp": 110,
        "types": ["Colorless"],
        "evolve_from": "Sentret",
        "description": "It makes a nest to suit its long and skinny body.",
        "stage": "Stage1",
        "attacks": [
            { "cost": ["Colorless"], "name": "Feelin' Fine", "effect": "Draw 3 cards." },
            { "cost": ["Colorless", "Colorless", "Colorless"], "name": "Tail Smash", "damage": 90 }
        ],
        "weaknesses": [{ "type": "Fighting", "value": "×2" }],
        "retreat": 1,
        "regulation_mark": "D",
        "legal": { "standard": false, "expanded": true },
        "updated": "2024-06-18T00:34:39+02:00"
    })
}

pub fn trainer_detail_json() -> serde_json::Value {
    serde_json::json!({
        "category": "Trainer",
        "id": "swsh1-178",
        "image": "https://assets.tcgdex.net/en/swsh/swsh1/178",
        "local_id": "178",
        "name": "Great Ball",
        "rarity": "Uncommon",
        "set": {
            "card_count": { "official": 202, "total": 216 },
            "id": "swsh1",
            "name": "Sword & Shield"
        },
        "variants": {
            "first_edition": false,
            "holo": false,
            "normal": true,
            "reverse": true,
            "w_promo": false
        },
        "effect": "Look at the top 7 cards of your deck.",
        "trainer_type": "Item",
        "legal": { "standard": false, "expanded": true }
    })
}

pub fn energy_detail_json() -> serde_json::Value {
    serde_json::json!({
        "category": "Energy",
        "id": "swsh3-174",
        "local_id": "174",
        "name": "Capture Energy",
        "set": {
            "card_count": { "official": 189, "total": 201 },
            "id": "swsh3",
            "name": "Darkness Ablaze"
        },
        "variants": {
            "first_edition": false,
            "holo": false,
            "normal": true,
            "reverse": true,
            "w_promo": false
        },
        "effect": "This card provides 1 Colorless Energy.",
        "energy_type": "Special"
    })
}

pub fn pokemon_detail() -> CardDetail {
    decode_card_detail(pokemon_detail_json().to_string().as_bytes()).unwrap()
}

// ---------------------------------------------------------------------------
// FakeCatalog
// ---------------------------------------------------------------------------

/// Arguments of one `fetch_cards` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_field: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

/// In-process [`CatalogApi`] answering from scripted responses.
///
/// Unscripted list calls return an empty page; unscripted detail calls fail
/// with a 404. When gated, every call blocks until the test releases it.
#[derive(Default)]
pub struct FakeCatalog {
    calls: Mutex<Vec<FetchCall>>,
    detail_calls: Mutex<Vec<String>>,
    pages: Mutex<VecDeque<Result<Vec<Card>>>>,
    details: Mutex<VecDeque<Result<CardDetail>>>,
    gate: Mutex<Option<mpsc::Receiver<()>>>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_page(&self, cards: Vec<Card>) {
        self.pages.lock().unwrap().push_back(Ok(cards));
    }

    pub fn push_error(&self, status: u16) {
        self.pages.lock().unwrap().push_back(Err(TcgError::BadResponse {
            status,
            url: "http://fake/en/cards".to_string(),
        }));
    }

    pub fn push_detail(&self, detail: Result<CardDetail>) {
        self.details.lock().unwrap().push_back(detail);
    }

    /// Make every subsequent call wait for one message on the returned sender.
    pub fn gate(&self) -> mpsc::Sender<()> {
        let (tx, rx) = mpsc::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }

    fn wait_for_gate(&self) {
        let gate = self.gate.lock().unwrap();
        if let Some(rx) = gate.as_ref() {
            let _ = rx.recv_timeout(Duration::from_secs(5));
        }
    }
}

impl CatalogApi for FakeCatalog {
    fn fetch_cards(
        &self,
        query: Option<&str>,
        pagination: Option<PaginationRequest>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
    ) -> Result<PaginatedResult<Vec<Card>>> {
        self.calls.lock().unwrap().push(FetchCall {
            query: query.map(str::to_string),
            page: pagination.map(|p| p.page()),
            page_size: pagination.map(|p| p.items_per_page()),
            sort_field,
            sort_order,
        });
        self.wait_for_gate();

        let next = self.pages.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()));
        let items = next?;
        let is_last_page = match pagination {
            Some(p) => items.len() < p.items_per_page() as usize,
            None => true,
        };
        Ok(PaginatedResult {
            page: pagination.map(|p| p.page()).unwrap_or(1),
            items,
            is_last_page,
        })
    }

    fn fetch_card_detail(&self, card_id: &str) -> Result<CardDetail> {
        self.detail_calls.lock().unwrap().push(card_id.to_string());
        self.wait_for_gate();

        self.details
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TcgError::BadResponse {
                    status: 404,
                    url: format!("http://fake/en/cards/{}", card_id),
                })
            })
    }
}

/// Poll `cond` every 10ms for up to five seconds of real time.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..500 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 5s");
}
