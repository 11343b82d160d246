//! Collection add, query and statistics tests against the in-memory store.

mod support;

use chrono::Utc;

use cardvault_core::collection::{
    AddEntryRequest, CollectionParams, CollectionQuery, UpdateEntryRequest, add_card,
    collection_stats, search_collection,
};
use cardvault_core::{CardCache, CardRecord, CollectionStore, Condition};

use support::{MemoryStore, StubSearch, card, card_with, error_is_not_found, user};

fn add(id: &str, quantity: i64, condition: &str, foil: bool) -> AddEntryRequest {
    AddEntryRequest {
        scryfall_id: Some(id.to_string()),
        quantity: Some(quantity),
        condition: Some(condition.to_string()),
        foil: Some(foil),
        notes: None,
    }
}

async fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    let alice = user("alice");
    let cards = [
        card_with("bolt", "Lightning Bolt", &["R"], "Instant", 1.0, "m11", "common"),
        card_with("shivan", "Shivan Dragon", &["R"], "Creature — Dragon", 6.0, "m11", "rare"),
        card_with("llanowar", "Llanowar Elves", &["G"], "Creature — Elf Druid", 1.0, "dom", "common"),
        card_with("sol", "Sol Ring", &[], "Artifact", 1.0, "c21", "uncommon"),
        card_with("teferi", "Teferi, Hero of Dominaria", &["W", "U"], "Legendary Planeswalker — Teferi", 5.0, "dom", "mythic"),
    ];
    for card in &cards {
        store
            .upsert_card(&CardRecord::from_card(card, Utc::now()))
            .await
            .unwrap();
        store
            .add_entry(&alice, add(card.id.as_str(), 1, "near_mint", false).validate().unwrap())
            .await
            .unwrap();
    }
    store
        .add_entry(&user("bob"), add("bolt", 9, "mint", false).validate().unwrap())
        .await
        .unwrap();
    store
}

fn params(pairs: &[(&str, &str)]) -> CollectionParams {
    let mut params = CollectionParams::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "q" => params.q = value,
            "colors" => params.colors = value,
            "types" => params.types = value,
            "sets" => params.sets = value,
            "cmc_min" => params.cmc_min = value,
            "cmc_max" => params.cmc_max = value,
            "rarity" => params.rarity = value,
            "sort" => params.sort = value,
            "order" => params.order = value,
            "page" => params.page = value,
            "limit" => params.limit = value,
            other => panic!("unknown param {other}"),
        }
    }
    params
}

#[tokio::test]
async fn duplicate_add_increments_quantity() {
    let store = MemoryStore::new();
    let alice = user("alice");

    let first = store
        .add_entry(&alice, add("bolt", 2, "near_mint", false).validate().unwrap())
        .await
        .unwrap();
    let second = store
        .add_entry(&alice, add("bolt", 3, "near_mint", false).validate().unwrap())
        .await
        .unwrap();

    assert!(!first.merged);
    assert!(second.merged);
    assert_eq!(second.entry.id, first.entry.id);
    assert_eq!(second.entry.quantity, 5);
}

#[tokio::test]
async fn add_card_caches_unknown_card_once() {
    let store = MemoryStore::new();
    let search = StubSearch::with_cards(vec![card("abc123", "Lightning Bolt")]);
    let alice = user("alice");

    let first = add_card(&search, &store, &alice, add("abc123", 1, "mint", false).validate().unwrap())
        .await
        .unwrap();
    let second = add_card(&search, &store, &alice, add("abc123", 2, "mint", false).validate().unwrap())
        .await
        .unwrap();

    assert!(!first.merged);
    assert!(second.merged);
    assert_eq!(second.entry.quantity, 3);
    assert_eq!(search.lookup_count(), 1);
    assert_eq!(store.upsert_count(), 1);
    assert_eq!(store.cached("abc123").unwrap().name, "Lightning Bolt");
}

#[tokio::test]
async fn add_card_unknown_to_api_adds_nothing() {
    let store = MemoryStore::new();
    let search = StubSearch::default();
    let alice = user("alice");

    let err = add_card(&search, &store, &alice, add("ghost", 1, "mint", false).validate().unwrap())
        .await
        .unwrap_err();

    assert!(error_is_not_found(&err));
    assert_eq!(store.owned_quantity(&alice, &"ghost".parse().unwrap()).await.unwrap(), None);
}

#[tokio::test]
async fn new_condition_or_finish_creates_row() {
    let store = MemoryStore::new();
    let alice = user("alice");

    let base = store
        .add_entry(&alice, add("bolt", 1, "near_mint", false).validate().unwrap())
        .await
        .unwrap();
    let foil = store
        .add_entry(&alice, add("bolt", 1, "near_mint", true).validate().unwrap())
        .await
        .unwrap();
    let played = store
        .add_entry(&alice, add("bolt", 1, "played", false).validate().unwrap())
        .await
        .unwrap();

    assert!(!foil.merged && !played.merged);
    assert_ne!(base.entry.id, foil.entry.id);
    assert_ne!(base.entry.id, played.entry.id);
    assert_eq!(played.entry.condition, Condition::Played);
    let owned = store
        .owned_quantity(&alice, &base.entry.scryfall_id)
        .await
        .unwrap();
    assert_eq!(owned, Some(3));
}

#[tokio::test]
async fn pagination_invariants() {
    let store = seeded().await;
    let alice = user("alice");

    for (page, limit) in [("1", "2"), ("2", "2"), ("3", "2"), ("4", "2"), ("1", "100")] {
        let query = CollectionQuery::from_params(&params(&[("page", page), ("limit", limit)]))
            .unwrap();
        let result = search_collection(&store, &alice, &query).await.unwrap();
        let limit: u64 = limit.parse().unwrap();
        let page: u64 = page.parse().unwrap();

        assert_eq!(result.total, 5);
        assert!(result.data.len() as u64 <= limit);
        assert_eq!(result.has_more, result.total > page * limit);
    }
}

#[tokio::test]
async fn every_filter_moves_total_and_data_together() {
    let store = seeded().await;
    let alice = user("alice");

    let cases: &[(&[(&str, &str)], u64)] = &[
        (&[], 5),
        (&[("q", "dragon")], 1),
        (&[("colors", "r")], 2),
        (&[("colors", "w,g")], 2),
        (&[("types", "creature")], 2),
        (&[("types", "artifact,planeswalker")], 2),
        (&[("sets", "dom")], 2),
        (&[("cmc_min", "2")], 2),
        (&[("cmc_max", "1")], 3),
        (&[("rarity", "rare,mythic")], 2),
        (&[("colors", "r"), ("types", "creature")], 1),
    ];

    for (pairs, expected) in cases {
        let query = CollectionQuery::from_params(&params(pairs)).unwrap();
        let result = search_collection(&store, &alice, &query).await.unwrap();

        assert_eq!(result.total, *expected, "total for {pairs:?}");
        assert_eq!(result.data.len() as u64, *expected, "data for {pairs:?}");
        for item in &result.data {
            assert!(
                query.filter.matches(&item.entry, &item.card),
                "{} leaked through {pairs:?}",
                item.card.name
            );
        }
    }
}

#[tokio::test]
async fn sorting() {
    let store = seeded().await;
    let alice = user("alice");

    let query =
        CollectionQuery::from_params(&params(&[("sort", "cmc"), ("order", "desc")])).unwrap();
    let result = search_collection(&store, &alice, &query).await.unwrap();
    let names: Vec<&str> = result.data.iter().map(|i| i.card.name.as_str()).collect();
    assert_eq!(&names[..2], &["Shivan Dragon", "Teferi, Hero of Dominaria"]);

    let query = CollectionQuery::from_params(&params(&[("sort", "rarity")])).unwrap();
    let result = search_collection(&store, &alice, &query).await.unwrap();
    assert_eq!(
        result.data.last().unwrap().card.name,
        "Teferi, Hero of Dominaria"
    );

    let query = CollectionQuery::from_params(&params(&[("sort", "name")])).unwrap();
    let result = search_collection(&store, &alice, &query).await.unwrap();
    assert_eq!(result.data[0].card.name, "Lightning Bolt");
}

#[tokio::test]
async fn queries_are_scoped_to_user() {
    let store = seeded().await;
    let query = CollectionQuery::from_params(&CollectionParams::default()).unwrap();

    let bob = search_collection(&store, &user("bob"), &query).await.unwrap();
    assert_eq!(bob.total, 1);
    assert_eq!(bob.data[0].entry.quantity, 9);

    let carol = search_collection(&store, &user("carol"), &query).await.unwrap();
    assert_eq!(carol.total, 0);
    assert!(!carol.has_more);
}

#[tokio::test]
async fn update_and_remove_are_scoped_to_user() {
    let store = MemoryStore::new();
    let alice = user("alice");
    let added = store
        .add_entry(&alice, add("bolt", 1, "near_mint", false).validate().unwrap())
        .await
        .unwrap();

    let update = UpdateEntryRequest {
        quantity: Some(7),
        notes: Some("deck box".to_string()),
        ..Default::default()
    }
    .validate()
    .unwrap();

    let err = store
        .update_entry(&user("mallory"), added.entry.id, update.clone())
        .await
        .unwrap_err();
    assert!(error_is_not_found(&err));

    let updated = store
        .update_entry(&alice, added.entry.id, update)
        .await
        .unwrap();
    assert_eq!(updated.quantity, 7);
    assert_eq!(updated.notes.as_deref(), Some("deck box"));

    assert!(error_is_not_found(
        &store
            .remove_entry(&user("mallory"), added.entry.id)
            .await
            .unwrap_err()
    ));
    store.remove_entry(&alice, added.entry.id).await.unwrap();
    assert_eq!(
        store
            .owned_quantity(&alice, &added.entry.scryfall_id)
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn stats_cover_all_rows() {
    let store = seeded().await;
    let stats = collection_stats(&store, &user("alice")).await.unwrap();
    assert_eq!(stats.total_cards, 5);
    assert_eq!(stats.unique_cards, 5);
    assert_eq!(stats.by_color["red"], 2);
    assert_eq!(stats.by_color["colorless"], 1);
    assert_eq!(stats.by_set["dom"], 2);
    assert_eq!(stats.estimated_value_usd, 5.0);
}
