//! Cache-and-enrich pipeline tests.

mod support;

use cardvault_core::collection::AddEntryRequest;
use cardvault_core::{CardCache, CollectionStore, EnrichPipeline, EnrichedCard, SearchPage};

use support::{MemoryStore, card, user};

#[tokio::test]
async fn cache_miss_upserts_once_and_reports_unowned() {
    let store = MemoryStore::new();
    let pipeline = EnrichPipeline::new(&store, &store);

    let page = SearchPage {
        total_cards: 1,
        has_more: false,
        next_page: None,
        data: vec![card("abc123", "Lightning Bolt")],
    };
    let enriched = pipeline.enrich_page(&user("alice"), page).await;

    assert_eq!(store.upsert_count(), 1);
    assert_eq!(enriched.total_cards, 1);
    assert_eq!(enriched.data.len(), 1);
    assert_eq!(enriched.data[0].card.scryfall_id.as_str(), "abc123");
    assert!(!enriched.data[0].in_collection);
    assert_eq!(enriched.data[0].collection_quantity, 0);
    assert!(store.cached("abc123").is_some());
}

#[tokio::test]
async fn cache_hit_does_not_write() {
    let store = MemoryStore::new();
    let pipeline = EnrichPipeline::new(&store, &store);
    let alice = user("alice");
    let cards = vec![card("abc123", "Lightning Bolt")];

    pipeline.enrich(&alice, &cards).await;
    pipeline.enrich(&alice, &cards).await;

    assert_eq!(store.upsert_count(), 1);
}

#[tokio::test]
async fn ownership_sums_all_rows_of_the_card() {
    let store = MemoryStore::new();
    let alice = user("alice");
    for (quantity, foil) in [(3, false), (1, true)] {
        let entry = AddEntryRequest {
            scryfall_id: Some("abc123".to_string()),
            quantity: Some(quantity),
            foil: Some(foil),
            ..Default::default()
        }
        .validate()
        .unwrap();
        store.add_entry(&alice, entry).await.unwrap();
    }

    let pipeline = EnrichPipeline::new(&store, &store);
    let enriched = pipeline
        .enrich(&alice, &[card("abc123", "Lightning Bolt")])
        .await;
    assert!(enriched[0].in_collection);
    assert_eq!(enriched[0].collection_quantity, 4);

    let other = pipeline
        .enrich(&user("bob"), &[card("abc123", "Lightning Bolt")])
        .await;
    assert!(!other[0].in_collection);
}

#[tokio::test]
async fn failed_card_degrades_without_dropping() {
    let store = MemoryStore::new();
    store.fail_card("broken");
    let pipeline = EnrichPipeline::new(&store, &store);

    let cards = vec![
        card("first", "Opt"),
        card("broken", "Counterspell"),
        card("last", "Brainstorm"),
    ];
    let enriched = pipeline.enrich(&user("alice"), &cards).await;

    assert_eq!(enriched.len(), 3);
    let ids: Vec<&str> = enriched
        .iter()
        .map(|c| c.card.scryfall_id.as_str())
        .collect();
    assert_eq!(ids, vec!["first", "broken", "last"]);
    assert_eq!(enriched[1].card.name, "Counterspell");
    assert!(!enriched[1].in_collection);
    assert!(store.cached("broken").is_none());
    assert_eq!(store.upsert_count(), 2);
}

fn ids(cards: &[EnrichedCard]) -> Vec<&str> {
    cards.iter().map(|c| c.card.scryfall_id.as_str()).collect()
}

#[tokio::test]
async fn failed_cache_write_degrades_without_dropping() {
    let store = MemoryStore::new();
    store.fail_upsert("broken");
    let pipeline = EnrichPipeline::new(&store, &store);

    let cards = vec![
        card("first", "Opt"),
        card("broken", "Counterspell"),
        card("last", "Brainstorm"),
    ];
    let enriched = pipeline.enrich(&user("alice"), &cards).await;

    assert_eq!(ids(&enriched), vec!["first", "broken", "last"]);
    assert_eq!(enriched[1].card.name, "Counterspell");
    assert!(!enriched[1].in_collection);
    assert_eq!(enriched[1].collection_quantity, 0);
    assert!(store.cached("broken").is_none());
    assert!(store.cached("first").is_some());
}

#[tokio::test]
async fn failed_ownership_lookup_degrades_without_dropping() {
    let store = MemoryStore::new();
    let alice = user("alice");
    for id in ["first", "broken"] {
        let entry = AddEntryRequest {
            scryfall_id: Some(id.to_string()),
            quantity: Some(2),
            ..Default::default()
        }
        .validate()
        .unwrap();
        store.add_entry(&alice, entry).await.unwrap();
    }
    store.fail_ownership("broken");
    let pipeline = EnrichPipeline::new(&store, &store);

    let cards = vec![
        card("first", "Opt"),
        card("broken", "Counterspell"),
        card("last", "Brainstorm"),
    ];
    let enriched = pipeline.enrich(&alice, &cards).await;

    assert_eq!(ids(&enriched), vec!["first", "broken", "last"]);
    assert!(enriched[0].in_collection);
    assert_eq!(enriched[0].collection_quantity, 2);
    assert!(!enriched[1].in_collection);
    assert_eq!(enriched[1].collection_quantity, 0);
    assert!(!enriched[2].in_collection);
}

#[tokio::test]
async fn refresh_always_writes_and_keeps_cached_at() {
    let store = MemoryStore::new();
    let pipeline = EnrichPipeline::new(&store, &store);
    let alice = user("alice");
    let bolt = card("abc123", "Lightning Bolt");

    pipeline.enrich(&alice, std::slice::from_ref(&bolt)).await;
    let first = store.get_card(&bolt.id).await.unwrap().unwrap();

    let refreshed = pipeline.refresh(&alice, &bolt).await.unwrap();
    assert_eq!(store.upsert_count(), 2);
    assert_eq!(refreshed.card.cached_at, first.cached_at);
    assert!(refreshed.card.updated_at >= first.updated_at);
}
