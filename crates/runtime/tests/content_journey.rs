//! End-to-end: RON catalog through the loader, planner and simulated world.

use std::sync::Arc;

use runtime::{SimulatedWorld, TravelExecutor, TravelStatus};
use transit_content::{CatalogLoader, ConfigLoader};
use transit_core::{EdgeCost, Location};

const CATALOG: &str = r#"(
    stops: [
        (
            planet: "naboo",
            city: "theed",
            coordinates: (-4856, 4162),
            interactable: "Theed Starport Pilot",
            reachable: [
                (planet: "tatooine", city: "mos_eisley"),
                (planet: "naboo", city: "keren", distance: Some(1900), travel_time: Some(40)),
            ],
        ),
        (
            planet: "naboo",
            city: "keren",
            coordinates: (1441, 2771),
            interactable: "Keren Shuttle Pilot",
            reachable: [(planet: "naboo", city: "theed")],
        ),
        (
            planet: "tatooine",
            city: "mos_eisley",
            coordinates: (3528, -4804),
            interactable: "Mos Eisley Starport Pilot",
            reachable: [
                (planet: "naboo", city: "theed"),
                (planet: "tatooine", city: "anchorhead", travel_time: Some(30)),
            ],
        ),
        (
            planet: "tatooine",
            city: "anchorhead",
            coordinates: (40, -5348),
            interactable: "Anchorhead Shuttle Pilot",
            reachable: [(planet: "tatooine", city: "mos_eisley", travel_time: Some(30))],
        ),
    ],
    trainers: [
        (name: "Master Brawler", planet: "naboo", city: "keren", coordinates: (1500, 2800)),
    ],
    quests: [
        (name: "Moisture Farmer", planet: "tatooine", city: "anchorhead", coordinates: (100, -5300)),
    ],
)"#;

#[tokio::test(start_paused = true)]
async fn loaded_catalog_drives_interplanetary_journey() {
    let catalog = Arc::new(CatalogLoader::parse(CATALOG).expect("catalog should parse"));
    let config = ConfigLoader::parse("max_attempts = 2\nverification_delay_ms = 1000\n")
        .expect("config should parse");

    let world = Arc::new(SimulatedWorld::new(
        catalog.clone(),
        Location::new("naboo", "theed"),
    ));
    let executor = TravelExecutor::builder()
        .catalog(catalog)
        .config(config)
        .world(world.clone())
        .build()
        .unwrap();

    executor.travel_to_quest("Moisture Farmer").await.unwrap();

    let status = executor.status();
    assert_eq!(status.status, TravelStatus::Arrived);
    assert_eq!(world.location(), Location::new("tatooine", "anchorhead"));

    let route = status.current_route.unwrap();
    let hops = route.hops();
    assert_eq!(hops.len(), 2);
    assert_eq!(hops[0].interactable_name, "Theed Starport Pilot");
    assert_eq!(hops[0].cost.distance, EdgeCost::INTERPLANETARY_DISTANCE);
    assert_eq!(hops[1].interactable_name, "Mos Eisley Starport Pilot");
    assert!(hops[1].is_transfer);
    assert_eq!(hops[1].cost.travel_time, 30);
}

#[tokio::test(start_paused = true)]
async fn return_trip_uses_the_same_catalog() {
    let catalog = Arc::new(CatalogLoader::parse(CATALOG).unwrap());
    let world = Arc::new(SimulatedWorld::new(
        catalog.clone(),
        Location::new("tatooine", "anchorhead"),
    ));
    let executor = TravelExecutor::builder()
        .catalog(catalog)
        .world(world.clone())
        .build()
        .unwrap();

    executor.travel_to_trainer("Master Brawler").await.unwrap();
    assert_eq!(executor.status().stop_index, 3);
    assert_eq!(world.location(), Location::new("naboo", "keren"));
}
