use casamento_rsvp::{
    CliConfig, GiftId, GiftListing, GiftOrder, GuestId, PostgrestStore, ReservationProtocol,
};
use httpmock::prelude::*;
use std::collections::BTreeSet;

fn test_config(store_url: String) -> CliConfig {
    CliConfig {
        store_url,
        api_key: "test-key".to_string(),
        order: "created_at".to_string(),
        report: false,
        page: 1,
        page_size: 10,
        watch: false,
        refresh_seconds: 6,
        timeout_seconds: 5,
        retry_attempts: 0,
        retry_delay_seconds: 0,
        verbose: false,
    }
}

fn gift_ids(raw: &[&str]) -> BTreeSet<GiftId> {
    raw.iter().map(|s| GiftId::from(*s)).collect()
}

#[tokio::test]
async fn test_competing_claimants_scenario_over_real_http() {
    // Registry starts with gifts {A: free, B: free}; X reserves {A, B},
    // then Y attempts {B}. The store (mocked here) serializes the
    // conflicting row update: Y's filtered PATCH matches nothing.
    let server = MockServer::start();

    let x_patch = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/rest/v1/presentes")
            .query_param("id", "in.(gift-a,gift-b)")
            .query_param("reservado", "eq.false")
            .header("Prefer", "return=representation")
            .json_body(serde_json::json!({
                "reservado": true,
                "reservado_por": "guest-x"
            }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id": "gift-a", "nome": "Air Fryer", "reservado": true, "reservado_por": "guest-x"},
                {"id": "gift-b", "nome": "Cafeteira", "reservado": true, "reservado_por": "guest-x"}
            ]));
    });

    let y_patch = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/rest/v1/presentes")
            .query_param("id", "in.(gift-b)")
            .query_param("reservado", "eq.false")
            .json_body(serde_json::json!({
                "reservado": true,
                "reservado_por": "guest-y"
            }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([]));
    });

    // Classification read for Y's non-transitioned row
    let y_lookup = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/presentes")
            .query_param("id", "in.(gift-b)");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id": "gift-b", "nome": "Cafeteira", "reservado": true, "reservado_por": "guest-x"}
            ]));
    });

    let store = PostgrestStore::new(test_config(server.base_url()));
    let protocol = ReservationProtocol::new(store);

    let outcome_x = protocol
        .reserve(&gift_ids(&["gift-a", "gift-b"]), &GuestId::from("guest-x"))
        .await
        .unwrap();
    assert!(outcome_x.is_complete());
    assert_eq!(outcome_x.claimed, gift_ids(&["gift-a", "gift-b"]));

    let outcome_y = protocol
        .reserve(&gift_ids(&["gift-b"]), &GuestId::from("guest-y"))
        .await
        .unwrap();
    assert!(outcome_y.nothing_claimed());
    assert_eq!(outcome_y.lost, gift_ids(&["gift-b"]));

    x_patch.assert();
    y_patch.assert();
    y_lookup.assert();
}

#[tokio::test]
async fn test_empty_reservation_never_touches_the_store() {
    let server = MockServer::start();
    let any_request = server.mock(|when, then| {
        when.path_contains("/rest/v1/");
        then.status(200).json_body(serde_json::json!([]));
    });

    let store = PostgrestStore::new(test_config(server.base_url()));
    let protocol = ReservationProtocol::new(store);

    let outcome = protocol
        .reserve(&BTreeSet::new(), &GuestId::from("guest-x"))
        .await
        .unwrap();

    assert!(outcome.claimed.is_empty());
    assert!(outcome.lost.is_empty());
    any_request.assert_hits(0);
}

#[tokio::test]
async fn test_re_reserving_own_gift_reports_claimed() {
    let server = MockServer::start();

    // filtered update matches nothing: the row is already reserved
    let patch = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path("/rest/v1/presentes")
            .query_param("id", "in.(gift-a)")
            .query_param("reservado", "eq.false");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([]));
    });

    // ... but the owner is the same claimant
    let lookup = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/presentes")
            .query_param("id", "in.(gift-a)");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id": "gift-a", "nome": "Air Fryer", "reservado": true, "reservado_por": "guest-x"}
            ]));
    });

    let store = PostgrestStore::new(test_config(server.base_url()));
    let protocol = ReservationProtocol::new(store);

    let outcome = protocol
        .reserve(&gift_ids(&["gift-a"]), &GuestId::from("guest-x"))
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.claimed, gift_ids(&["gift-a"]));

    patch.assert();
    lookup.assert();
}

#[tokio::test]
async fn test_listing_is_empty_after_everything_is_reserved() {
    let server = MockServer::start();

    let listing_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/presentes")
            .query_param("reservado", "eq.false")
            .query_param("order", "created_at.asc");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([]));
    });

    let store = PostgrestStore::new(test_config(server.base_url()));
    let listing = GiftListing::new(store, GiftOrder::CreatedAt);

    let gifts = listing.available().await.unwrap();
    assert!(gifts.is_empty());
    listing_mock.assert();
}

#[tokio::test]
async fn test_transport_failure_is_retryable_store_unavailable() {
    // Nothing listens on this port
    let mut config = test_config("http://127.0.0.1:9".to_string());
    config.timeout_seconds = 1;
    let store = PostgrestStore::new(config);
    let protocol = ReservationProtocol::new(store);

    let err = protocol
        .reserve(&gift_ids(&["gift-a"]), &GuestId::from("guest-x"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        casamento_rsvp::SiteError::StoreUnavailable(_)
    ));
    assert!(err.is_retryable());
}
