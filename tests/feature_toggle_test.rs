//! Feature toggle endpoint integration tests

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use common::fixtures::{
    app_config, hours_from_now, memory_gateway, toggle_body, unreachable_gateway,
};
use fitcheck::storage::ToggleStore;
use serde_json::{json, Value};

#[actix_rt::test]
async fn test_create_and_view_toggle() {
    let (_store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .set_json(toggle_body(
            "shop",
            "new-checkout",
            "2024-01-01 00:00:00",
            "2024-01-31 00:00:00",
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Feature toggle created successfully");
    let id = body["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/feature-toggle/shop/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let toggle: Value = test::read_body_json(resp).await;
    assert_eq!(toggle["_id"], id.as_str());
    assert_eq!(toggle["name"], "new-checkout");
    assert_eq!(toggle["description"], "new-checkout toggle");
    assert_eq!(toggle["beginning_date"], "2024-01-01 00:00:00");
    assert_eq!(toggle["expiration_date"], "2024-01-31 00:00:00");
    assert!(toggle["created_at"].is_string());
    assert_eq!(toggle["created_at"], toggle["updated_at"]);
}

#[actix_rt::test]
async fn test_created_ids_are_unique() {
    let (store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri("/feature-toggle")
            .set_json(toggle_body(
                "shop",
                "same-name",
                "2024-01-01 00:00:00",
                "2024-01-01 00:00:00",
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["_id"].as_str().unwrap().to_string());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
    assert_eq!(store.find_all("shop").await.unwrap().len(), 5);
}

#[actix_rt::test]
async fn test_create_rejects_reversed_dates() {
    let (store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .set_json(toggle_body(
            "shop",
            "backwards",
            "2024-02-01 00:00:00",
            "2024-01-01 00:00:00",
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Beginning date must be before expiration date");
    assert!(store.find_all("shop").await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_create_rejects_invalid_input() {
    let (_store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    // Missing fields
    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .set_json(json!({ "package_name": "shop", "name": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Invalid request! Missing or empty fields: description, beginning_date, expiration_date"
    );

    // Unparsable date
    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .set_json(toggle_body("shop", "x", "2024-01-01", "2024-01-31 00:00:00"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Invalid date format. Please use YYYY-MM-DD HH:MM:SS"
    );

    // Not JSON at all
    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request!"));
}

#[actix_rt::test]
async fn test_view_unknown_toggle() {
    let (_store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .set_json(toggle_body(
            "shop",
            "x",
            "2024-01-01 00:00:00",
            "2024-01-31 00:00:00",
        ))
        .to_request();
    test::call_service(&app, req).await;

    for uri in ["/feature-toggle/shop/unknown-id", "/feature-toggle/nowhere/unknown-id"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Feature toggle not found");
    }
}

#[actix_rt::test]
async fn test_list_toggles_of_unknown_package_is_empty() {
    let (_store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/feature-toggles/nowhere")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_rt::test]
async fn test_list_by_date() {
    let (_store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .set_json(toggle_body(
            "shop",
            "january",
            "2024-01-01 00:00:00",
            "2024-01-31 00:00:00",
        ))
        .to_request();
    test::call_service(&app, req).await;

    let cases = [
        ("2024-01-15", 1),
        ("2024-01-01", 1),
        ("2024-01-31", 1),
        ("2024-02-01", 0),
        ("2023-12-31", 0),
    ];
    for (date, expected) in cases {
        let req = test::TestRequest::get()
            .uri(&format!("/feature-toggles/shop/by-date?date={}", date))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body.as_array().unwrap().len(), expected, "date {}", date);
    }

    for uri in [
        "/feature-toggles/shop/by-date?date=01-15-2024",
        "/feature-toggles/shop/by-date",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid date format, use YYYY-MM-DD");
    }
}

#[actix_rt::test]
async fn test_list_active() {
    let (_store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let toggles = [
        ("running", hours_from_now(-24), hours_from_now(24)),
        ("expired", hours_from_now(-48), hours_from_now(-24)),
        ("upcoming", hours_from_now(24), hours_from_now(48)),
    ];
    for (name, beginning, expiration) in &toggles {
        let req = test::TestRequest::post()
            .uri("/feature-toggle")
            .set_json(toggle_body("shop", name, beginning, expiration))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/feature-toggles/shop/active")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let active = body.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "running");

    let req = test::TestRequest::get()
        .uri("/feature-toggles/shop")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn test_update_dates() {
    let (store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .set_json(toggle_body(
            "shop",
            "x",
            "2024-01-01 00:00:00",
            "2024-01-31 00:00:00",
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["_id"].as_str().unwrap().to_string();
    let uri = format!("/feature-toggle/shop/{}/update-dates", id);

    // Expiration before the stored beginning
    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "expiration_date": "2023-12-25 00:00:00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Expiration date cannot be before beginning date");
    let stored = store.find_by_id("shop", &id).await.unwrap().unwrap();
    assert_eq!(
        fitcheck::dates::format_date_time(&stored.expiration_date),
        "2024-01-31 00:00:00"
    );

    // No dates at all
    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "name": "renamed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No dates provided");

    // Bad format
    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "beginning_date": "2024/01/05" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid date format, use YYYY-MM-DD HH:MM:SS");

    // Valid update of the beginning only
    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "beginning_date": "2024-01-05 00:00:00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Dates updated");

    let req = test::TestRequest::get()
        .uri(&format!("/feature-toggle/shop/{}", id))
        .to_request();
    let toggle: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(toggle["beginning_date"], "2024-01-05 00:00:00");
    assert_eq!(toggle["expiration_date"], "2024-01-31 00:00:00");

    // Unknown toggle
    let req = test::TestRequest::put()
        .uri("/feature-toggle/shop/unknown/update-dates")
        .set_json(json!({ "beginning_date": "2024-01-05 00:00:00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_delete_package_toggles() {
    let (_store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    for i in 0..5 {
        let req = test::TestRequest::post()
            .uri("/feature-toggle")
            .set_json(toggle_body(
                "shop",
                &format!("toggle-{}", i),
                "2024-01-01 00:00:00",
                "2024-01-31 00:00:00",
            ))
            .to_request();
        test::call_service(&app, req).await;
    }
    let req = test::TestRequest::post()
        .uri("/feature-toggle")
        .set_json(toggle_body(
            "blog",
            "comments",
            "2024-01-01 00:00:00",
            "2024-01-31 00:00:00",
        ))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/feature-toggles/shop")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "All feature toggles deleted");

    let req = test::TestRequest::get()
        .uri("/feature-toggles/shop")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));

    let req = test::TestRequest::get()
        .uri("/feature-toggles/blog")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Deleting an empty or unknown package still succeeds
    let req = test::TestRequest::delete()
        .uri("/feature-toggles/nowhere")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_delete_all_packages() {
    let (store, gateway) = memory_gateway();
    let app = test::init_service(
        App::new()
            .app_data(gateway)
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    for package in ["shop", "blog", "admin"] {
        let req = test::TestRequest::post()
            .uri("/feature-toggle")
            .set_json(toggle_body(
                package,
                "x",
                "2024-01-01 00:00:00",
                "2024-01-31 00:00:00",
            ))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::delete().uri("/feature-toggles").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    for package in ["shop", "blog", "admin"] {
        assert!(store.find_all(package).await.unwrap().is_empty());
    }
}

#[actix_rt::test]
async fn test_database_not_initialized() {
    let app = test::init_service(
        App::new()
            .app_data(unreachable_gateway())
            .app_data(app_config())
            .configure(fitcheck::web::configure),
    )
    .await;

    let requests = vec![
        // Invalid input is not looked at before the database check
        test::TestRequest::post()
            .uri("/feature-toggle")
            .set_json(json!({})),
        test::TestRequest::get().uri("/feature-toggles/shop"),
        test::TestRequest::get().uri("/feature-toggle/shop/some-id"),
        test::TestRequest::get().uri("/feature-toggles/shop/active"),
        test::TestRequest::get().uri("/feature-toggles/shop/by-date?date=garbage"),
        test::TestRequest::put()
            .uri("/feature-toggle/shop/some-id/update-dates")
            .set_json(json!({})),
        test::TestRequest::delete().uri("/feature-toggles/shop"),
        test::TestRequest::delete().uri("/feature-toggles"),
    ];

    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Database not initialized");
    }

    // Health does not depend on the database
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
