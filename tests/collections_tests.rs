mod common;

use actix_web::{http::StatusCode, test, App};
use mongodb::bson::doc;
use relief_service::api;
use relief_service::database::{DocumentStore, Resource};
use serde_json::{json, Value};

#[actix_web::test]
async fn test_donors_sorted_by_amount_descending() {
    let (store, state) = common::state();
    for (name, amount) in [("Rahim", 100), ("Karim", 50), ("Salma", 200)] {
        store
            .insert(Resource::Donors, doc! { "name": name, "amount": amount })
            .await
            .unwrap();
    }

    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

    let req = test::TestRequest::get().uri("/api/v1/doners").to_request();
    let donors: Value = test::call_and_read_body_json(&app, req).await;

    let amounts: Vec<i64> = donors
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["amount"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![200, 100, 50]);
}

#[actix_web::test]
async fn test_community_sorted_by_timestamp_descending() {
    let (_store, state) = common::state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

    for (comment, timestamp) in [
        ("first", "2024-06-01T08:00:00.000Z"),
        ("third", "2024-06-03T08:00:00.000Z"),
        ("second", "2024-06-02T08:00:00.000Z"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/community")
            .set_json(json!({ "comment": comment, "timestamp": timestamp }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/v1/community").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;

    let comments: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["comment"].as_str().unwrap())
        .collect();
    assert_eq!(comments, vec!["third", "second", "first"]);
}

#[actix_web::test]
async fn test_volunteers_and_testimonials_create_and_list() {
    let (_store, state) = common::state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

    for (uri, body) in [
        ("/api/v1/volunteer", json!({ "name": "Nadia", "phone": "017" })),
        ("/api/v1/testominal", json!({ "name": "Omar", "quote": "Help arrived fast" })),
    ] {
        let req = test::TestRequest::post().uri(uri).set_json(&body).to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ack["acknowledged"], true);

        let req = test::TestRequest::get().uri(uri).to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["_id"], ack["insertedId"]);
        assert_eq!(listed[0]["name"], body["name"]);
    }
}

#[actix_web::test]
async fn test_unexposed_operations_are_not_routed() {
    let (_store, state) = common::state();
    let app = test::init_service(App::new().app_data(state.clone()).configure(api::configure)).await;

    let requests = [
        test::TestRequest::post()
            .uri("/api/v1/doners")
            .set_json(json!({ "amount": 10 }))
            .to_request(),
        test::TestRequest::delete().uri("/api/v1/community").to_request(),
        test::TestRequest::get()
            .uri("/api/v1/volunteer/65f000000000000000000000")
            .to_request(),
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": "x@example.com" }))
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
