mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn created_property_belongs_to_the_caller() {
    let app = TestApp::new();
    let (user_id, sid) = app.manager("ana", "a@x.com").await;

    let property = app.create_property(&sid, "Flat").await;
    assert_eq!(property["managerId"], user_id.to_string());
    assert_eq!(property["tenantIds"], json!([]));
    assert_eq!(property["propertyName"], "Flat");
    assert_eq!(property["numberOfRooms"], 2);
}

#[tokio::test]
async fn create_requires_login_before_validation() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/v1/properties",
            Some(json!({"propertyName": ""})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.property_count().await, 0);
}

#[tokio::test]
async fn invalid_property_lists_every_field() {
    let app = TestApp::new();
    let (_, sid) = app.manager("ana", "a@x.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/properties",
            Some(json!({"propertyName": "Flat", "numberOfRooms": -1})),
            Some(&sid),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"].as_array().unwrap().len(), 3);
    assert_eq!(app.store.property_count().await, 0);
}

#[tokio::test]
async fn listing_only_shows_own_properties() {
    let app = TestApp::new();
    let (_, ana) = app.manager("ana", "a@x.com").await;
    let (_, bob) = app.manager("bob", "b@x.com").await;

    let empty = app
        .request(Method::GET, "/api/v1/properties", None, Some(&ana))
        .await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body, json!([]));

    let first = app.create_property(&ana, "First").await;
    app.create_property(&ana, "Second").await;
    app.create_property(&bob, "Elsewhere").await;

    let listed = app
        .request(Method::GET, "/api/v1/properties", None, Some(&ana))
        .await;
    let names: Vec<_> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["propertyName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["First", "Second"]);
    assert_eq!(listed.body[0]["id"], first["id"]);
}

#[tokio::test]
async fn listing_requires_login() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/api/v1/properties", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn partial_update_touches_only_given_fields() {
    let app = TestApp::new();
    let (_, sid) = app.manager("ana", "a@x.com").await;
    let property = app.create_property(&sid, "Flat").await;
    let id = id_of(&property);

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(json!({"numberOfRooms": 5, "description": "renovated"})),
            Some(&sid),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["numberOfRooms"], 5);
    assert_eq!(response.body["description"], "renovated");
    assert_eq!(response.body["propertyName"], "Flat");
    assert_eq!(response.body["address"], "1 Rd");
    assert_eq!(response.body["managerId"], property["managerId"]);
}

#[tokio::test]
async fn update_rejects_protected_fields_without_writing() {
    let app = TestApp::new();
    let (_, sid) = app.manager("ana", "a@x.com").await;
    let property = app.create_property(&sid, "Flat").await;
    let id = id_of(&property);

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(json!({"propertyName": "Renamed", "managerId": "someone"})),
            Some(&sid),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let listed = app
        .request(Method::GET, "/api/v1/properties", None, Some(&sid))
        .await;
    assert_eq!(listed.body[0]["propertyName"], "Flat");
}

#[tokio::test]
async fn update_by_another_manager_is_forbidden() {
    let app = TestApp::new();
    let (_, ana) = app.manager("ana", "a@x.com").await;
    let (_, bob) = app.manager("bob", "b@x.com").await;
    let id = id_of(&app.create_property(&ana, "Flat").await);

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(json!({"address": "2 Rd"})),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_checks_id_existence_and_ownership() {
    let app = TestApp::new();
    let (_, ana) = app.manager("ana", "a@x.com").await;
    let (_, bob) = app.manager("bob", "b@x.com").await;
    let id = id_of(&app.create_property(&ana, "Flat").await);

    let bad_id = app
        .request(Method::DELETE, "/api/v1/properties/not-an-id", None, Some(&ana))
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);

    let missing = app
        .request(
            Method::DELETE,
            &format!("/api/v1/properties/{}", uuid::Uuid::new_v4()),
            None,
            Some(&ana),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let foreign = app
        .request(Method::DELETE, &format!("/api/v1/properties/{id}"), None, Some(&bob))
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.property_count().await, 1);

    let own = app
        .request(Method::DELETE, &format!("/api/v1/properties/{id}"), None, Some(&ana))
        .await;
    assert_eq!(own.status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.property_count().await, 0);
}

#[tokio::test]
async fn deleting_a_property_removes_its_tenants() {
    let app = TestApp::new();
    let (_, sid) = app.manager("ana", "a@x.com").await;
    let id = id_of(&app.create_property(&sid, "Flat").await);
    let keep = id_of(&app.create_property(&sid, "Other").await);

    app.add_tenant(&sid, id, "Bo").await;
    app.add_tenant(&sid, id, "Cy").await;
    app.add_tenant(&sid, keep, "Di").await;
    assert_eq!(app.store.tenant_count().await, 3);

    let response = app
        .request(Method::DELETE, &format!("/api/v1/properties/{id}"), None, Some(&sid))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.tenant_count().await, 1);
    assert_eq!(app.store.property_count().await, 1);
}

#[tokio::test]
async fn null_field_does_not_pass_as_no_change() {
    let app = TestApp::new();
    let (_, sid) = app.manager("ana", "a@x.com").await;
    let id = id_of(&app.create_property(&sid, "Flat").await);

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(json!({"propertyName": null})),
            Some(&sid),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "propertyName");
}
