//! End-to-end journeys against mocked backend hosts.
//!
//! Each test drives the real layers together: the auth flow persisting to a
//! session store on disk, the store API reading its token back out, and the
//! catalog/save flows on top.

use std::fs;
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfront::api::StoreApi;
use shopfront::config::ApiConfig;
use shopfront::flow::{save_product, AuthFlow, Catalog, ImageItem};
use shopfront::model::{Product, ProductImage, Role};
use shopfront::session::SessionStore;

fn api_config(auth: &MockServer, store: &MockServer) -> ApiConfig {
    ApiConfig {
        auth_base_url: auth.uri(),
        store_base_url: store.uri(),
        timeout_secs: 5,
        log_bodies: false,
    }
}

async fn mount_auth(server: &MockServer, token: &str, role: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authToken": token })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header(
            "authorization",
            format!("Bearer {}", token).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Ada",
            "email": "ada@example.com",
            "role": role
        })))
        .mount(server)
        .await;
}

fn catalog_body() -> serde_json::Value {
    json!([
        { "id": 1, "name": "Red Shoe", "brand": "Acme", "category": "shoes", "price": 49.99, "stock": 3 },
        { "id": 2, "name": "Blue Hat", "brand": "Acme", "category": "hats", "price": 15.0, "stock": 9 },
        { "id": 3, "name": "red Socks", "brand": "Warm", "category": "socks", "price": 5.5, "stock": 40 }
    ])
}

fn saved_product_body(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Red Shoe",
        "description": "Bright",
        "price": 49.99,
        "stock": 3,
        "brand": "Acme",
        "category": "shoes"
    })
}

#[tokio::test]
async fn test_login_then_browse_catalog_across_hosts() {
    let auth_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = api_config(&auth_server, &store_server);

    mount_auth(&auth_server, "tok-browse", "user").await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .and(header("authorization", "Bearer tok-browse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .expect(1)
        .mount(&store_server)
        .await;

    // Step 1: log in; the validated role selects the user surface
    let session = Arc::new(SessionStore::open(dir.path()).unwrap());
    let auth = AuthFlow::new(config.clone(), session.clone());
    let active = auth.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(active.role, Role::User);

    // Step 2: the store client picks the token up from the same store
    let store = StoreApi::new(&config, session).unwrap();
    let catalog = Catalog::load(&store).await.unwrap();
    assert_eq!(catalog.all().len(), 3);

    // Step 3: narrow by name, case-insensitively, without another request
    let names: Vec<&str> = catalog
        .filter("red")
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Red Shoe", "red Socks"]);
}

#[tokio::test]
async fn test_session_survives_restart() {
    let auth_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = api_config(&auth_server, &store_server);

    mount_auth(&auth_server, "tok-persist", "admin").await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .and(header("authorization", "Bearer tok-persist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .expect(1)
        .mount(&store_server)
        .await;

    // Step 1: log in and drop every handle, as if the process exited
    {
        let session = Arc::new(SessionStore::open(dir.path()).unwrap());
        let auth = AuthFlow::new(config.clone(), session);
        auth.login("ada@example.com", "secret").await.unwrap();
    }

    // Step 2: a fresh process resumes the session without the network
    let session = Arc::new(SessionStore::open(dir.path()).unwrap());
    let resumed = AuthFlow::new(config.clone(), session.clone())
        .resume()
        .unwrap();
    assert_eq!(resumed.token, "tok-persist");
    assert_eq!(resumed.role, Role::Admin);

    // Step 3: the resumed token authorizes store calls
    let store = StoreApi::new(&config, session).unwrap();
    let products = store.products().await.unwrap();
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn test_admin_creates_product_with_images_journey() {
    let auth_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = api_config(&auth_server, &store_server);

    mount_auth(&auth_server, "tok-admin", "admin").await;
    Mock::given(method("POST"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(saved_product_body(7)))
        .expect(1)
        .mount(&store_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "image": { "path": "/vault/shoe.png", "name": "shoe.png" }
        })))
        .expect(2)
        .mount(&store_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/product_image"))
        .and(body_json(json!({ "product_id": 7, "image_id": 42 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 900 })))
        .expect(2)
        .mount(&store_server)
        .await;

    // Step 1: log in as an admin
    let session = Arc::new(SessionStore::open(dir.path()).unwrap());
    let auth = AuthFlow::new(config.clone(), session.clone());
    let active = auth.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(active.role, Role::Admin);

    // Step 2: save a product with two local images
    let front = dir.path().join("front.png");
    let back = dir.path().join("back.png");
    fs::write(&front, b"png-front").unwrap();
    fs::write(&back, b"png-back").unwrap();

    let store = StoreApi::new(&config, session).unwrap();
    let draft = shopfront::model::ProductDraft {
        name: "Red Shoe".to_string(),
        description: "Bright".to_string(),
        price: 49.99,
        stock: 3,
        brand: "Acme".to_string(),
        category: "shoes".to_string(),
    };
    let report = save_product(
        &store,
        &draft,
        vec![ImageItem::Local(front), ImageItem::Local(back)],
        None,
    )
    .await
    .unwrap();

    // Step 3: both images were uploaded and associated with the new product
    assert!(report.created);
    assert_eq!(report.product.id, 7);
    assert_eq!(report.attached.len(), 2);
    assert!(report.fully_succeeded());
}

#[tokio::test]
async fn test_edit_journey_swaps_image() {
    let auth_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = api_config(&auth_server, &store_server);

    mount_auth(&auth_server, "tok-edit", "admin").await;
    Mock::given(method("PATCH"))
        .and(path("/product/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(saved_product_body(7)))
        .expect(1)
        .mount(&store_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 52,
            "image": { "path": "/vault/new.png", "name": "new.png" }
        })))
        .expect(1)
        .mount(&store_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/product_image"))
        .and(body_json(json!({ "product_id": 7, "image_id": 52 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 901 })))
        .expect(1)
        .mount(&store_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/product_image/31"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&store_server)
        .await;

    let session = Arc::new(SessionStore::open(dir.path()).unwrap());
    AuthFlow::new(config.clone(), session.clone())
        .login("ada@example.com", "secret")
        .await
        .unwrap();

    // The product being edited currently carries image 31
    let mut current: Product = serde_json::from_value(saved_product_body(7)).unwrap();
    current.image = Some(ProductImage {
        id: 31,
        product_id: Some(7),
        image: None,
    });

    // The edit form drops image 31 and adds a new file instead
    let replacement = dir.path().join("new.png");
    fs::write(&replacement, b"png-new").unwrap();

    let store = StoreApi::new(&config, session).unwrap();
    let draft = shopfront::model::ProductDraft {
        name: "Red Shoe".to_string(),
        description: "Bright".to_string(),
        price: 49.99,
        stock: 3,
        brand: "Acme".to_string(),
        category: "shoes".to_string(),
    };
    let report = save_product(
        &store,
        &draft,
        vec![ImageItem::Local(replacement)],
        Some(&current),
    )
    .await
    .unwrap();

    assert!(!report.created);
    assert_eq!(report.attached.len(), 1);
    assert_eq!(report.removed, vec![31]);
}

#[tokio::test]
async fn test_logout_ends_the_session_on_disk() {
    let auth_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = api_config(&auth_server, &store_server);

    mount_auth(&auth_server, "tok-out", "user").await;

    let session = Arc::new(SessionStore::open(dir.path()).unwrap());
    let auth = AuthFlow::new(config.clone(), session);
    auth.login("ada@example.com", "secret").await.unwrap();
    assert!(dir.path().join("session.json").exists());

    auth.logout().unwrap();

    // A fresh open sees nothing to resume
    let reopened = SessionStore::open(dir.path()).unwrap();
    assert!(!reopened.is_logged_in());
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_rejected_login_never_touches_disk() {
    let auth_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = api_config(&auth_server, &store_server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&auth_server)
        .await;

    let session = Arc::new(SessionStore::open(dir.path()).unwrap());
    let auth = AuthFlow::new(config.clone(), session.clone());
    auth.login("ada@example.com", "wrong").await.unwrap_err();

    assert!(!session.is_logged_in());
    assert!(!dir.path().join("session.json").exists());
}
