use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

impl TestApp {
    fn items(&self) -> String {
        format!("{}/api/items", self.base_url)
    }

    fn item(&self, index: i64) -> String {
        format!("{}/api/items/{}", self.base_url, index)
    }
}

/// Serve a freshly seeded app on an ephemeral port.
async fn start_server() -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, server::app()).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_seed_scenario() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/api/items/count/apple", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<usize>().await?, 1);

    let res = c.get(app.item(10)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.text().await?, "no item at index 10");

    let res = c.get(app.items()).query(&[("sortStrategy", "1")]).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(
        res.json::<Vec<String>>().await?,
        vec!["Apple", "Banana", "Grape", "Mango", "Orange"]
    );

    let res = c.delete(app.item(0)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(app.item(0)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "Banana");
    Ok(())
}

#[tokio::test]
async fn e2e_add_update_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(app.items()).json(&json!("Kiwi")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.text().await?.is_empty());

    let items = c.get(app.items()).send().await?.json::<Vec<String>>().await?;
    let last = items.len() as i64 - 1;
    assert_eq!(items.last().map(String::as_str), Some("Kiwi"));

    let res = c.put(app.item(last)).json(&json!("Lime")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(app.item(last)).send().await?;
    assert_eq!(res.text().await?, "Lime");
    Ok(())
}

#[tokio::test]
async fn e2e_rejections_leave_items_untouched() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.post(app.items()).json(&json!("  ")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.text().await?, "item must not be empty");

    let res = c.put(app.item(-1)).json(&json!("X")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.delete(app.item(99)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.get(app.items()).query(&[("sortStrategy", "5")]).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.text().await?, "invalid sortStrategy value");

    let items = c.get(app.items()).send().await?.json::<Vec<String>>().await?;
    assert_eq!(items, vec!["Apple", "Banana", "Orange", "Grape", "Mango"]);
    Ok(())
}
