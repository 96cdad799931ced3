use billtracker::prelude::*;
use billtracker::{fetch_jurisdictions, BillId, LegiscanClient};
use mockito::{Matcher, Server, ServerGuard};
use std::time::Duration;

const TEST_KEY: &str = "test-key";

fn config_for(server: &ServerGuard, key: Option<&str>) -> Config {
    let mut builder = ConfigBuilder::new()
        .api_base(format!("{}/", server.url()))
        .pacing(PacingPolicy::none());
    if let Some(key) = key {
        builder = builder.api_key(key);
    }
    builder.build().unwrap()
}

fn query(op: &str, param: &str, value: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("key".into(), TEST_KEY.into()),
        Matcher::UrlEncoded("op".into(), op.into()),
        Matcher::UrlEncoded(param.into(), value.into()),
    ])
}

fn search_body(hits: &[(u64, &str)]) -> String {
    let mut result = serde_json::Map::new();
    result.insert(
        "summary".to_string(),
        serde_json::json!({"page": "1 of 1", "count": hits.len()}),
    );
    for (idx, (id, number)) in hits.iter().enumerate() {
        result.insert(
            idx.to_string(),
            serde_json::json!({"bill_id": id, "bill_number": number, "relevance": 100}),
        );
    }
    serde_json::json!({"status": "OK", "searchresult": result}).to_string()
}

fn bill_body(id: u64, number: &str, title: &str, last_action_date: &str) -> String {
    serde_json::json!({
        "status": "OK",
        "bill": {
            "bill_id": id,
            "bill_number": number,
            "title": title,
            "description": "",
            "status": 1,
            "status_date": "",
            "last_action": "Introduced",
            "last_action_date": last_action_date,
            "url": format!("https://legiscan.com/bill/{}", id),
            "sponsors": []
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_http_error_on_one_search_is_absorbed() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/")
        .match_query(query("getSearch", "state", "US"))
        .with_body(search_body(&[(1, "HR 1")]))
        .create_async()
        .await;
    let failing = server
        .mock("GET", "/")
        .match_query(query("getSearch", "state", "CA"))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/")
        .match_query(query("getSearch", "state", "CO"))
        .with_body(search_body(&[(2, "SB 2"), (3, "SB 3")]))
        .create_async()
        .await;

    server
        .mock("GET", "/")
        .match_query(query("getBill", "id", "1"))
        .with_body(bill_body(1, "HR 1", "Marijuana rescheduling", "2024-02-10"))
        .create_async()
        .await;
    server
        .mock("GET", "/")
        .match_query(query("getBill", "id", "2"))
        .with_body(bill_body(2, "SB 2", "Cannabis social equity", "2024-04-01"))
        .create_async()
        .await;
    server
        .mock("GET", "/")
        .match_query(query("getBill", "id", "3"))
        .with_body(bill_body(3, "SB 3", "Hemp Rope Manufacturing Standards", "2024-05-01"))
        .create_async()
        .await;

    let config = config_for(&server, Some(TEST_KEY));
    let jurisdictions: Vec<Jurisdiction> = ["US", "CA", "CO"]
        .iter()
        .filter_map(|code| Jurisdiction::from_code(code))
        .collect();

    let result = fetch_jurisdictions(&config, &jurisdictions).await.unwrap();

    failing.assert_async().await;
    let ids: Vec<BillId> = result.bills.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![BillId(2), BillId(1)]);
    assert_eq!(result.total_states, 2);
    assert_eq!(result.federal_bills, 1);
    assert_eq!(result.bills[0].state_name, "Colorado");
    assert_eq!(result.bills[0].status, "Introduced");
}

#[tokio::test]
async fn test_missing_api_key_makes_no_requests() {
    let mut server = Server::new_async().await;
    let any_request = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = config_for(&server, None);
    let result = fetch_all(&config).await;

    assert!(matches!(result, Err(Error::MissingApiKey)));
    any_request.assert_async().await;
}

#[tokio::test]
async fn test_api_error_status_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(query("getSearch", "state", "TX"))
        .with_body(r#"{"status": "ERROR", "alert": {"message": "Invalid API Key"}}"#)
        .create_async()
        .await;

    let client = LegiscanClient::new(format!("{}/", server.url()), TEST_KEY, Duration::from_secs(5)).unwrap();
    match client.search("TX", "cannabis", SearchYear::Current).await {
        Err(Error::Api(message)) => assert_eq!(message, "Invalid API Key"),
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_year_is_sent_as_param() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("op".into(), "getSearch".into()),
            Matcher::UrlEncoded("year".into(), "1".into()),
            Matcher::UrlEncoded("query".into(), "cannabis OR marijuana".into()),
        ]))
        .with_body(search_body(&[]))
        .expect(1)
        .create_async()
        .await;

    let client = LegiscanClient::new(format!("{}/", server.url()), TEST_KEY, Duration::from_secs(5)).unwrap();
    let result = client
        .search("WY", "cannabis OR marijuana", SearchYear::nearest(0))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.hits().count(), 0);
    assert_eq!(result.summary().map(|s| s.count), Some(0));
}

#[tokio::test]
async fn test_malformed_hit_does_not_drop_jurisdiction() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(query("getSearch", "state", "ME"))
        .with_body(
            r#"{"status": "OK", "searchresult": {
                "summary": {"count": "2"},
                "0": {"bill_number": "LD 1", "title": null},
                "1": {"bill_id": 8, "bill_number": "LD 8", "title": null}
            }}"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/")
        .match_query(query("getBill", "id", "8"))
        .with_body(bill_body(8, "LD 8", "Adult use cannabis licensing", "2024-03-01"))
        .create_async()
        .await;

    let config = config_for(&server, Some(TEST_KEY));
    let maine = Jurisdiction::from_code("ME").unwrap();
    let result = fetch_jurisdictions(&config, &[maine]).await.unwrap();

    let ids: Vec<BillId> = result.bills.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![BillId(8)]);
    assert_eq!(result.bills[0].state_name, "Maine");
}
