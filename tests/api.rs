use std::time::Duration;

use egot::api::{ApiError, CelebrityApi, HttpApi, Resource};
use egot::model::AwardType;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> HttpApi {
    HttpApi::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn rita_moreno() -> serde_json::Value {
    json!({
        "id": "8d5e9f7a-2b1c-4e3d-9a8b-7c6d5e4f3a2b",
        "name": "Rita Moreno",
        "slug": "rita-moreno",
        "photo_url": null,
        "summary": "Puerto Rican actress",
        "last_updated": "2024-11-02T10:00:00Z",
        "awards": [
            {
                "id": "00000000-0000-0000-0000-000000000001",
                "celebrity_id": "8d5e9f7a-2b1c-4e3d-9a8b-7c6d5e4f3a2b",
                "type": "Oscar",
                "year": 1962,
                "work": "West Side Story",
                "category": "Best Supporting Actress",
                "is_winner": true,
                "ceremony_date": "1962-04-09"
            },
            {
                "id": "00000000-0000-0000-0000-000000000002",
                "celebrity_id": "8d5e9f7a-2b1c-4e3d-9a8b-7c6d5e4f3a2b",
                "type": "Emmy",
                "year": 1977,
                "work": "",
                "category": "Outstanding Lead Actress",
                "is_winner": true
            }
        ]
    })
}

#[tokio::test]
async fn search_celebrity_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/celebrity/search"))
        .and(query_param("q", "Rita Moreno"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rita_moreno()))
        .expect(1)
        .mount(&server)
        .await;

    let celebrity = client(&server).await.search_celebrity("Rita Moreno").await.unwrap();
    assert_eq!(celebrity.name, "Rita Moreno");
    assert_eq!(celebrity.awards.len(), 2);
    assert_eq!(celebrity.awards[0].kind, AwardType::Oscar);
    assert_eq!(celebrity.awards[0].work.as_deref(), Some("West Side Story"));
    assert!(celebrity.awards[0].ceremony_date.is_some());
    // empty work is absent
    assert_eq!(celebrity.awards[1].work, None);
}

#[tokio::test]
async fn status_mapping() {
    let server = MockServer::start().await;
    Mock::given(path("/api/celebrity/search"))
        .and(query_param("q", "Nobody"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Celebrity not found"})))
        .mount(&server)
        .await;
    Mock::given(path("/api/celebrity/search"))
        .and(query_param("q", "Broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(path("/api/oscar-race/1900"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = client(&server).await;
    assert_eq!(
        api.search_celebrity("Nobody").await,
        Err(ApiError::NotFound(Resource::Celebrity))
    );
    assert_eq!(api.search_celebrity("Broken").await, Err(ApiError::Status(500)));
    assert_eq!(api.oscar_ceremony(1900).await, Err(ApiError::NotFound(Resource::Ceremony)));
}

#[tokio::test]
async fn invalid_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(path("/api/celebrity/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let result = client(&server).await.search_celebrity("Anyone").await;
    assert!(matches!(result, Err(ApiError::Decode(_))), "{result:?}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(path("/api/celebrity/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(rita_moreno())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let api = HttpApi::new(&server.uri(), Duration::from_millis(50)).unwrap();
    assert_eq!(api.search_celebrity("Rita Moreno").await, Err(ApiError::Timeout));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // nothing listens on the discard port
    let api = HttpApi::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let result = api.search_celebrity("Rita Moreno").await;
    assert!(matches!(result, Err(ApiError::Network(_)) | Err(ApiError::Timeout)), "{result:?}");
}

#[tokio::test]
async fn autocomplete_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(path("/api/celebrity/autocomplete"))
        .and(query_param("q", "Tom Ha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "00000000-0000-0000-0000-000000000003", "name": "Tom Hanks", "slug": "tom-hanks"}
        ])))
        .mount(&server)
        .await;
    Mock::given(path("/api/celebrity/autocomplete"))
        .and(query_param("q", "Err"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let api = client(&server).await;
    let suggestions = api.autocomplete("Tom Ha").await.unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].name, "Tom Hanks");
    assert_eq!(api.autocomplete("Err").await, Ok(Vec::new()));
}

#[tokio::test]
async fn blank_autocomplete_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(path("/api/celebrity/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    assert_eq!(client(&server).await.autocomplete("   ").await, Ok(Vec::new()));
}

#[tokio::test]
async fn listings_pass_limit() {
    let server = MockServer::start().await;
    Mock::given(path("/api/celebrity/close-to-egot"))
        .and(query_param("limit", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "00000000-0000-0000-0000-000000000004",
                "name": "Lin-Manuel Miranda",
                "slug": "lin-manuel-miranda",
                "egot_win_count": 3,
                "won_awards": ["Emmy", "Grammy", "Tony"]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/oscar-race/years"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([2025, 2024])))
        .mount(&server)
        .await;
    Mock::given(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&server)
        .await;

    let api = client(&server).await;
    let close = api.close_to_egot(Some(6)).await.unwrap();
    assert_eq!(close[0].missing_award(), Some(AwardType::Oscar));
    assert_eq!(api.oscar_years().await, Ok(vec![2025, 2024]));
    assert_eq!(api.health().await, Ok(()));
}

#[tokio::test]
async fn ceremony_with_null_lists_decodes() {
    let server = MockServer::start().await;
    Mock::given(path("/api/oscar-race/2026"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "00000000-0000-0000-0000-000000000010",
            "year": 2026,
            "ceremony_name": "98th Academy Awards",
            "ceremony_date": "2026-03-15",
            "is_complete": false,
            "categories": [
                {
                    "id": "00000000-0000-0000-0000-000000000011",
                    "name": "Best Picture",
                    "display_order": 1,
                    "winner_announced": false,
                    "nominees": null
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(path("/api/oscar-race/2027"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "00000000-0000-0000-0000-000000000012",
            "year": 2027,
            "categories": null
        })))
        .mount(&server)
        .await;

    let api = client(&server).await;
    let ceremony = api.oscar_ceremony(2026).await.unwrap();
    assert_eq!(ceremony.categories.len(), 1);
    assert!(ceremony.categories[0].nominees.is_empty());
    assert!(api.oscar_ceremony(2027).await.unwrap().categories.is_empty());
}
