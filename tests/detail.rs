#[allow(dead_code)]
mod common;

use std::time::Duration;

use common::{MockApi, award, celebrity};
use egot::api::{ApiError, Resource};
use egot::detail::{DetailPage, DetailState, LOADING_MESSAGES, SLOW_HINT};
use egot::model::AwardType;
use egot::options::EgotOptions;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn hanging_lookup_times_out() {
    let api = MockApi {
        hang: true,
        ..Default::default()
    };
    let mut page = DetailPage::new("Unknown Person");
    let mut seen = Vec::new();
    let start = Instant::now();
    let state = page.load(&api, |p| seen.push(p.index())).await.clone();

    assert_eq!(start.elapsed(), Duration::from_secs(30));
    assert_eq!(state, DetailState::Failed(ApiError::Timeout));
    assert!(!page.is_loading());
    assert_eq!(&seen[..5], &[0, 1, 2, 3, 4]);
    assert!(seen.iter().all(|i| *i < LOADING_MESSAGES.len()));
    assert_eq!(seen.last(), Some(&4));
}

#[tokio::test(start_paused = true)]
async fn slow_lookup_shows_hint() {
    let api = MockApi::default()
        .with_celebrity(celebrity("Audra McDonald", vec![award(AwardType::Tony, 1994, true)]))
        .with_latency("Audra McDonald", Duration::from_secs(5));
    let mut page = DetailPage::new("Audra McDonald");
    let mut hints = Vec::new();
    page.load(&api, |p| hints.push(p.shows_slow_hint())).await;

    // initial message, then one per 2 s
    assert_eq!(hints, vec![false, false, true]);
    assert_eq!(page.celebrity().map(|c| c.name.as_str()), Some("Audra McDonald"));
    assert!(!SLOW_HINT.is_empty());
}

#[tokio::test(start_paused = true)]
async fn fast_lookup_keeps_first_message() {
    let api = MockApi::default().with_celebrity(celebrity("Mel Brooks", Vec::new()));
    let mut page = DetailPage::new("Mel Brooks");
    let mut messages = Vec::new();
    page.load(&api, |p| messages.push(p.message())).await;
    assert_eq!(messages, vec!["Searching the archives..."]);
    assert_eq!(page.status().map(|s| s.count), Some(0));
    assert!(page.groups().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn not_found() {
    let api = MockApi::default();
    let mut page = DetailPage::new("Nobody");
    page.load(&api, |_| {}).await;
    let error = page.error().unwrap();
    assert_eq!(error, &ApiError::NotFound(Resource::Celebrity));
    assert_eq!(
        error.user_hint(),
        "This person may not have EGOT-eligible awards in Wikidata."
    );
}

#[tokio::test(start_paused = true)]
async fn options_shorten_timeout() {
    let api = MockApi {
        hang: true,
        ..Default::default()
    };
    let options = EgotOptions {
        request_timeout_secs: 3,
        loading_interval_ms: 1000,
        ..Default::default()
    };
    let mut page = DetailPage::from_options("Someone", &options);
    let mut count = 0;
    let start = Instant::now();
    page.load(&api, |_| count += 1).await;
    assert_eq!(start.elapsed(), Duration::from_secs(3));
    assert!(page.error().is_some_and(|e| e.user_hint().contains("connection")));
    assert!((3..=4).contains(&count));
}

#[tokio::test(start_paused = true)]
async fn awards_grouped_by_recency() {
    let api = MockApi::default().with_celebrity(celebrity(
        "Jennifer Hudson",
        vec![
            award(AwardType::Oscar, 2015, true),
            award(AwardType::Emmy, 2019, true),
            award(AwardType::Oscar, 2020, true),
        ],
    ));
    let mut page = DetailPage::new("Jennifer Hudson");
    page.load(&api, |_| {}).await;
    let groups = page.groups().unwrap();
    let years = |kind| -> Vec<i32> { groups.get(kind).unwrap().iter().map(|a| a.year).collect() };
    assert_eq!(years(AwardType::Oscar), vec![2020, 2015]);
    assert_eq!(years(AwardType::Emmy), vec![2019]);
    assert_eq!(groups.kinds(), vec![AwardType::Oscar, AwardType::Emmy]);
    assert_eq!(api.search_calls.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_clamped() {
    let api = MockApi::default()
        .with_celebrity(celebrity("Mel Brooks", Vec::new()))
        .with_latency("Mel Brooks", Duration::from_millis(3));
    let mut page = DetailPage::new("Mel Brooks").with_timings(Duration::ZERO, Duration::from_secs(1));
    let mut count = 0;
    page.load(&api, |_| count += 1).await;
    assert!(matches!(page.state(), DetailState::Loaded(_)));
    assert!(count > 1);
}
