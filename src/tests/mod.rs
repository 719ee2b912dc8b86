use reqwest::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::dom::{ContainerId, Content, Document, StatId};
use crate::location::{MemoryHistory, NavigationStore};
use crate::navigation::{ConfigError, NavigationOptions};
use crate::records::render::{NO_PEOPLE, NO_RECORDS};
use crate::records::{
    load_records, parse_records, AssetResolver, LoadError, Medal, PeopleView, RecordSource,
    RecordsError, RecordsOptions,
};
use crate::session::{Event, Session, SessionError, SessionOptions};

const PAGES: [&str; 4] = ["home", "records", "former", "people"];

fn options() -> SessionOptions {
    SessionOptions {
        navigation: NavigationOptions::default(),
        records: RecordsOptions::new(AssetResolver::parse("https://example.com/").unwrap()),
    }
}

fn start(url: &str) -> Session {
    Session::start(
        Document::standard(&PAGES),
        MemoryHistory::new(Url::parse(url).unwrap()),
        options(),
    )
    .unwrap()
}

fn loaded(url: &str, body: &str) -> Session {
    let mut session = start(url);
    session.finish_load(parse_records("records.json", body));
    session
}

fn leader_names(session: &Session) -> Vec<String> {
    match session.document().content(ContainerId::LeaderboardList) {
        Some(Content::Leaderboard(rows)) => rows.iter().map(|r| r.name.clone()).collect(),
        other => panic!("expected leaderboard rows, got {other:?}"),
    }
}

fn certificate_count(session: &Session, id: ContainerId) -> usize {
    match session.document().content(id) {
        Some(Content::Certificates(cards)) => cards.len(),
        _ => 0,
    }
}

const TRIO: &str = r#"[
  {"name":"Bo","title":"Old","description":"d","year":2019,"status":"former"},
  {"name":"Cy","title":"Mid","description":"d","year":2020},
  {"name":"Bo","title":"New","description":"d","year":2021,"status":"current"}
]"#;

#[test]
fn single_record_fills_every_region() {
    let session = loaded(
        "https://example.com/",
        r#"[{"name":"Ada","title":"Fastest","description":"d","year":2021,"status":"current"}]"#,
    );
    let doc = session.document();

    assert_eq!(doc.stat(StatId::Total), Some("1"));
    assert_eq!(doc.stat(StatId::Current), Some("1"));
    assert_eq!(doc.stat(StatId::Former), Some("0"));
    assert_eq!(certificate_count(&session, ContainerId::RecordsGrid), 1);
    assert_eq!(
        doc.content(ContainerId::FormerGrid),
        Some(&Content::Empty(NO_RECORDS.to_string()))
    );

    let Some(Content::Leaderboard(rows)) = doc.content(ContainerId::LeaderboardList) else {
        panic!("leaderboard not rendered");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rank_label, "1st");
    assert_eq!(rows[0].points, 10);
    assert_eq!(rows[0].medal, Some(Medal::Gold));
    assert_eq!(rows[0].action_label, "View Ada's profile");
}

#[test]
fn leaderboard_orders_by_points() {
    let session = loaded("https://example.com/", TRIO);
    assert_eq!(leader_names(&session), vec!["Bo", "Cy"]);
    let leaders = session.records().unwrap().leaders();
    assert_eq!(leaders[0].points, 15);
    assert_eq!(leaders[1].points, 10);

    assert_eq!(certificate_count(&session, ContainerId::RecordsGrid), 3);
    assert_eq!(certificate_count(&session, ContainerId::FormerGrid), 1);
    let titles: Vec<&str> = session
        .records()
        .unwrap()
        .records()
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["New", "Mid", "Old"]);
}

#[test]
fn non_array_payload_shows_the_same_error_everywhere() {
    let session = loaded("https://example.com/", r#"{"records":[]}"#);
    let doc = session.document();
    let expected = Content::Error("records.json must be an array.".to_string());
    for id in [
        ContainerId::RecordsGrid,
        ContainerId::FormerGrid,
        ContainerId::LeaderboardList,
        ContainerId::ProfileGrid,
    ] {
        assert_eq!(doc.content(id), Some(&expected), "{}", id.element_id());
    }
    let records = session.records().unwrap();
    assert!(!records.is_loading());
    assert_eq!(records.error(), Some("records.json must be an array."));
    assert_eq!(doc.stat(StatId::Total), Some(""));
}

#[test]
fn empty_array_shows_empty_messages() {
    let session = loaded("https://example.com/", "[]");
    let doc = session.document();
    assert_eq!(
        doc.content(ContainerId::RecordsGrid),
        Some(&Content::Empty(NO_RECORDS.to_string()))
    );
    assert_eq!(
        doc.content(ContainerId::LeaderboardList),
        Some(&Content::Empty(NO_PEOPLE.to_string()))
    );
    assert_eq!(doc.stat(StatId::Total), Some("0"));
}

#[test]
fn unknown_person_in_url_keeps_leaderboard() {
    let session = loaded("https://example.com/?person=Nobody#people", TRIO);
    let doc = session.document();
    assert_eq!(doc.active_page(), Some("people"));
    assert_eq!(doc.is_hidden(ContainerId::PeopleLeaderboard), Some(false));
    assert_eq!(doc.is_hidden(ContainerId::PeopleProfile), Some(true));
    assert_eq!(
        session.records().unwrap().view(),
        Some(&PeopleView::Leaderboard)
    );
}

#[test]
fn known_person_in_url_opens_profile_without_a_new_entry() {
    let session = loaded("https://example.com/?person=%20Bo%20#people", TRIO);
    let doc = session.document();
    assert_eq!(
        session.records().unwrap().view(),
        Some(&PeopleView::Profile("Bo".to_string()))
    );
    assert_eq!(doc.is_hidden(ContainerId::PeopleLeaderboard), Some(true));
    assert_eq!(doc.is_hidden(ContainerId::PeopleProfile), Some(false));
    assert_eq!(
        doc.content(ContainerId::ProfileName),
        Some(&Content::Text("Bo".to_string()))
    );
    assert_eq!(certificate_count(&session, ContainerId::ProfileGrid), 2);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn profile_history_round_trip() {
    let mut session = loaded("https://example.com/#people", TRIO);
    assert!(session.dispatch(Event::OpenProfile("Cy".to_string())));
    assert_eq!(session.history().len(), 2);
    assert_eq!(
        session.history().query_param("person").as_deref(),
        Some("Cy")
    );

    assert!(session.dispatch(Event::HistoryBack));
    assert_eq!(
        session.records().unwrap().view(),
        Some(&PeopleView::Leaderboard)
    );
    assert_eq!(session.history().len(), 2);

    assert!(session.dispatch(Event::HistoryForward));
    assert_eq!(
        session.records().unwrap().view(),
        Some(&PeopleView::Profile("Cy".to_string()))
    );

    assert!(session.dispatch(Event::ProfileBack));
    assert_eq!(session.history().len(), 3);
    assert_eq!(
        session.history().current().as_str(),
        "https://example.com/#people"
    );
    assert_eq!(session.document().scroll_resets(), 4);
}

#[test]
fn opening_an_unknown_person_changes_nothing() {
    let mut session = loaded("https://example.com/#people", TRIO);
    assert!(!session.dispatch(Event::OpenProfile("Nobody".to_string())));
    assert_eq!(session.history().len(), 1);
    assert_eq!(
        session.records().unwrap().view(),
        Some(&PeopleView::Leaderboard)
    );
}

#[test]
fn history_edges_are_no_ops() {
    let mut session = loaded("https://example.com/", TRIO);
    assert!(!session.dispatch(Event::HistoryBack));
    assert!(!session.dispatch(Event::HistoryForward));
    assert_eq!(session.document().active_page(), Some("home"));
}

#[test]
fn initial_hash_and_default_page() {
    let session = start("https://example.com/");
    assert_eq!(session.document().active_page(), Some("home"));
    assert_eq!(
        session.history().current().as_str(),
        "https://example.com/#home"
    );
    assert_eq!(session.history().len(), 1);

    let session = start("https://example.com/#former");
    assert_eq!(session.document().active_page(), Some("former"));

    let session = start("https://example.com/#missing");
    assert_eq!(session.document().active_page(), Some("home"));
    assert_eq!(session.history().current().fragment(), Some("home"));
}

#[test]
fn nav_click_and_hash_navigation() {
    let mut session = start("https://example.com/");
    let people = session.trigger_for("people").unwrap();
    assert!(session.dispatch(Event::NavClick(people)));
    assert_eq!(session.document().active_page(), Some("people"));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.document().visible_pages().len(), 1);

    let tab = &session.document().nav_triggers[people];
    assert_eq!(tab.aria_selected, Some(true));
    assert_eq!(tab.tab_index, Some(0));

    assert!(session.dispatch(Event::HashNavigate("records".to_string())));
    assert_eq!(session.document().active_page(), Some("records"));
    assert_eq!(session.history().len(), 2);

    assert!(session.dispatch(Event::HistoryBack));
    assert_eq!(session.document().active_page(), Some("people"));

    let changed = session.dispatch(Event::HashNavigate("nowhere".to_string()));
    assert!(!changed);
    assert_eq!(session.document().active_page(), Some("people"));
}

#[test]
fn records_events_before_load_are_ignored() {
    let mut session = start("https://example.com/#people");
    assert!(session.records().unwrap().is_loading());
    assert!(!session.dispatch(Event::OpenProfile("Bo".to_string())));
    assert!(!session.dispatch(Event::ProfileBack));
}

#[test]
fn missing_containers_disable_records_only() {
    let mut doc = Document::standard(&PAGES);
    doc.remove_container(ContainerId::ProfileGrid);
    let mut session = Session::start(
        doc,
        MemoryHistory::new(Url::parse("https://example.com/#people").unwrap()),
        options(),
    )
    .unwrap();
    assert!(session.records().is_none());
    assert!(session.navigation().is_some());
    session.finish_load(parse_records("records.json", TRIO));
    assert_eq!(
        session.document().content(ContainerId::RecordsGrid),
        Some(&Content::Blank)
    );
}

#[test]
fn duplicate_page_ids_abort_start() {
    let doc = Document::standard(&["home", "home"]);
    let err = Session::start(
        doc,
        MemoryHistory::new(Url::parse("https://example.com/").unwrap()),
        options(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Navigation(ConfigError::DuplicatePageId { .. })
    ));
}

#[test]
fn rejected_elements_are_skipped() {
    let report = parse_records(
        "records.json",
        r#"[
          {"name":"Ada","title":"T","description":"d","year":"2020"},
          {"name":"","title":"T","description":"d","year":2020},
          {"name":"Bo","title":"T","description":"d","year":"soon"},
          42
        ]"#,
    )
    .unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.rejected.len(), 3);
}

#[tokio::test]
async fn http_load_sends_no_cache_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Assets/records.json"))
        .and(header("cache-control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TRIO))
        .expect(1)
        .mount(&server)
        .await;

    let assets = AssetResolver::parse(&server.uri()).unwrap();
    let source = RecordSource::Url(assets.records_url());
    let client = crate::records::loader::build_client(5, None).unwrap();

    let mut session = start("https://example.com/#people");
    session.load(&source, &client).await;
    assert_eq!(leader_names(&session), vec!["Bo", "Cy"]);
}

#[tokio::test]
async fn http_status_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Assets/records.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/Assets/records.json", server.uri())).unwrap();
    let source = RecordSource::Url(url);
    let client = crate::records::loader::build_client(5, None).unwrap();

    let err = load_records(&source, &client).await.unwrap_err();
    assert!(matches!(
        err,
        RecordsError::Load(LoadError::Status { status: 404, .. })
    ));
    assert_eq!(err.to_string(), "Failed to load records.json (404)");

    let mut session = start("https://example.com/");
    session.load(&source, &client).await;
    assert_eq!(
        session.records().unwrap().error(),
        Some("Failed to load records.json (404)")
    );
}
