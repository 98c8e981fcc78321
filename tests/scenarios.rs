//! End-to-end scenarios through the public API against a mock JIRA server.

use httpmock::prelude::*;
use serde_json::json;

use jeera::api::{ApiError, IssueFields, IssueType, JiraClient, Project, Transition, UpdateOutcome};
use jeera::config::{AuthMode, Config, CustomFieldSlots};
use jeera::{BoardSelector, Session};

fn basic_config(base_url: &str, username: &str) -> Config {
    Config::new(base_url, username, "tok123", AuthMode::Basic).with_custom_fields(CustomFieldSlots {
        acceptance_criteria: Some("customfield_11028".to_string()),
        story_points: Some("customfield_10002".to_string()),
    })
}

#[test]
fn create_issue_sends_only_set_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/api/2/issue")
            .header("Authorization", "Basic YWxpY2U6dG9rMTIz")
            .header("Content-Type", "application/json")
            .json_body(json!({"fields": {
                "project": {"key": "ENG"},
                "issuetype": {"name": "Task"},
                "summary": "Fix crash",
                "description": "Crashes on start"
            }}));
        then.status(201).json_body(json!({
            "id": "10001",
            "key": "ENG-42",
            "self": "https://jira.example.com/rest/api/2/issue/10001"
        }));
    });

    let session = Session::new(&basic_config(&server.base_url(), "alice"), false).unwrap();
    let fields = IssueFields {
        project: Some(Project::keyed("ENG")),
        issue_type: Some(IssueType::named("Task")),
        summary: "Fix crash".to_string(),
        description: "Crashes on start".to_string(),
        ..IssueFields::default()
    };
    let created = session.create_issue(&fields).unwrap();

    assert_eq!(created.id, "10001");
    assert_eq!(created.key, "ENG-42");
    assert_eq!(created.self_url, "https://jira.example.com/rest/api/2/issue/10001");
    mock.assert();
}

#[test]
fn partial_update_of_story_points() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/rest/api/2/issue/ENG-42")
            .body(r#"{"fields":{"customfield_10002":5}}"#);
        then.status(204);
    });

    let session = Session::new(&basic_config(&server.base_url(), "alice"), false).unwrap();
    let fields = IssueFields {
        story_points: Some(5.0),
        ..IssueFields::default()
    };
    let outcome = session.update_issue("ENG-42", &fields, None).unwrap();

    assert_eq!(outcome, UpdateOutcome::Updated);
    mock.assert();
}

#[test]
fn transition_listing_ignores_extra_fields() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/api/2/issue/ENG-42/transitions");
        then.status(200).json_body(json!({
            "transitions": [{"id": "31", "name": "Start", "to": {"id": "10000"}, "fields": {}}]
        }));
    });

    let session = Session::new(&basic_config(&server.base_url(), "alice"), false).unwrap();
    let transitions = session.list_transitions("ENG-42").unwrap();

    assert_eq!(
        transitions,
        vec![Transition {
            id: "31".to_string(),
            name: "Start".to_string()
        }]
    );
}

#[test]
fn long_token_selects_bearer_auth() {
    let token = "x".repeat(64);
    let config = Config::resolve(|key| match key {
        "JIRA_BASE_URL" => Some("https://jira.example.com".to_string()),
        "JIRA_USERNAME" => Some("alice".to_string()),
        "JIRA_API_TOKEN" => Some(token.clone()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.auth_mode, AuthMode::Bearer);

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/api/2/myself")
            .header("Authorization", format!("Bearer {}", token));
        then.status(200)
            .json_body(json!({"name": "alice", "displayName": "Alice"}));
    });

    let config = Config::new(&server.base_url(), "alice", &token, config.auth_mode);
    let session = Session::new(&config, false).unwrap();
    session.who_am_i().unwrap();
    mock.assert();

    let client = JiraClient::new(&config, false).unwrap();
    let request = client
        .build_request(reqwest::Method::GET, "/rest/api/2/myself", None::<&()>)
        .unwrap();
    assert_eq!(request.headers().get_all("Authorization").iter().count(), 1);
}

#[test]
fn empty_active_sprint_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/agile/1.0/board/14190/project");
        then.status(200).json_body(json!({"values": [{"key": "ENG"}]}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/agile/1.0/board/14190/sprint")
            .query_param("state", "active");
        then.status(200).json_body(json!({"values": []}));
    });

    let session = Session::new(&basic_config(&server.base_url(), "alice"), false).unwrap();

    let err = session.active_sprint(14190).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = session
        .sprint_report(BoardSelector::Id(14190), None)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn who_am_i_login_is_used_in_jql() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/api/2/myself");
        then.status(200)
            .json_body(json!({"name": "aliceL", "displayName": "Alice L"}));
    });
    let search = server.mock(|when, then| {
        when.method(GET).path("/rest/api/2/search").query_param(
            "jql",
            "project = ENG AND sprint = \"Sprint 7\" AND assignee in (aliceL)",
        );
        then.status(200).json_body(json!({"total": 0, "issues": []}));
    });

    let session = Session::new(&basic_config(&server.base_url(), "alice@corp"), false).unwrap();
    let user = session.who_am_i().unwrap();
    assert_eq!(user.name, "aliceL");

    let issues = session.my_issues_in_sprint("ENG", "Sprint 7").unwrap();
    assert!(issues.is_empty());
    search.assert();
}
