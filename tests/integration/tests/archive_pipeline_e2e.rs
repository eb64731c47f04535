//! End-to-end pipeline runs against a mocked Mattermost server.

use httpmock::prelude::*;
use serde_json::json;

use reaper_client::MattermostClient;
use reaper_pipeline::{
    archive_cutoff_ms, current_unix_timestamp_ms, render_outcome_line, run_archive_pipeline,
    ArchivePipelineConfig, PipelineError,
};

const DAY_MS: i64 = 24 * 60 * 60 * 1_000;

fn pipeline_config(dry_run: bool, cutoff_ms: i64) -> ArchivePipelineConfig {
    ArchivePipelineConfig {
        team_name: "eng".to_string(),
        dry_run,
        page_size: 2,
        cutoff_ms,
    }
}

fn mount_login(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/api/v4/users/login");
        then.status(200)
            .header("Token", "session-token")
            .json_body(json!({"id": "u1", "username": "admin"}));
    })
}

fn mount_logout(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v4/users/logout")
            .header("authorization", "Bearer session-token");
        then.status(200).json_body(json!({"status": "OK"}));
    })
}

fn mount_team(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/api/v4/teams/name/eng");
        then.status(200)
            .json_body(json!({"id": "t1", "name": "eng", "display_name": "Engineering"}));
    })
}

// Two full-page channels plus a short second page: a stale channel with only
// a system post since the cutoff, an active channel with one authored post,
// and a channel created two months ago.
fn mount_channels_and_posts(server: &MockServer, now_ms: i64, cutoff_ms: i64) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/teams/t1/channels")
            .query_param("page", "0")
            .query_param("per_page", "2");
        then.status(200).json_body(json!([
            {
                "id": "c-a",
                "name": "dead-ideas",
                "display_name": "Dead Ideas",
                "create_at": now_ms - 730 * DAY_MS,
                "type": "O"
            },
            {
                "id": "c-b",
                "name": "active-chat",
                "display_name": "Active Chat",
                "create_at": now_ms - 730 * DAY_MS,
                "type": "O"
            }
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/teams/t1/channels")
            .query_param("page", "1")
            .query_param("per_page", "2");
        then.status(200).json_body(json!([
            {
                "id": "c-c",
                "name": "fresh-start",
                "display_name": "Fresh Start",
                "create_at": now_ms - 60 * DAY_MS,
                "type": "O"
            }
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/channels/c-a/posts")
            .query_param("since", cutoff_ms.to_string());
        then.status(200).json_body(json!({
            "order": ["p-join"],
            "posts": {
                "p-join": {
                    "id": "p-join",
                    "create_at": cutoff_ms + DAY_MS,
                    "type": "system_join_channel"
                }
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/v4/channels/c-b/posts")
            .query_param("since", cutoff_ms.to_string());
        then.status(200).json_body(json!({
            "order": ["p-chat"],
            "posts": {
                "p-chat": {
                    "id": "p-chat",
                    "create_at": cutoff_ms + DAY_MS,
                    "type": "",
                    "message": "still here",
                    "user_id": "u2"
                }
            }
        }));
    });
}

#[tokio::test]
async fn e2e_live_run_archives_only_the_unused_channel() {
    let server = MockServer::start();
    let now_ms = current_unix_timestamp_ms();
    let cutoff_ms = archive_cutoff_ms(now_ms);

    let login = mount_login(&server);
    let team = mount_team(&server);
    mount_channels_and_posts(&server, now_ms, cutoff_ms);
    let archive = server.mock(|when, then| {
        when.method(DELETE).path("/api/v4/channels/c-a");
        then.status(200).json_body(json!({"status": "OK"}));
    });
    let logout = mount_logout(&server);

    let client = MattermostClient::new(&server.base_url(), 2_000, 3, 1).expect("client");
    let session = client.login("admin", "hunter2").await.expect("session");
    let report = run_archive_pipeline(&session, &pipeline_config(false, cutoff_ms))
        .await
        .expect("pipeline run");
    session.logout().await.expect("logout");

    assert_eq!(report.team.id, "t1");
    assert!(!report.dry_run);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].channel.id, "c-a");
    assert!(report.all_succeeded());
    assert_eq!(
        render_outcome_line(&report.outcomes[0]),
        "Channel: ~dead-ideas(Dead Ideas), Result: OK"
    );

    login.assert_calls(1);
    team.assert_calls(1);
    archive.assert_calls(1);
    logout.assert_calls(1);
}

#[tokio::test]
async fn e2e_dry_run_selects_the_same_candidate_without_archiving() {
    let server = MockServer::start();
    let now_ms = current_unix_timestamp_ms();
    let cutoff_ms = archive_cutoff_ms(now_ms);

    mount_login(&server);
    mount_team(&server);
    mount_channels_and_posts(&server, now_ms, cutoff_ms);
    let archive = server.mock(|when, then| {
        when.method(DELETE).path_includes("/api/v4/channels/");
        then.status(200).json_body(json!({"status": "OK"}));
    });
    let logout = mount_logout(&server);

    let client = MattermostClient::new(&server.base_url(), 2_000, 3, 1).expect("client");
    let session = client.login("admin", "hunter2").await.expect("session");
    let report = run_archive_pipeline(&session, &pipeline_config(true, cutoff_ms))
        .await
        .expect("dry run");
    session.logout().await.expect("logout");

    assert!(report.dry_run);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].channel.id, "c-a");
    assert!(report.outcomes[0].archived);

    archive.assert_calls(0);
    logout.assert_calls(1);
}

#[tokio::test]
async fn e2e_team_resolution_failure_surfaces_and_still_logs_out() {
    let server = MockServer::start();
    let cutoff_ms = archive_cutoff_ms(current_unix_timestamp_ms());

    mount_login(&server);
    server.mock(|when, then| {
        when.method(GET).path("/api/v4/teams/name/eng");
        then.status(404).json_body(json!({"message": "team not found"}));
    });
    let logout = mount_logout(&server);

    let client = MattermostClient::new(&server.base_url(), 2_000, 3, 1).expect("client");
    let session = client.login("admin", "hunter2").await.expect("session");
    let error = run_archive_pipeline(&session, &pipeline_config(false, cutoff_ms))
        .await
        .expect_err("unknown team");
    session.logout().await.expect("logout");

    assert!(matches!(error, PipelineError::TeamResolution { ref team, .. } if team == "eng"));
    logout.assert_calls(1);
}
