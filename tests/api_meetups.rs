//! Integration tests for the meetup endpoints

mod common;

#[cfg(test)]
mod meetup_tests {
    use super::common::{meetup_payload, seed_meetup, seed_proposal, seed_user, spawn_app};
    use axum_test::http::{HeaderName, StatusCode};
    use serde_json::{Value, json};

    fn auth() -> HeaderName {
        HeaderName::from_static("authorization")
    }

    #[tokio::test]
    async fn test_root_is_public() {
        let app = spawn_app().await;
        app.server.get("/").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_create_and_get_meetup() {
        let app = spawn_app().await;
        let alice = seed_user(&app, "alice").await;
        let bob = seed_user(&app, "bob").await;

        let response = app
            .server
            .post("/meetup")
            .add_header(auth(), alice.bearer())
            .json(&meetup_payload())
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["is_organizer"], true);
        assert_eq!(created["like_count"], 0);
        let meetup_id = created["meetup_id"].as_i64().unwrap();

        let response = app
            .server
            .get(&format!("/meetup/{}", meetup_id))
            .add_header(auth(), bob.bearer())
            .await;
        response.assert_status_ok();
        let meetup: Value = response.json();
        assert_eq!(meetup["is_organizer"], false);
        assert_eq!(meetup["organizer"]["nickname"], "alice");
        assert_eq!(meetup["ad_title"], "Rustaceans wanted");
    }

    #[tokio::test]
    async fn test_create_meetup_validation() {
        let app = spawn_app().await;
        let alice = seed_user(&app, "alice").await;

        let mut payload = meetup_payload();
        payload["name"] = json!("");
        app.server
            .post("/meetup")
            .add_header(auth(), alice.bearer())
            .json(&payload)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_get_missing_meetup() {
        let app = spawn_app().await;
        let alice = seed_user(&app, "alice").await;

        app.server
            .get("/meetup/404")
            .add_header(auth(), alice.bearer())
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_update_is_organizer_only() {
        let app = spawn_app().await;
        let alice = seed_user(&app, "alice").await;
        let bob = seed_user(&app, "bob").await;
        let meetup_id = seed_meetup(&app, &alice).await;

        app.server
            .put(&format!("/meetup/{}", meetup_id))
            .add_header(auth(), bob.bearer())
            .json(&json!({ "place": "Busan" }))
            .await
            .assert_status_forbidden();

        let response = app
            .server
            .put(&format!("/meetup/{}", meetup_id))
            .add_header(auth(), alice.bearer())
            .json(&json!({ "place": "Busan" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["place"], "Busan");
    }

    #[tokio::test]
    async fn test_update_rejects_protected_fields() {
        let app = spawn_app().await;
        let alice = seed_user(&app, "alice").await;
        let bob = seed_user(&app, "bob").await;
        let meetup_id = seed_meetup(&app, &alice).await;

        let response = app
            .server
            .put(&format!("/meetup/{}", meetup_id))
            .add_header(auth(), alice.bearer())
            .json(&json!({ "organizer_id": bob.id() }))
            .await;
        assert!(response.status_code().is_client_error());

        app.server
            .put(&format!("/meetup/{}", meetup_id))
            .add_header(auth(), alice.bearer())
            .json(&json!({}))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let app = spawn_app().await;
        let alice = seed_user(&app, "alice").await;
        let bob = seed_user(&app, "bob").await;
        let meetup_id = seed_meetup(&app, &alice).await;
        let proposal_id = seed_proposal(&app, meetup_id, &bob, "hi").await;

        app.server
            .delete(&format!("/meetup/{}", meetup_id))
            .add_header(auth(), bob.bearer())
            .await
            .assert_status_forbidden();

        app.server
            .delete(&format!("/meetup/{}", meetup_id))
            .add_header(auth(), alice.bearer())
            .await
            .assert_status(StatusCode::NO_CONTENT);

        app.server
            .get(&format!("/meetup/{}/member", meetup_id))
            .add_header(auth(), alice.bearer())
            .await
            .assert_status_not_found();

        app.server
            .delete(&format!("/proposal/{}", proposal_id))
            .add_header(auth(), bob.bearer())
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_like_toggles() {
        let app = spawn_app().await;
        let alice = seed_user(&app, "alice").await;
        let bob = seed_user(&app, "bob").await;
        let meetup_id = seed_meetup(&app, &alice).await;

        let liked: Value = app
            .server
            .post(&format!("/meetup/{}/like", meetup_id))
            .add_header(auth(), bob.bearer())
            .await
            .json();
        assert_eq!(liked["is_like"], true);
        assert_eq!(liked["like_count"], 1);

        let unliked: Value = app
            .server
            .post(&format!("/meetup/{}/like", meetup_id))
            .add_header(auth(), bob.bearer())
            .await
            .json();
        assert_eq!(unliked["is_like"], false);
        assert_eq!(unliked["like_count"], 0);

        app.server
            .post("/meetup/999/like")
            .add_header(auth(), bob.bearer())
            .await
            .assert_status_not_found();
    }
}
