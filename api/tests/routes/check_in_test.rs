#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::helpers::{Seed, bearer, make_test_app, send};

    #[tokio::test]
    async fn face_check_in_succeeds_with_enrolled_embedding() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let token = seed.open_lesson(&app, 2, "standard").await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(Seed::check_in_body(&seed.alice, &token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Check-in successful");
        assert_eq!(json["data"]["class_id"], seed.class.id);
        assert_eq!(json["data"]["lesson_id"], "L01");
        assert_eq!(json["data"]["method"], "qr_face");

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(Seed::check_in_body(&seed.alice, &token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Already checked in");
    }

    #[tokio::test]
    async fn wrong_face_is_rejected_with_similarity() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let token = seed.open_lesson(&app, 2, "standard").await;

        // Bob's embedding is orthogonal to Alice's.
        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(json!({
                "session_token": token,
                "nfc_value": seed.alice.nfc_id,
                "face_embedding": seed.bob.face_embedding.0,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("0.0%"), "{message}");
        assert!(message.contains("40.0%"), "{message}");
    }

    #[tokio::test]
    async fn missing_face_and_wrong_card_are_bad_requests() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let token = seed.open_lesson(&app, 2, "standard").await;
        let auth = bearer(&seed.alice);

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&auth),
            Some(json!({ "session_token": token, "nfc_value": seed.alice.nfc_id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Face data is required for this level");

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&auth),
            Some(Seed::check_in_body(&seed.bob, &token)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "NFC card does not match the registered card");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(Seed::check_in_body(&seed.alice, "00000000")),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Session not found or expired");
    }

    #[tokio::test]
    async fn exam_roster_is_enforced() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let (status, json) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&bearer(&seed.teacher)),
            Some(json!({ "exam_id": seed.exam.id, "level": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let token = json["data"]["session_token"].as_str().unwrap().to_owned();

        let (status, _) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.bob)),
            Some(Seed::check_in_body(&seed.bob, &token)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(Seed::check_in_body(&seed.alice, &token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["exam_id"], seed.exam.id);
        assert_eq!(json["data"]["method"], "nfc_loc");
    }

    #[tokio::test]
    async fn validate_answers_ready_then_conflict() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let token = seed.open_lesson(&app, 2, "standard").await;
        let auth = bearer(&seed.alice);

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in/validate",
            Some(&auth),
            Some(json!({ "session_token": token })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["outcome"], "ready");
        assert_eq!(json["data"]["requires_face"], true);

        send(&app, "POST", "/api/check-in", Some(&auth), Some(Seed::check_in_body(&seed.alice, &token))).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in/validate",
            Some(&auth),
            Some(json!({ "session_token": token })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["outcome"], "blocked");
    }
}
