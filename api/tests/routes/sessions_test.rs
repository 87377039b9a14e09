#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::helpers::{Seed, bearer, make_test_app, send};

    #[tokio::test]
    async fn open_returns_created_session() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&bearer(&seed.teacher)),
            Some(json!({ "class_id": seed.class.id, "lesson_id": "L01", "level": 2 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Check-in session opened");
        let data = &json["data"];
        assert_eq!(data["session_token"].as_str().unwrap().len(), 8);
        assert_eq!(data["level"], 2);
        assert_eq!(data["mode"], "standard");
        assert_eq!(data["status"], "open");
        assert_eq!(data["target"]["kind"], "class");
        assert_eq!(data["target"]["lesson_id"], "L01");
    }

    #[tokio::test]
    async fn open_rejects_bad_requests() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let auth = bearer(&seed.teacher);

        let (status, _) = send(&app, "POST", "/api/sessions", Some(&auth), Some(json!({ "level": 1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&auth),
            Some(json!({ "class_id": seed.class.id, "lesson_id": "L01", "level": 7 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&auth),
            Some(json!({ "class_id": seed.class.id, "lesson_id": "L42", "level": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Lesson not found in this class");
    }

    #[tokio::test]
    async fn open_by_other_teacher_is_forbidden() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&bearer(&seed.other_teacher)),
            Some(json!({ "exam_id": seed.exam.id, "level": 3 })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn extend_close_and_stats_round_trip() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let auth = bearer(&seed.teacher);
        let token = seed.open_lesson(&app, 1, "standard").await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(Seed::check_in_body(&seed.alice, &token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, "POST", &format!("/api/sessions/{token}/extend"), Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "open");

        let (status, json) = send(&app, "GET", &format!("/api/sessions/{token}/stats"), Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["data"]["active"], true);
        assert_eq!(json["data"]["recent_checkins"][0]["username"], "sv001");
        assert_eq!(json["data"]["recent_checkins"][0]["method"], "qr");

        let (status, json) = send(&app, "POST", &format!("/api/sessions/{token}/close"), Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["session"]["status"], "closed");

        let (status, json) = send(&app, "POST", &format!("/api/sessions/{token}/close"), Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Check-in session was already closed");
        assert!(json["data"]["reconciliation"].is_null());

        let (_, json) = send(&app, "GET", &format!("/api/sessions/{token}/stats"), Some(&auth), None).await;
        assert_eq!(json["data"]["active"], false);
        assert_eq!(json["data"]["count"], 1);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let auth = bearer(&seed.teacher);

        for path in ["extend", "close"] {
            let (status, _) = send(&app, "POST", &format!("/api/sessions/FFFFFFFF/{path}"), Some(&auth), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        }
        let (status, _) = send(&app, "GET", "/api/sessions/FFFFFFFF/stats", Some(&auth), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn closing_reinforced_round_reports_demotions() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let auth = bearer(&seed.teacher);

        let standard = seed.open_lesson(&app, 1, "standard").await;
        for student in [&seed.alice, &seed.bob] {
            let (status, _) = send(
                &app,
                "POST",
                "/api/check-in",
                Some(&bearer(student)),
                Some(Seed::check_in_body(student, &standard)),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let reinforced = seed.open_lesson(&app, 1, "reinforced").await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(Seed::check_in_body(&seed.alice, &reinforced)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, "POST", &format!("/api/sessions/{reinforced}/close"), Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["reconciliation"]["demoted"], json!([seed.bob.id]));
        assert_eq!(json["data"]["reconciliation"]["confirmed"], json!([seed.alice.id]));
    }

    #[tokio::test]
    async fn replacing_reinforced_round_demotes_before_next_round() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let auth = bearer(&seed.teacher);

        let standard = seed.open_lesson(&app, 1, "standard").await;
        for student in [&seed.alice, &seed.bob] {
            send(&app, "POST", "/api/check-in", Some(&bearer(student)), Some(Seed::check_in_body(student, &standard)))
                .await;
        }
        let reinforced = seed.open_lesson(&app, 1, "reinforced").await;
        send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(Seed::check_in_body(&seed.alice, &reinforced)),
        )
        .await;

        seed.open_lesson(&app, 1, "standard").await;

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/reports/classes/{}/lessons/L01", seed.class.id),
            Some(&auth),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["present"], 1);
        assert_eq!(json["data"]["absent"], 1);

        let (status, json) = send(&app, "POST", &format!("/api/sessions/{reinforced}/close"), Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Check-in session was already closed");
    }
}
