#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::helpers::{Seed, bearer, make_test_app, send};

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let (app, _) = make_test_app().await;

        let (status, json) = send(&app, "POST", "/api/sessions", None, Some(json!({}))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Authentication required");
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let (app, _) = make_test_app().await;

        let (status, _) = send(&app, "GET", "/api/me/classes/1/attendance", Some("Bearer nope"), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn students_cannot_manage_sessions() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&bearer(&seed.alice)),
            Some(json!({ "class_id": seed.class.id, "lesson_id": "L01", "level": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Teacher access required");
    }

    #[tokio::test]
    async fn teachers_cannot_check_in() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.teacher)),
            Some(json!({ "session_token": "ABCDEF12", "nfc_value": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Student access required");
    }
}
