#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::helpers::{Seed, bearer, make_test_app, send};

    #[tokio::test]
    async fn student_sees_own_lesson_history() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
        let token = seed.open_lesson(&app, 1, "standard").await;
        send(
            &app,
            "POST",
            "/api/check-in",
            Some(&bearer(&seed.alice)),
            Some(Seed::check_in_body(&seed.alice, &token)),
        )
        .await;

        let uri = format!("/api/me/classes/{}/attendance", seed.class.id);

        let (status, json) = send(&app, "GET", &uri, Some(&bearer(&seed.alice)), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["lesson_id"], "L01");
        assert_eq!(json["data"][0]["status"], "present");

        let (_, json) = send(&app, "GET", &uri, Some(&bearer(&seed.bob)), None).await;
        assert_eq!(json["data"][0]["status"], "not_checked");
    }

    #[tokio::test]
    async fn unknown_class_is_not_found() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;

        let (status, _) = send(&app, "GET", "/api/me/classes/777/attendance", Some(&bearer(&seed.alice)), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
