#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::helpers::{Seed, bearer, make_test_app, send};

    #[tokio::test]
    async fn fresh_lesson_report_is_all_not_checked() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/reports/classes/{}/lessons/L01", seed.class.id),
            Some(&bearer(&seed.teacher)),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["total"], 2);
        assert_eq!(data["present"], 0);
        assert_eq!(data["absent"], 0);
        assert_eq!(data["not_checked"], 2);
        assert!(data["active_session"].is_null());
        for student in data["students"].as_array().unwrap() {
            assert_eq!(student["status"], "not_checked");
        }
    }

    #[tokio::test]
    async fn reinforced_round_shows_missing_in_report() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;
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

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/reports/classes/{}/lessons/L01", seed.class.id),
            Some(&bearer(&seed.teacher)),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["present"], 1);
        assert_eq!(json["data"]["missing"], 1);
        assert_eq!(json["data"]["active_session"]["mode"], "reinforced");
    }

    #[tokio::test]
    async fn exam_report_checks_supervisor_and_existence() {
        let (app, state) = make_test_app().await;
        let seed = Seed::new(&state).await;

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/reports/exams/{}", seed.exam.id),
            Some(&bearer(&seed.teacher)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/reports/exams/{}", seed.exam.id),
            Some(&bearer(&seed.other_teacher)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, "GET", "/api/reports/exams/9999", Some(&bearer(&seed.teacher)), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
