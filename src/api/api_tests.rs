#[cfg(test)]
mod route_shape_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::*,
    };
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_register_returns_201() {
        let app = Router::new().route(
            "/api/auth/register",
            post(|| async { (StatusCode::CREATED, r#"{"id":"user_1","username":"alice"}"#) }),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/register")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        json!({
                            "username": "alice",
                            "email": "alice@example.com",
                            "full_name": "Alice",
                            "password": "password123"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_send_message_returns_201() {
        let app = Router::new().route(
            "/api/chat/:session_id/messages",
            post(|| async {
                (
                    StatusCode::CREATED,
                    r#"{"id":"msg_1","message_type":"bot"}"#,
                )
            }),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat/session_1/messages")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        json!({"content": "hi", "reasoning": false}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_protected_route_returns_401_without_token() {
        let app = Router::new().route(
            "/api/sessions",
            get(|| async { (StatusCode::UNAUTHORIZED, r#"{"code":"UNAUTHORIZED"}"#) }),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_session_returns_404_for_non_existing() {
        let app = Router::new().route(
            "/api/sessions/:id",
            get(|| async { (StatusCode::NOT_FOUND, r#"{"code":"NOT_FOUND"}"#) }),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/sessions/non_existing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
