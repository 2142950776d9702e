mod common;

use linkvault::error::AppError;

#[tokio::test]
async fn test_concurrent_refresh_has_one_winner() {
    let state = common::create_test_state();
    let (_, tokens) = state
        .auth_service
        .register("alice", "alice@example.com", common::TEST_PASSWORD)
        .await
        .unwrap();

    let refresh = tokens.refresh.token;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let auth = state.auth_service.clone();
        let token = refresh.clone();
        handles.push(tokio::spawn(async move {
            auth.refresh(Some(&token)).await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(pair) => winners.push(pair),
            Err(err) => assert!(matches!(err, AppError::Unauthorized { .. })),
        }
    }

    assert_eq!(winners.len(), 1);

    // Only the winner's token continues the session.
    let next = state
        .auth_service
        .refresh(Some(&winners[0].refresh.token))
        .await;
    assert!(next.is_ok());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let state = common::create_test_state();
    let (user, registered) = state
        .auth_service
        .register("alice", "alice@example.com", common::TEST_PASSWORD)
        .await
        .unwrap();

    let user_id = state
        .session_service
        .verify_access_token(&registered.access.token)
        .unwrap();
    assert_eq!(user_id, user.id);

    let logged_in = state
        .auth_service
        .login("alice@example.com", common::TEST_PASSWORD)
        .await
        .unwrap();

    // Login replaced the registration session.
    assert!(
        state
            .auth_service
            .refresh(Some(&registered.refresh.token))
            .await
            .is_err()
    );

    let refreshed = state
        .auth_service
        .refresh(Some(&logged_in.refresh.token))
        .await
        .unwrap();

    state.auth_service.logout(user.id).await.unwrap();

    let err = state
        .auth_service
        .refresh(Some(&refreshed.refresh.token))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { .. }));

    let current = state.auth_service.current_user(user.id).await.unwrap();
    assert!(!current.has_active_session());
}

#[tokio::test]
async fn test_tokens_are_not_interchangeable() {
    let state = common::create_test_state();
    let (_, tokens) = state
        .auth_service
        .register("alice", "alice@example.com", common::TEST_PASSWORD)
        .await
        .unwrap();

    assert!(
        state
            .session_service
            .verify_access_token(&tokens.refresh.token)
            .is_err()
    );
    assert!(
        state
            .auth_service
            .refresh(Some(&tokens.access.token))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_oversized_refresh_lifetime_fails_cleanly() {
    let mut config = common::test_config();
    config.refresh_token_expiry = linkvault::config::parse_duration("100000000000d").unwrap();

    assert!(config.validate().is_err());

    // Skipping validation must still not bring the runtime down.
    let state = linkvault::AppState::in_memory(&config).unwrap();
    let auth = state.auth_service.clone();
    let outcome = tokio::spawn(async move {
        auth.register("alice", "alice@example.com", common::TEST_PASSWORD)
            .await
            .map(|_| ())
    })
    .await;

    let result = outcome.expect("registration task panicked");
    assert!(matches!(result, Err(AppError::Internal { .. })));
}
