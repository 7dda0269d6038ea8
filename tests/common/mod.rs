use authcode_core::{AccessToken, AuthorizationCode, Client, CodeRedemption};
use authcode_ports::Storage;

/// A minimal contract test suite that every `Storage` backend must satisfy.
///
/// Shared by the bare in-memory registries and the observed wrapper around them.
pub async fn run_storage_contract(storage: &dyn Storage) -> Result<(), Box<dyn std::error::Error>> {
    storage.healthcheck().await?;

    // Client roundtrip
    let client = Client::new(
        "client_1".to_string(),
        "secret".to_string(),
        vec!["http://localhost/cb".to_string()],
    );
    storage.save_client(&client).await?;

    let fetched = storage
        .get_client("client_1")
        .await?
        .ok_or_else(|| std::io::Error::other("client should exist"))?;
    assert_eq!(fetched.client_id, client.client_id);
    assert_eq!(fetched.redirect_uris, client.redirect_uris);

    // Saving the same client_id twice must fail rather than overwrite.
    let dup = storage.save_client(&client).await;
    assert!(dup.is_err(), "saving the same client_id twice should fail");

    // Authorization codes: a mismatch never consumes, single-use exchange does.
    let code = AuthorizationCode::new(
        "code000001".to_string(),
        client.client_id.clone(),
        "http://localhost/cb".to_string(),
    );
    storage.save_authorization_code(&code).await?;
    assert!(storage.save_authorization_code(&code).await.is_err());

    let mismatch = storage
        .exchange_authorization_code(
            "code000001",
            "other_client",
            CodeRedemption::SingleUse,
            &AccessToken::new("token0000000000000000".to_string(), "other_client".to_string()),
        )
        .await?;
    assert!(mismatch.is_none());
    assert!(storage.get_token("token0000000000000000").await?.is_none());
    assert_eq!(storage.stats().await?.authorization_codes, 1);

    let reused = storage
        .exchange_authorization_code(
            "code000001",
            "client_1",
            CodeRedemption::Reusable,
            &AccessToken::new("token0000000000000001".to_string(), client.client_id.clone()),
        )
        .await?
        .ok_or_else(|| std::io::Error::other("reusable exchange should succeed"))?;
    assert_eq!(reused.client_id, "client_1");
    assert_eq!(storage.stats().await?.authorization_codes, 1);

    // A colliding token fails the exchange without consuming the code.
    let collision = storage
        .exchange_authorization_code(
            "code000001",
            "client_1",
            CodeRedemption::SingleUse,
            &AccessToken::new("token0000000000000001".to_string(), client.client_id.clone()),
        )
        .await;
    assert!(collision.is_err_and(|e| e.is_duplicate_key()));
    assert_eq!(storage.stats().await?.authorization_codes, 1);

    let consumed = storage
        .exchange_authorization_code(
            "code000001",
            "client_1",
            CodeRedemption::SingleUse,
            &AccessToken::new("token0000000000000002".to_string(), client.client_id.clone()),
        )
        .await?;
    assert!(consumed.is_some());
    assert_eq!(storage.stats().await?.authorization_codes, 0);

    // Direct token inserts never overwrite.
    let token = AccessToken::new("token0000000000000003".to_string(), client.client_id.clone());
    storage.save_token(&token).await?;
    assert!(storage.save_token(&token).await.is_err());

    let fetched_token = storage
        .get_token("token0000000000000001")
        .await?
        .ok_or_else(|| std::io::Error::other("token should exist"))?;
    assert_eq!(fetched_token.client_id, "client_1");
    assert!(storage.get_token("garbage-token").await?.is_none());

    let stats = storage.stats().await?;
    assert_eq!(stats.clients, 1);
    assert_eq!(stats.authorization_codes, 0);
    assert_eq!(stats.access_tokens, 3);

    Ok(())
}
