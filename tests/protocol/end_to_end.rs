use mozaik_client::{
    combine_shares, create_analysis_request, derive_result_params, reconstruct_result, seal_result,
    AnalysisRequest, ClientConfig, CompletionInfo, ProtocolError, RecipientKeys, RequestPayload,
    RustCryptoProvider, SharingMode,
};

use crate::common::{
    self, import_key, open_all, public_keys, ANALYSIS_TYPE, DEVICE_KEY, PUBLIC_KEYS, USER_ID,
};

// ============================================================================
// Helpers
// ============================================================================

fn point_request(mode: SharingMode) -> AnalysisRequest {
    let payload = RequestPayload::data_indices_from_iso(&common::ten_timestamps()).unwrap();
    AnalysisRequest::new(USER_ID, ANALYSIS_TYPE, "AES-GCM-128", payload, mode)
}

/// Computing side: seal `result` under the reconstructed device key.
async fn seal_as_parties(device_key: &[u8], computation_id: &str, result: &[u8]) -> Vec<u8> {
    let provider = RustCryptoProvider;
    let recipients = RecipientKeys::export(&provider, &public_keys()).await.unwrap();
    let info = CompletionInfo::new(USER_ID, computation_id, ANALYSIS_TYPE);
    let params = derive_result_params(&provider, &recipients, &info)
        .await
        .unwrap();
    let key = import_key(device_key).await;
    seal_result(&provider, &key, &params, result).await.unwrap()
}

// ============================================================================
// Full round: request, share opening, result
// ============================================================================

#[tokio::test]
async fn raw_key_round() {
    let request = point_request(SharingMode::RawKey);
    let shares = create_analysis_request(&RustCryptoProvider, &request, &DEVICE_KEY, &public_keys())
        .await
        .unwrap();

    let opened = open_all(&request, &shares).await;
    let key = combine_shares(&opened).unwrap();
    assert_eq!(key.as_slice(), &DEVICE_KEY);

    let sealed = seal_as_parties(&key, "computation-7", b"heartbeat-class:4").await;
    let info = CompletionInfo::new(USER_ID, "computation-7", ANALYSIS_TYPE);
    let result = reconstruct_result(&RustCryptoProvider, &DEVICE_KEY, &public_keys(), &info, &sealed)
        .await
        .unwrap();
    assert_eq!(result, b"heartbeat-class:4");
}

#[tokio::test]
async fn key_schedule_round() {
    let request = point_request(SharingMode::KeySchedule);
    let shares = create_analysis_request(&RustCryptoProvider, &request, &DEVICE_KEY, &public_keys())
        .await
        .unwrap();

    let opened = open_all(&request, &shares).await;
    assert!(opened.iter().all(|s| s.len() == 176));
    let schedule = combine_shares(&opened).unwrap();
    // The first round key is the cipher key itself.
    assert_eq!(&schedule[..16], &DEVICE_KEY);
    assert_eq!(
        hex::encode(&schedule[160..]),
        "f93d2ba6a03af83df6c24e974e063dab"
    );

    let sealed = seal_as_parties(&schedule[..16], "computation-8", b"heartbeat-class:1").await;
    let info = CompletionInfo::new(USER_ID, "computation-8", ANALYSIS_TYPE);
    let result = reconstruct_result(&RustCryptoProvider, &DEVICE_KEY, &public_keys(), &info, &sealed)
        .await
        .unwrap();
    assert_eq!(result, b"heartbeat-class:1");
}

#[tokio::test]
async fn streaming_round() {
    let payload =
        RequestPayload::streaming_range_from_iso("2024-01-24T12:00:00", "2024-01-24T12:00:09")
            .unwrap();
    assert_eq!(
        payload,
        RequestPayload::StreamingRange {
            start: 1_706_097_600_000,
            stop: 1_706_097_609_000
        }
    );
    let request = AnalysisRequest::new(
        USER_ID,
        ANALYSIS_TYPE,
        "AES-GCM-128",
        payload,
        SharingMode::KeySchedule,
    );
    let shares = create_analysis_request(&RustCryptoProvider, &request, &DEVICE_KEY, &public_keys())
        .await
        .unwrap();
    let opened = open_all(&request, &shares).await;
    assert_eq!(&combine_shares(&opened).unwrap()[..16], &DEVICE_KEY);
}

#[tokio::test]
async fn streaming_share_does_not_open_as_point_query() {
    // Both payloads encode the same two numbers; only the state tag differs.
    let range = AnalysisRequest::new(
        USER_ID,
        ANALYSIS_TYPE,
        "AES-GCM-128",
        RequestPayload::StreamingRange { start: 10, stop: 20 },
        SharingMode::RawKey,
    );
    let shares = create_analysis_request(&RustCryptoProvider, &range, &DEVICE_KEY, &public_keys())
        .await
        .unwrap();

    let mut point = range.clone();
    point.payload = RequestPayload::DataIndices(vec![10, 20]);
    let party = common::party(0).await;
    assert!(
        mozaik_client::open_share(&RustCryptoProvider, &party, &point, shares.get(0).unwrap())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn encapsulation_is_randomized() {
    let request = point_request(SharingMode::RawKey);
    let a = create_analysis_request(&RustCryptoProvider, &request, &DEVICE_KEY, &public_keys())
        .await
        .unwrap();
    let b = create_analysis_request(&RustCryptoProvider, &request, &DEVICE_KEY, &public_keys())
        .await
        .unwrap();
    assert_ne!(a, b);

    let first = open_all(&request, &a).await;
    let second = open_all(&request, &b).await;
    assert_ne!(first[0], second[0]);
    assert_eq!(
        combine_shares(&first).unwrap().as_slice(),
        combine_shares(&second).unwrap().as_slice()
    );
}

#[tokio::test]
async fn result_for_other_computation_is_rejected() {
    let sealed = seal_as_parties(&DEVICE_KEY, "computation-9", b"heartbeat-class:0").await;
    let info = CompletionInfo::new(USER_ID, "computation-10", ANALYSIS_TYPE);
    let err = reconstruct_result(&RustCryptoProvider, &DEVICE_KEY, &public_keys(), &info, &sealed)
        .await
        .unwrap_err();
    assert!(matches!(err, ProtocolError::AuthenticationFailed));
}

// ============================================================================
// Config-driven flow
// ============================================================================

#[tokio::test]
async fn config_driven_round() {
    let json = serde_json::json!({
        "sharing_mode": "raw-key",
        "recipients": PUBLIC_KEYS,
    })
    .to_string();
    let config = ClientConfig::from_json(&json).unwrap();
    let recipients = config.load_recipients().unwrap();

    let payload = RequestPayload::data_indices_from_iso(&common::ten_timestamps()).unwrap();
    let request = AnalysisRequest::new(
        USER_ID,
        ANALYSIS_TYPE,
        config.algorithm().unwrap().as_str(),
        payload,
        config.sharing_mode,
    );
    let shares = create_analysis_request(&RustCryptoProvider, &request, &DEVICE_KEY, &recipients)
        .await
        .unwrap();

    let mut opened = Vec::new();
    for (index, pem) in common::PRIVATE_KEYS.iter().enumerate() {
        let party = config.party_keys(index, pem).await.unwrap();
        opened.push(
            mozaik_client::open_share(
                &RustCryptoProvider,
                &party,
                &request,
                shares.get(index).unwrap(),
            )
            .await
            .unwrap(),
        );
    }
    let opened: [_; 3] = opened.try_into().unwrap();
    assert_eq!(combine_shares(&opened).unwrap().as_slice(), &DEVICE_KEY);
}
