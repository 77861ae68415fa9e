use mozaik_client::{
    combine_shares, create_analysis_request, protect, unprotect, Algorithm, AnalysisRequest,
    DeviceState, ProtocolError, RequestPayload, RustCryptoProvider, SharingMode,
};

use crate::common::{open_all, public_keys, ANALYSIS_TYPE, DEVICE_KEY, USER_ID};

#[tokio::test]
async fn parties_decrypt_uploads_with_reconstructed_key() {
    let mut state = DeviceState::new([0u8; 12], DEVICE_KEY);
    let readings: Vec<Vec<u8>> = (0u64..10).map(|i| (60 + i).to_le_bytes().to_vec()).collect();
    let uploads: Vec<Vec<u8>> = readings
        .iter()
        .map(|r| protect(USER_ID, &mut state, Algorithm::AesGcm128, r).unwrap())
        .collect();
    assert_eq!(state.used_nonces(), 10);

    let request = AnalysisRequest::new(
        USER_ID,
        ANALYSIS_TYPE,
        "AES-GCM-128",
        RequestPayload::DataIndices((0..10).collect()),
        SharingMode::RawKey,
    );
    let shares = create_analysis_request(&RustCryptoProvider, &request, &DEVICE_KEY, &public_keys())
        .await
        .unwrap();
    let key = combine_shares(&open_all(&request, &shares).await).unwrap();

    for (blob, reading) in uploads.iter().zip(&readings) {
        assert_eq!(&unprotect(USER_ID, &key, blob).unwrap(), reading);
    }
}

#[test]
fn upload_is_bound_to_user() {
    let mut state = DeviceState::new([7u8; 12], DEVICE_KEY);
    let blob = protect(USER_ID, &mut state, Algorithm::AesGcm128, b"72bpm").unwrap();
    assert!(matches!(
        unprotect("another-user", &DEVICE_KEY, &blob),
        Err(ProtocolError::AuthenticationFailed)
    ));
}
