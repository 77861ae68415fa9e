use mozaik_client::{
    open_share, AnalysisRequest, CryptoProvider, EncapsulatedShares, PartyKeys, RsaPublicKey,
    RustCryptoProvider, Share,
};

pub const PRIVATE_KEYS: [&str; 3] = [
    include_str!("../fixtures/party_key_1.pem"),
    include_str!("../fixtures/party_key_2.pem"),
    include_str!("../fixtures/party_key_3.pem"),
];

pub const PUBLIC_KEYS: [&str; 3] = [
    include_str!("../fixtures/party_pub_1.pem"),
    include_str!("../fixtures/party_pub_2.pem"),
    include_str!("../fixtures/party_pub_3.pem"),
];

pub const OPENSSL_OAEP_CIPHERTEXT: &str = include_str!("../fixtures/openssl_oaep_label_ct.hex");
pub const SEALED_RESULT: &str = include_str!("../fixtures/sealed_result.hex");

pub const USER_ID: &str = "4d14750e-2353-4d30-ac2b-e893818076d2";
pub const ANALYSIS_TYPE: &str = "Heartbeat-Demo-1";
pub const DEVICE_KEY: [u8; 16] = [
    0x12, 0x23, 0x34, 0x45, 0x56, 0x67, 0x78, 0x89, 0x9a, 0xab, 0xbc, 0xcd, 0xde, 0xef, 0xf0, 0x01,
];

pub fn ten_timestamps() -> Vec<String> {
    (0..10)
        .map(|s| format!("2024-01-24T12:00:{:02}", s))
        .collect()
}

pub fn public_keys() -> [RsaPublicKey; 3] {
    PUBLIC_KEYS.map(|pem| RustCryptoProvider::public_key_from_pem(pem).unwrap())
}

pub async fn party(index: usize) -> PartyKeys<RustCryptoProvider> {
    let private = RustCryptoProvider::private_key_from_pem(PRIVATE_KEYS[index]).unwrap();
    let own = private.to_public_key();
    PartyKeys::new(&RustCryptoProvider, index, private, &own, &public_keys())
        .await
        .unwrap()
}

/// Every party opens its own share.
pub async fn open_all(request: &AnalysisRequest, shares: &EncapsulatedShares) -> [Share; 3] {
    let mut opened = Vec::with_capacity(3);
    for index in 0..3 {
        let party = party(index).await;
        let share = open_share(&RustCryptoProvider, &party, request, shares.get(index).unwrap())
            .await
            .unwrap();
        opened.push(share);
    }
    opened.try_into().unwrap()
}

pub async fn import_key(raw: &[u8]) -> <RustCryptoProvider as CryptoProvider>::SecretKey {
    RustCryptoProvider.import_secret_key(raw).await.unwrap()
}
