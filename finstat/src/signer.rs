use sha2::{Digest, Sha256};

/// Compute the `Hash` query parameter the Finstat API uses to authenticate a request.
///
/// The layout of the hashed string is fixed by the API and validated server-side.
pub fn sign_request(api_key: &str, private_key: &str, ico: &str) -> String {
    let payload = format!("SomeSalt+{}+{}++{}+ended", api_key, private_key, ico);

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}
