/// Every variant means the same thing to a caller: the state could not be verified.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("state is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("ciphertext too short")]
    TooShort,
    #[error("state key could not be constructed")]
    InvalidKey,
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed")]
    Decryption,
    #[error("state claims are malformed: {0}")]
    Claims(#[from] serde_json::Error),
    #[error("state has expired")]
    Expired,
    #[error("state was issued in the future")]
    NotYetValid,
    #[error("state has already been used")]
    Replayed,
}
