use rand::rngs::OsRng;
use rand::RngCore;

/// Bytes of OS randomness behind each reset token (128 bits)
pub const RESET_TOKEN_BYTES: usize = 16;

/// What a successful reset request hands back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTicket {
    pub token: String,
    pub expires_at: u64,
}

/// Generate a fresh opaque reset token from the operating system CSPRNG
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// A token stops being valid at its expiry instant, not after it
pub fn is_expired(expires_at: u64, now_ms: u64) -> bool {
    now_ms >= expires_at
}
