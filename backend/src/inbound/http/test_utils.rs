//! Test helpers for inbound HTTP components.

use jsonwebtoken::{EncodingKey, Header, encode};

use super::identity::Claims;

/// Shared HS256 secret used by handler tests.
pub const TEST_JWT_SECRET: &[u8] = b"shipments-test-secret";

/// Sign `claims` with [`TEST_JWT_SECRET`].
pub fn encode_claims(claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("test claims encode")
}

/// Build an `Authorization` header value for the given user and role.
pub fn bearer_for(user_id: &str, role: Option<&str>) -> String {
    let token = encode_claims(&Claims {
        sub: user_id.to_owned(),
        role_code: role.map(str::to_owned),
        exp: None,
    });
    format!("Bearer {token}")
}
