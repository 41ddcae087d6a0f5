//! Bearer-token identity extraction for shipment handlers.
//!
//! Handlers take an [`IdentityContext`] argument; the extractor reads the
//! `Authorization` header, verifies the HS256 JWT with the shared
//! [`TokenVerifier`] and rejects every failure with `401 Unauthorized`.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Error, IdentityContext, Role, UserId};

const BEARER_SCHEME: &str = "bearer";

/// Claims carried by access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller user id as a UUID string.
    pub sub: String,
    /// Role label; absent means no privileges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_code: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Verifies HS256 access tokens against the configured secret.
///
/// `exp` is checked when the token carries it; tokens without expiry are
/// accepted.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier for HS256 tokens signed with `secret`.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Decode `token` into the caller's identity.
    ///
    /// # Errors
    ///
    /// Returns an `unauthorized` error when the signature, expiry or `sub`
    /// claim is invalid.
    pub fn verify(&self, token: &str) -> Result<IdentityContext, Error> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|err| {
            debug!(error = %err, "rejected bearer token");
            Error::unauthorized("invalid bearer token")
        })?;
        let Claims { sub, role_code, .. } = data.claims;
        let owner_id = UserId::new(&sub).map_err(|err| {
            debug!(error = %err, "rejected bearer token subject");
            Error::unauthorized("invalid token subject")
        })?;
        let role = role_code.map_or_else(Role::none, Role::new);
        Ok(IdentityContext::new(owner_id, role))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

fn identity_from_request(req: &HttpRequest) -> Result<IdentityContext, Error> {
    let verifier = req
        .app_data::<web::Data<TokenVerifier>>()
        .ok_or_else(|| Error::internal("token verifier is not configured"))?;
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = raw
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let token = bearer_token(value).ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    verifier.verify(token)
}

impl FromRequest for IdentityContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity_from_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{TEST_JWT_SECRET, bearer_for, encode_claims};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[fixture]
    fn verifier() -> TokenVerifier {
        TokenVerifier::new(TEST_JWT_SECRET)
    }

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("BEARER   abc  ", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer", None)]
    #[case("Bearer    ", None)]
    fn bearer_scheme_is_matched_case_insensitively(
        #[case] header: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(bearer_token(header), expected);
    }

    #[rstest]
    fn verify_accepts_token_with_role(verifier: TokenVerifier) {
        let token = encode_claims(&Claims {
            sub: USER_ID.to_owned(),
            role_code: Some("admin".to_owned()),
            exp: None,
        });

        let identity = verifier.verify(&token).expect("token verifies");
        assert_eq!(identity.owner_id().to_string(), USER_ID);
        assert_eq!(identity.role().as_str(), "admin");
    }

    #[rstest]
    fn missing_role_maps_to_empty_role(verifier: TokenVerifier) {
        let token = encode_claims(&Claims {
            sub: USER_ID.to_owned(),
            role_code: None,
            exp: None,
        });

        let identity = verifier.verify(&token).expect("token verifies");
        assert!(identity.role().is_empty());
    }

    #[rstest]
    #[case::bad_subject(Claims { sub: "not-a-uuid".to_owned(), role_code: None, exp: None })]
    #[case::expired(Claims { sub: USER_ID.to_owned(), role_code: None, exp: Some(1) })]
    fn invalid_claims_are_unauthorized(verifier: TokenVerifier, #[case] claims: Claims) {
        let err = verifier
            .verify(&encode_claims(&claims))
            .expect_err("claims rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn foreign_signature_is_unauthorized() {
        let token = encode_claims(&Claims {
            sub: Uuid::new_v4().to_string(),
            role_code: None,
            exp: None,
        });
        let err = TokenVerifier::new(b"another-secret")
            .verify(&token)
            .expect_err("signature rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    async fn whoami(identity: IdentityContext) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}|{}", identity.owner_id(), identity.role().as_str()))
    }

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some("Token abc".to_owned()), StatusCode::UNAUTHORIZED)]
    #[case(Some("Bearer garbage".to_owned()), StatusCode::UNAUTHORIZED)]
    #[case(Some(bearer_for(USER_ID, Some("clerk"))), StatusCode::OK)]
    #[actix_web::test]
    async fn extractor_maps_headers_to_status(
        verifier: TokenVerifier,
        #[case] authorization: Option<String>,
        #[case] expected: StatusCode,
    ) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(verifier))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let mut req = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = authorization {
            req = req.insert_header((header::AUTHORIZATION, value));
        }

        let res = actix_test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), expected);
        if expected == StatusCode::OK {
            let body = actix_test::read_body(res).await;
            assert_eq!(body.as_ref(), format!("{USER_ID}|clerk").as_bytes());
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_verifier_is_internal_error() {
        let app =
            actix_test::init_service(App::new().route("/whoami", web::get().to(whoami))).await;
        let req = actix_test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, bearer_for(USER_ID, None)))
            .to_request();

        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
