//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderName};
use actix_web::{App, HttpResponse, HttpServer, web};

use shipments::Trace;
use shipments::domain::{Error, TRACE_ID_HEADER};
#[cfg(debug_assertions)]
use shipments::doc::ApiDoc;
use shipments::inbound::http::health::{HealthState, live, ready};
use shipments::inbound::http::identity::TokenVerifier;
use shipments::inbound::http::shipments::{
    create_shipment, list_shipments, track_shipment, update_shipment_status,
};
use shipments::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    token_verifier: web::Data<TokenVerifier>,
    cors_allowed_origins: Arc<[String]>,
}

fn cors(origins: &[String]) -> Cors {
    origins.iter().fold(
        Cors::default()
            .allowed_methods(["GET", "POST", "PATCH", "OPTIONS"])
            .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers([header::LOCATION, HeaderName::from_static(TRACE_ID_HEADER)])
            .max_age(3600),
        |cors, origin| cors.allowed_origin(origin),
    )
}

/// Reject undecodable JSON bodies with the standard error envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    })
}

async fn route_not_found() -> Result<HttpResponse, Error> {
    Err(Error::not_found("resource not found"))
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        token_verifier,
        cors_allowed_origins,
    } = deps;

    let api = web::scope("/api/v1")
        .service(create_shipment)
        .service(list_shipments)
        .service(track_shipment)
        .service(update_shipment_status);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(token_verifier)
        .app_data(json_config())
        .wrap(cors(&cors_allowed_origins))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
        .default_service(web::to(route_not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The returned [`Server`] must be awaited to drive the listener. Readiness
/// is flagged once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        bind_addr,
        token_verifier,
        access_policy: _,
        db_pool: _,
        cors_allowed_origins,
    } = config;
    let token_verifier = web::Data::new(token_verifier);
    let cors_allowed_origins: Arc<[String]> = cors_allowed_origins.into();
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            token_verifier: token_verifier.clone(),
            cors_allowed_origins: cors_allowed_origins.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rstest::rstest;
    use serde_json::{Value, json};

    const SECRET: &[u8] = b"server-wiring-secret";
    const ALLOWED_ORIGIN: &str = "https://ops.example.com";

    fn dependencies() -> AppDependencies {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket address"),
            TokenVerifier::new(SECRET),
        );
        let health_state = HealthState::new();
        health_state.mark_ready();
        AppDependencies {
            health_state: web::Data::new(health_state),
            http_state: web::Data::new(build_http_state(&config)),
            token_verifier: web::Data::new(config.token_verifier),
            cors_allowed_origins: Arc::from(vec![ALLOWED_ORIGIN.to_owned()]),
        }
    }

    fn bearer() -> String {
        let token = encode(
            &Header::default(),
            &json!({"sub": "3fa85f64-5717-4562-b3fc-2c963f66afa6"}),
            &EncodingKey::from_secret(SECRET),
        )
        .expect("token encodes");
        format!("Bearer {token}")
    }

    #[rstest]
    #[actix_web::test]
    async fn fixture_backed_app_creates_shipments() {
        let app = actix_test::init_service(build_app(dependencies())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/shipments")
            .insert_header(("Authorization", bearer()))
            .set_json(json!({
                "senderName": "A",
                "senderAddress": "Addr A",
                "receiverName": "B",
                "receiverAddress": "Addr B",
                "itemDescription": "Box"
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().contains_key("trace-id"));
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["status"], "Created");
        assert_eq!(body["trackingNumber"].as_str().map(str::len), Some(25));
    }

    #[rstest]
    #[actix_web::test]
    async fn health_endpoints_are_mounted_without_auth() {
        let app = actix_test::init_service(build_app(dependencies())).await;

        for uri in ["/health/ready", "/health/live"] {
            let response =
                actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn shipment_routes_require_a_token() {
        let app = actix_test::init_service(build_app(dependencies())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/shipments").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn undecodable_json_uses_the_error_envelope() {
        let app = actix_test::init_service(build_app(dependencies())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/shipments")
            .insert_header(("Authorization", bearer()))
            .set_json(json!({"senderName": 5}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().contains_key("trace-id"));
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
        assert!(body["traceId"].is_string());
    }

    #[rstest]
    #[case("/api/v1/parcels")]
    #[case("/nowhere")]
    #[actix_web::test]
    async fn unknown_routes_are_json_not_found(#[case] uri: &str) {
        let app = actix_test::init_service(build_app(dependencies())).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "not_found");
    }

    #[rstest]
    #[actix_web::test]
    async fn preflight_from_configured_origin_is_allowed() {
        let app = actix_test::init_service(build_app(dependencies())).await;

        let request = actix_test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/v1/shipments")
            .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some(ALLOWED_ORIGIN)
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn unlisted_origin_gets_no_cors_grant() {
        let app = actix_test::init_service(build_app(dependencies())).await;

        let request = actix_test::TestRequest::get()
            .uri("/health/live")
            .insert_header((header::ORIGIN, "https://elsewhere.example.com"))
            .to_request();
        match actix_test::try_call_service(&app, request).await {
            Ok(response) => assert!(
                !response
                    .headers()
                    .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            ),
            Err(err) => assert_eq!(
                err.as_response_error().status_code(),
                StatusCode::BAD_REQUEST
            ),
        }
    }
}
