//! Gateway in backend mode, with wiremock standing in for the leasing backend.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lease_portal::{create_router, AppState, EnvironmentConfig};

const BACKEND_TOKEN: &str = "backend-issued-token";

async fn gateway(server: &MockServer) -> Router {
    let config = EnvironmentConfig {
        backend_base_url: server.uri(),
        use_backend_api: true,
        backend_timeout_secs: 5,
        ..EnvironmentConfig::default()
    };
    create_router(AppState::new(config).await.expect("backend state"))
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn call_json(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = call(app, method, uri, token, body).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn mount_login(server: &MockServer, id: i64, role: &str) {
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": BACKEND_TOKEN,
            "user": { "id": id, "name": "Acme Leasing", "mail": "ops@acme.in", "companyName": "Acme Leasing" },
            "userRole": role,
            "userName": "Acme Leasing"
        })))
        .mount(server)
        .await;
}

fn lease_request_record(company_id: i64, status: &str) -> Value {
    json!({
        "id": 5,
        "vehicleType": "SEDAN",
        "leaseDuration": 12,
        "minBudget": 20000,
        "maxBudget": 30000,
        "companyId": company_id,
        "status": status
    })
}

/// Quotation 9 answering lease request 5, as older backend builds return it
fn quotation_without_company() -> Value {
    json!({
        "id": 9,
        "quoteDate": "2024-03-01",
        "validUntil": "2024-03-31",
        "leaseRequestId": 5,
        "vendorId": 2,
        "itemDescription": "Sedan",
        "quantity": 1,
        "unitPrice": 1000,
        "taxPercent": 18,
        "terms": "Net 30",
        "status": "pending"
    })
}

async fn mount_quotation_and_request(server: &MockServer, owner: i64) {
    Mock::given(method("GET"))
        .and(path("/quotations/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quotation_without_company()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lease-requests/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lease_request_record(owner, "pending")))
        .mount(server)
        .await;
}

async fn login(app: &Router) -> String {
    let (status, body) = call_json(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ops@acme.in", "password": "Secret@123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_keeps_the_backend_token() {
    let server = MockServer::start().await;
    mount_login(&server, 3, "COMPANY").await;
    let app = gateway(&server).await;

    let token = login(&app).await;
    assert_eq!(token, BACKEND_TOKEN);

    let (status, me) = call_json(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["role"], "company");
    assert_eq!(me["data"]["email"], "ops@acme.in");
}

#[tokio::test]
async fn lease_request_message_is_passed_through() {
    let server = MockServer::start().await;
    mount_login(&server, 3, "company").await;
    Mock::given(method("POST"))
        .and(path("/lease-requests/new-Lease-Request"))
        .and(header_eq("authorization", format!("Bearer {}", BACKEND_TOKEN).as_str()))
        .and(body_partial_json(json!({
            "vehicleType": "SEDAN",
            "companyId": 3,
            "preferredModel": "",
            "additionalRequirements": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Lease request created successfully"))
        .expect(1)
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/lease-requests",
        Some(&token),
        Some(json!({ "vehicleType": "SEDAN", "leaseDuration": 12, "minBudget": 10000, "maxBudget": 15000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Lease request created successfully");
    assert_eq!(body["data"]["companyId"], 3);
}

#[tokio::test]
async fn backend_error_message_is_verbatim() {
    let server = MockServer::start().await;
    mount_login(&server, 3, "company").await;
    Mock::given(method("GET"))
        .and(path("/lease-requests/company/3"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "Company not found for id 3" })))
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let (status, body) = call_json(&app, Method::GET, "/api/lease-requests/company/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Company not found for id 3");
}

#[tokio::test]
async fn backend_401_clears_the_session() {
    let server = MockServer::start().await;
    mount_login(&server, 3, "company").await;
    Mock::given(method("GET"))
        .and(path("/lease-requests/company/3"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let (status, _) = call_json(&app, Method::GET, "/api/lease-requests/company/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call_json(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn backend_403_keeps_the_session() {
    let server = MockServer::start().await;
    mount_login(&server, 3, "company").await;
    Mock::given(method("GET"))
        .and(path("/quotations/company/3"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let (status, _) = call_json(&app, Method::GET, "/api/quotations/company/3", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call_json(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn double_approval_never_reaches_the_backend() {
    let server = MockServer::start().await;
    mount_login(&server, 3, "company").await;
    Mock::given(method("GET"))
        .and(path("/quotations/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "quotationNumber": "QT-20240301-0042",
            "quoteDate": "2024-03-01",
            "validUntil": "2024-03-31",
            "leaseRequestId": 5,
            "vendorId": 2,
            "companyId": 3,
            "itemDescription": "Sedan",
            "quantity": 1,
            "unitPrice": 1000,
            "taxPercent": 18,
            "terms": "Net 30",
            "status": "ACCEPTED"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/quotations/9/approve"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let (status, _) = call_json(&app, Method::PUT, "/api/quotations/9/approve", Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn quotation_list_is_searched_and_paged() {
    let server = MockServer::start().await;
    mount_login(&server, 2, "vendor").await;
    let quotations: Vec<Value> = (1..=7)
        .map(|i| {
            json!({
                "id": i,
                "quoteDate": "2024-03-01",
                "validUntil": "2099-03-31",
                "leaseRequestId": 100 + i,
                "vendorId": 2,
                "vendorName": if i % 2 == 0 { "Prime Motors" } else { "City Cars" },
                "itemDescription": "Hatchback",
                "quantity": 1,
                "unitPrice": 500,
                "taxPercent": 0,
                "terms": "Net 30",
                "status": if i == 1 { "approved" } else { "pending" }
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/quotations/vendor/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quotations))
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let (status, body) = call_json(
        &app,
        Method::GET,
        "/api/quotations/vendor/2?search=city&status=pending&page=1&perPage=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = &body["data"];
    assert_eq!(page["totalItems"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["items"][0]["id"], 3);
    assert_eq!(page["items"][0]["expired"], false);
}

#[tokio::test]
async fn registry_response_is_normalized() {
    let server = MockServer::start().await;
    mount_login(&server, 2, "vendor").await;
    Mock::given(method("GET"))
        .and(path("/vehicle/addVehicle"))
        .and(query_param("regNo", "MH12DE1433"))
        .and(query_param("ownerName", "Ravi Kumar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "maker": "Honda",
                "model": "City",
                "isFinanced": true,
                "seatingCapacity": 5,
                "color": "",
                "chassisNumber": "MAKGM1234",
                "insurer": null
            }
        })))
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let (status, body) = call_json(
        &app,
        Method::GET,
        "/api/vehicles/lookup?regNo=mh-12-de-1433&ownerName=Ravi%20Kumar",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let details = &body["data"];
    assert_eq!(details["registrationNumber"], "MH12DE1433");
    assert_eq!(details["make"], "Honda");
    assert_eq!(details["isFinanced"], "Yes");
    assert_eq!(details["seatingCapacity"], "5");
    assert_eq!(details["chasisNumber"], "MAKGM1234");
    assert_eq!(details["color"], Value::Null);
    assert_eq!(details["insuranceCompany"], Value::Null);
}

#[tokio::test]
async fn quotation_pdf_bytes_pass_through() {
    let server = MockServer::start().await;
    mount_login(&server, 3, "company").await;
    mount_quotation_and_request(&server, 3).await;
    let pdf = b"%PDF-1.4 quotation".to_vec();
    Mock::given(method("GET"))
        .and(path("/quotations/9/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pdf.clone()))
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let request = Request::builder()
        .uri("/api/quotations/9/pdf")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"quotation-9.pdf\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.to_vec(), pdf);
}

#[tokio::test]
async fn other_companies_are_refused_when_the_record_has_no_company() {
    let server = MockServer::start().await;
    mount_login(&server, 4, "company").await;
    mount_quotation_and_request(&server, 3).await;
    Mock::given(method("GET"))
        .and(path("/quotations/9/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/quotations/9/approve"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let (status, _) = call(&app, Method::GET, "/api/quotations/9", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, Method::GET, "/api/quotations/9/pdf", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, Method::PUT, "/api/quotations/9/approve", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn submitted_quotation_names_the_request_owner() {
    let server = MockServer::start().await;
    mount_login(&server, 2, "vendor").await;
    Mock::given(method("GET"))
        .and(path("/lease-requests/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lease_request_record(3, "pending")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/quotations/new-Quotation"))
        .and(body_partial_json(json!({ "leaseRequestId": 5, "companyId": 3, "vendorId": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Quotation submitted successfully"))
        .expect(1)
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let form = json!({
        "leaseRequestId": 5,
        "companyId": 503,
        "quoteDate": "2024-03-01",
        "validUntil": "2024-03-31",
        "itemDescription": "Sedan",
        "quantity": 1,
        "unitPrice": 1000,
        "taxPercent": 18,
        "terms": "Net 30"
    });
    let (status, body) = call_json(&app, Method::POST, "/api/quotations", Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["companyId"], 3);
}

#[tokio::test]
async fn closed_request_is_not_quoted() {
    let server = MockServer::start().await;
    mount_login(&server, 2, "vendor").await;
    Mock::given(method("GET"))
        .and(path("/lease-requests/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lease_request_record(3, "REJECTED")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/quotations/new-Quotation"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = gateway(&server).await;
    let token = login(&app).await;

    let form = json!({
        "leaseRequestId": 5,
        "quoteDate": "2024-03-01",
        "validUntil": "2024-03-31",
        "itemDescription": "Sedan",
        "quantity": 1,
        "unitPrice": 1000,
        "taxPercent": 18,
        "terms": "Net 30"
    });
    let (status, _) = call(&app, Method::POST, "/api/quotations", Some(&token), Some(form)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn otp_resend_uses_mail_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OTP sent to your email"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/resend-otp"))
        .and(query_param("mail", "asha@fleet.in"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OTP resent"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify_OTP"))
        .and(body_partial_json(json!({ "mail": "asha@fleet.in", "otp": "482913" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Account verified"))
        .expect(1)
        .mount(&server)
        .await;
    let app = gateway(&server).await;

    let signup = json!({
        "role": "vendor",
        "firstName": "Asha",
        "lastName": "Rao",
        "email": "asha@fleet.in",
        "companyName": "Fleet Co",
        "password": "Secret@123",
        "confirmPassword": "Secret@123"
    });
    let (status, _) = call_json(&app, Method::POST, "/api/auth/signup", None, Some(signup)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/resend-otp",
        None,
        Some(json!({ "email": "asha@fleet.in" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP resent");

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/verify-otp",
        None,
        Some(json!({ "email": "asha@fleet.in", "role": "vendor", "otp": "482913" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account verified");
}
