//! End-to-end tests of the gateway router running against the local store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use lease_portal::repositories::local_accounts::PendingSignup;
use lease_portal::store::local_store::PENDING_SIGNUPS_KEY;
use lease_portal::{create_router, AppState, EnvironmentConfig};

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let state = AppState::new(EnvironmentConfig::local()).await.expect("local state");
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
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

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    /// Returns (token, user id)
    async fn login(&self, email: &str, password: &str) -> (String, i64) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_i64().unwrap(),
        )
    }

    /// Lease request raised by the test company, returning its id
    async fn open_lease_request(&self, company: &str, company_id: i64) -> i64 {
        self.send(Method::POST, "/api/lease-requests", Some(company), Some(lease_request_body()))
            .await;
        let (_, list) = self
            .get(&format!("/api/lease-requests/company/{}", company_id), company)
            .await;
        list["data"][0]["id"].as_i64().unwrap()
    }

    /// A second company account, added by the admin
    async fn other_company(&self) -> (String, i64) {
        let (admin, _) = self.login("admin@leaseright.com", "Admin@123").await;
        let (status, _) = self
            .send(
                Method::POST,
                "/api/users",
                Some(&admin),
                Some(json!({
                    "name": "Orbit Logistics",
                    "email": "fleet@orbit.in",
                    "password": "Orbit@1234",
                    "role": "company",
                    "companyName": "Orbit Logistics"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.login("fleet@orbit.in", "Orbit@1234").await
    }
}

fn lease_request_body() -> Value {
    json!({
        "vehicleType": "SUV",
        "preferredModel": "Innova Crysta",
        "leaseDuration": 24,
        "minBudget": 20000,
        "maxBudget": 35000,
        "additionalRequirements": "Diesel, white"
    })
}

fn quotation_body(lease_request_id: i64) -> Value {
    let today = Utc::now().date_naive();
    json!({
        "leaseRequestId": lease_request_id,
        "quoteDate": today.to_string(),
        "validUntil": (today + Duration::days(30)).to_string(),
        "itemDescription": "Toyota Innova Crysta, 24 month lease",
        "quantity": 2,
        "unitPrice": 1500.50,
        "taxPercent": 18,
        "terms": "Monthly billing, net 30"
    })
}

#[tokio::test]
async fn health_reports_local_mode() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["mode"], "local");
}

#[tokio::test]
async fn requests_without_a_session_are_unauthorized() {
    let app = TestApp::new().await;
    let (status, _) = app.send(Method::GET, "/api/lease-requests", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/lease-requests", "not-a-session").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "company@test.com", "password": "Wrong@123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password. Please try again.");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new().await;
    let (token, _) = app.login("company@test.com", "Test@123").await;

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "company");

    let (status, _) = app.send(Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn budget_ordering_is_checked_before_saving() {
    let app = TestApp::new().await;
    let (token, company_id) = app.login("company@test.com", "Test@123").await;

    let mut body = lease_request_body();
    body["minBudget"] = json!(50000);
    let (status, response) = app
        .send(Method::POST, "/api/lease-requests", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response["message"],
        "Minimum budget cannot be greater than maximum budget"
    );

    let (_, list) = app
        .get(&format!("/api/lease-requests/company/{}", company_id), &token)
        .await;
    assert_eq!(list["data"], json!([]));
}

#[tokio::test]
async fn vendors_cannot_create_lease_requests() {
    let app = TestApp::new().await;
    let (token, _) = app.login("vendor@test.com", "Test@123").await;
    let (status, _) = app
        .send(Method::POST, "/api/lease-requests", Some(&token), Some(lease_request_body()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn lease_request_to_approved_quotation() {
    let app = TestApp::new().await;
    let (company, company_id) = app.login("company@test.com", "Test@123").await;
    let (vendor, vendor_id) = app.login("vendor@test.com", "Test@123").await;

    let (status, created) = app
        .send(Method::POST, "/api/lease-requests", Some(&company), Some(lease_request_body()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["companyId"], company_id);

    let (_, list) = app
        .get(&format!("/api/lease-requests/company/{}", company_id), &company)
        .await;
    let request = &list["data"][0];
    let request_id = request["id"].as_i64().unwrap();
    assert_eq!(request["status"], "pending");

    let (_, open) = app
        .get(&format!("/api/lease-requests/pending/vendor/{}", vendor_id), &vendor)
        .await;
    assert_eq!(open["data"].as_array().unwrap().len(), 1);

    let mut bad_dates = quotation_body(request_id);
    bad_dates["validUntil"] = bad_dates["quoteDate"].clone();
    let (status, response) = app
        .send(Method::POST, "/api/quotations", Some(&vendor), Some(bad_dates))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Valid Until date must be after the Quotation Date");

    let (status, quotation) = app
        .send(Method::POST, "/api/quotations", Some(&vendor), Some(quotation_body(request_id)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let quotation = &quotation["data"];
    assert!(quotation["quotationNumber"].as_str().unwrap().starts_with("QT-"));
    assert!((quotation["total"].as_f64().unwrap() - 3541.18).abs() < 1e-9);
    assert_eq!(quotation["expired"], false);
    let quotation_id = quotation["id"].as_i64().unwrap();

    let (_, open) = app
        .get(&format!("/api/lease-requests/pending/vendor/{}", vendor_id), &vendor)
        .await;
    assert_eq!(open["data"], json!([]));

    let (status, _) = app
        .send(Method::PUT, &format!("/api/quotations/{}/approve", quotation_id), Some(&vendor), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, page) = app
        .get(&format!("/api/quotations/company/{}?status=pending", company_id), &company)
        .await;
    assert_eq!(page["data"]["totalItems"], 1);

    let (status, approved) = app
        .send(Method::PUT, &format!("/api/quotations/{}/approve", quotation_id), Some(&company), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["data"]["status"], "approved");

    let (status, _) = app
        .send(Method::PUT, &format!("/api/quotations/{}/reject", quotation_id), Some(&company), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, stats) = app
        .get(&format!("/api/lease-requests/company/{}/stats", company_id), &company)
        .await;
    assert_eq!(stats["data"], json!({ "total": 1, "pending": 0, "approved": 1, "rejected": 0 }));

    let (_, dashboard) = app.get("/api/dashboard/company", &company).await;
    assert_eq!(dashboard["data"]["quotations"]["approved"], 1);
}

#[tokio::test]
async fn vendor_response_closes_a_lease_request() {
    let app = TestApp::new().await;
    let (company, company_id) = app.login("company@test.com", "Test@123").await;
    let (vendor, _) = app.login("vendor@test.com", "Test@123").await;

    app.send(Method::POST, "/api/lease-requests", Some(&company), Some(lease_request_body()))
        .await;
    let (_, list) = app
        .get(&format!("/api/lease-requests/company/{}", company_id), &company)
        .await;
    let id = list["data"][0]["id"].as_i64().unwrap();

    let update = json!({ "status": "rejected", "vendorResponse": "No SUVs available" });
    let (status, body) = app
        .send(Method::PUT, &format!("/api/lease-requests/{}/status", id), Some(&vendor), Some(update.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vendorResponse"], "No SUVs available");

    let (status, _) = app
        .send(Method::PUT, &format!("/api/lease-requests/{}/status", id), Some(&vendor), Some(update))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(Method::PUT, &format!("/api/lease-requests/{}", id), Some(&company), Some(lease_request_body()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn companies_cannot_read_each_others_requests() {
    let app = TestApp::new().await;
    let (company, company_id) = app.login("company@test.com", "Test@123").await;
    let (status, _) = app
        .get(&format!("/api/lease-requests/company/{}", company_id + 100), &company)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn vehicle_lookup_and_save() {
    let app = TestApp::new().await;
    let (vendor, vendor_id) = app.login("vendor@test.com", "Test@123").await;

    let (status, body) = app.get("/api/vehicles/lookup?regNo=KA01AB1234", &vendor).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Registration number and owner name are required.");

    let (status, body) = app
        .get("/api/vehicles/lookup?regNo=ka-01-ab-1234&ownerName=Ravi%20Kumar", &vendor)
        .await;
    assert_eq!(status, StatusCode::OK);
    let details = body["data"].clone();
    assert_eq!(details["registrationNumber"], "KA01AB1234");
    assert_eq!(details["make"], "Toyota");
    assert_eq!(details["licensePlate"], "KA01AB1234");

    let (status, _) = app
        .send(Method::POST, "/api/vehicles", Some(&vendor), Some(details))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, saved) = app
        .get(&format!("/api/vehicles/vendor/{}", vendor_id), &vendor)
        .await;
    assert_eq!(saved["data"].as_array().unwrap().len(), 1);
    assert_eq!(saved["data"][0]["vendorId"], vendor_id);
}

#[tokio::test]
async fn pdf_download_checks_the_caller_first() {
    let app = TestApp::new().await;
    let (company, company_id) = app.login("company@test.com", "Test@123").await;
    let (vendor, _) = app.login("vendor@test.com", "Test@123").await;
    let (outsider, _) = app.other_company().await;

    let request_id = app.open_lease_request(&company, company_id).await;
    let (_, quotation) = app
        .send(Method::POST, "/api/quotations", Some(&vendor), Some(quotation_body(request_id)))
        .await;
    let pdf = format!("/api/quotations/{}/pdf", quotation["data"]["id"].as_i64().unwrap());

    let (status, _) = app.get(&pdf, &outsider).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&pdf, &company).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn quotation_is_addressed_to_the_request_owner() {
    let app = TestApp::new().await;
    let (company, company_id) = app.login("company@test.com", "Test@123").await;
    let (vendor, _) = app.login("vendor@test.com", "Test@123").await;
    let (outsider, outsider_id) = app.other_company().await;

    let request_id = app.open_lease_request(&company, company_id).await;
    let mut body = quotation_body(request_id);
    body["companyId"] = json!(outsider_id);
    let (status, created) = app
        .send(Method::POST, "/api/quotations", Some(&vendor), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["companyId"], company_id);
    let quotation_id = created["data"]["id"].as_i64().unwrap();

    let (_, page) = app
        .get(&format!("/api/quotations/company/{}", company_id), &company)
        .await;
    assert_eq!(page["data"]["totalItems"], 1);

    let (status, _) = app
        .send(Method::PUT, &format!("/api/quotations/{}/approve", quotation_id), Some(&outsider), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn closed_lease_requests_take_no_quotations() {
    let app = TestApp::new().await;
    let (company, company_id) = app.login("company@test.com", "Test@123").await;
    let (vendor, _) = app.login("vendor@test.com", "Test@123").await;

    let request_id = app.open_lease_request(&company, company_id).await;
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/lease-requests/{}/status", request_id),
            Some(&vendor),
            Some(json!({ "status": "rejected" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::POST, "/api/quotations", Some(&vendor), Some(quotation_body(request_id)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, page) = app
        .get(&format!("/api/quotations/company/{}", company_id), &company)
        .await;
    assert_eq!(page["data"]["totalItems"], 0);
}

#[tokio::test]
async fn bharat_series_plates_are_looked_up() {
    let app = TestApp::new().await;
    let (vendor, _) = app.login("vendor@test.com", "Test@123").await;

    let (status, body) = app
        .get("/api/vehicles/lookup?regNo=22%20BH%201234%20AA&ownerName=Ravi", &vendor)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["registrationNumber"], "22BH1234AA");
}

#[tokio::test]
async fn otp_signup_creates_an_account() {
    let app = TestApp::new().await;
    let signup = json!({
        "role": "vendor",
        "firstName": "Asha",
        "lastName": "Rao",
        "email": "asha@fleet.in",
        "companyName": "Fleet Co",
        "password": "Secret@123",
        "confirmPassword": "Secret@123"
    });
    let (status, body) = app
        .send(Method::POST, "/api/auth/signup", None, Some(signup))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP sent to your email");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/verify-otp",
            None,
            Some(json!({ "email": "asha@fleet.in", "role": "company", "otp": "123456" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "OTP session expired. Please sign up again.");

    let (status, _) = app
        .send(Method::POST, "/api/auth/resend-otp", None, Some(json!({ "email": "asha@fleet.in" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let store = app.state.local_store.clone().unwrap();
    let pending: Vec<PendingSignup> = store.get_list(PENDING_SIGNUPS_KEY).await.unwrap();
    let otp = pending[0].otp.clone();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/verify-otp",
            None,
            Some(json!({ "email": "asha@fleet.in", "role": "vendor", "otp": otp })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP verified successfully! Account created.");

    let (token, _) = app.login("asha@fleet.in", "Secret@123").await;
    let (_, me) = app.get("/api/auth/me", &token).await;
    assert_eq!(me["data"]["role"], "vendor");
}

#[tokio::test]
async fn admin_manages_users() {
    let app = TestApp::new().await;
    let (admin, _) = app.login("admin@leaseright.com", "Admin@123").await;
    let (company, company_id) = app.login("company@test.com", "Test@123").await;

    let (status, _) = app.get("/api/users", &company).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/users",
            Some(&admin),
            Some(json!({
                "name": "Prime Motors",
                "email": "ops@primemotors.in",
                "password": "Prime@1234",
                "role": "vendor",
                "companyName": "Prime Motors"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, dashboard) = app.get("/api/dashboard/admin", &admin).await;
    assert_eq!(
        dashboard["data"],
        json!({ "totalUsers": 4, "vendors": 2, "companies": 1, "admins": 1, "unverified": 0 })
    );

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/users/{}", company_id),
            Some(&company),
            Some(json!({ "contactNumber": "9876543210" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["contactNumber"], "9876543210");
}
