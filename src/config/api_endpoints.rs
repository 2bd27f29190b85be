//! Backend endpoint table
//!
//! Every path the gateway calls on the external leasing backend lives here,
//! with `:param` placeholders filled by [`replace_url_params`].

pub mod auth {
    pub const LOGIN: &str = "/users/login";
    pub const ADD_USER: &str = "/users/addNewUser";
    pub const GET_USER_BY_ID: &str = "/users/getUserById/:id";
    pub const UPDATE_USER_BY_ID: &str = "/users/updateUserById/:id";
    pub const GET_ALL_USERS: &str = "/users/getAllUsers";
}

pub mod otp {
    /// POST - create user, validate GST, send OTP
    pub const SIGNUP: &str = "/signup";
    /// POST - verify OTP and activate account
    pub const VERIFY: &str = "/verify_OTP";
    /// GET - resend OTP, `mail` query parameter
    pub const RESEND: &str = "/resend-otp";
}

pub mod lease_request {
    pub const CREATE: &str = "/lease-requests/new-Lease-Request";
    pub const GET_BY_ID: &str = "/lease-requests/:id";
    pub const UPDATE: &str = "/lease-requests/:id";
    pub const UPDATE_STATUS: &str = "/lease-requests/:id/status";
    pub const GET_BY_COMPANY: &str = "/lease-requests/company/:companyId";
    pub const GET_PENDING_FOR_VENDOR: &str = "/lease-requests/pending/vendor/:vendorId";
    pub const GET_ALL: &str = "/lease-requests/all";
}

pub mod quotation {
    pub const CREATE: &str = "/quotations/new-Quotation";
    pub const GET_BY_ID: &str = "/quotations/:id";
    pub const GET_BY_VENDOR: &str = "/quotations/vendor/:vendorId";
    pub const GET_BY_COMPANY: &str = "/quotations/company/:companyId";
    pub const APPROVE: &str = "/quotations/:id/approve";
    pub const REJECT: &str = "/quotations/:id/reject";
    pub const DOWNLOAD_PDF: &str = "/quotations/:id/pdf";
}

pub mod vehicle {
    /// GET - registry lookup, `regNo` and `ownerName` query parameters
    pub const LOOKUP: &str = "/vehicle/addVehicle";
    pub const SAVE: &str = "/vehicle/saveVehicle";
    pub const GET_BY_VENDOR: &str = "/vendor/:id/vehicles";
}

/// Replace `:name` placeholders with URL-encoded values.
///
/// `replace_url_params("/users/getUserById/:id", &[("id", "123")])` gives
/// `/users/getUserById/123`.
pub fn replace_url_params(path: &str, params: &[(&str, &str)]) -> String {
    path.split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .and_then(|name| params.iter().find(|(key, _)| *key == name))
                .map(|(_, value)| urlencoding::encode(value).into_owned())
                .unwrap_or_else(|| segment.to_string())
        })
        .collect::<Vec<_>>()
        .join("/")
}
