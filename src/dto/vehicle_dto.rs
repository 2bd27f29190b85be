use serde::{Deserialize, Serialize};

/// Registry lookup parameters, as the dashboards and the backend name them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLookupQuery {
    #[serde(default, alias = "registrationNumber")]
    pub reg_no: String,
    #[serde(default)]
    pub owner_name: String,
}
