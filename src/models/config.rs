use serde::{Deserialize, Serialize};

/// Singleton institution record. Exactly one logical instance exists; it is
/// created on first write and updated in place afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalConfig {
    pub name: String,
    pub logo: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for HospitalConfig {
    fn default() -> Self {
        Self {
            name: "Bharat Seva Hospital".to_string(),
            logo: "https://i.ibb.co/68Xk9wL/medical-logo.png".to_string(),
            address: "123, Health Avenue, New Delhi, India".to_string(),
            phone: "+91 98765 43210".to_string(),
            email: "contact@bharatsevahospital.in".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConfigRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
