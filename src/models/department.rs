use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Symbolic icon name or emoji shown next to the department.
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartmentRequest {
    pub name: String,
    pub description: String,
    pub icon: String,
}
