use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewQueue,
    ManageBookings,
    UpdateStatus,
    ManageCatalog,
    ManageTherapists,
    EditConfig,
    ViewReports,
}

const STAFF_CAPABILITIES: &[Capability] = &[
    Capability::ViewQueue,
    Capability::ManageBookings,
    Capability::UpdateStatus,
];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewQueue,
    Capability::ManageBookings,
    Capability::UpdateStatus,
    Capability::ManageCatalog,
    Capability::ManageTherapists,
    Capability::EditConfig,
    Capability::ViewReports,
];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Admin => ADMIN_CAPABILITIES,
            Role::Staff => STAFF_CAPABILITIES,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}
