use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Stable role value that grants unconditional access.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// Role carried by the authenticated session.
///
/// The value is kept verbatim; only an exact `super_admin` bypasses access
/// checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Returns whether this role bypasses access checks.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.0 == SUPER_ADMIN_ROLE
    }

    /// Returns the stable role value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.0
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Extended module flag written by the permission admin tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSettings {
    /// Whether the module is switched on.
    pub enabled: bool,
    /// Optional access tier label; informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,
}

/// Module entry in a permission grant: a plain toggle or a settings object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrantFlag {
    /// Plain boolean toggle.
    Toggle(bool),
    /// Structured settings.
    Detailed(ModuleSettings),
}

impl GrantFlag {
    /// Returns whether the flag enables its module.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Toggle(enabled) => *enabled,
            Self::Detailed(settings) => settings.enabled,
        }
    }
}

impl From<bool> for GrantFlag {
    fn from(value: bool) -> Self {
        Self::Toggle(value)
    }
}

/// Explicitly configured module and sub-module flags for one user.
///
/// A present `modules` table is authoritative: anything missing from it is
/// denied and legacy department rules no longer apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modules: Option<BTreeMap<String, GrantFlag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_modules: Option<BTreeMap<String, bool>>,
}

impl PermissionGrant {
    /// Creates a grant from raw module and sub-module tables.
    #[must_use]
    pub fn new(
        modules: Option<BTreeMap<String, GrantFlag>>,
        sub_modules: Option<BTreeMap<String, bool>>,
    ) -> Self {
        Self {
            modules,
            sub_modules,
        }
    }

    /// Adds a module flag, creating the module table when absent.
    #[must_use]
    pub fn with_module(mut self, module_id: impl Into<String>, flag: impl Into<GrantFlag>) -> Self {
        self.modules
            .get_or_insert_with(BTreeMap::new)
            .insert(module_id.into(), flag.into());
        self
    }

    /// Adds a sub-module flag, creating the sub-module table when absent.
    #[must_use]
    pub fn with_sub_module(mut self, sub_module_id: impl Into<String>, enabled: bool) -> Self {
        self.sub_modules
            .get_or_insert_with(BTreeMap::new)
            .insert(sub_module_id.into(), enabled);
        self
    }

    /// Returns the module table, if configured.
    #[must_use]
    pub fn modules(&self) -> Option<&BTreeMap<String, GrantFlag>> {
        self.modules.as_ref()
    }

    /// Returns the sub-module table, if configured.
    #[must_use]
    pub fn sub_modules(&self) -> Option<&BTreeMap<String, bool>> {
        self.sub_modules.as_ref()
    }
}

/// Session user snapshot supplied by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    role: Role,
    #[serde(default)]
    department: Option<String>,
    #[serde(default, alias = "viewableDepartments")]
    legacy_viewable_departments: Vec<String>,
    #[serde(default)]
    permission_grant: Option<PermissionGrant>,
}

impl User {
    /// Creates a user with a role and no department or grant.
    #[must_use]
    pub fn new(role: impl Into<Role>) -> Self {
        Self {
            role: role.into(),
            department: None,
            legacy_viewable_departments: Vec::new(),
            permission_grant: None,
        }
    }

    /// Sets the home department.
    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Sets the additional departments visible under legacy rules.
    #[must_use]
    pub fn with_legacy_viewable_departments<I, S>(mut self, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legacy_viewable_departments = departments.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches an authoritative permission grant.
    #[must_use]
    pub fn with_permission_grant(mut self, grant: PermissionGrant) -> Self {
        self.permission_grant = Some(grant);
        self
    }

    /// Returns the session role.
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Returns the home department, if any.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Returns the legacy view list.
    #[must_use]
    pub fn legacy_viewable_departments(&self) -> &[String] {
        self.legacy_viewable_departments.as_slice()
    }

    /// Returns the permission grant, if configured.
    #[must_use]
    pub fn permission_grant(&self) -> Option<&PermissionGrant> {
        self.permission_grant.as_ref()
    }

    /// Returns the module table of the grant when one is configured.
    #[must_use]
    pub fn granted_modules(&self) -> Option<&BTreeMap<String, GrantFlag>> {
        self.permission_grant.as_ref().and_then(PermissionGrant::modules)
    }

    /// Returns the sub-module table of the grant when one is configured.
    #[must_use]
    pub fn granted_sub_modules(&self) -> Option<&BTreeMap<String, bool>> {
        self.permission_grant
            .as_ref()
            .and_then(PermissionGrant::sub_modules)
    }
}
