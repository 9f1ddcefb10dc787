use tallyhub_domain::{DepartmentEntry, GrantFlag, NavigationPage, NavigationSection, User};
use tracing::debug;

/// Rule that settled an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// No session user; everything is denied.
    NoUser,
    /// Super-admin role bypass.
    SuperAdmin,
    /// Authoritative permission grant lookup.
    PermissionGrant,
    /// Legacy home-department or view-list match.
    LegacyDepartment,
    /// No grant configured; access is allowed for backward compatibility.
    Unconfigured,
}

impl AccessRule {
    /// Returns a stable rule name for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoUser => "no_user",
            Self::SuperAdmin => "super_admin",
            Self::PermissionGrant => "permission_grant",
            Self::LegacyDepartment => "legacy_department",
            Self::Unconfigured => "unconfigured",
        }
    }
}

/// Outcome of one access query together with the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether access is allowed.
    pub allowed: bool,
    /// Rule that produced the outcome.
    pub rule: AccessRule,
}

impl AccessDecision {
    fn new(allowed: bool, rule: AccessRule) -> Self {
        Self { allowed, rule }
    }
}

/// Stateless navigation access resolver.
///
/// Every query is an ordered rule ladder evaluated from scratch; the first
/// matching rule decides. Nothing is cached between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessResolver;

impl AccessResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns whether the user may see a module.
    #[must_use]
    pub fn can_access_module(&self, user: Option<&User>, module_id: &str) -> bool {
        let decision = self.module_decision(user, module_id);
        debug!(
            module_id,
            allowed = decision.allowed,
            rule = decision.rule.as_str(),
            "resolved module access"
        );
        decision.allowed
    }

    /// Returns whether the user may see a sub-module.
    ///
    /// Independent of the parent module; use [`Self::filter_pages`] for the
    /// composed module-and-sub-module check.
    #[must_use]
    pub fn can_access_sub_module(&self, user: Option<&User>, sub_module_id: &str) -> bool {
        let decision = self.sub_module_decision(user, sub_module_id);
        debug!(
            sub_module_id,
            allowed = decision.allowed,
            rule = decision.rule.as_str(),
            "resolved sub-module access"
        );
        decision.allowed
    }

    /// Returns whether the user may see a department-keyed section.
    #[must_use]
    pub fn can_access_department(
        &self,
        user: Option<&User>,
        department_key: &str,
        module_id: &str,
    ) -> bool {
        let decision = self.department_decision(user, department_key, module_id);
        debug!(
            department_key,
            module_id,
            allowed = decision.allowed,
            rule = decision.rule.as_str(),
            "resolved department access"
        );
        decision.allowed
    }

    /// Returns whether the user may see a top-level section.
    #[must_use]
    pub fn can_access_section(&self, user: Option<&User>, section: &NavigationSection) -> bool {
        self.can_access_module(user, section.module_id().as_str())
    }

    /// Returns whether the user may see a department entry.
    #[must_use]
    pub fn can_access_department_entry(
        &self,
        user: Option<&User>,
        department: &DepartmentEntry,
    ) -> bool {
        self.can_access_department(
            user,
            department.department_key().as_str(),
            department.section().module_id().as_str(),
        )
    }

    /// Returns whether the "Departments" header should be shown at all.
    #[must_use]
    pub fn has_any_department_access<S>(
        &self,
        user: Option<&User>,
        department_module_ids: &[S],
    ) -> bool
    where
        S: AsRef<str>,
    {
        if user.is_some_and(|user| user.role().is_super_admin()) {
            return true;
        }

        let Some(user) = user else {
            return false;
        };

        if user.granted_modules().is_some() {
            return department_module_ids
                .iter()
                .any(|module_id| self.can_access_module(Some(user), module_id.as_ref()));
        }

        true
    }

    /// Returns the pages of a module section visible to the user.
    ///
    /// A disabled module hides every page. Inside an enabled module, mapped
    /// pages follow their sub-module flag and unmapped pages are always kept.
    #[must_use]
    pub fn filter_pages(
        &self,
        user: Option<&User>,
        pages: &[NavigationPage],
        module_id: &str,
    ) -> Vec<NavigationPage> {
        let Some(user) = user else {
            return Vec::new();
        };

        if user.role().is_super_admin() || user.granted_modules().is_none() {
            return pages.to_vec();
        }

        if !self.can_access_module(Some(user), module_id) {
            return Vec::new();
        }

        pages
            .iter()
            .filter(|page| {
                page.sub_module_id().is_none_or(|sub_module_id| {
                    self.can_access_sub_module(Some(user), sub_module_id)
                })
            })
            .cloned()
            .collect()
    }

    /// Resolves module access and reports the deciding rule.
    #[must_use]
    pub fn module_decision(&self, user: Option<&User>, module_id: &str) -> AccessDecision {
        let Some(user) = user else {
            return AccessDecision::new(false, AccessRule::NoUser);
        };

        if user.role().is_super_admin() {
            return AccessDecision::new(true, AccessRule::SuperAdmin);
        }

        if let Some(modules) = user.granted_modules() {
            let enabled = modules.get(module_id).is_some_and(GrantFlag::is_enabled);
            return AccessDecision::new(enabled, AccessRule::PermissionGrant);
        }

        AccessDecision::new(true, AccessRule::Unconfigured)
    }

    /// Resolves sub-module access and reports the deciding rule.
    #[must_use]
    pub fn sub_module_decision(&self, user: Option<&User>, sub_module_id: &str) -> AccessDecision {
        let Some(user) = user else {
            return AccessDecision::new(false, AccessRule::NoUser);
        };

        if user.role().is_super_admin() {
            return AccessDecision::new(true, AccessRule::SuperAdmin);
        }

        if let Some(sub_modules) = user.granted_sub_modules() {
            let enabled = sub_modules.get(sub_module_id).copied().unwrap_or(false);
            return AccessDecision::new(enabled, AccessRule::PermissionGrant);
        }

        AccessDecision::new(true, AccessRule::Unconfigured)
    }

    /// Resolves department access and reports the deciding rule.
    #[must_use]
    pub fn department_decision(
        &self,
        user: Option<&User>,
        department_key: &str,
        module_id: &str,
    ) -> AccessDecision {
        let Some(user) = user else {
            return AccessDecision::new(false, AccessRule::NoUser);
        };

        if user.role().is_super_admin() {
            return AccessDecision::new(true, AccessRule::SuperAdmin);
        }

        if user.granted_modules().is_some() {
            return self.module_decision(Some(user), module_id);
        }

        let key = department_key.to_lowercase();
        let home_match = user
            .department()
            .is_some_and(|department| department.to_lowercase() == key);
        let view_list_match = user
            .legacy_viewable_departments()
            .iter()
            .any(|department| department.to_lowercase() == key);

        AccessDecision::new(home_match || view_list_match, AccessRule::LegacyDepartment)
    }
}

#[cfg(test)]
mod tests;
