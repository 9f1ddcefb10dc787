use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use tallyhub_core::AppResult;
use tallyhub_domain::{GrantFlag, ModuleSettings, NavigationPage, PermissionGrant, User};

use super::{AccessResolver, AccessRule};

fn employee() -> User {
    User::new("employee")
}

fn pages(entries: &[(&str, Option<&str>)]) -> AppResult<Vec<NavigationPage>> {
    entries
        .iter()
        .map(|(path, sub_module_id)| {
            NavigationPage::new(*path, *path, sub_module_id.map(ToOwned::to_owned))
        })
        .collect()
}

fn paths(pages: &[NavigationPage]) -> Vec<&str> {
    pages.iter().map(|page| page.path().as_str()).collect()
}

#[test]
fn missing_user_is_denied_everywhere() -> AppResult<()> {
    let resolver = AccessResolver::new();
    let section_pages = pages(&[("/a", None)])?;

    assert!(!resolver.can_access_module(None, "sales_dept"));
    assert!(!resolver.can_access_sub_module(None, "sales_quotes"));
    assert!(!resolver.can_access_department(None, "sales", "sales_dept"));
    assert!(!resolver.has_any_department_access(None, &["sales_dept"]));
    assert!(resolver.filter_pages(None, &section_pages, "sales_dept").is_empty());
    assert_eq!(
        resolver.module_decision(None, "sales_dept").rule,
        AccessRule::NoUser
    );
    Ok(())
}

#[test]
fn legacy_department_match_uses_home_department() {
    let resolver = AccessResolver::new();
    let user = employee().with_department("Sales");

    assert!(resolver.can_access_department(Some(&user), "sales", "sales_dept"));
    assert!(!resolver.can_access_department(Some(&user), "hr", "hr_dept"));
}

#[test]
fn legacy_department_match_uses_view_list() {
    let resolver = AccessResolver::new();
    let user = employee()
        .with_department("Sales")
        .with_legacy_viewable_departments(["Finance", "EXPORTS"]);

    assert!(resolver.can_access_department(Some(&user), "finance", "finance_dept"));
    assert!(resolver.can_access_department(Some(&user), "exports", "exports_dept"));
    assert!(!resolver.can_access_department(Some(&user), "purchase", "purchase_dept"));
    assert_eq!(
        resolver
            .department_decision(Some(&user), "finance", "finance_dept")
            .rule,
        AccessRule::LegacyDepartment
    );
}

#[test]
fn grant_overrides_home_department() {
    let resolver = AccessResolver::new();
    let user = employee().with_department("HR").with_permission_grant(
        PermissionGrant::default()
            .with_module("sales_dept", true)
            .with_module("hr_dept", false),
    );

    assert!(!resolver.can_access_module(Some(&user), "hr_dept"));
    assert!(!resolver.can_access_department(Some(&user), "hr", "hr_dept"));
    assert!(resolver.can_access_department(Some(&user), "sales", "sales_dept"));
}

#[test]
fn module_absent_from_grant_is_denied() {
    let resolver = AccessResolver::new();
    let user = employee()
        .with_permission_grant(PermissionGrant::default().with_module("sales_dept", true));

    assert!(!resolver.can_access_module(Some(&user), "administration"));
}

#[test]
fn present_but_empty_module_table_denies() {
    let resolver = AccessResolver::new();
    let user =
        employee().with_permission_grant(PermissionGrant::new(Some(Default::default()), None));

    assert!(!resolver.can_access_module(Some(&user), "company_hub"));
    assert!(!resolver.has_any_department_access(Some(&user), &["sales_dept", "hr_dept"]));
}

#[test]
fn loosely_spelled_super_admin_role_stays_bound_by_grant() {
    let resolver = AccessResolver::new();
    let empty_grant = PermissionGrant::new(Some(Default::default()), None);

    for role in [" SUPER_ADMIN ", "Super_Admin", "super_admin "] {
        let user = User::new(role).with_permission_grant(empty_grant.clone());
        assert!(!resolver.can_access_module(Some(&user), "hr_dept"));
        assert_eq!(
            resolver.module_decision(Some(&user), "hr_dept").rule,
            AccessRule::PermissionGrant
        );
    }
}

#[test]
fn detailed_flag_follows_enabled_field() {
    let resolver = AccessResolver::new();
    let user = employee().with_permission_grant(
        PermissionGrant::default()
            .with_module(
                "finance_dept",
                GrantFlag::Detailed(ModuleSettings {
                    enabled: true,
                    access_level: Some("read".to_owned()),
                }),
            )
            .with_module(
                "exports_dept",
                GrantFlag::Detailed(ModuleSettings {
                    enabled: false,
                    access_level: None,
                }),
            ),
    );

    assert!(resolver.can_access_module(Some(&user), "finance_dept"));
    assert!(!resolver.can_access_module(Some(&user), "exports_dept"));
}

#[test]
fn sub_module_access_is_independent_of_module_access() {
    let resolver = AccessResolver::new();
    let user = employee().with_permission_grant(
        PermissionGrant::default()
            .with_module("finance_dept", false)
            .with_sub_module("finance_payroll", true),
    );

    assert!(resolver.can_access_sub_module(Some(&user), "finance_payroll"));
    assert!(!resolver.can_access_sub_module(Some(&user), "finance_ledger"));
}

#[test]
fn super_admin_short_circuits_empty_department_list() {
    let resolver = AccessResolver::new();
    let user = User::new("super_admin");
    let no_modules: [&str; 0] = [];

    assert!(resolver.has_any_department_access(Some(&user), &no_modules));
}

#[test]
fn unconfigured_user_sees_departments_header() {
    let resolver = AccessResolver::new();
    let no_modules: [&str; 0] = [];

    assert!(resolver.has_any_department_access(Some(&employee()), &no_modules));
}

#[test]
fn filter_drops_disabled_sub_module_and_keeps_unmapped_page() -> AppResult<()> {
    let resolver = AccessResolver::new();
    let user = employee().with_permission_grant(
        PermissionGrant::default()
            .with_module("projects_dept", true)
            .with_sub_module("a1", false),
    );
    let section_pages = pages(&[("/a", Some("a1")), ("/b", None)])?;

    let visible = resolver.filter_pages(Some(&user), &section_pages, "projects_dept");
    assert_eq!(paths(&visible), vec!["/b"]);
    Ok(())
}

#[test]
fn filter_hides_every_page_of_disabled_module() -> AppResult<()> {
    let resolver = AccessResolver::new();
    let user = employee().with_permission_grant(
        PermissionGrant::default()
            .with_module("projects_dept", false)
            .with_sub_module("a1", true),
    );
    let section_pages = pages(&[("/a", Some("a1")), ("/b", None)])?;

    assert!(
        resolver
            .filter_pages(Some(&user), &section_pages, "projects_dept")
            .is_empty()
    );
    Ok(())
}

#[test]
fn filter_allows_mapped_pages_when_sub_module_table_is_absent() -> AppResult<()> {
    let resolver = AccessResolver::new();
    let user = employee()
        .with_permission_grant(PermissionGrant::default().with_module("projects_dept", true));
    let section_pages = pages(&[("/a", Some("a1")), ("/b", None)])?;

    let visible = resolver.filter_pages(Some(&user), &section_pages, "projects_dept");
    assert_eq!(paths(&visible), vec!["/a", "/b"]);
    Ok(())
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(_[a-z]{1,6})?"
}

fn grant() -> impl Strategy<Value = PermissionGrant> {
    (
        proptest::option::of(btree_map(identifier(), any::<bool>(), 0..6)),
        proptest::option::of(btree_map(identifier(), any::<bool>(), 0..6)),
    )
        .prop_map(|(modules, sub_modules)| {
            PermissionGrant::new(
                modules.map(|table| {
                    table
                        .into_iter()
                        .map(|(key, enabled)| (key, GrantFlag::from(enabled)))
                        .collect()
                }),
                sub_modules,
            )
        })
}

proptest! {
    #[test]
    fn super_admin_is_always_allowed(
        grant in grant(),
        module_id in identifier(),
        department_key in identifier(),
    ) {
        let resolver = AccessResolver::new();
        let user = User::new("super_admin").with_permission_grant(grant);

        prop_assert!(resolver.can_access_module(Some(&user), &module_id));
        prop_assert!(resolver.can_access_sub_module(Some(&user), &module_id));
        prop_assert!(resolver.can_access_department(Some(&user), &department_key, &module_id));
    }

    #[test]
    fn module_table_is_authoritative(
        table in btree_map(identifier(), any::<bool>(), 0..6),
        module_id in identifier(),
        department in identifier(),
        view_list in vec(identifier(), 0..4),
    ) {
        let resolver = AccessResolver::new();
        let expected = table.get(&module_id).copied().unwrap_or(false);
        let mut grant = PermissionGrant::default();
        for (key, enabled) in table {
            grant = grant.with_module(key, enabled);
        }
        let grant = if grant.modules().is_none() {
            PermissionGrant::new(Some(Default::default()), None)
        } else {
            grant
        };
        let user = employee()
            .with_department(department.clone())
            .with_legacy_viewable_departments(view_list)
            .with_permission_grant(grant);

        prop_assert_eq!(resolver.can_access_module(Some(&user), &module_id), expected);
        prop_assert_eq!(
            resolver.can_access_department(Some(&user), &department, &module_id),
            expected
        );
    }

    #[test]
    fn unconfigured_user_is_allowed_and_sees_all_pages(
        module_id in identifier(),
        sub_module_ids in vec(proptest::option::of(identifier()), 0..6),
    ) {
        let resolver = AccessResolver::new();
        let user = employee();
        let section_pages = sub_module_ids
            .into_iter()
            .enumerate()
            .map(|(index, sub_module_id)| {
                NavigationPage::new(format!("/p{index}"), "Page", sub_module_id)
            })
            .collect::<AppResult<Vec<_>>>();
        prop_assert!(section_pages.is_ok());
        let section_pages = section_pages.unwrap_or_default();

        prop_assert!(resolver.can_access_module(Some(&user), &module_id));
        prop_assert_eq!(
            resolver.filter_pages(Some(&user), &section_pages, &module_id),
            section_pages
        );
    }

    #[test]
    fn legacy_matching_ignores_case(
        department_key in "[a-z]{1,8}",
        uppercase_home in any::<bool>(),
        in_view_list in any::<bool>(),
    ) {
        let resolver = AccessResolver::new();
        let home = if uppercase_home {
            department_key.to_uppercase()
        } else {
            "unrelated-department".to_owned()
        };
        let view_list = if in_view_list {
            vec![department_key.to_uppercase()]
        } else {
            Vec::new()
        };
        let user = employee()
            .with_department(home)
            .with_legacy_viewable_departments(view_list);

        let lower = resolver.can_access_department(Some(&user), &department_key, "m");
        let upper = resolver.can_access_department(Some(&user), &department_key.to_uppercase(), "m");
        prop_assert_eq!(lower, upper);
        prop_assert_eq!(lower, uppercase_home || in_view_list);
    }

    #[test]
    fn queries_are_idempotent(
        grant in proptest::option::of(grant()),
        module_id in identifier(),
        department_key in identifier(),
    ) {
        let resolver = AccessResolver::new();
        let mut user = employee().with_department(department_key.clone());
        if let Some(grant) = grant {
            user = user.with_permission_grant(grant);
        }

        prop_assert_eq!(
            resolver.module_decision(Some(&user), &module_id),
            resolver.module_decision(Some(&user), &module_id)
        );
        prop_assert_eq!(
            resolver.sub_module_decision(Some(&user), &module_id),
            resolver.sub_module_decision(Some(&user), &module_id)
        );
        prop_assert_eq!(
            resolver.department_decision(Some(&user), &department_key, &module_id),
            resolver.department_decision(Some(&user), &department_key, &module_id)
        );
    }
}
