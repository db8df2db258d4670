use anyhow::Result;
use serde_json::{json, Value};

use carelink::authz::PermissionEvaluator;
use carelink::models::permission::Action;
use carelink::models::user::UserData;
use carelink::navigation::{screen_catalog, select_dashboard, Dashboard, Destination, EntryScreen, Screen};

fn land(payload: Value) -> Result<Destination> {
    let user = UserData::from_value(payload)?;
    Ok(select_dashboard(Some(&user)))
}

#[test]
fn no_user_lands_on_login() {
    assert_eq!(select_dashboard(None), Destination::Entry(EntryScreen::Login));
    assert_eq!(select_dashboard(None).route_name(), "Login");
}

#[test]
fn each_role_has_its_dashboard() -> Result<()> {
    let cases = [
        ("super_admin", Dashboard::SuperAdmin),
        ("admin", Dashboard::Admin),
        ("care_manager", Dashboard::CareManager),
        ("relative", Dashboard::Relative),
        ("driver", Dashboard::Driver),
        ("staff", Dashboard::Staff),
    ];
    for (role, expected) in cases {
        assert_eq!(land(json!({"effective_role": role}))?, Destination::Dashboard(expected), "{role}");
    }
    Ok(())
}

#[test]
fn driver_job_title_routes_staff_to_driver_dashboard() -> Result<()> {
    let senior = land(json!({"effective_role": "staff", "staff": {"staff_role": "Senior Driver"}}))?;
    assert_eq!(senior, Destination::Dashboard(Dashboard::Driver));
    assert_eq!(senior.route_name(), "DriverDashboard");

    let carer = land(json!({"effective_role": "staff", "staff": {"staff_role": "Carer"}}))?;
    assert_eq!(carer, Destination::Dashboard(Dashboard::Staff));
    Ok(())
}

#[test]
fn router_reads_the_wider_role_chain() -> Result<()> {
    // nested user.role beats userType and top-level role
    let nested = land(json!({"user": {"role": "care_manager"}, "userType": "staff", "role": "admin"}))?;
    assert_eq!(nested, Destination::Dashboard(Dashboard::CareManager));

    let top_level = land(json!({"role": "admin"}))?;
    assert_eq!(top_level, Destination::Dashboard(Dashboard::Admin));

    let effective_wins = land(json!({"effective_role": "relative", "user": {"role": "admin"}}))?;
    assert_eq!(effective_wins, Destination::Dashboard(Dashboard::Relative));

    let unknown = land(json!({"effective_role": "janitor"}))?;
    assert_eq!(unknown, Destination::Dashboard(Dashboard::Staff));
    Ok(())
}

#[test]
fn entry_flow_is_linear() {
    assert_eq!(EntryScreen::Login.next(), EntryScreen::ForgotPassword);
    assert_eq!(EntryScreen::ForgotPassword.next(), EntryScreen::VerifyResetCode);
    assert_eq!(EntryScreen::VerifyResetCode.next(), EntryScreen::ResetPassword);
    assert_eq!(EntryScreen::ResetPassword.next(), EntryScreen::Login);
}

#[test]
fn catalog_route_names_resolve_back() {
    let specs: Vec<_> = screen_catalog().collect();
    assert_eq!(specs.len(), 23);
    for spec in specs {
        assert_eq!(Screen::from_route_name(spec.route_name), Some(spec.screen));
    }
    assert_eq!(Screen::from_route_name("NoSuchScreen"), None);
}

#[test]
fn only_profile_and_settings_receive_logout() {
    let receivers: Vec<_> = screen_catalog()
        .filter(|spec| spec.receives_logout)
        .map(|spec| spec.screen)
        .collect();
    assert_eq!(receivers, vec![Screen::Profile, Screen::Settings]);
}

#[test]
fn privileged_controls_follow_permissions() -> Result<()> {
    let user = UserData::from_value(json!({
        "effective_role": "staff",
        "permissions": {
            "clients": {"view": true, "create": false, "edit": true, "delete": false}
        }
    }))?;
    let eval = PermissionEvaluator::new(&user);

    assert!(Screen::ClientList.spec().visible_controls(&eval).is_empty());
    assert_eq!(Screen::ClientDetails.spec().visible_controls(&eval), vec![Action::Edit]);
    assert!(Screen::StaffDetails.spec().visible_controls(&eval).is_empty());
    Ok(())
}
