use anyhow::Result;
use serde_json::json;

use carelink::authz::{AuthzMode, HookState};
use carelink::errors::AppError;
use carelink::models::user::RecordId;
use carelink::session::{AUTH_TOKEN_KEY, USER_DATA_KEY};
use carelink::{MemorySessionStore, PermissionHook, SessionRepository, SessionRouter, SessionStore};

fn crud(view: bool, create: bool, edit: bool, delete: bool) -> serde_json::Value {
    json!({"view": view, "create": create, "edit": edit, "delete": delete})
}

async fn hook_with(user: Option<serde_json::Value>, mode: AuthzMode) -> Result<PermissionHook> {
    let store = MemorySessionStore::new();
    if let Some(user) = user {
        store.set(AUTH_TOKEN_KEY, "tok").await?;
        store.set(USER_DATA_KEY, &user.to_string()).await?;
    }
    Ok(PermissionHook::new(SessionRepository::new(store), mode))
}

#[tokio::test]
async fn defaults_before_load_are_conservative() -> Result<()> {
    let hook = hook_with(Some(json!({"effective_role": "super_admin"})), AuthzMode::Strict).await?;

    assert!(hook.loading());
    assert!(!hook.is_authenticated());
    assert!(!hook.can_view("clients"));
    assert!(!hook.is_admin());
    assert_eq!(hook.role(), "");
    assert_eq!(hook.role_name(), "guest");
    assert!(hook.route_scope().is_unscoped());
    assert!(hook.user().is_none());
    Ok(())
}

#[tokio::test]
async fn load_builds_evaluator_from_storage() -> Result<()> {
    let user = json!({
        "effective_role": "admin",
        "userType": "admin",
        "permissions": {
            "clients": crud(true, true, true, true),
            "staff": crud(true, false, false, false),
            "analytics": {"view": true}
        }
    });
    let hook = hook_with(Some(user), AuthzMode::Strict).await?;
    hook.load().await;

    assert!(!hook.loading());
    assert!(hook.is_authenticated());
    assert!(hook.is_admin());
    assert!(!hook.is_super_admin());
    assert_eq!(hook.role(), "admin");
    assert_eq!(hook.role_name(), "Administrator");
    assert!(hook.can_delete("clients"));
    assert!(hook.is_read_only("staff"));
    assert!(hook.can("analytics", "view"));
    assert!(!hook.can("analytics", "edit"));
    assert!(!hook.can_view("transport"));
    Ok(())
}

#[tokio::test]
async fn relative_gets_visits_and_logs_view_patch() -> Result<()> {
    let user = json!({
        "effective_role": "relative",
        "userType": "relative",
        "relative": {"relative_id": 5, "client_id": 7},
        "permissions": {
            "visits": crud(false, false, false, false),
            "logs": crud(false, false, false, false)
        }
    });
    let hook = hook_with(Some(user), AuthzMode::Strict).await?;
    hook.load().await;

    for resource in ["visits", "logs"] {
        assert!(hook.can_view(resource), "{resource} should be viewable");
        assert!(!hook.can_create(resource));
        assert!(!hook.can_edit(resource));
        assert!(!hook.can_delete(resource));
        assert!(hook.is_read_only(resource));
    }
    assert!(!hook.can_view("clients"));

    let scope = hook.route_scope();
    assert_eq!(scope.client_id, Some(RecordId::Int(7)));
    assert_eq!(scope.is_read_only, Some(true));
    Ok(())
}

#[tokio::test]
async fn patch_does_not_touch_persisted_payload() -> Result<()> {
    let store = std::sync::Arc::new(MemorySessionStore::new());
    let raw = json!({"effective_role": "relative", "permissions": {"visits": crud(false, false, false, false)}})
        .to_string();
    store.set(USER_DATA_KEY, &raw).await?;

    let hook = PermissionHook::new(SessionRepository::from_arc(store.clone()), AuthzMode::Strict);
    hook.load().await;
    assert!(hook.can_view("visits"));

    assert_eq!(store.get(USER_DATA_KEY).await?.as_deref(), Some(raw.as_str()));
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_payload_is_ready_without_permissions() -> Result<()> {
    let hook = hook_with(None, AuthzMode::Strict).await?;
    hook.load().await;
    assert!(!hook.loading());
    assert!(!hook.is_authenticated());
    assert!(matches!(hook.state(), HookState::Ready(None)));
    assert_eq!(hook.role_name(), "guest");

    let store = MemorySessionStore::new();
    store.set(USER_DATA_KEY, "definitely not json").await?;
    let hook = PermissionHook::new(SessionRepository::new(store), AuthzMode::Strict);
    hook.load().await;
    assert!(!hook.loading());
    assert!(!hook.is_authenticated());
    assert!(!hook.can_view("clients"));
    Ok(())
}

#[tokio::test]
async fn refresh_picks_up_new_session() -> Result<()> {
    let repo = SessionRepository::new(MemorySessionStore::new());
    let router = SessionRouter::new(repo.clone());
    let hook = PermissionHook::new(repo, AuthzMode::Strict);

    router.launch().await;
    hook.load().await;
    assert!(!hook.is_authenticated());

    let user = json!({"effective_role": "staff", "staff": {"staff_id": 11}, "permissions": {"logs": crud(true, true, false, false)}});
    assert!(router.login(Some("tok"), user).await);

    // the hook is an independent view and only sees the login after refresh
    assert!(!hook.is_authenticated());
    hook.refresh().await;
    assert!(hook.is_authenticated());
    assert!(hook.is_staff());
    assert!(hook.can_create("logs"));
    assert_eq!(hook.route_scope().staff_id, Some(RecordId::Int(11)));
    assert_eq!(hook.route_scope().filter_by_user, Some(true));

    router.logout().await;
    hook.refresh().await;
    assert!(!hook.loading());
    assert!(!hook.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn concurrent_refreshes_settle_on_a_ready_state() -> Result<()> {
    let hook = hook_with(Some(json!({"effective_role": "driver"})), AuthzMode::Strict).await?;

    let (a, b, c) = (hook.clone(), hook.clone(), hook.clone());
    tokio::join!(a.refresh(), b.refresh(), c.refresh());

    assert!(!hook.loading());
    assert!(hook.is_driver());
    assert_eq!(hook.role_name(), "Driver");
    Ok(())
}

#[tokio::test]
async fn guards_follow_enforcement_mode() -> Result<()> {
    let user = json!({"effective_role": "staff", "permissions": {"clients": crud(true, false, false, false)}});

    let strict = hook_with(Some(user.clone()), AuthzMode::Strict).await?;
    strict.load().await;
    assert!(strict.require_view("clients").is_ok());
    assert!(matches!(strict.require_edit("clients"), Err(AppError::Forbidden(_))));
    assert!(matches!(strict.require_delete("clients"), Err(AppError::Forbidden(_))));

    let advisory = hook_with(Some(user.clone()), AuthzMode::Advisory).await?;
    advisory.load().await;
    assert!(advisory.require_edit("clients").is_ok());

    let off = hook_with(None, AuthzMode::Off).await?;
    off.load().await;
    assert!(off.require_create("clients").is_ok());

    let signed_out = hook_with(None, AuthzMode::Strict).await?;
    signed_out.load().await;
    assert!(matches!(signed_out.require_view("clients"), Err(AppError::Unauthorized(_))));
    Ok(())
}
