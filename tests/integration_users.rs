mod common;

use axum::http::StatusCode;
use common::{TEST_PASSWORD, TestApp, empty_request, json_request};
use gatehouse_core::verify_password;
use gatehouse_db::UserRepository;
use gatehouse_models::{Role, UserRecord};
use serde_json::json;

struct Fixture {
    app: TestApp,
    user: UserRecord,
    other: UserRecord,
    admin: UserRecord,
}

fn fixture() -> Fixture {
    let app = TestApp::new();
    let user = app.seed("u1@example.com", Role::User, true);
    let other = app.seed("u2@example.com", Role::User, true);
    let admin = app.seed("admin@example.com", Role::Admin, true);
    Fixture {
        app,
        user,
        other,
        admin,
    }
}

async fn set_status(
    f: &Fixture,
    actor: &UserRecord,
    target: &UserRecord,
    is_active: bool,
) -> (StatusCode, serde_json::Value) {
    f.app
        .send(json_request(
            "PATCH",
            &format!("/users/{}/status", target.id),
            Some(&f.app.token_for(actor)),
            json!({ "is_active": is_active }),
        ))
        .await
}

async fn stored(f: &Fixture, record: &UserRecord) -> Option<UserRecord> {
    f.app.repository.find_by_id(&record.id).await.unwrap()
}

#[tokio::test]
async fn test_get_user() {
    let f = fixture();

    let (status, body) = f
        .app
        .send(empty_request("GET", &format!("/users/{}", f.user.id), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "u1@example.com");
    assert!(body.get("password_hash").is_none());

    let (status, body) = f.app.send(empty_request("GET", "/users/missing", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn test_user_cannot_activate_another_user() {
    let f = fixture();
    let (status, body) = set_status(&f, &f.user, &f.other, true).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "only admin can activate a user");
}

#[tokio::test]
async fn test_user_cannot_reactivate_self() {
    let f = fixture();
    let (status, _) = set_status(&f, &f.user, &f.user, true).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_can_deactivate_self() {
    let f = fixture();
    let (status, body) = set_status(&f, &f.user, &f.user, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "user status updated");
    assert!(!stored(&f, &f.user).await.unwrap().is_active);
}

#[tokio::test]
async fn test_user_cannot_deactivate_another_user() {
    let f = fixture();
    let (status, body) = set_status(&f, &f.user, &f.other, false).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "you must be admin to deactivate other users than yourself"
    );
    assert!(stored(&f, &f.other).await.unwrap().is_active);
}

#[tokio::test]
async fn test_admin_can_deactivate_and_activate_others() {
    let f = fixture();
    let (status, _) = set_status(&f, &f.admin, &f.other, false).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!stored(&f, &f.other).await.unwrap().is_active);

    let (status, _) = set_status(&f, &f.admin, &f.other, true).await;
    assert_eq!(status, StatusCode::OK);
    assert!(stored(&f, &f.other).await.unwrap().is_active);
}

#[tokio::test]
async fn test_status_requires_flag_and_existing_user() {
    let f = fixture();
    let token = f.app.token_for(&f.admin);

    let (status, body) = f
        .app
        .send(json_request(
            "PATCH",
            &format!("/users/{}/status", f.user.id),
            Some(&token),
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "is_active is required in request body");

    let (status, _) = f
        .app
        .send(json_request(
            "PATCH",
            "/users/missing/status",
            Some(&token),
            json!({ "is_active": false }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_requires_authentication() {
    let f = fixture();
    let (status, body) = f
        .app
        .send(json_request(
            "PATCH",
            &format!("/users/{}/status", f.user.id),
            None,
            json!({ "is_active": false }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "no authorization header");
}

#[tokio::test]
async fn test_admin_cannot_self_delete() {
    let f = fixture();
    let token = f.app.token_for(&f.admin);
    let (status, body) = f
        .app
        .send(empty_request("DELETE", &format!("/users/{}", f.admin.id), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "admin cannot self-delete");
    assert!(stored(&f, &f.admin).await.is_some());
}

#[tokio::test]
async fn test_admin_deletes_user() {
    let f = fixture();
    let token = f.app.token_for(&f.admin);
    let (status, body) = f
        .app
        .send(empty_request("DELETE", &format!("/users/{}", f.user.id), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "user deleted");
    assert!(stored(&f, &f.user).await.is_none());

    let (status, _) = f
        .app
        .send(empty_request("DELETE", &format!("/users/{}", f.user.id), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_cannot_delete() {
    let f = fixture();
    let token = f.app.token_for(&f.user);
    let (status, body) = f
        .app
        .send(empty_request("DELETE", &format!("/users/{}", f.other.id), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "insufficient role");
    assert!(stored(&f, &f.other).await.is_some());
}

#[tokio::test]
async fn test_deleted_principal_token_no_longer_resolves() {
    let f = fixture();
    let user_token = f.app.token_for(&f.user);
    let admin_token = f.app.token_for(&f.admin);

    f.app
        .send(empty_request("DELETE", &format!("/users/{}", f.user.id), Some(&admin_token)))
        .await;

    let (status, body) = f
        .app
        .send(empty_request("GET", "/auth/me", Some(&user_token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "cannot resolve principal");
}

#[tokio::test]
async fn test_update_email() {
    let f = fixture();
    let token = f.app.token_for(&f.user);

    let (status, body) = f
        .app
        .send(json_request(
            "PATCH",
            &format!("/users/{}", f.user.id),
            Some(&token),
            json!({ "email": "renamed@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "renamed@example.com");
    assert_eq!(body["id"], f.user.id);

    let (status, body) = f
        .app
        .send(json_request(
            "PATCH",
            &format!("/users/{}", f.user.id),
            Some(&token),
            json!({ "email": "u2@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already existed");

    let (status, _) = f
        .app
        .send(json_request(
            "PATCH",
            &format!("/users/{}", f.user.id),
            Some(&token),
            json!({ "email": "bad-address" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_email_is_self_only() {
    let f = fixture();
    for actor in [&f.user, &f.admin] {
        let (status, body) = f
            .app
            .send(json_request(
                "PATCH",
                &format!("/users/{}", f.other.id),
                Some(&f.app.token_for(actor)),
                json!({ "email": "taken-over@example.com" }),
            ))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "cannot update another user");
    }
    assert_eq!(stored(&f, &f.other).await.unwrap().email, "u2@example.com");
}

#[tokio::test]
async fn test_change_password() {
    let f = fixture();
    let token = f.app.token_for(&f.user);
    let uri = format!("/users/{}/password", f.user.id);

    let (status, _) = f
        .app
        .send(json_request(
            "PATCH",
            &uri,
            Some(&token),
            json!({ "old_password": TEST_PASSWORD, "new_password": "weak" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = f
        .app
        .send(json_request(
            "PATCH",
            &uri,
            Some(&token),
            json!({ "old_password": "Wr0ng!pass", "new_password": "N3w-Passw0rd!" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "old password is not correct");

    let (status, body) = f
        .app
        .send(json_request(
            "PATCH",
            &uri,
            Some(&token),
            json!({ "old_password": TEST_PASSWORD, "new_password": "N3w-Passw0rd!" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "password changed");

    let hash = stored(&f, &f.user).await.unwrap().password_hash;
    assert!(verify_password("N3w-Passw0rd!", &hash).unwrap());
    assert!(!verify_password(TEST_PASSWORD, &hash).unwrap());
}

#[tokio::test]
async fn test_change_password_is_self_only() {
    let f = fixture();
    let (status, body) = f
        .app
        .send(json_request(
            "PATCH",
            &format!("/users/{}/password", f.other.id),
            Some(&f.app.token_for(&f.admin)),
            json!({ "old_password": TEST_PASSWORD, "new_password": "N3w-Passw0rd!" }),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot change another user's password");
}

#[tokio::test]
async fn test_role_is_read_from_store_not_token() {
    let f = fixture();
    let token = f.app.token_for(&f.admin);

    f.app.repository.delete(&f.admin.id).await.unwrap();
    f.app.repository.seed(UserRecord {
        role: Role::User,
        ..f.admin.clone()
    });

    let (status, body) = f
        .app
        .send(empty_request("DELETE", &format!("/users/{}", f.user.id), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "insufficient role");
    assert!(stored(&f, &f.user).await.is_some());

    let (status, body) = f.app.send(empty_request("GET", "/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "user");
}

