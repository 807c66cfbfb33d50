//! Login check behaviour driven through the full router.

use axum::http::StatusCode;
use serde_json::json;

use common::{get_req, test_config, TestApp};
use login_gate::session::{EMPLOYEE_KEY, USER_KEY};

mod common;

#[tokio::test]
async fn test_exempt_path_with_empty_session_passes() {
    let app = TestApp::new(test_config());

    let res = app.send(get_req("/front/index.html", None)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["reached"], json!(true));
    assert!(res.identity().is_null(), "exempt paths bind no identity");
    assert_eq!(app.hits(), 1);
}

#[tokio::test]
async fn test_exempt_path_ignores_session_state() {
    let app = TestApp::new(test_config());
    let cookie = app.session_with(EMPLOYEE_KEY, 17).await;

    for cookie in [None, Some(cookie.as_str()), Some("SESSION=unknown")] {
        let res = app.send(get_req("/front/index.html", cookie)).await;
        assert_eq!(res.body["reached"], json!(true));
        assert!(res.identity().is_null());
    }
    assert_eq!(app.hits(), 3);
}

#[tokio::test]
async fn test_employee_session_binds_identity() {
    let app = TestApp::new(test_config());
    let cookie = app.session_with(EMPLOYEE_KEY, 17).await;

    let res = app.send(get_req("/order/list", Some(&cookie))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.identity(), &json!({ "id": 17, "principal": "employee" }));
}

#[tokio::test]
async fn test_user_session_binds_identity() {
    let app = TestApp::new(test_config());
    let cookie = app.session_with(USER_KEY, 42).await;

    let res = app.send(get_req("/order/list", Some(&cookie))).await;

    assert_eq!(res.identity(), &json!({ "id": 42, "principal": "user" }));
}

#[tokio::test]
async fn test_employee_takes_priority_over_user() {
    let app = TestApp::new(test_config());
    let cookie = app.session_with(USER_KEY, 42).await;
    let cookie = app.add_to_session(Some(&cookie), EMPLOYEE_KEY, 17).await;

    let res = app.send(get_req("/order/list", Some(&cookie))).await;

    assert_eq!(res.identity()["id"], json!(17));
    assert_eq!(res.identity()["principal"], json!("employee"));
}

#[tokio::test]
async fn test_no_session_is_rejected_without_reaching_handler() {
    let app = TestApp::new(test_config());

    let res = app.send(get_req("/order/list", None)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "code": 0, "msg": "NOTLOGIN", "data": null }));
    assert_eq!(
        res.headers.get("content-type").unwrap(),
        "application/json"
    );
    assert!(res.session_cookie().is_none());
    assert_eq!(app.hits(), 0);
}

#[tokio::test]
async fn test_unknown_or_identityless_session_is_rejected() {
    let app = TestApp::new(test_config());
    let pending_code = app.session_with("sms_code:139", 1234).await;

    for cookie in ["SESSION=forged", pending_code.as_str(), "OTHER=1"] {
        let res = app.send(get_req("/order/list", Some(cookie))).await;
        assert!(res.is_not_login(), "{cookie} should be rejected");
    }
    assert_eq!(app.hits(), 0);
}

#[tokio::test]
async fn test_empty_duplicate_cookie_does_not_hide_live_session() {
    let app = TestApp::new(test_config());
    let cookie = app.session_with(EMPLOYEE_KEY, 17).await;

    let res = app
        .send(get_req("/order/list", Some(&format!("SESSION=; {cookie}"))))
        .await;

    assert_eq!(res.identity()["id"], json!(17));
}

#[tokio::test]
async fn test_unrouted_protected_path_is_rejected() {
    let app = TestApp::new(test_config());

    let res = app.send(get_req("/no/such/endpoint", None)).await;

    assert!(res.is_not_login());
}

#[tokio::test]
async fn test_unrouted_exempt_path_reaches_fallback() {
    let app = TestApp::new(test_config());

    let res = app.send(get_req("/common/download", None)).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(!res.is_not_login());
}

#[tokio::test]
async fn test_query_string_is_not_part_of_the_path() {
    let app = TestApp::new(test_config());

    let res = app.send(get_req("/front/index.html?next=/order/list", None)).await;

    assert_eq!(res.body["reached"], json!(true));
}

#[tokio::test]
async fn test_identity_does_not_leak_between_requests() {
    let app = TestApp::new(test_config());
    let employee = app.session_with(EMPLOYEE_KEY, 17).await;
    let user = app.session_with(USER_KEY, 42).await;

    for _ in 0..3 {
        let res = app.send(get_req("/order/list", Some(&employee))).await;
        assert_eq!(res.identity()["id"], json!(17));

        let res = app.send(get_req("/order/list", None)).await;
        assert!(res.is_not_login());

        let res = app.send(get_req("/front/index.html", None)).await;
        assert!(res.identity().is_null());

        let res = app.send(get_req("/order/list", Some(&user))).await;
        assert_eq!(res.identity()["id"], json!(42));
    }
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_own_identity() {
    let app = TestApp::new(test_config());

    let mut tasks = Vec::new();
    for id in 1..=50_i64 {
        let cookie = app.session_with(USER_KEY, id).await;
        let router = app.router();
        tasks.push(tokio::spawn(async move {
            let res = common::send(router, get_req("/order/list", Some(&cookie))).await;
            (id, res.identity()["id"].clone())
        }));
    }

    for task in tasks {
        let (id, seen) = task.await.unwrap();
        assert_eq!(seen, json!(id));
    }
}

#[tokio::test]
async fn test_configured_reject_status() {
    let mut config = test_config();
    config.login_check.reject_status = 401;
    let app = TestApp::new(config);

    let res = app.send(get_req("/order/list", None)).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.is_not_login());
}

#[tokio::test]
async fn test_custom_exempt_list() {
    let mut config = test_config();
    config.login_check.exempt_paths = vec!["/order/**".into()];
    let app = TestApp::new(config);

    let res = app.send(get_req("/order/list", None)).await;
    assert_eq!(res.body["reached"], json!(true));

    let res = app.send(get_req("/front/index.html", None)).await;
    assert!(res.is_not_login());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = TestApp::new(test_config());

    let res = app.send(get_req("/order/list", None)).await;

    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_idle_session_expires() {
    let mut config = test_config();
    config.session.idle_timeout_secs = 1;
    let app = TestApp::new(config);
    let cookie = app.session_with(EMPLOYEE_KEY, 17).await;

    assert_eq!(app.send(get_req("/order/list", Some(&cookie))).await.identity()["id"], json!(17));

    tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
    assert!(app.send(get_req("/order/list", Some(&cookie))).await.is_not_login());
}
