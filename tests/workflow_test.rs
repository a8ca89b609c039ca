//! End-to-end user journeys against the store API.

use earnhub_backend::auth::{AuthRequest, Caller};
use earnhub_backend::config::StoreConfig;
use earnhub_backend::error::AppError;
use earnhub_backend::models::task::{Task, TaskStatus};
use earnhub_backend::models::user::RegisterRequest;
use earnhub_backend::models::withdrawal::WithdrawalStatus;
use earnhub_backend::store::Store;

fn open_task(id: u64, reward: u64) -> Task {
    Task {
        id,
        title: format!("task {id}"),
        description: "do the thing".into(),
        reward,
        status: TaskStatus::Open,
    }
}

fn registration(username: &str, referred_by_code: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        whatsapp_number: "+1000".into(),
        group_number: "7".into(),
        password_hash: "secret-hash".into(),
        referral_code: None,
        referred_by_code: referred_by_code.map(str::to_string),
    }
}

async fn setup() -> (Store, Caller) {
    let store = Store::new(StoreConfig::default());
    let admin_id = store.seed_admin("admin", "admin-hash").await.unwrap();
    (store, Caller::admin(admin_id))
}

#[tokio::test]
async fn earn_then_withdraw_then_rejection_refunds() {
    let (store, admin) = setup().await;
    store.add_task(&admin, open_task(1, 20)).await.unwrap();

    let profile = store.register_user(registration("alice", None)).await.unwrap();
    store.approve_user(&admin, profile.id, true).await.unwrap();
    let alice = Caller::user(profile.id);
    assert_eq!(store.get_balance(&alice).await.unwrap(), 0);

    store.complete_task(&alice, 1).await.unwrap();
    assert_eq!(store.get_balance(&alice).await.unwrap(), 20);

    let request = store
        .submit_withdraw_request(&alice, "+123456".into(), 15, "bank".into())
        .await
        .unwrap();
    assert_eq!(store.get_balance(&alice).await.unwrap(), 5);
    assert_eq!(request.status, WithdrawalStatus::Pending);

    store
        .update_withdraw_status(&admin, profile.id, request.id, WithdrawalStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(store.get_balance(&alice).await.unwrap(), 20);

    let history = store.user_withdraw_history(&alice).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, WithdrawalStatus::Rejected);
}

#[tokio::test]
async fn completion_stats_leave_catalog_status_alone() {
    let (store, admin) = setup().await;
    store.add_task(&admin, open_task(1, 10)).await.unwrap();

    let profile = store.register_user(registration("bob", None)).await.unwrap();
    store.approve_user(&admin, profile.id, true).await.unwrap();
    let bob = Caller::user(profile.id);

    store.complete_task(&bob, 1).await.unwrap();

    let stats = store.task_stats().await;
    assert_eq!(stats.total_tasks, 1);
    assert_eq!(stats.open_tasks, 1);
    assert_eq!(stats.completed_tasks, 0);

    let weekly = store.weekly_task_stats(&bob, profile.id).await.unwrap();
    assert_eq!(weekly.completed_tasks, 1);
    assert_eq!(weekly.total_points, 10);
}

#[tokio::test]
async fn referral_journey_pays_the_referrer_on_read() {
    let (store, admin) = setup().await;
    store.add_task(&admin, open_task(1, 200)).await.unwrap();

    let mut req = registration("referrer", None);
    req.referral_code = Some("INVITE".into());
    let referrer_profile = store.register_user(req).await.unwrap();
    store
        .approve_user(&admin, referrer_profile.id, true)
        .await
        .unwrap();
    let referrer = Caller::user(referrer_profile.id);

    let friend_profile = store
        .register_user(registration("friend", Some("INVITE")))
        .await
        .unwrap();
    assert_eq!(friend_profile.referred_by, Some(referrer_profile.id));
    store
        .approve_user(&admin, friend_profile.id, true)
        .await
        .unwrap();

    store
        .complete_task(&Caller::user(friend_profile.id), 1)
        .await
        .unwrap();

    assert_eq!(store.referral_count(&referrer).await.unwrap(), 1);
    assert_eq!(store.referral_earnings(&referrer).await.unwrap(), 20);
    // The referrer's own balance is untouched until they earn directly.
    assert_eq!(store.get_balance(&referrer).await.unwrap(), 0);
}

#[tokio::test]
async fn login_session_drives_authorization() {
    let (store, admin) = setup().await;
    let profile = store
        .register_user(registration("carol", None))
        .await
        .unwrap();
    store.approve_user(&admin, profile.id, true).await.unwrap();

    let response = store
        .login(&AuthRequest {
            username: "carol".into(),
            password_hash: "secret-hash".into(),
        })
        .await
        .unwrap();
    let carol = store.resolve_session(response.token).await.unwrap();

    // A plain user cannot reach admin surfaces.
    assert!(matches!(
        store.add_task(&carol, open_task(9, 1)).await.unwrap_err(),
        AppError::Unauthorized(_)
    ));

    store
        .assign_role(
            &admin,
            profile.id,
            earnhub_backend::models::user::UserRole::Admin,
        )
        .await
        .unwrap();
    // Role changes apply to freshly resolved sessions.
    let carol = store.resolve_session(response.token).await.unwrap();
    assert!(store.add_task(&carol, open_task(9, 1)).await.is_ok());
}

#[tokio::test]
async fn balance_never_goes_negative_across_a_journey() {
    let (store, admin) = setup().await;
    store.add_task(&admin, open_task(1, 12)).await.unwrap();

    let profile = store.register_user(registration("dave", None)).await.unwrap();
    store.approve_user(&admin, profile.id, true).await.unwrap();
    let dave = Caller::user(profile.id);

    assert!(matches!(
        store
            .submit_withdraw_request(&dave, "+1".into(), 10, "bank".into())
            .await
            .unwrap_err(),
        AppError::InsufficientFunds { .. }
    ));

    store.complete_task(&dave, 1).await.unwrap();
    store
        .submit_withdraw_request(&dave, "+1".into(), 12, "bank".into())
        .await
        .unwrap();
    assert_eq!(store.get_balance(&dave).await.unwrap(), 0);

    assert!(matches!(
        store
            .submit_withdraw_request(&dave, "+1".into(), 10, "bank".into())
            .await
            .unwrap_err(),
        AppError::InsufficientFunds { .. }
    ));
}
