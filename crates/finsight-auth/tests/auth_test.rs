use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use finsight_auth::{
    AuthError, AuthService, AuthSettings, MailError, Mailer, OutgoingEmail, RequestOrigin,
};
use finsight_persist::{ClientStore, MemoryStore};
use finsight_types::Client;
use tokio::sync::Mutex;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    async fn last_passcode(&self) -> String {
        let sent = self.sent.lock().await;
        let html = &sent.last().expect("an email was sent").html;
        let start = html.find("monospace;\">").expect("code block") + "monospace;\">".len();
        html[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

struct BrokenMailer;

#[async_trait]
impl Mailer for BrokenMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), MailError> {
        Err(MailError::Delivery("smtp refused".to_string()))
    }
}

async fn setup(mailer: Arc<dyn Mailer>) -> (AuthService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    store
        .insert_client(Client::new("Jane Doe", "Jane@Example.com"))
        .await
        .unwrap();

    let mut inactive = Client::new("Old Client", "old@example.com");
    inactive.is_active = false;
    store.insert_client(inactive).await.unwrap();

    let service = AuthService::new(store.clone(), store.clone(), store.clone(), mailer);
    (service, store)
}

#[tokio::test]
async fn test_passcode_verifies_exactly_once() {
    let mailer = Arc::new(RecordingMailer::default());
    let (service, _) = setup(mailer.clone()).await;

    let email = service
        .request_access("  JANE@example.com ", RequestOrigin::default())
        .await
        .unwrap();
    assert_eq!(email, "jane@example.com");

    let passcode = mailer.last_passcode().await;
    assert_eq!(passcode.len(), 6);

    let grant = service.verify_passcode("jane@example.com", &passcode).await.unwrap();
    assert_eq!(grant.email, "jane@example.com");
    assert_eq!(
        service.validate_session(&grant.session_token).await.unwrap(),
        "jane@example.com"
    );

    let second = service.verify_passcode("jane@example.com", &passcode).await;
    assert!(matches!(second, Err(AuthError::InvalidPasscode)));
}

#[tokio::test]
async fn test_unauthorized_email_never_mails() {
    let mailer = Arc::new(RecordingMailer::default());
    let (service, _) = setup(mailer.clone()).await;

    let unknown = service
        .request_access("stranger@example.com", RequestOrigin::default())
        .await;
    assert!(matches!(unknown, Err(AuthError::NotAuthorized)));

    let inactive = service
        .request_access("old@example.com", RequestOrigin::default())
        .await;
    assert!(matches!(inactive, Err(AuthError::NotAuthorized)));

    assert!(mailer.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_missing_fields_are_validation_errors() {
    let (service, _) = setup(Arc::new(RecordingMailer::default())).await;

    assert!(matches!(
        service.request_access("   ", RequestOrigin::default()).await,
        Err(AuthError::Validation("Email is required"))
    ));
    assert!(matches!(
        service.verify_passcode("jane@example.com", "").await,
        Err(AuthError::Validation("Email and token are required"))
    ));
}

#[tokio::test]
async fn test_expired_passcode_is_rejected() {
    let mailer = Arc::new(RecordingMailer::default());
    let (service, _) = setup(mailer.clone()).await;
    let service = service.with_settings(AuthSettings {
        passcode_ttl: Duration::zero(),
        ..AuthSettings::default()
    });

    service
        .request_access("jane@example.com", RequestOrigin::default())
        .await
        .unwrap();
    let passcode = mailer.last_passcode().await;

    assert!(matches!(
        service.verify_passcode("jane@example.com", &passcode).await,
        Err(AuthError::InvalidPasscode)
    ));
}

#[tokio::test]
async fn test_wrong_email_cannot_use_passcode() {
    let mailer = Arc::new(RecordingMailer::default());
    let (service, store) = setup(mailer.clone()).await;
    store
        .insert_client(Client::new("Other", "other@example.com"))
        .await
        .unwrap();

    service
        .request_access("jane@example.com", RequestOrigin::default())
        .await
        .unwrap();
    let passcode = mailer.last_passcode().await;

    assert!(service.verify_passcode("other@example.com", &passcode).await.is_err());
    assert!(service.verify_passcode("jane@example.com", &passcode).await.is_ok());
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let mailer = Arc::new(RecordingMailer::default());
    let (service, _) = setup(mailer.clone()).await;

    service
        .request_access("jane@example.com", RequestOrigin::default())
        .await
        .unwrap();
    let grant = service
        .verify_passcode("jane@example.com", &mailer.last_passcode().await)
        .await
        .unwrap();

    assert!(service.logout(&grant.session_token).await.unwrap());
    assert!(matches!(
        service.validate_session(&grant.session_token).await,
        Err(AuthError::InvalidSession)
    ));
    assert!(!service.logout("").await.unwrap());
}

#[tokio::test]
async fn test_mail_failure_surfaces() {
    let (service, _) = setup(Arc::new(BrokenMailer)).await;

    assert!(matches!(
        service
            .request_access("jane@example.com", RequestOrigin::default())
            .await,
        Err(AuthError::Mail(_))
    ));
}
