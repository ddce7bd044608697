use std::sync::Arc;

use bb_types::{
    auth::{AccountType, SignupRequest}, records::{EmailRequest, SuggestionRequest}
};
use serde_json::json;

use super::*;
use crate::{
    error::ClientError, test_support::{MockTransport, fake_token, test_client}, transport::{Method, RequestBody}
};

fn admin_token() -> String {
    fake_token(json!({"userID": 7, "accountType": "ADMIN", "locationID": "L1", "exp": 4_102_444_800i64}))
}

#[tokio::test]
async fn login_stores_token_then_lists_children_then_fails_fast_without_it() {
    let mock = Arc::new(MockTransport::new());
    let token = admin_token();
    mock.push_json(200, json!({"message": "Login successful", "token": token}));
    mock.push_json(200, json!({"message": "ok", "data": [{"childID": 1, "firstName": "Ada", "locationID": "L1"}]}));
    let client = test_client(mock.clone());

    let session = client.auth().login(" admin@daycare.test ", "secret-pass").await.unwrap();
    assert_eq!(session.account_type(), AccountType::Admin);
    assert_eq!(session.location_id(), Some("L1"));
    assert!(client.session().has_token());

    let children = client.children().by_location("L1").await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].child_id.as_deref(), Some("1"));

    let requests = mock.requests();
    assert_eq!(requests[0].url.path(), LOGIN_PATH);
    assert_eq!(requests[0].header("authorization"), None);
    match &requests[0].body {
        RequestBody::Json(body) => assert_eq!(body["email"], "admin@daycare.test"),
        other => panic!("unexpected body {:?}", other),
    }
    assert_eq!(requests[1].header("authorization"), Some(format!("Bearer {}", token).as_str()));

    client.auth().logout();
    assert!(matches!(
        client.children().by_location("L1").await,
        Err(ClientError::Unauthenticated)
    ));
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn login_rejects_tokens_without_a_known_role() {
    let mock = Arc::new(MockTransport::new());
    mock.push_json(200, json!({"token": fake_token(json!({"userID": 1, "accountType": "Janitor"}))}));
    mock.push_json(200, json!({"token": "not-a-token"}));
    let client = test_client(mock.clone());

    assert!(matches!(
        client.auth().login("a@b.test", "pw").await,
        Err(ClientError::Unauthenticated)
    ));
    assert!(!client.session().has_token());

    assert!(matches!(client.auth().login("a@b.test", "pw").await, Err(ClientError::Claims(_))));
    assert!(!client.session().has_token());
}

#[tokio::test]
async fn login_failure_and_validation() {
    let mock = Arc::new(MockTransport::new());
    mock.push_json(401, json!({"message": "Invalid email or password"}));
    let client = test_client(mock.clone());

    match client.auth().login("a@b.test", "wrong").await {
        Err(ClientError::Unauthorized { message, .. }) => assert_eq!(message, "Invalid email or password"),
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(client.auth().login("", "").await, Err(ClientError::Validation(_))));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn signup_is_public() {
    let mock = Arc::new(MockTransport::new());
    mock.push_json(201, json!({"message": "User created"}));
    let client = test_client(mock.clone());

    let request = SignupRequest {
        email: "new@daycare.test".into(),
        password: "long-enough".into(),
        first_name: "New".into(),
        last_name: "Parent".into(),
        account_type: AccountType::Parent,
        location_id: Some("L1".into()),
    };
    client.auth().signup(&request).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].url.path(), SIGNUP_PATH);
    assert_eq!(requests[0].header("authorization"), None);
    assert!(!client.session().has_token());
}

#[tokio::test]
async fn current_user_uses_claim_id() {
    let mock = Arc::new(MockTransport::new());
    mock.push_json(200, json!({"userID": 7, "email": "admin@daycare.test", "accountType": "Admin"}));
    let client = test_client(mock.clone());
    client.session().store_token(&admin_token()).unwrap();

    let user = client.users().current().await.unwrap();
    assert_eq!(user.user_id.as_deref(), Some("7"));
    assert_eq!(mock.requests()[0].url.path(), "/v1/user/7");
}

#[tokio::test]
async fn filtered_lists_hit_their_endpoints() {
    let mock = Arc::new(MockTransport::new());
    for _ in 0..6 {
        mock.push_json(404, json!({"message": "none"}));
    }
    let client = test_client(mock.clone());
    client.session().store_token(&admin_token()).unwrap();

    assert!(client.relationships().by_parent("P1").await.unwrap().is_empty());
    assert!(client.contacts().by_child("C1").await.unwrap().is_empty());
    assert!(client.activity_logs().by_location("L1").await.unwrap().is_empty());
    assert!(client.activity_logs().by_user("U1").await.unwrap().is_empty());
    assert!(client.progress_reports().by_child("C1").await.unwrap().is_empty());
    assert!(client.messages().by_user("U1").await.unwrap().is_empty());

    let seen: Vec<(String, Option<String>)> = mock
        .requests()
        .iter()
        .map(|r| (r.url.path().to_string(), r.url.query().map(str::to_string)))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("/v1/relationship/parent".to_string(), Some("parentID=P1".to_string())),
            ("/v1/contacts/child".to_string(), Some("childID=C1".to_string())),
            ("/log/by-location".to_string(), Some("locationID=L1".to_string())),
            ("/log/by-user".to_string(), Some("userID=U1".to_string())),
            ("/v1/progress-report/child".to_string(), Some("childID=C1".to_string())),
            ("/v1/message/user".to_string(), Some("userID=U1".to_string())),
        ]
    );
}

#[tokio::test]
async fn media_upload_is_multipart() {
    let mock = Arc::new(MockTransport::new());
    mock.push_json(201, json!({"message": "Uploaded", "item": {"mediaID": 3, "childID": "C1", "url": "https://cdn.test/nap.jpg"}}));
    let client = test_client(mock.clone());
    client.session().store_token(&admin_token()).unwrap();

    let media = client
        .media()
        .upload(MediaUpload {
            child_id: "C1".into(),
            file_name: "nap.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xff, 0xd8],
            caption: Some("Nap time".into()),
        })
        .await
        .unwrap();
    assert_eq!(media.media_id.as_deref(), Some("3"));

    let requests = mock.requests();
    let request = &requests[0];
    assert_eq!((request.method, request.url.path()), (Method::Post, MEDIA_PATH));
    assert_eq!(request.header("content-type"), None);
    match &request.body {
        RequestBody::Multipart(form) => {
            assert_eq!(form.field("childID"), Some("C1"));
            assert_eq!(form.field("caption"), Some("Nap time"));
            assert_eq!(form.file.as_ref().map(|f| f.field.as_str()), Some(FILE_FIELD));
        }
        other => panic!("unexpected body {:?}", other),
    }
}

#[tokio::test]
async fn empty_upload_is_rejected_locally() {
    let mock = Arc::new(MockTransport::new());
    let client = test_client(mock.clone());
    client.session().store_token(&admin_token()).unwrap();

    let err = client
        .media()
        .upload(MediaUpload {
            child_id: " ".into(),
            file_name: "empty.png".into(),
            content_type: "image/png".into(),
            bytes: Vec::new(),
            caption: None,
        })
        .await
        .unwrap_err();
    match err {
        ClientError::Validation(errors) => {
            assert!(errors.contains_key("childID"));
            assert!(errors.contains_key(FILE_FIELD));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn mail_and_suggestions() {
    let mock = Arc::new(MockTransport::new());
    mock.push_json(200, json!({"message": "Emails sent"}));
    mock.push_json(200, json!({"suggestions": ["Sensory bins", "Outdoor walk"]}));
    let client = test_client(mock.clone());
    client.session().store_token(&admin_token()).unwrap();

    let bad = EmailRequest {
        recipients: vec!["not-an-email".into()],
        subject: "".into(),
        body: "Hi".into(),
    };
    assert!(matches!(client.mail().send_emails(&bad).await, Err(ClientError::Validation(_))));

    let email = EmailRequest {
        recipients: vec!["parent@daycare.test".into()],
        subject: "Pickup".into(),
        body: "Early pickup Friday".into(),
    };
    client.mail().send_emails(&email).await.unwrap();

    let ideas = client
        .suggestions()
        .generate(&SuggestionRequest {
            prompt: "rainy day, toddlers".into(),
            child_id: None,
        })
        .await
        .unwrap();
    assert_eq!(ideas, vec!["Sensory bins", "Outdoor walk"]);

    let paths: Vec<String> = mock.requests().iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec![SEND_EMAILS_PATH, GENERATE_PATH]);
}

#[tokio::test]
async fn signed_out_calls_fail_as_unauthenticated_even_with_bad_input() {
    let mock = Arc::new(MockTransport::new());
    let client = test_client(mock.clone());

    let upload = MediaUpload {
        child_id: "".into(),
        file_name: "empty.png".into(),
        content_type: "image/png".into(),
        bytes: Vec::new(),
        caption: None,
    };
    assert!(matches!(client.media().upload(upload).await, Err(ClientError::Unauthenticated)));

    let email = EmailRequest {
        recipients: Vec::new(),
        subject: "".into(),
        body: "".into(),
    };
    assert!(matches!(client.mail().send_emails(&email).await, Err(ClientError::Unauthenticated)));

    let request = SuggestionRequest {
        prompt: "".into(),
        child_id: None,
    };
    assert!(matches!(client.suggestions().generate(&request).await, Err(ClientError::Unauthenticated)));
    assert_eq!(mock.call_count(), 0);
}
