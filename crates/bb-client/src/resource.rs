//! One generic wrapper for every backend entity.

use std::marker::PhantomData;

use bb_types::Record;
use serde_json::Value;
use tracing::debug;

use crate::{
    client::ApiClient, error::{ClientError, ClientResult}, transport::{Method, RequestBody}
};

/// CRUD access to one REST collection at `<origin><path>`.
///
/// List-by-filter calls can opt into treating 404 as "no items" with
/// [`RestResource::empty_on_not_found`]; plain `get`/`update`/`delete` always
/// surface 404 as [`ClientError::NotFound`].
pub struct RestResource<T> {
    client: ApiClient,
    path: &'static str,
    empty_on_not_found: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for RestResource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path,
            empty_on_not_found: self.empty_on_not_found,
            _record: PhantomData,
        }
    }
}

impl<T: Record> RestResource<T> {
    pub fn new(client: ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            empty_on_not_found: false,
            _record: PhantomData,
        }
    }

    /// Treat 404 from filtered list endpoints as an empty result.
    pub fn empty_on_not_found(mut self) -> Self {
        self.empty_on_not_found = true;
        self
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `GET <path>`
    pub async fn list(&self) -> ClientResult<Vec<T>> {
        let url = self.client.url(self.path, None, &[])?;
        let payload = self.client.send(Method::Get, url, RequestBody::Empty).await?;
        decode_list(payload)
    }

    /// `GET <path>/<sub>?<query>`, honouring the 404-as-empty opt-in.
    pub async fn list_by(&self, sub: &str, query: &[(&str, &str)]) -> ClientResult<Vec<T>> {
        let path = format!("{}/{}", self.path.trim_end_matches('/'), sub.trim_start_matches('/'));
        let url = self.client.url(&path, None, query)?;
        match self.client.send(Method::Get, url, RequestBody::Empty).await {
            Ok(payload) => decode_list(payload),
            Err(ClientError::NotFound { .. }) if self.empty_on_not_found => {
                debug!(kind = T::KIND, path, "no matching records");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// `GET <path>/<id>`
    pub async fn get(&self, id: &str) -> ClientResult<T> {
        let url = self.client.url(self.path, Some(id), &[])?;
        let payload = self.client.send(Method::Get, url, RequestBody::Empty).await?;
        if payload.is_null() {
            return Err(ClientError::NotFound {
                message: format!("{} '{}' not found", T::KIND, id),
            });
        }
        Ok(serde_json::from_value(payload)?)
    }

    /// `POST <path>` after the token check and client-side validation. Returns the stored record
    /// when the backend echoes it, otherwise the submitted one.
    pub async fn create(&self, record: &T) -> ClientResult<T> {
        self.client.require_token()?;
        validate(record)?;
        let url = self.client.url(self.path, None, &[])?;
        let body = RequestBody::Json(serde_json::to_value(record)?);
        let payload = self.client.send(Method::Post, url, body).await?;
        decode_echo(payload, record)
    }

    /// `PUT <path>/<id>` after the token check and client-side validation.
    pub async fn update(&self, id: &str, record: &T) -> ClientResult<T> {
        self.client.require_token()?;
        validate(record)?;
        let url = self.client.url(self.path, Some(id), &[])?;
        let body = RequestBody::Json(serde_json::to_value(record)?);
        let payload = self.client.send(Method::Put, url, body).await?;
        decode_echo(payload, record)
    }

    /// `DELETE <path>/<id>`. Deleting a missing id is `NotFound`, not success.
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let url = self.client.url(self.path, Some(id), &[])?;
        self.client.send(Method::Delete, url, RequestBody::Empty).await?;
        Ok(())
    }
}

fn validate<T: Record>(record: &T) -> ClientResult<()> {
    let errors = record.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(errors))
    }
}

/// Arrays decode element-wise; `null` and `{}` are empty; any other lone
/// object is one item.
pub(crate) fn decode_list<T: Record>(payload: Value) -> ClientResult<Vec<T>> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Object(ref map) if map.is_empty() => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(payload)?),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

fn decode_echo<T: Record>(payload: Value, submitted: &T) -> ClientResult<T> {
    match payload {
        Value::Object(ref map) if !map.is_empty() => Ok(serde_json::from_value(payload)?),
        _ => Ok(submitted.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bb_types::records::Child;
    use serde_json::json;

    use super::*;
    use crate::test_support::{MockTransport, fake_token, test_client};

    fn signed_in(mock: &Arc<MockTransport>) -> RestResource<Child> {
        let client = test_client(mock.clone());
        client.session().store_token(&fake_token(json!({"accountType": "Admin"}))).unwrap();
        RestResource::new(client, "/v1/child")
    }

    fn valid_child() -> Child {
        Child {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            location_id: Some("L1".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_accepts_raw_and_wrapped_bodies() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!([{"childID": "1", "firstName": "A"}]));
        mock.push_json(200, json!({"message": "ok", "data": [{"childID": "2"}, {"childID": "3"}]}));
        mock.push_json(200, json!({"message": "none"}));
        let children = signed_in(&mock);

        assert_eq!(children.list().await.unwrap().len(), 1);
        assert_eq!(children.list().await.unwrap().len(), 2);
        assert!(children.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_object_bodies_are_no_items() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!({}));
        mock.push_json(200, json!({"data": {}}));
        let children = signed_in(&mock).empty_on_not_found();

        assert!(children.list_by("location", &[("locationID", "L1")]).await.unwrap().is_empty());
        assert!(children.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn not_found_on_filter_respects_opt_in() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(404, json!({"message": "No children"}));
        mock.push_json(404, json!({"message": "No children"}));
        let strict = signed_in(&mock);
        let lenient = strict.clone().empty_on_not_found();

        assert!(matches!(
            strict.list_by("location", &[("locationID", "L9")]).await,
            Err(ClientError::NotFound { .. })
        ));
        assert!(lenient.list_by("location", &[("locationID", "L9")]).await.unwrap().is_empty());

        let requests = mock.requests();
        assert_eq!(requests[1].url.path(), "/v1/child/location");
        assert_eq!(requests[1].query("locationID").as_deref(), Some("L9"));
    }

    #[tokio::test]
    async fn get_by_id_404_is_not_swallowed() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(404, json!({"message": "Child not found"}));
        let children = signed_in(&mock).empty_on_not_found();
        assert!(matches!(children.get("42").await, Err(ClientError::NotFound { .. })));
    }

    #[tokio::test]
    async fn invalid_record_is_rejected_before_sending() {
        let mock = Arc::new(MockTransport::new());
        let children = signed_in(&mock);
        let err = children.create(&Child::default()).await.unwrap_err();
        match err {
            ClientError::Validation(errors) => {
                assert!(errors.contains_key("firstName"));
                assert!(errors.contains_key("locationID"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn create_uses_echo_or_falls_back_to_input() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(201, json!({"message": "Created", "item": {"childID": 77, "firstName": "Ada", "lastName": "Lovelace"}}));
        mock.push_json(201, json!({"message": "Created"}));
        let children = signed_in(&mock);

        let created = children.create(&valid_child()).await.unwrap();
        assert_eq!(created.child_id.as_deref(), Some("77"));

        let created = children.create(&valid_child()).await.unwrap();
        assert_eq!(created, valid_child());

        let body = match &mock.requests()[0].body {
            RequestBody::Json(v) => v.clone(),
            other => panic!("unexpected body {:?}", other),
        };
        assert_eq!(body["firstName"], "Ada");
        assert_eq!(body["locationID"], "L1");
    }

    #[tokio::test]
    async fn update_and_delete_target_the_id() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, json!({"message": "Updated"}));
        mock.push_status(204);
        let children = signed_in(&mock);

        children.update("5", &valid_child()).await.unwrap();
        children.delete("5").await.unwrap();

        let requests = mock.requests();
        assert_eq!((requests[0].method, requests[0].url.path()), (Method::Put, "/v1/child/5"));
        assert_eq!((requests[1].method, requests[1].url.path()), (Method::Delete, "/v1/child/5"));
    }

    #[tokio::test]
    async fn every_operation_requires_a_token() {
        let mock = Arc::new(MockTransport::new());
        let children: RestResource<Child> = RestResource::new(test_client(mock.clone()), "/v1/child").empty_on_not_found();

        assert!(matches!(children.list().await, Err(ClientError::Unauthenticated)));
        assert!(matches!(children.list_by("location", &[]).await, Err(ClientError::Unauthenticated)));
        assert!(matches!(children.get("1").await, Err(ClientError::Unauthenticated)));
        assert!(matches!(children.create(&valid_child()).await, Err(ClientError::Unauthenticated)));
        assert!(matches!(children.update("1", &valid_child()).await, Err(ClientError::Unauthenticated)));
        assert!(matches!(children.create(&Child::default()).await, Err(ClientError::Unauthenticated)));
        assert!(matches!(children.update("1", &Child::default()).await, Err(ClientError::Unauthenticated)));
        assert!(matches!(children.delete("1").await, Err(ClientError::Unauthenticated)));
        assert_eq!(mock.call_count(), 0);
    }
}
