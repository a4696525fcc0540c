//! Typed calls against the settlement API.

use crate::transport::{ApiRequest, Method, Transport};
use crate::ClientResult;
use datamonster_core::{
    CoreError, Glossary, NewSettlement, NewSurvivor, PatchPayload, Settlement, Survivor,
};

/// Typed client for the settlement API.
///
/// Every call goes through the [`Transport`] `T`; session credentials and the base URL are the
/// transport's concern. Non-2xx responses come back as the matching
/// [`ClientError`](crate::ClientError) variant.
pub struct DatamonsterApi<T> {
    transport: T,
}

impl<T: Transport> DatamonsterApi<T> {
    /// Wraps `transport`; nothing is sent until the first call.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches the settlements visible to the current session (`GET /api/settlements`).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` without a valid session, other status errors as
    /// classified by [`ClientError::from_status`](crate::ClientError::from_status), and
    /// `ClientError::Decode` if the body is not a settlement list.
    pub async fn list_settlements(&self) -> ClientResult<Vec<Settlement>> {
        self.transport
            .send(ApiRequest::new(Method::Get, ["api", "settlements"]))
            .await?
            .json()
    }

    /// Creates a settlement (`POST /api/settlements`).
    ///
    /// # Arguments
    ///
    /// * `body` - Creation body holding an already validated name
    ///
    /// # Returns
    ///
    /// The settlement as stored by the server, including its new id.
    pub async fn create_settlement(&self, body: &NewSettlement) -> ClientResult<Settlement> {
        let body = serde_json::to_value(body).map_err(CoreError::Serialization)?;
        self.transport
            .send(ApiRequest::new(Method::Post, ["api", "settlements"]).with_body(body))
            .await?
            .json()
    }

    /// Fetches every survivor of `settlement_id`. Used to reload after an edit.
    pub async fn list_survivors(&self, settlement_id: &str) -> ClientResult<Vec<Survivor>> {
        self.transport
            .send(ApiRequest::new(Method::Get, survivors_path(settlement_id)))
            .await?
            .json()
    }

    /// Creates a survivor in the settlement named by `body.settlement_id`.
    ///
    /// # Returns
    ///
    /// The survivor as stored by the server, including its new id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Core` if the body cannot be serialised, otherwise the same
    /// classification as [`list_settlements`](Self::list_settlements).
    pub async fn create_survivor(&self, body: &NewSurvivor) -> ClientResult<Survivor> {
        let segments = survivors_path(&body.settlement_id);
        let body = serde_json::to_value(body).map_err(CoreError::Serialization)?;
        self.transport
            .send(ApiRequest::new(Method::Post, segments).with_body(body))
            .await?
            .json()
    }

    /// Sends a sparse update for one survivor.
    ///
    /// The response body is not used; callers reload instead.
    ///
    /// # Arguments
    ///
    /// * `settlement_id` - Settlement owning the survivor
    /// * `survivor_id` - Survivor to update
    /// * `patch` - Only the fields that changed
    pub async fn update_survivor(
        &self,
        settlement_id: &str,
        survivor_id: &str,
        patch: &PatchPayload,
    ) -> ClientResult<()> {
        let mut segments = survivors_path(settlement_id);
        segments.push(survivor_id.to_owned());
        self.transport
            .send(ApiRequest::new(Method::Patch, segments).with_body(patch.to_json()?))
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Fetches the disorder and fighting art glossary.
    pub async fn glossary(&self) -> ClientResult<Glossary> {
        self.transport
            .send(ApiRequest::new(Method::Get, ["api", "glossary"]))
            .await?
            .json()
    }
}

fn survivors_path(settlement_id: &str) -> Vec<String> {
    vec![
        "api".to_owned(),
        "settlements".to_owned(),
        settlement_id.to_owned(),
        "survivors".to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::transport::ApiResponse;
    use crate::ClientError;

    #[tokio::test]
    async fn test_list_survivors_path() {
        let mock = MockTransport::new();
        mock.push_response(ApiResponse::new(200, "[]"));
        let api = DatamonsterApi::new(mock);

        let survivors = api.list_survivors("12").await.unwrap();

        assert!(survivors.is_empty());
        let sent = api.transport().requests();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].path(), "/api/settlements/12/survivors");
    }

    #[tokio::test]
    async fn test_update_survivor_ignores_response_body() {
        let mock = MockTransport::new();
        mock.push_response(ApiResponse::new(204, ""));
        let api = DatamonsterApi::new(mock);

        let mut patch = PatchPayload::default();
        patch.stat_updates.insert("survival".into(), 3);
        api.update_survivor("12", "s-9", &patch).await.unwrap();

        let sent = api.transport().requests();
        assert_eq!(sent[0].method, Method::Patch);
        assert_eq!(sent[0].path(), "/api/settlements/12/survivors/s-9");
        assert_eq!(
            sent[0].body,
            Some(serde_json::json!({"statUpdates": {"survival": 3}}))
        );
    }

    #[tokio::test]
    async fn test_ids_stay_single_segments() {
        let mock = MockTransport::new();
        mock.push_response(ApiResponse::new(200, ""));
        let api = DatamonsterApi::new(mock);

        api.update_survivor("12/x", "s?9#", &PatchPayload::default())
            .await
            .unwrap();

        let sent = api.transport().requests();
        assert_eq!(
            sent[0].segments,
            vec!["api", "settlements", "12/x", "survivors", "s?9#"]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_passed_through() {
        let mock = MockTransport::new();
        mock.push_error(ClientError::Unavailable { status: 503 });
        let api = DatamonsterApi::new(mock);

        let result = api.list_settlements().await;
        assert!(matches!(result, Err(ClientError::Unavailable { status: 503 })));
    }

    #[tokio::test]
    async fn test_unauthorized_glossary() {
        let mock = MockTransport::new();
        mock.push_response(ApiResponse::new(401, ""));
        let api = DatamonsterApi::new(mock);

        assert!(matches!(api.glossary().await, Err(ClientError::Unauthorized)));
    }
}
