use api_types::{
    ErrorBody,
    bill::{BillNew, BillUpdate, BillView},
    group::GroupDetail,
    page::{Page, PageQuery},
    summary::SummaryResponse,
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::{ClientError, Result};

/// REST client for the accounting service.
///
/// Authentication is handled elsewhere: the client only attaches the bearer
/// token it was given.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        // `Url::join` drops the last path segment unless it ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|err| ClientError::Url(format!("{base_url}: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Url(format!("{path}: {err}")))?;
        tracing::debug!("{method} {endpoint}");
        let builder = self.http.request(method, endpoint);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn check(res: Response) -> Result<Response> {
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.detail)
            .unwrap_or_else(|_| {
                if text.trim().is_empty() {
                    "Something went wrong".to_string()
                } else {
                    text
                }
            });
        tracing::debug!("request failed with {status}: {message}");
        Err(ClientError::from_status(status, message))
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let res = Self::check(builder.send().await?).await?;
        Ok(res.json::<T>().await?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        Self::send(self.request(method, path)?.json(body)).await
    }

    /// Bills of one group, newest first, optionally filtered by `search`.
    pub async fn bills_by_group(&self, group_id: Uuid, query: &PageQuery) -> Result<Page<BillView>> {
        let path = format!("bills/group/{group_id}");
        Self::send(self.request(Method::GET, &path)?.query(query)).await
    }

    /// Every bill visible to the signed-in user, newest first.
    pub async fn activity(&self, query: &PageQuery) -> Result<Page<BillView>> {
        Self::send(self.request(Method::GET, "bills/")?.query(query)).await
    }

    pub async fn bill(&self, bill_id: Uuid) -> Result<BillView> {
        Self::send(self.request(Method::GET, &format!("bills/{bill_id}"))?).await
    }

    pub async fn create_bill(&self, payload: &BillNew) -> Result<BillView> {
        self.send_json(Method::POST, "bills/", payload).await
    }

    pub async fn update_bill(&self, bill_id: Uuid, payload: &BillUpdate) -> Result<BillView> {
        self.send_json(Method::PATCH, &format!("bills/{bill_id}"), payload)
            .await
    }

    pub async fn delete_bill(&self, bill_id: Uuid) -> Result<()> {
        let res = self
            .request(Method::DELETE, &format!("bills/{bill_id}"))?
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    pub async fn group_detail(&self, group_id: Uuid) -> Result<GroupDetail> {
        Self::send(self.request(Method::GET, &format!("groups/{group_id}"))?).await
    }

    /// Removes a membership. The service may refuse even when the advisory
    /// [`engine::can_remove`] allowed it; that refusal comes back as an error.
    pub async fn remove_member(&self, group_id: Uuid, membership_id: Uuid) -> Result<()> {
        let res = self
            .request(
                Method::DELETE,
                &format!("groups/{group_id}/members/{membership_id}"),
            )?
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    /// Server-side owed/owe totals, for one group or across all of them.
    pub async fn summary(&self, group_id: Option<Uuid>) -> Result<SummaryResponse> {
        let mut builder = self.request(Method::GET, "summary/")?;
        if let Some(group_id) = group_id {
            builder = builder.query(&[("group_id", group_id.to_string())]);
        }
        Self::send(builder).await
    }
}
