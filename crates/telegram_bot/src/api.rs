use api_types::{
    catalog::ServicesResponse,
    close::CloseDayResponse,
    line_item::{Created, ExpenseNew, LineItemPatch, ListResponse, ServiceLogNew, SessionNew},
    log_channel::{LogChannelResponse, LogChannelSet},
    search::SearchResponse,
    summary::Summary,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Which record family a command targets, mapped to its route root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CategoryPath {
    Sessions,
    ServiceLogs,
    Expenses,
}

impl CategoryPath {
    pub(crate) fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "pc" | "pcs" | "session" | "sessions" => Some(Self::Sessions),
            "service" | "services" => Some(Self::ServiceLogs),
            "expense" | "expenses" => Some(Self::Expenses),
            _ => None,
        }
    }

    fn root(self) -> &'static str {
        match self {
            Self::Sessions => "/sessions",
            Self::ServiceLogs => "/serviceLogs",
            Self::Expenses => "/expenses",
        }
    }

    pub(crate) fn noun(self) -> &'static str {
        match self {
            Self::Sessions => "PC session",
            Self::ServiceLogs => "service",
            Self::Expenses => "expense",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
}

async fn into_api_result<TResp: for<'de> serde::Deserialize<'de>>(
    resp: reqwest::Response,
) -> Result<TResp, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<TResp>().await?);
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(err) => err.error,
        Err(_) => "server error".to_string(),
    };
    Err(ApiError::Server { status, message })
}

async fn into_unit_result(resp: reqwest::Response) -> Result<(), ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(err) => err.error,
        Err(_) => "server error".to_string(),
    };
    Err(ApiError::Server { status, message })
}

impl ApiClient {
    pub(crate) fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json<TReq: serde::Serialize + ?Sized, TResp: for<'de> serde::Deserialize<'de>>(
        &self,
        telegram_user_id: u64,
        path: &str,
        body: &TReq,
    ) -> Result<TResp, ApiError> {
        let resp = self
            .client
            .post(self.url(path))
            .header("telegram-user-id", telegram_user_id.to_string())
            .json(body)
            .send()
            .await?;
        into_api_result(resp).await
    }

    async fn get_json<TResp: for<'de> serde::Deserialize<'de>>(
        &self,
        telegram_user_id: u64,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<TResp, ApiError> {
        let resp = self
            .client
            .get(self.url(path))
            .header("telegram-user-id", telegram_user_id.to_string())
            .query(query)
            .send()
            .await?;
        into_api_result(resp).await
    }

    pub(crate) async fn create_session(
        &self,
        telegram_user_id: u64,
        payload: &SessionNew,
    ) -> Result<Created, ApiError> {
        self.post_json(telegram_user_id, "/sessions", payload).await
    }

    pub(crate) async fn create_service_log(
        &self,
        telegram_user_id: u64,
        payload: &ServiceLogNew,
    ) -> Result<Created, ApiError> {
        self.post_json(telegram_user_id, "/serviceLogs", payload)
            .await
    }

    pub(crate) async fn create_expense(
        &self,
        telegram_user_id: u64,
        payload: &ExpenseNew,
    ) -> Result<Created, ApiError> {
        self.post_json(telegram_user_id, "/expenses", payload).await
    }

    pub(crate) async fn summary(&self, telegram_user_id: u64) -> Result<Summary, ApiError> {
        self.get_json(telegram_user_id, "/summary", &[]).await
    }

    pub(crate) async fn list(
        &self,
        telegram_user_id: u64,
        category: CategoryPath,
    ) -> Result<ListResponse, ApiError> {
        self.get_json(telegram_user_id, category.root(), &[]).await
    }

    pub(crate) async fn search(
        &self,
        telegram_user_id: u64,
        query: &str,
    ) -> Result<SearchResponse, ApiError> {
        self.get_json(telegram_user_id, "/search", &[("q", query)])
            .await
    }

    pub(crate) async fn edit(
        &self,
        telegram_user_id: u64,
        category: CategoryPath,
        id: &str,
        payload: &LineItemPatch,
    ) -> Result<(), ApiError> {
        let resp = self
            .client
            .patch(self.url(&format!("{}/{id}", category.root())))
            .header("telegram-user-id", telegram_user_id.to_string())
            .json(payload)
            .send()
            .await?;
        into_unit_result(resp).await
    }

    pub(crate) async fn delete(
        &self,
        telegram_user_id: u64,
        category: CategoryPath,
        id: &str,
    ) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(self.url(&format!("{}/{id}", category.root())))
            .header("telegram-user-id", telegram_user_id.to_string())
            .send()
            .await?;
        into_unit_result(resp).await
    }

    pub(crate) async fn close_day(
        &self,
        telegram_user_id: u64,
    ) -> Result<CloseDayResponse, ApiError> {
        let resp = self
            .client
            .post(self.url("/closeDay"))
            .header("telegram-user-id", telegram_user_id.to_string())
            .send()
            .await?;
        into_api_result(resp).await
    }

    pub(crate) async fn services(
        &self,
        telegram_user_id: u64,
    ) -> Result<ServicesResponse, ApiError> {
        self.get_json(telegram_user_id, "/services", &[("available", "true")])
            .await
    }

    pub(crate) async fn set_log_channel(
        &self,
        telegram_user_id: u64,
        channel_id: Option<i64>,
    ) -> Result<LogChannelResponse, ApiError> {
        self.post_json(
            telegram_user_id,
            "/logChannel",
            &LogChannelSet { channel_id },
        )
        .await
    }

    pub(crate) async fn log_channel(
        &self,
        telegram_user_id: u64,
    ) -> Result<LogChannelResponse, ApiError> {
        self.get_json(telegram_user_id, "/logChannel", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_accepts_aliases() {
        assert_eq!(CategoryPath::parse("pc"), Some(CategoryPath::Sessions));
        assert_eq!(CategoryPath::parse("Sessions"), Some(CategoryPath::Sessions));
        assert_eq!(
            CategoryPath::parse("service"),
            Some(CategoryPath::ServiceLogs)
        );
        assert_eq!(
            CategoryPath::parse("EXPENSES"),
            Some(CategoryPath::Expenses)
        );
        assert_eq!(CategoryPath::parse("drinks"), None);
    }
}
