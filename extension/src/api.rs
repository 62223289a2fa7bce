use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use stance_shared::{
    CommandRequest, Error, ErrorCode, PostId, RenderedPost, SelectRequest, StanceKind, TallyView, VoteOutcome,
};
use crate::config::CONFIG;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub code: Option<ErrorCode>,
    pub message: String,
}

impl ApiFailure {
    fn transport(e: impl ToString) -> Self {
        Self { code: None, message: e.to_string() }
    }
}

fn post_url(id: &PostId, tail: &str) -> String {
    let encoded: String = js_sys::encode_uri_component(id.as_str()).into();
    format!("{}/posts/{}/{}", CONFIG.api_base_url, encoded, tail)
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiFailure> {
    if response.ok() {
        return response.json::<T>().await.map_err(ApiFailure::transport);
    }
    let status = response.status();
    match response.json::<Error>().await {
        Ok(error) => Err(ApiFailure { code: Some(error.code), message: error.message }),
        Err(_) => Err(ApiFailure { code: None, message: format!("Request failed with status {}", status) }),
    }
}

pub async fn fetch_feed() -> Result<Vec<RenderedPost>, ApiFailure> {
    let response = Request::get(&format!("{}/feed", CONFIG.api_base_url))
        .send()
        .await
        .map_err(ApiFailure::transport)?;
    read(response).await
}

pub async fn select_stance(id: &PostId, stance: StanceKind) -> Result<VoteOutcome, ApiFailure> {
    let body = SelectRequest { stance: stance.as_str().to_string() };
    let response = Request::post(&post_url(id, "stance"))
        .json(&body)
        .map_err(ApiFailure::transport)?
        .send()
        .await
        .map_err(ApiFailure::transport)?;
    read(response).await
}

pub async fn open_surface(id: &PostId) -> Result<TallyView, ApiFailure> {
    let response = Request::post(&post_url(id, "surface"))
        .send()
        .await
        .map_err(ApiFailure::transport)?;
    read(response).await
}

pub async fn close_surface(id: &PostId) -> Result<(), ApiFailure> {
    let response = Request::delete(&post_url(id, "surface"))
        .send()
        .await
        .map_err(ApiFailure::transport)?;
    // already closed on the tracker side is fine
    if response.ok() || response.status() == 404 {
        Ok(())
    } else {
        Err(ApiFailure { code: None, message: format!("Request failed with status {}", response.status()) })
    }
}

pub async fn tag_active_post(stance: StanceKind) -> Result<VoteOutcome, ApiFailure> {
    let body = CommandRequest { stance: stance.as_str().to_string() };
    let response = Request::post(&format!("{}/command/stance", CONFIG.api_base_url))
        .json(&body)
        .map_err(ApiFailure::transport)?
        .send()
        .await
        .map_err(ApiFailure::transport)?;
    read(response).await
}
