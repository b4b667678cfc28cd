use seed::browser::fetch::{Method, Request};
use shared::{Candidate, DistanceMatrixRequest, SearchHit};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response status: {0}")]
    Status(String),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<seed::browser::fetch::FetchError> for FetchError {
    fn from(err: seed::browser::fetch::FetchError) -> Self {
        FetchError::Transport(format!("{err:?}"))
    }
}

/// Client for the location service: autosuggest and distance matrix.
#[derive(Debug, Clone)]
pub struct LocationResolverClient {
    root: String,
}

impl LocationResolverClient {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(&self, text: &str) -> Result<Url, FetchError> {
        Ok(Url::parse_with_params(
            &format!("{}/search", self.root),
            &[("text", text)],
        )?)
    }

    pub fn distance_matrix_url(&self) -> String {
        format!("{}/distance-matrix", self.root)
    }

    pub async fn autosuggest(&self, text: &str) -> Result<Vec<Candidate>, FetchError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.search_url(text)?;
        tracing::debug!("autosuggest {url}");
        let response = Request::new(url.as_str())
            .method(Method::Get)
            .fetch()
            .await?
            .check_status()
            .map_err(|err| FetchError::Status(format!("{err:?}")))?;
        let body = response.text().await?;
        parse_candidates(&body)
    }

    pub async fn distance_matrix(
        &self,
        request: &DistanceMatrixRequest,
    ) -> Result<Vec<f64>, FetchError> {
        tracing::debug!(
            points = request.latitudes.len(),
            unit = %request.unit,
            "distance matrix"
        );
        let response = Request::new(self.distance_matrix_url())
            .method(Method::Post)
            .json(request)?
            .fetch()
            .await?
            .check_status()
            .map_err(|err| FetchError::Status(format!("{err:?}")))?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Decodes a `/search` body, keeping only hits that form a valid [`Candidate`].
pub fn parse_candidates(body: &str) -> Result<Vec<Candidate>, FetchError> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)?;
    let total = hits.len();
    let candidates: Vec<Candidate> = hits
        .into_iter()
        .filter_map(|hit| match Candidate::try_from(hit) {
            Ok(candidate) => Some(candidate),
            Err(err) => {
                tracing::warn!("dropping search hit: {err}");
                None
            }
        })
        .collect();
    if candidates.len() < total {
        tracing::debug!(kept = candidates.len(), total, "filtered search hits");
    }
    Ok(candidates)
}
