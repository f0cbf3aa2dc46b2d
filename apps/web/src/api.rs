use nixvis_dashboard::{
    DashboardError, DateRange, OverallStats, RankingKind, RankingRow, Result, StatsEndpoint,
    StatsSource, Website, WebsiteList,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// One bucket of the traffic chart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrafficPoint {
    pub label: String,
    #[serde(default)]
    pub pv: u64,
    #[serde(default)]
    pub uv: u64,
}

/// Stats API client over the browser `fetch`.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    endpoint: StatsEndpoint,
    same_origin: bool,
}

impl HttpStatsSource {
    pub fn new(api_base: &str) -> Self {
        Self {
            endpoint: StatsEndpoint::new(api_base),
            same_origin: api_base.trim().is_empty(),
        }
    }

    pub async fn fetch_timeseries(
        &self,
        website_id: &str,
        range: DateRange,
    ) -> Result<Vec<TrafficPoint>> {
        self.get_json(self.endpoint.stats("timeseries", website_id, range, None))
            .await
    }

    pub async fn fetch_locations(
        &self,
        website_id: &str,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<RankingRow>> {
        self.get_json(self.endpoint.stats("location", website_id, range, Some(limit)))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let window =
            web_sys::window().ok_or_else(|| DashboardError::request(&url, "no window object"))?;

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(if self.same_origin {
            RequestMode::SameOrigin
        } else {
            RequestMode::Cors
        });

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|error| DashboardError::request(&url, describe_js(&error)))?;

        let response_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|error| DashboardError::request(&url, describe_js(&error)))?;

        let response = response_value
            .dyn_into::<Response>()
            .map_err(|_| DashboardError::request(&url, "fetch did not return a Response"))?;

        if !response.ok() {
            return Err(DashboardError::Status {
                endpoint: url,
                status: response.status(),
            });
        }

        let body = response
            .json()
            .map_err(|error| DashboardError::decode(&url, describe_js(&error)))?;
        let json = JsFuture::from(body)
            .await
            .map_err(|error| DashboardError::decode(&url, describe_js(&error)))?;

        debug!(endpoint = %url, "response received");
        serde_wasm_bindgen::from_value(json)
            .map_err(|error| DashboardError::decode(&url, error.to_string()))
    }
}

impl StatsSource for HttpStatsSource {
    async fn fetch_websites(&self) -> Result<Vec<Website>> {
        let list: WebsiteList = self.get_json(self.endpoint.websites()).await?;
        Ok(list.websites)
    }

    async fn fetch_overall(&self, website_id: &str, range: DateRange) -> Result<OverallStats> {
        self.get_json(self.endpoint.overall(website_id, range)).await
    }

    async fn fetch_ranking(
        &self,
        kind: RankingKind,
        website_id: &str,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<RankingRow>> {
        self.get_json(self.endpoint.ranking(kind, website_id, range, limit))
            .await
    }
}

/// Best-effort message for a thrown JS value.
pub fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
