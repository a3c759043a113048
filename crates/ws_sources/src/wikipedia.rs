use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;
use ws_core::{Article, ArticleSource, Error, Result, Thumbnail};

pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    /// Base of the REST API, `.../api/rest_v1`
    pub rest_base_url: String,
    /// The action API endpoint, `.../w/api.php`
    pub api_base_url: String,
    /// Prefix for building page links when the provider gives none
    pub page_base_url: String,
    pub thumbnail_size: u32,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            rest_base_url: "https://en.wikipedia.org/api/rest_v1".to_string(),
            api_base_url: "https://en.wikipedia.org/w/api.php".to_string(),
            page_base_url: "https://en.wikipedia.org/wiki/".to_string(),
            thumbnail_size: 500,
            user_agent: concat!("wisdomscroll/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl WikipediaConfig {
    /// Point both APIs at another host, keeping the usual paths.
    pub fn with_host(mut self, host: &str) -> Self {
        let host = host.trim_end_matches('/');
        self.rest_base_url = format!("{}/api/rest_v1", host);
        self.api_base_url = format!("{}/w/api.php", host);
        self.page_base_url = format!("{}/wiki/", host);
        self
    }
}

#[derive(Debug, Deserialize)]
struct RandomSummary {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    #[serde(default)]
    desktop: Option<PageUrls>,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    #[serde(default)]
    page: Option<String>,
}

impl RandomSummary {
    fn desktop_url(&self) -> Option<&str> {
        self.content_urls
            .as_ref()?
            .desktop
            .as_ref()?
            .page
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, QueryPage>,
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    pageid: Option<u64>,
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pageimage: Option<String>,
    #[serde(default)]
    fullurl: Option<String>,
    /// Rank within search results
    #[serde(default)]
    index: Option<u32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub struct WikipediaSource {
    client: Client,
    config: WikipediaConfig,
}

impl WikipediaSource {
    pub fn new() -> Result<Self> {
        Self::with_config(WikipediaConfig::default())
    }

    pub fn with_config(config: WikipediaConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WikipediaConfig {
        &self.config
    }

    /// Link to a page by title, percent-encoding it as a single path segment.
    pub fn page_url(&self, title: &str) -> String {
        match Url::parse(&self.config.page_base_url) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().push(title);
                }
                url.to_string()
            }
            Err(_) => format!("{}{}", self.config.page_base_url, title),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("{} request failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!("{} returned HTTP {}", what, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Upstream(format!("{} returned malformed data: {}", what, e)))
    }

    async fn random_summary(&self) -> Result<RandomSummary> {
        let url = format!("{}/page/random/summary", self.config.rest_base_url);
        self.get_json(self.client.get(url), "random summary").await
    }

    async fn page_details(&self, title: &str) -> Result<QueryPage> {
        let thumb_size = self.config.thumbnail_size.to_string();
        let request = self.client.get(&self.config.api_base_url).query(&[
            ("action", "query"),
            ("format", "json"),
            ("prop", "extracts|pageimages|info"),
            ("exintro", "true"),
            ("exlimit", "1"),
            ("explaintext", "true"),
            ("titles", title),
            ("piprop", "thumbnail"),
            ("pithumbsize", thumb_size.as_str()),
            ("pilimit", "1"),
            ("inprop", "url"),
        ]);

        let response: QueryResponse = self.get_json(request, "page details").await?;
        response
            .query
            .and_then(|q| q.pages.into_values().next())
            .ok_or_else(|| Error::Upstream(format!("no page details for {:?}", title)))
    }

    fn normalize_random(&self, summary: RandomSummary, page: QueryPage) -> Result<Article> {
        let id = page
            .pageid
            .ok_or_else(|| Error::Upstream(format!("page {:?} has no id", page.title)))?;

        let url = match summary.desktop_url() {
            Some(url) => url.to_string(),
            None => self.page_url(&page.title),
        };

        let extract = non_empty(page.extract)
            .or_else(|| non_empty(summary.extract))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Ok(Article {
            id,
            title: page.title,
            extract,
            thumbnail: page.thumbnail,
            page_image: page.pageimage,
            url,
        })
    }

    fn normalize_search_hit(&self, page: QueryPage) -> Option<Article> {
        let id = page.pageid?;
        let url = match non_empty(page.fullurl) {
            Some(url) => url,
            None => self.page_url(&page.title),
        };
        Some(Article {
            id,
            extract: non_empty(page.extract).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            title: page.title,
            thumbnail: page.thumbnail,
            page_image: page.pageimage,
            url,
        })
    }

    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        let limit = limit.to_string();
        let thumb_size = self.config.thumbnail_size.to_string();
        let request = self.client.get(&self.config.api_base_url).query(&[
            ("action", "query"),
            ("format", "json"),
            ("prop", "extracts|pageimages|info"),
            ("generator", "search"),
            ("gsrsearch", query),
            ("gsrlimit", limit.as_str()),
            ("exintro", "true"),
            ("explaintext", "true"),
            ("piprop", "thumbnail"),
            ("pithumbsize", thumb_size.as_str()),
            ("inprop", "url"),
        ]);

        let response: QueryResponse = self.get_json(request, "search").await?;
        let Some(body) = response.query else {
            return Ok(vec![]);
        };

        let mut pages: Vec<QueryPage> = body.pages.into_values().collect();
        pages.sort_by_key(|p| (p.index.unwrap_or(u32::MAX), p.pageid.unwrap_or(0)));

        Ok(pages
            .into_iter()
            .filter_map(|page| self.normalize_search_hit(page))
            .collect())
    }
}

#[async_trait]
impl ArticleSource for WikipediaSource {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    async fn fetch_random_article(&self) -> Result<Article> {
        let summary = self.random_summary().await?;
        let page = self.page_details(&summary.title).await?;
        let article = self.normalize_random(summary, page)?;
        tracing::debug!("Fetched random article {} ({})", article.title, article.id);
        Ok(article)
    }

    async fn search_articles(&self, query: &str, limit: usize) -> Vec<Article> {
        match self.try_search(query, limit).await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {}", query, e);
                vec![]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    async fn random_summary() -> Json<Value> {
        Json(json!({
            "title": "Halley's Comet",
            "extract": "Summary extract used when the page has none.",
            "content_urls": { "desktop": { "page": "https://en.wikipedia.org/wiki/Halley%27s_Comet" } }
        }))
    }

    async fn action_api(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        if params.get("generator").map(String::as_str) == Some("search") {
            return Json(json!({
                "query": { "pages": {
                    "300": { "pageid": 300, "title": "Second hit", "index": 2, "extract": "" },
                    "100": { "pageid": 100, "title": "First hit", "index": 1,
                             "extract": "The best match.", "fullurl": "https://example.org/First" }
                } }
            }));
        }

        match params.get("titles").map(String::as_str) {
            Some("Halley's Comet") => Json(json!({
                "query": { "pages": { "12345": {
                    "pageid": 12345,
                    "title": "Halley's Comet",
                    "thumbnail": { "source": "https://upload.example/halley.jpg", "width": 500, "height": 333 },
                    "pageimage": "Halley.jpg",
                    "fullurl": "https://en.wikipedia.org/wiki/Halley%27s_Comet"
                } } }
            })),
            _ => Json(json!({ "batchcomplete": "" })),
        }
    }

    async fn spawn_wiki(router: Router) -> WikipediaSource {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let config = WikipediaConfig::default().with_host(&format!("http://{}", addr));
        WikipediaSource::with_config(config).unwrap()
    }

    fn fake_wiki() -> Router {
        Router::new()
            .route("/api/rest_v1/page/random/summary", get(random_summary))
            .route("/w/api.php", get(action_api))
    }

    #[tokio::test]
    async fn test_fetch_random_article_merges_summary_and_details() {
        let source = spawn_wiki(fake_wiki()).await;
        let article = source.fetch_random_article().await.unwrap();

        assert_eq!(article.id, 12345);
        assert_eq!(article.title, "Halley's Comet");
        // page extract was absent, so the summary's one is used
        assert_eq!(article.extract, "Summary extract used when the page has none.");
        assert_eq!(article.url, "https://en.wikipedia.org/wiki/Halley%27s_Comet");
        assert_eq!(article.page_image.as_deref(), Some("Halley.jpg"));
        assert_eq!(article.thumbnail.unwrap().width, 500);
    }

    #[tokio::test]
    async fn test_upstream_status_is_an_error() {
        let router = Router::new().route(
            "/api/rest_v1/page/random/summary",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let source = spawn_wiki(router).await;

        let err = source.fetch_random_article().await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert!(source.fetch_random_articles(3).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_details_is_an_error() {
        let router = Router::new()
            .route(
                "/api/rest_v1/page/random/summary",
                get(|| async { Json(json!({ "title": "Nowhere" })) }),
            )
            .route("/w/api.php", get(action_api));
        let source = spawn_wiki(router).await;

        assert!(matches!(
            source.fetch_random_article().await,
            Err(Error::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn test_search_orders_by_rank_and_fills_gaps() {
        let source = spawn_wiki(fake_wiki()).await;
        let hits = source.search_articles("comet", 3).await;

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "First hit");
        assert_eq!(hits[0].url, "https://example.org/First");
        assert_eq!(hits[1].extract, NO_DESCRIPTION);
        assert!(hits[1].url.ends_with("/wiki/Second%20hit"));
    }

    #[tokio::test]
    async fn test_search_failure_is_empty() {
        let config = WikipediaConfig {
            timeout: Duration::from_millis(500),
            ..WikipediaConfig::default().with_host("http://127.0.0.1:9")
        };
        let source = WikipediaSource::with_config(config).unwrap();
        assert!(source.search_articles("anything", 3).await.is_empty());
    }

    #[test]
    fn test_page_url_encodes_title() {
        let source = WikipediaSource::new().unwrap();
        assert_eq!(
            source.page_url("C++ (language)/history"),
            "https://en.wikipedia.org/wiki/C++%20(language)%2Fhistory"
        );
    }
}
