// API client module: a small blocking HTTP client for the TMDB v3 API.
// Responses are handed back as raw JSON so they can be written out
// untouched; typed views are decoded from them for display only.

use crate::config::{APPEND_TO_RESPONSE, LANGUAGE};
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

/// Compose `base + path` and append each `(name, value)` pair in order,
/// form-encoded.
pub fn build_target(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(&format!("{base}{path}"))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

/// The two read-only calls a lookup session needs.
pub trait MovieService {
    /// Text search; the body holds a `results` array.
    fn search(&self, query: &str, api_key: &str) -> Result<Value>;

    /// Extended record for one movie, including videos and images.
    fn details(&self, id: u64, api_key: &str) -> Result<Value>;
}

/// Blocking TMDB client holding a reqwest client and the API base URL.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("movie-lookup/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(TmdbClient {
            client,
            base_url: base_url.into(),
        })
    }

    /// Single-shot GET; a non-success status is mapped through `on_status`.
    fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
        on_status: fn(StatusCode) -> Error,
    ) -> Result<Value> {
        let url = build_target(&self.base_url, path, params)?;
        tracing::debug!(path, "sending TMDB request");

        let res = self.client.get(url).send()?;
        let status = res.status();
        if !status.is_success() {
            tracing::debug!(path, %status, "TMDB request rejected");
            return Err(on_status(status));
        }
        let body: Value = res.json()?;
        tracing::debug!(path, "TMDB response parsed");
        Ok(body)
    }
}

impl MovieService for TmdbClient {
    fn search(&self, query: &str, api_key: &str) -> Result<Value> {
        self.get_json(
            "/search/movie",
            &[
                ("query", query),
                ("api_key", api_key),
                ("language", LANGUAGE),
                ("include_adult", "false"),
            ],
            |status| Error::SearchRequest { status },
        )
    }

    fn details(&self, id: u64, api_key: &str) -> Result<Value> {
        self.get_json(
            &format!("/movie/{id}"),
            &[
                ("api_key", api_key),
                ("language", LANGUAGE),
                ("append_to_response", APPEND_TO_RESPONSE),
            ],
            |status| Error::DetailsRequest { status },
        )
    }
}

/// The first `limit` hits of a search response, in service order.
///
/// Only the hits that will be shown are inspected, so trailing entries
/// with odd shapes never abort a lookup.
pub fn top_results(raw: &Value, limit: usize) -> Result<Vec<MovieSummary>> {
    let results = raw
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::MalformedResponse("search response has no results array".into()))?;
    Ok(results.iter().take(limit).map(MovieSummary::from_raw).collect())
}

/// One search hit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieSummary {
    pub id: Option<u64>,
    pub title: String,
    pub release_date: Option<String>,
}

impl MovieSummary {
    pub fn from_raw(raw: &Value) -> Self {
        MovieSummary {
            id: raw.get("id").and_then(Value::as_u64),
            title: field_text(raw, "title"),
            release_date: raw
                .get("release_date")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// The identifier needed to fetch details for this hit.
    pub fn require_id(&self) -> Result<u64> {
        self.id
            .ok_or_else(|| Error::MalformedResponse(format!("\"{}\" has no numeric id", self.title)))
    }
}

/// The displayed subset of a details response, already rendered as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub original_title: String,
    pub release_date: String,
    pub vote_average: String,
    pub vote_count: String,
    pub overview: String,
}

impl MovieDetails {
    pub fn from_raw(raw: &Value) -> Self {
        MovieDetails {
            title: field_text(raw, "title"),
            original_title: field_text(raw, "original_title"),
            release_date: field_text(raw, "release_date"),
            vote_average: field_text(raw, "vote_average"),
            vote_count: field_text(raw, "vote_count"),
            overview: field_text(raw, "overview"),
        }
    }
}

/// Literal text of `raw[key]`: strings unquoted, absent or null as empty,
/// anything else in its JSON form. Whole floats print without `.0`.
pub fn field_text(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.is_f64() => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn target_keeps_param_order_and_encodes_values() {
        let url = build_target(
            "https://api.themoviedb.org/3",
            "/search/movie",
            &[("query", "Amélie & co?"), ("api_key", "k=1"), ("language", "en-US")],
        )
        .unwrap();

        assert_eq!(url.path(), "/3/search/movie");
        assert_eq!(
            url.query(),
            Some("query=Am%C3%A9lie+%26+co%3F&api_key=k%3D1&language=en-US")
        );

        let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            decoded,
            vec![
                ("query".to_string(), "Amélie & co?".to_string()),
                ("api_key".to_string(), "k=1".to_string()),
                ("language".to_string(), "en-US".to_string()),
            ]
        );
    }

    #[test]
    fn target_without_params_has_no_query() {
        let url = build_target("https://api.themoviedb.org/3", "/movie/27205", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.themoviedb.org/3/movie/27205");
    }

    #[test]
    fn search_sends_fixed_params_and_returns_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", Matcher::Regex(r"^/3/search/movie".into()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "Inception".into()),
                Matcher::UrlEncoded("api_key".into(), "secret".into()),
                Matcher::UrlEncoded("language".into(), "en-US".into()),
                Matcher::UrlEncoded("include_adult".into(), "false".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"page":1,"results":[{"id":27205,"title":"Inception"}]}"#)
            .create();

        let client = TmdbClient::new(format!("{}/3", server.url())).unwrap();
        let body = client.search("Inception", "secret").unwrap();

        mock.assert();
        assert_eq!(body["results"][0]["id"], json!(27205));
    }

    #[test]
    fn details_requests_videos_and_images() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", Matcher::Regex(r"^/3/movie/27205".into()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "secret".into()),
                Matcher::UrlEncoded("language".into(), "en-US".into()),
                Matcher::UrlEncoded("append_to_response".into(), "videos,images".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":27205,"title":"Inception","videos":{"results":[]}}"#)
            .create();

        let client = TmdbClient::new(format!("{}/3", server.url())).unwrap();
        let body = client.details(27205, "secret").unwrap();

        mock.assert();
        assert_eq!(body["title"], json!("Inception"));
    }

    #[test]
    fn non_success_status_maps_to_request_errors() {
        let mut server = mockito::Server::new();
        let _search = server
            .mock("GET", Matcher::Regex(r"^/3/search/movie".into()))
            .with_status(401)
            .with_body(r#"{"status_message":"Invalid API key"}"#)
            .create();
        let _details = server
            .mock("GET", Matcher::Regex(r"^/3/movie/".into()))
            .with_status(404)
            .create();

        let client = TmdbClient::new(format!("{}/3", server.url())).unwrap();

        match client.search("x", "bad").unwrap_err() {
            Error::SearchRequest { status } => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("unexpected error: {other}"),
        }
        match client.details(1, "bad").unwrap_err() {
            Error::DetailsRequest { status } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_shown_hits_are_inspected() {
        let mut results: Vec<Value> = (1..=5)
            .map(|i| json!({"id": i, "title": format!("Film {i}")}))
            .collect();
        results.push(json!({"title": "no id six"}));
        results.push(json!("not even an object"));

        let hits = top_results(&json!({ "results": results }), 5).unwrap();

        assert_eq!(hits.len(), 5);
        assert_eq!(hits[4].id, Some(5));
        assert_eq!(hits[0].title, "Film 1");
    }

    #[test]
    fn hit_without_id_only_fails_when_selected() {
        let hits = top_results(&json!({"results": [{"title": "Loose", "release_date": 2010}]}), 5).unwrap();
        assert_eq!(hits[0].release_date, None);
        assert!(matches!(hits[0].require_id(), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn search_without_results_is_malformed() {
        let err = top_results(&json!({"page": 1}), 5).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn detail_fields_render_literally() {
        let details = MovieDetails::from_raw(&json!({
            "title": 42,
            "original_title": null,
            "vote_average": 8.0,
            "vote_count": "many",
            "overview": ["a", "b"]
        }));

        assert_eq!(details.title, "42");
        assert_eq!(details.original_title, "");
        assert_eq!(details.release_date, "");
        assert_eq!(details.vote_average, "8");
        assert_eq!(details.vote_count, "many");
        assert_eq!(details.overview, r#"["a","b"]"#);
        assert_eq!(field_text(&json!({"v": 8.369}), "v"), "8.369");
    }

    proptest! {
        #[test]
        fn target_query_decodes_to_input_pairs(
            params in prop::collection::vec(
                ("[a-z_]{1,12}", "[ -~éü漢&=+?#%/]{0,16}"),
                0..6,
            )
        ) {
            let borrowed: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let url = build_target("https://api.themoviedb.org/3", "/search/movie", &borrowed).unwrap();

            let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
            prop_assert_eq!(decoded, params);
            prop_assert_eq!(url.path(), "/3/search/movie");
        }
    }
}
