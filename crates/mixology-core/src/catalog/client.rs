//! TheCocktailDB client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::drink::{AlcoholicResponse, CategoryResponse, Drink, DrinkResponse};
use crate::error::FetchError;
use crate::storage::CatalogConfig;

/// Where drinks come from. One call per first letter; the store aggregates.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch_by_letter(&self, letter: char) -> Result<Vec<Drink>, FetchError>;

    async fn list_categories(&self) -> Result<Vec<String>, FetchError>;

    /// Alcoholic classifications the catalog knows ("Alcoholic",
    /// "Non alcoholic", ...).
    async fn list_alcoholic_filters(&self) -> Result<Vec<String>, FetchError>;
}

/// HTTP client for the public cocktail catalog.
#[derive(Clone)]
pub struct CocktailDbClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CocktailDbClient {
    /// Build a client for `base_url` (a trailing slash is added if missing).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut().extend_pairs(query);

        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        // The service answers an empty body instead of `{"drinks": null}` for
        // some filters.
        if body.trim().is_empty() {
            return serde_json::from_str("{}").map_err(|e| FetchError::Decode(e.to_string()));
        }
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecipeSource for CocktailDbClient {
    async fn fetch_by_letter(&self, letter: char) -> Result<Vec<Drink>, FetchError> {
        let letter = letter.to_string();
        let response: DrinkResponse = self.get_json("search.php", &[("f", &letter)]).await?;
        Ok(response.into_drinks())
    }

    async fn list_categories(&self) -> Result<Vec<String>, FetchError> {
        let response: CategoryResponse = self.get_json("list.php", &[("c", "list")]).await?;
        Ok(response
            .drinks
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.category)
            .collect())
    }

    async fn list_alcoholic_filters(&self) -> Result<Vec<String>, FetchError> {
        let response: AlcoholicResponse = self.get_json("list.php", &[("a", "list")]).await?;
        Ok(response
            .drinks
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.alcoholic)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> CocktailDbClient {
        CocktailDbClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_maps_letter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::UrlEncoded("f".into(), "m".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"drinks":[
                    {"idDrink":"11007","strDrink":"Margarita","strCategory":"Ordinary Drink",
                     "strAlcoholic":"Alcoholic","strIngredient1":"Tequila","strMeasure1":"1 1/2 oz "},
                    {"idDrink":null,"strDrink":"Broken"}
                ]}"#,
            )
            .create_async()
            .await;

        let drinks = client(&server).fetch_by_letter('m').await.unwrap();
        mock.assert_async().await;
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].ingredients[0].measure.as_deref(), Some("1 1/2 oz"));
    }

    #[tokio::test]
    async fn null_drinks_is_empty_not_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search.php")
            .match_query(Matcher::UrlEncoded("f".into(), "x".into()))
            .with_status(200)
            .with_body(r#"{"drinks":null}"#)
            .create_async()
            .await;

        assert!(client(&server).fetch_by_letter('x').await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search.php")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let err = client(&server).fetch_by_letter('a').await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client(&server).fetch_by_letter('a').await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn lists_categories_and_filters() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/list.php")
            .match_query(Matcher::UrlEncoded("c".into(), "list".into()))
            .with_status(200)
            .with_body(r#"{"drinks":[{"strCategory":"Cocktail"},{"strCategory":"Shot"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/list.php")
            .match_query(Matcher::UrlEncoded("a".into(), "list".into()))
            .with_status(200)
            .with_body(r#"{"drinks":[{"strAlcoholic":"Alcoholic"},{"strAlcoholic":"Non alcoholic"}]}"#)
            .create_async()
            .await;

        let client = client(&server);
        assert_eq!(client.list_categories().await.unwrap(), vec!["Cocktail", "Shot"]);
        assert_eq!(
            client.list_alcoholic_filters().await.unwrap(),
            vec!["Alcoholic", "Non alcoholic"]
        );
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        // Nothing listens on a port released right after binding.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{port}");

        let client = CocktailDbClient::new(&url, Duration::from_secs(2)).unwrap();
        let err = client.fetch_by_letter('a').await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client =
            CocktailDbClient::new("https://example.test/api/json/v1/1", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.test/api/json/v1/1/");
        assert!(CocktailDbClient::new("not a url", Duration::from_secs(1)).is_err());
    }
}
