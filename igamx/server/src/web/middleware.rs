use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, LOCATION, VARY};
use axum::http::request::Parts;
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderValue, Request, Response, StatusCode, Uri};
use axum_extra::extract::CookieJar;
use igamx_i18n::routing::{self, DEFAULT_EXCLUDED_PREFIXES};
use igamx_i18n::{Locale, LocaleHints, RouteDecision, RoutingStrategy};
use pin_project_lite::pin_project;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// The effective locale of a page request, set by [`LocaleRoutingLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestLocale(pub Locale);

/// Reads the extension set by the routing layer. Without it (a router used
/// bare, as in tests) the path prefix is used, then the default locale.
impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .extensions
            .get::<RequestLocale>()
            .map(|RequestLocale(locale)| *locale)
            .or_else(|| routing::split_locale_prefix(parts.uri.path()).map(|(locale, _)| locale))
            .unwrap_or_default();
        Ok(RequestLocale(locale))
    }
}

/// Layer that gives every page request a locale prefix.
///
/// Must wrap the router rather than be added with `Router::layer`, since
/// rewrites have to happen before route matching.
#[derive(Clone)]
pub struct LocaleRoutingLayer {
    strategy: RoutingStrategy,
    cookie_name: Arc<str>,
    excluded_prefixes: Arc<[String]>,
}

impl LocaleRoutingLayer {
    /// Creates a LocaleRoutingLayer excluding the default prefixes.
    pub fn new(strategy: RoutingStrategy, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            strategy,
            cookie_name: cookie_name.into(),
            excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Replaces the excluded path prefixes.
    pub fn with_excluded_prefixes<I, P>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.excluded_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

impl<S> Layer<S> for LocaleRoutingLayer {
    type Service = LocaleRoutingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LocaleRoutingService {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service that rewrites or redirects unprefixed page requests.
#[derive(Clone)]
pub struct LocaleRoutingService<S> {
    inner: S,
    layer: LocaleRoutingLayer,
}

impl<S> LocaleRoutingService<S> {
    fn hints<B>(&self, request: &Request<B>) -> LocaleHints {
        let cookie = CookieJar::from_headers(request.headers())
            .get(&self.layer.cookie_name)
            .map(|cookie| cookie.value().to_string());
        let accept_language = request
            .headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        LocaleHints {
            cookie,
            accept_language,
        }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for LocaleRoutingService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: Default,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = LocaleRoutingFuture<S::Future, ResBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let hints = self.hints(&request);
        let path = routing::trim_trailing_slash(request.uri().path()).to_string();
        let decision = routing::decide(
            &path,
            request.uri().query(),
            &hints,
            self.layer.strategy,
            &self.layer.excluded_prefixes[..],
        );
        tracing::debug!(path = %request.uri().path(), ?decision, "locale routing");

        let (locale, negotiated) = match decision {
            RouteDecision::PassThrough => {
                return LocaleRoutingFuture::Inner {
                    future: self.inner.call(request),
                    locale: None,
                    negotiated: false,
                };
            }
            RouteDecision::Localized { locale } => {
                if path != request.uri().path() {
                    let target = match request.uri().query() {
                        Some(query) => format!("{path}?{query}"),
                        None => path,
                    };
                    rewrite_request(&mut request, &target);
                }
                (locale, false)
            }
            RouteDecision::Rewrite { locale, path } => {
                rewrite_request(&mut request, &path);
                (locale, true)
            }
            RouteDecision::Redirect { locale, location } => {
                return LocaleRoutingFuture::Redirect {
                    response: Some(redirect_response(locale, &location)),
                };
            }
        };
        request.extensions_mut().insert(RequestLocale(locale));
        LocaleRoutingFuture::Inner {
            future: self.inner.call(request),
            locale: Some(locale),
            negotiated,
        }
    }
}

fn rewrite_uri(uri: &Uri, path_and_query: &str) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

fn rewrite_request<B>(request: &mut Request<B>, path_and_query: &str) {
    match rewrite_uri(request.uri(), path_and_query) {
        Some(uri) => *request.uri_mut() = uri,
        None => tracing::warn!(path = %path_and_query, "could not rewrite request path"),
    }
}

fn redirect_response<B: Default>(locale: Locale, location: &str) -> Response<B> {
    let mut response = Response::new(B::default());
    *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(LOCATION, value);
    }
    headers.insert(CONTENT_LANGUAGE, HeaderValue::from_static(locale.code()));
    headers.insert(VARY, HeaderValue::from_static("cookie, accept-language"));
    response
}

pin_project! {
    /// Future that resolves to the inner response with locale headers added,
    /// or to a ready-made redirect.
    #[project = LocaleRoutingFutureProj]
    pub enum LocaleRoutingFuture<F, B> {
        Inner {
            #[pin]
            future: F,
            locale: Option<Locale>,
            negotiated: bool,
        },
        Redirect {
            response: Option<Response<B>>,
        },
    }
}

impl<F, ResBody, E> Future for LocaleRoutingFuture<F, ResBody>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            LocaleRoutingFutureProj::Inner {
                future,
                locale,
                negotiated,
            } => match future.poll(cx) {
                Poll::Ready(Ok(mut response)) => {
                    if let Some(locale) = locale {
                        let headers = response.headers_mut();
                        headers.insert(CONTENT_LANGUAGE, HeaderValue::from_static(locale.code()));
                        if *negotiated {
                            headers.insert(VARY, HeaderValue::from_static("cookie, accept-language"));
                        }
                    }
                    Poll::Ready(Ok(response))
                }
                Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
                Poll::Pending => Poll::Pending,
            },
            LocaleRoutingFutureProj::Redirect { response } => match response.take() {
                Some(response) => Poll::Ready(Ok(response)),
                None => panic!("LocaleRoutingFuture polled after completion"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::extract::OriginalUri;
    use axum::routing::get;
    use tower::ServiceExt;

    async fn echo(RequestLocale(locale): RequestLocale, uri: OriginalUri) -> String {
        format!("{locale} {}", uri.0.path())
    }

    fn app(strategy: RoutingStrategy) -> LocaleRoutingService<Router> {
        let router = Router::new()
            .route("/{locale}", get(echo))
            .route("/{locale}/privacy-policy", get(echo))
            .route("/favicon.ico", get(|| async { "icon" }));
        LocaleRoutingLayer::new(strategy, "locale").layer(router)
    }

    async fn body_text(response: Response<Body>) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn can_rewrite_unprefixed_path_before_routing() {
        let response = app(RoutingStrategy::Rewrite)
            .oneshot(
                Request::builder()
                    .uri("/privacy-policy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_LANGUAGE),
            Some(&HeaderValue::from_static("en"))
        );
        assert!(response.headers().get(VARY).is_some());
        assert_eq!(body_text(response).await, "en /en/privacy-policy");
    }

    #[tokio::test]
    async fn can_route_paths_with_trailing_slash() {
        for (uri, expected) in [
            ("/fr/", "fr /fr"),
            ("/fr/privacy-policy/", "fr /fr/privacy-policy"),
            ("/privacy-policy/", "en /en/privacy-policy"),
        ] {
            let response = app(RoutingStrategy::Rewrite)
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(body_text(response).await, expected);
        }
    }

    #[tokio::test]
    async fn can_redirect_trailing_slash_to_trimmed_location() {
        let response = app(RoutingStrategy::Redirect)
            .oneshot(
                Request::builder()
                    .uri("/privacy-policy/?a=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(LOCATION),
            Some(&HeaderValue::from_static("/en/privacy-policy?a=1"))
        );
    }

    #[tokio::test]
    async fn can_pass_prefixed_path_through_with_its_locale() {
        let response = app(RoutingStrategy::Rewrite)
            .oneshot(
                Request::builder()
                    .uri("/fr/privacy-policy")
                    .header("cookie", "locale=zh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(CONTENT_LANGUAGE),
            Some(&HeaderValue::from_static("fr"))
        );
        assert!(response.headers().get(VARY).is_none());
        assert_eq!(body_text(response).await, "fr /fr/privacy-policy");
    }

    #[tokio::test]
    async fn can_redirect_without_calling_inner_service() {
        let response = app(RoutingStrategy::Redirect)
            .oneshot(
                Request::builder()
                    .uri("/?utm=x")
                    .header("accept-language", "fr-CA,fr;q=0.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(LOCATION),
            Some(&HeaderValue::from_static("/fr?utm=x"))
        );
    }

    #[tokio::test]
    async fn can_leave_excluded_paths_untouched() {
        let response = app(RoutingStrategy::Redirect)
            .oneshot(
                Request::builder()
                    .uri("/favicon.ico")
                    .header("cookie", "locale=zh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(CONTENT_LANGUAGE).is_none());
        assert_eq!(body_text(response).await, "icon");
    }

    #[tokio::test]
    async fn can_use_custom_excluded_prefixes() {
        let router = Router::new().route("/docs", get(|| async { "docs" }));
        let service = LocaleRoutingLayer::new(RoutingStrategy::Redirect, "locale")
            .with_excluded_prefixes(["/docs"])
            .layer(router);

        let response = service
            .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "docs");
    }

    #[tokio::test]
    async fn can_fall_back_to_path_prefix_without_layer() {
        let router = Router::new().route("/{locale}", get(echo));

        let response = router
            .oneshot(Request::builder().uri("/zh").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_text(response).await, "zh /zh");
    }
}
