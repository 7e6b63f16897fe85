use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::Response;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use rustls::{ClientConfig, RootCertStore};

use crate::logging::NotificationError;

#[derive(Clone, Default, Debug)]
pub struct Builder {
    client_builder: Option<hyper_util::client::legacy::Builder>,
    skip_native_roots: bool,
}

impl Builder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the Hyper client [`Builder`](hyper_util::client::legacy::Builder) used to construct this client.
    pub fn hyper_builder(mut self, hyper_builder: hyper_util::client::legacy::Builder) -> Self {
        self.client_builder = Some(hyper_builder);
        self
    }

    /// Do not load the platform's root certificates, only plain http endpoints can be reached.
    pub fn without_native_roots(mut self) -> Self {
        self.skip_native_roots = true;
        self
    }

    /// The connector, plus the reason https is unavailable when no trust roots could be loaded.
    fn https_connector(&self) -> (HttpsConnector<HttpConnector>, Option<String>) {
        let native = if self.skip_native_roots {
            Err("native root certificates disabled".to_string())
        } else {
            HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|err| format!("no native root certificates available: {}", err))
        };

        match native {
            Ok(builder) => (builder.https_or_http().enable_http1().build(), None),
            Err(reason) => {
                tracing::debug!(target: "flarelog", "{}", reason);
                let config = ClientConfig::builder()
                    .with_root_certificates(RootCertStore::empty())
                    .with_no_client_auth();

                let connector = HttpsConnectorBuilder::new()
                    .with_tls_config(config)
                    .https_or_http()
                    .enable_http1()
                    .build();
                (connector, Some(reason))
            }
        }
    }

    pub fn build(self) -> JsonClient {
        let (connector, tls_unavailable) = self.https_connector();

        let mut builder = self
            .client_builder
            .unwrap_or_else(|| Client::builder(TokioExecutor::new()));
        // Every request runs on its own short lived runtime, pooled connections would outlive it.
        builder.pool_max_idle_per_host(0);

        JsonClient {
            inner: builder.build(connector),
            tls_unavailable,
        }
    }
}

/// Blocking client for posting small JSON documents.
#[derive(Clone, Debug)]
pub struct JsonClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    tls_unavailable: Option<String>,
}

impl JsonClient {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// POSTs `body` to `uri` with a bearer token and returns the response status.
    ///
    /// The request runs on a dedicated thread with its own runtime, so this can
    /// be called from synchronous code and from inside an async task alike.
    pub fn post_json(
        &self,
        uri: &Uri,
        bearer: &str,
        body: Vec<u8>,
    ) -> Result<StatusCode, NotificationError> {
        if uri.scheme() == Some(&http::uri::Scheme::HTTPS) {
            if let Some(reason) = &self.tls_unavailable {
                return Err(NotificationError::Tls(reason.clone()));
            }
        }

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri.clone())
            .header(AUTHORIZATION, format!("Bearer {}", bearer))
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))?;

        let client = self.inner.clone();
        let worker = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(NotificationError::Runtime)?;

            runtime.block_on(async move {
                let response: Response<Incoming> = client.request(request).await?;
                let status = response.status();
                // Read the answer to the end so the exchange completes before the runtime goes away.
                response.into_body().collect().await?;
                Ok::<_, NotificationError>(status)
            })
        });

        worker.join().unwrap_or(Err(NotificationError::Aborted))
    }
}
