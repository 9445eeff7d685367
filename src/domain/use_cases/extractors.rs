use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use std::convert::Infallible;

/// Scheme and host the client used to reach the server.
/// Usage: Add `origin: RequestOrigin` as a parameter to your handler function.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    /// Public URL of a stored asset. The scheme is `http` unless `use_request_scheme` is set.
    pub fn asset_url(&self, use_request_scheme: bool, subpath: &str, filename: &str) -> String {
        let scheme = if use_request_scheme { self.scheme.as_str() } else { "http" };
        format!("{}://{}/{}/{}", scheme, self.host, subpath, filename)
    }
}

impl FromRequest for RequestOrigin {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let info = req.connection_info();
        ready(Ok(RequestOrigin {
            scheme: info.scheme().to_string(),
            host: info.host().to_string(),
        }))
    }
}
