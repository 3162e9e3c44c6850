// FHEM command endpoint client
//
// Every operation is a single `GET {base}?cmd=<command>&XHR=1`. The `XHR`
// flag asks the server for the programmatic (plain text, no HTML page)
// response variant. Bodies are returned verbatim; classification of
// empty vs. non-empty replies is left to `fhemly-core`.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Query parameter carrying the command text.
const CMD_PARAM: &str = "cmd";
/// Query parameter selecting the programmatic response format.
const XHR_PARAM: &str = "XHR";

/// Raw HTTP client for the server's command endpoint.
#[derive(Debug, Clone)]
pub struct FhemClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FhemClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically so a web session established by the server is kept.
    /// `base_url` is the command endpoint itself, e.g. `http://fhem:8083/fhem`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Build the request URL for `command`: `{base}?cmd=<command>&XHR=1`.
    ///
    /// The command text is percent-encoded; existing query pairs on the
    /// base URL are kept.
    pub fn command_url(&self, command: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(CMD_PARAM, command)
            .append_pair(XHR_PARAM, "1");
        url
    }

    /// Issue `command` and return the response body verbatim.
    ///
    /// Non-success statuses are errors; an empty body is a valid success.
    pub async fn execute(&self, command: &str) -> Result<String, Error> {
        let url = self.command_url(command);
        debug!(%command, "GET {}", self.base_url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
