use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Error occurs while building HTTP client, error: {source}"))]
    BuildHttpClient { source: reqwest::Error },

    #[snafu(display("Error occurs while requesting orders from `{endpoint}`, error: {source}"))]
    SendRequest { endpoint: String, source: reqwest::Error },

    #[snafu(display("Order listing request to `{endpoint}` failed with status code {status}"))]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[snafu(display("Error occurs while decoding orders from `{endpoint}`, error: {source}"))]
    DecodeResponse { endpoint: String, source: reqwest::Error },
}
