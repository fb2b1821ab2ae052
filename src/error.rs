pub type SdResult<T> = Result<T, SdError>;

#[derive(Debug, thiserror::Error)]
pub enum SdError {
    #[error("[HTTP Request Error] {0}")]
    HttpRequestError(#[from] ::reqwest::Error),

    #[error("[HTTP Middleware Error] {0}")]
    HttpMiddlewareError(#[from] ::reqwest_middleware::Error),

    #[error("[HTTP Status Error] [{request}] {status}")]
    HttpStatusError { status: String, request: String },

    #[error("[Invalid] {message}")]
    Invalid { code: &'static str, message: String },

    #[error("[IO Error] {0}")]
    IoError(#[from] std::io::Error),

    #[error("[Not Exists] {message}")]
    NotExists { code: &'static str, message: String },

    #[error("[Parse Config Error] {0}")]
    ParseConfigError(#[from] ::confy::ConfyError),

    #[error("[Parse URL Error] {0}")]
    ParseUrlError(#[from] url::ParseError),

    #[error("[Registry Error] {0}")]
    RegistryError(String),

    #[error("[Serde JSON Error] {0}")]
    SerdeJsonError(#[from] ::serde_json::Error),
}

