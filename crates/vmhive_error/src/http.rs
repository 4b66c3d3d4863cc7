use ntex::web;
use ntex::http;

/// An http response error
#[derive(Clone, Debug)]
pub struct HttpError {
  pub msg: String,
  pub status: http::StatusCode,
}

pub type HttpResult<T, E = HttpError> = Result<T, E>;

impl HttpError {
  /// Create a new HttpError
  pub fn new<T>(status: http::StatusCode, msg: T) -> Self
  where
    T: ToString,
  {
    Self {
      status,
      msg: msg.to_string(),
    }
  }

  /// Create a new HttpError with status BadRequest - 400
  pub fn bad_request<T>(msg: T) -> Self
  where
    T: ToString,
  {
    Self::new(http::StatusCode::BAD_REQUEST, msg)
  }

  /// Create a new HttpError with status Unauthorized - 401
  pub fn unauthorized<T>(msg: T) -> Self
  where
    T: ToString,
  {
    Self::new(http::StatusCode::UNAUTHORIZED, msg)
  }

  pub fn forbidden<T>(msg: T) -> Self
  where
    T: ToString,
  {
    Self::new(http::StatusCode::FORBIDDEN, msg)
  }

  /// Create a new HttpError with status NotFound - 404
  pub fn not_found<T>(msg: T) -> Self
  where
    T: ToString,
  {
    Self::new(http::StatusCode::NOT_FOUND, msg)
  }

  /// Create a new HttpError with status InternalServerError - 500
  pub fn internal_server_error<T>(msg: T) -> Self
  where
    T: ToString,
  {
    Self::new(http::StatusCode::INTERNAL_SERVER_ERROR, msg)
  }
}

/// Helper function to display an HttpError
impl std::fmt::Display for HttpError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {}", self.status, self.msg)
  }
}

/// Implement standard error for HttpError
impl std::error::Error for HttpError {}

/// Convert an HttpError into a ntex::web::HttpResponse rendering the api envelope
impl web::WebResponseError for HttpError {
  fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
    let err_json = serde_json::json!({
      "api_version": "v1",
      "code": self.status.as_u16(),
      "message": self.msg,
      "data": serde_json::Value::Null,
    });
    web::HttpResponse::build(self.status).json(&err_json)
  }
}

#[cfg(feature = "io")]
impl From<crate::io::IoError> for HttpError {
  fn from(err: crate::io::IoError) -> Self {
    match err.inner.kind() {
      std::io::ErrorKind::NotFound => HttpError::not_found(err.to_string()),
      std::io::ErrorKind::AlreadyExists => {
        HttpError::bad_request(err.to_string())
      }
      std::io::ErrorKind::PermissionDenied => {
        HttpError::forbidden(err.to_string())
      }
      std::io::ErrorKind::InvalidInput => {
        HttpError::bad_request(err.to_string())
      }
      _ => HttpError::internal_server_error(err.to_string()),
    }
  }
}

#[cfg(feature = "io")]
impl From<Box<crate::io::IoError>> for HttpError {
  fn from(err: Box<crate::io::IoError>) -> Self {
    (*err).into()
  }
}

#[cfg(feature = "io")]
impl crate::io::FromIo<HttpError> for HttpError {
  fn map_err_context<C>(self, context: impl FnOnce() -> C) -> HttpError
  where
    C: ToString + std::fmt::Display,
  {
    HttpError::new(self.status, format!("{}: {}", context(), self.msg))
  }
}
