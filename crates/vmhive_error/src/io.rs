#[derive(Debug)]
pub struct IoError {
  pub context: Option<String>,
  pub inner: std::io::Error,
}

impl Clone for IoError {
  fn clone(&self) -> Self {
    Self {
      context: self.context.clone(),
      inner: std::io::Error::new(self.inner.kind(), self.inner.to_string()),
    }
  }
}

impl IoError {
  pub fn new<T>(context: T, inner: std::io::Error) -> Self
  where
    T: Into<String>,
  {
    Self {
      context: Some(context.into()),
      inner,
    }
  }

  pub fn without_context(inner: std::io::Error) -> Self {
    Self {
      context: None,
      inner,
    }
  }

  pub fn invalid_data<M>(context: M, message: M) -> Self
  where
    M: ToString + std::fmt::Display,
  {
    Self::new(
      context.to_string(),
      std::io::Error::new(std::io::ErrorKind::InvalidData, message.to_string()),
    )
  }

  pub fn invalid_input<M>(context: M, message: M) -> Self
  where
    M: ToString + std::fmt::Display,
  {
    Self::new(
      context.to_string(),
      std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
      ),
    )
  }

  pub fn not_found<M>(context: M, message: M) -> Self
  where
    M: ToString + std::fmt::Display,
  {
    Self::new(
      context.to_string(),
      std::io::Error::new(std::io::ErrorKind::NotFound, message.to_string()),
    )
  }

  pub fn already_exists<M>(context: M, message: M) -> Self
  where
    M: ToString + std::fmt::Display,
  {
    Self::new(
      context.to_string(),
      std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        message.to_string(),
      ),
    )
  }

  pub fn permission_denied<M>(context: M, message: M) -> Self
  where
    M: ToString + std::fmt::Display,
  {
    Self::new(
      context.to_string(),
      std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        message.to_string(),
      ),
    )
  }

  pub fn interrupted<M>(context: M, message: M) -> Self
  where
    M: ToString + std::fmt::Display,
  {
    Self::new(
      context.to_string(),
      std::io::Error::new(std::io::ErrorKind::Interrupted, message.to_string()),
    )
  }

  pub fn context(&self) -> Option<&str> {
    self.context.as_deref()
  }

  pub fn into_inner(self) -> std::io::Error {
    self.inner
  }

  pub fn print_and_exit(&self) -> ! {
    eprintln!("{self}");
    std::process::exit(self.inner.raw_os_error().unwrap_or(1));
  }
}

impl std::fmt::Display for IoError {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> Result<(), std::fmt::Error> {
    if let Some(ctx) = &self.context {
      write!(f, "{ctx}: {}", self.inner)
    } else {
      write!(f, "{}", self.inner)
    }
  }
}

impl std::error::Error for IoError {}

pub type IoResult<T, E = IoError> = Result<T, E>;

/// Attach a context string while converting a foreign error into an [IoError].
pub trait FromIo<T> {
  fn map_err_context<C>(self, context: impl FnOnce() -> C) -> T
  where
    C: ToString + std::fmt::Display;
}

impl FromIo<IoError> for IoError {
  fn map_err_context<C>(self, context: impl FnOnce() -> C) -> IoError
  where
    C: ToString + std::fmt::Display,
  {
    IoError {
      context: Some((context)().to_string()),
      inner: self.into_inner(),
    }
  }
}

impl FromIo<Box<IoError>> for std::io::Error {
  fn map_err_context<C>(self, context: impl FnOnce() -> C) -> Box<IoError>
  where
    C: ToString + std::fmt::Display,
  {
    Box::new(IoError {
      context: Some((context)().to_string()),
      inner: self,
    })
  }
}

impl From<Box<IoError>> for IoError {
  fn from(f: Box<IoError>) -> Self {
    *f
  }
}

impl From<std::io::Error> for IoError {
  fn from(f: std::io::Error) -> Self {
    Self {
      context: None,
      inner: f,
    }
  }
}

impl From<IoError> for std::io::Error {
  fn from(f: IoError) -> Self {
    f.inner
  }
}

#[cfg(feature = "serde_json")]
impl FromIo<Box<IoError>> for serde_json::Error {
  fn map_err_context<C>(self, context: impl FnOnce() -> C) -> Box<IoError>
  where
    C: ToString + std::fmt::Display,
  {
    Box::new(IoError {
      context: Some((context)().to_string()),
      inner: std::io::Error::new(std::io::ErrorKind::InvalidData, self),
    })
  }
}

#[cfg(feature = "diesel")]
impl FromIo<Box<IoError>> for diesel::result::Error {
  fn map_err_context<C>(self, context: impl FnOnce() -> C) -> Box<IoError>
  where
    C: ToString + std::fmt::Display,
  {
    let inner = match self {
      diesel::result::Error::NotFound => {
        std::io::Error::new(std::io::ErrorKind::NotFound, self)
      }
      diesel::result::Error::DatabaseError(dberr, infoerr) => match dberr {
        diesel::result::DatabaseErrorKind::UniqueViolation => {
          std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            infoerr.details().unwrap_or_default(),
          )
        }
        _ => std::io::Error::new(
          std::io::ErrorKind::InvalidData,
          infoerr.details().unwrap_or_default(),
        ),
      },
      _ => std::io::Error::new(std::io::ErrorKind::InvalidData, self),
    };
    Box::new(IoError {
      context: Some((context)().to_string()),
      inner,
    })
  }
}

#[cfg(feature = "kube")]
impl FromIo<Box<IoError>> for kube::Error {
  fn map_err_context<C>(self, context: impl FnOnce() -> C) -> Box<IoError>
  where
    C: ToString + std::fmt::Display,
  {
    let inner = match &self {
      kube::Error::Api(err) if err.code == 404 => {
        std::io::Error::new(std::io::ErrorKind::NotFound, self)
      }
      kube::Error::Api(err) if err.code == 409 => {
        std::io::Error::new(std::io::ErrorKind::AlreadyExists, self)
      }
      _ => std::io::Error::new(std::io::ErrorKind::ConnectionAborted, self),
    };
    Box::new(IoError {
      context: Some((context)().to_string()),
      inner,
    })
  }
}

#[cfg(feature = "http")]
impl From<crate::http::HttpError> for IoError {
  fn from(f: crate::http::HttpError) -> Self {
    Self {
      context: None,
      inner: std::io::Error::new(std::io::ErrorKind::InvalidData, f),
    }
  }
}
