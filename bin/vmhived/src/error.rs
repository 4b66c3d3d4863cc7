use thiserror::Error;

use vmhive_error::io::IoError;

/// Startup error, printed then turned into a non zero exit code
#[derive(Debug, Error)]
#[error("{msg}")]
pub struct CliError {
  pub(crate) code: i32,
  pub(crate) msg: String,
}

impl CliError {
  pub fn new<T>(code: i32, msg: T) -> Self
  where
    T: Into<String>,
  {
    Self {
      code,
      msg: msg.into(),
    }
  }

  pub fn print_and_exit(&self) -> ! {
    log::error!("{}", self.msg);
    eprintln!("{}", self.msg);
    std::process::exit(self.code);
  }
}

impl From<IoError> for CliError {
  fn from(err: IoError) -> Self {
    Self {
      code: 1,
      msg: err.to_string(),
    }
  }
}
