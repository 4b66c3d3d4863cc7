pub mod key;
pub mod retry;
pub mod store;

#[cfg(test)]
pub mod tests {
  /// Set the log level and build a test env logger
  pub fn before() {
    if std::env::var("LOG_LEVEL").is_err() {
      std::env::set_var("LOG_LEVEL", "vmhived=info,warn,error");
    }
    let _ = env_logger::Builder::new()
      .parse_env("LOG_LEVEL")
      .is_test(true)
      .try_init();
  }
}
