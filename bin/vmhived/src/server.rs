use ntex::web;
use ntex_cors::Cors;

use crate::{models::SystemState, services};

/// Build the http server out of the shared state and bind it.
/// The returned server future runs until the process is asked to stop.
pub fn gen(
  daemon_state: SystemState,
) -> std::io::Result<ntex::server::Server> {
  log::info!("Preparing server");
  let addr = format!(
    "{}:{}",
    daemon_state.config.bind_address, daemon_state.config.port
  );
  let server = web::HttpServer::new(move || {
    web::App::new()
      .state(daemon_state.clone())
      .state(web::types::JsonConfig::default().limit(4_000_000))
      .wrap(Cors::new().finish())
      .wrap(web::middleware::Logger::default())
      .configure(|config| services::ntex_config(config, &daemon_state))
      .default_service(web::route().to(services::unhandled))
  })
  .bind(&addr)?;
  log::info!("Listening on http://{addr}");
  Ok(server.run())
}
