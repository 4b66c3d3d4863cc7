use ntex::http;
use ntex::web;

use vmhive_error::http::HttpError;

use crate::middlewares;
use crate::models::SystemState;

mod auth;
mod vm;
mod vm_image;
mod user;
mod logs;

pub async fn unhandled() -> Result<web::HttpResponse, HttpError> {
  Err(HttpError {
    status: http::StatusCode::NOT_FOUND,
    msg: "Route or method unhandled".into(),
  })
}

async fn healthz() -> web::HttpResponse {
  web::HttpResponse::Ok().finish()
}

pub fn ntex_config(config: &mut web::ServiceConfig, state: &SystemState) {
  config.service(
    web::scope("/api/v1")
      .wrap(middlewares::Audit::new(state.clone()))
      .route("/healthz", web::get().to(healthz))
      .configure(auth::ntex_config)
      .configure(vm::ntex_config)
      .configure(vm_image::ntex_config)
      .configure(user::ntex_config)
      .configure(logs::ntex_config),
  );
}

#[cfg(test)]
mod tests {
  use ntex::http;
  use ntex::web;

  use crate::utils::tests::*;

  use super::{healthz, unhandled};

  #[ntex::test]
  async fn unhandled_route_is_not_found() {
    before();
    let srv = web::test::server(|| {
      web::App::new()
        .route("/healthz", web::get().to(healthz))
        .default_service(web::route().to(unhandled))
    });
    let res = srv.get("/does-not-exist").send().await.unwrap();
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
    let res = srv.get("/healthz").send().await.unwrap();
    assert_eq!(res.status(), http::StatusCode::OK);
  }
}
