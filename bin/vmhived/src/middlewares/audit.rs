use std::time::Instant;

use ntex::http::header;
use ntex::web::{Error, ErrorRenderer, WebRequest, WebResponse};
use ntex::{Middleware, Service, ServiceCtx};

use crate::models::{NewAuditLogDb, SystemState};
use crate::utils;

/// Paths that never produce an audit row
const SKIP_PATHS: [&str; 1] = ["/api/v1/healthz"];

/// Records every api request after its response is produced and feeds the
/// bounded audit queue, the consumer loop persists the rows.
pub struct Audit {
  state: SystemState,
}

impl Audit {
  pub fn new(state: SystemState) -> Self {
    Self { state }
  }
}

impl<S> Middleware<S> for Audit {
  type Service = AuditMiddleware<S>;

  fn create(&self, service: S) -> Self::Service {
    AuditMiddleware {
      service,
      state: self.state.clone(),
    }
  }
}

pub struct AuditMiddleware<S> {
  service: S,
  state: SystemState,
}

fn module_of(path: &str) -> String {
  // /api/v1/<module>/...
  path
    .split('/')
    .nth(3)
    .unwrap_or("unknown")
    .to_owned()
}

fn source_ip<Err>(req: &WebRequest<Err>) -> String {
  for name in ["x-forwarded-for", "x-real-ip"] {
    if let Some(value) = req.headers().get(name) {
      if let Ok(value) = value.to_str() {
        let first = value.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
          return first.to_owned();
        }
      }
    }
  }
  String::new()
}

impl<S, Err> Service<WebRequest<Err>> for AuditMiddleware<S>
where
  S: Service<WebRequest<Err>, Response = WebResponse, Error = Error>,
  Err: ErrorRenderer,
{
  type Response = WebResponse;
  type Error = Error;

  ntex::forward_ready!(service);

  async fn call<'a>(
    &self,
    req: WebRequest<Err>,
    ctx: ServiceCtx<'a, Self>,
  ) -> Result<Self::Response, Self::Error> {
    let path = req.uri().path().to_owned();
    if SKIP_PATHS.contains(&path.as_str()) {
      return ctx.call(&self.service, req).await;
    }
    let started = Instant::now();
    let method = req.method().to_string();
    let ip = source_ip(&req);
    let bearer = req
      .headers()
      .get(&header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .map(|v| {
        if v.len() > 7 && v[..6].eq_ignore_ascii_case("bearer") {
          v[7..].to_owned()
        } else {
          v.to_owned()
        }
      });
    let (uid, username) = bearer
      .and_then(|token| self.state.tokens.peek(&token).ok())
      .map(|info| (info.uid, info.username))
      .unwrap_or_default();
    let res = ctx.call(&self.service, req).await?;
    let row = NewAuditLogDb {
      uid,
      username,
      module: module_of(&path),
      method,
      uri: path,
      status: res.status().as_u16() as i32,
      duration_ms: started.elapsed().as_millis() as i64,
      source_ip: ip,
      created_at: utils::key::now_millis(),
    };
    self.state.push_audit(row);
    Ok(res)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn module_is_third_path_segment() {
    assert_eq!(module_of("/api/v1/vm/dev1"), "vm");
    assert_eq!(module_of("/api/v1/logs/audit"), "logs");
    assert_eq!(module_of("/healthz"), "unknown");
  }
}
