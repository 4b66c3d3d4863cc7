use ntex::web;

use vmhive_error::http::HttpResult;

use vmhive_stubs::generic::{ApiReply, ListQuery, ListReply};
use vmhive_stubs::logs::{AuditLog, EventLog, ImageOperationLog};

use crate::middlewares;
use crate::models::{AuditLogDb, EventLogDb, ImageOperationLogDb, SystemState};

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventLogQuery {
  /// Restrict to one resource uid
  pub resource_uid: Option<String>,
}

/// Audit trail of authenticated requests, admin only
#[web::get("/logs/audit")]
pub async fn list_audit_logs(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  qs: web::types::Query<ListQuery>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  middlewares::require_admin(&info)?;
  let (total, rows) = AuditLogDb::list(&qs, &state.pool).await?;
  let items: Vec<AuditLog> = rows.into_iter().map(Into::into).collect();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(ListReply { total, items })))
}

/// Resource lifecycle events, admin only
#[web::get("/logs/event")]
pub async fn list_event_logs(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  qs: web::types::Query<ListQuery>,
  filter: web::types::Query<EventLogQuery>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  middlewares::require_admin(&info)?;
  let (total, rows) =
    EventLogDb::list(filter.resource_uid.as_deref(), &qs, &state.pool).await?;
  let items: Vec<EventLog> = rows.into_iter().map(Into::into).collect();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(ListReply { total, items })))
}

/// Catalog changes applied by the importer, admin only
#[web::get("/logs/image-operations")]
pub async fn list_image_operation_logs(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  qs: web::types::Query<ListQuery>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  middlewares::require_admin(&info)?;
  let (total, rows) = ImageOperationLogDb::list(&qs, &state.pool).await?;
  let items: Vec<ImageOperationLog> = rows.into_iter().map(Into::into).collect();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(ListReply { total, items })))
}

/// Single registration entry point for the logs module
pub fn ntex_config(config: &mut web::ServiceConfig) {
  config.service(list_audit_logs);
  config.service(list_event_logs);
  config.service(list_image_operation_logs);
}
