use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::generic::{ApiReply, ListQuery, ListReply};
use vmhive_stubs::user::{User, UserUpdatePayload};

use crate::middlewares;
use crate::models::{
  NewUserOperationLogDb, SystemState, UserDb, UserOperationLogDb, UserUpdateDb,
};
use crate::utils;

/// List user accounts, admin only
#[web::get("/admin/user")]
pub async fn list_user(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  qs: web::types::Query<ListQuery>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  middlewares::require_admin(&info)?;
  let (total, rows) = UserDb::list(&qs, &state.pool).await?;
  let items: Vec<User> = rows
    .into_iter()
    .map(|row| {
      let mut user: User = row.into();
      user.group = state.groups.get(&user.gid_number).cloned().unwrap_or_default();
      user
    })
    .collect();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(ListReply { total, items })))
}

/// Update role or status of an account, admin only.
/// Disabling an account also revokes its cached token.
#[web::put("/admin/user/{uid}")]
pub async fn update_user(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
  path: web::types::Path<String>,
  payload: web::types::Json<UserUpdatePayload>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  middlewares::require_admin(&info)?;
  let uid = path.into_inner();
  let target = UserDb::find_by_uid(&uid, &state.pool)
    .await?
    .ok_or_else(|| HttpError::not_found("user not found"))?;
  if payload.role.is_none() && payload.status.is_none() {
    return Err(HttpError::bad_request("nothing to update"));
  }
  let values = UserUpdateDb {
    role: payload.role.map(|r| r.to_string()),
    status: payload.status.map(|s| s.to_string()),
    ..Default::default()
  };
  let updated =
    UserDb::update_by_uid(&target.uid, values, &info.uid, &state.pool).await?;
  if payload.status.map(|s| s.to_string()) == Some("disabled".to_owned()) {
    state.tokens.invalidate(&target.uid);
  }
  let row = NewUserOperationLogDb {
    uid: target.uid.clone(),
    operator: "update".to_owned(),
    operation: format!(
      "role={:?} status={:?}",
      payload.role, payload.status
    ),
    created_at: utils::key::now_millis(),
    creator: info.uid.clone(),
  };
  if let Err(err) = UserOperationLogDb::create(row, &state.pool).await {
    log::warn!("user: recording operation log: {err}");
  }
  let updated: User = updated.into();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(updated)))
}

pub fn ntex_config(config: &mut web::ServiceConfig) {
  config.service(list_user);
  config.service(update_user);
}
