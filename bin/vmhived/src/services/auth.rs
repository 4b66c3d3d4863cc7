use std::time::Duration;

use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::generic::ApiReply;
use vmhive_stubs::token::TokenInfo;
use vmhive_stubs::user::{LoginPayload, LoginReply, User, UserRole, UserStatus};

use crate::middlewares;
use crate::models::{
  NewUserDb, NewUserOperationLogDb, SystemState, UserDb, UserUpdateDb,
};
use crate::utils;

/// Lifetime of an issued token, the cache ttl slides independently
const TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 3600);

async fn log_user_operation(
  state: &SystemState,
  uid: &str,
  operator: &str,
  operation: &str,
) {
  let row = NewUserOperationLogDb {
    uid: uid.to_owned(),
    operator: operator.to_owned(),
    operation: operation.to_owned(),
    created_at: utils::key::now_millis(),
    creator: uid.to_owned(),
  };
  if let Err(err) = crate::models::UserOperationLogDb::create(row, &state.pool).await
  {
    log::warn!("auth: recording user operation: {err}");
  }
}

/// Authenticate against the directory service and issue a token.
/// The first successful login creates the local account.
#[web::post("/auth/login")]
pub async fn login(
  state: web::types::State<SystemState>,
  payload: web::types::Json<LoginPayload>,
) -> HttpResult<web::HttpResponse> {
  if payload.username.is_empty() || payload.password.is_empty() {
    return Err(HttpError::bad_request("username and password are required"));
  }
  let entry = state
    .directory
    .authenticate(&payload.username, &payload.password)
    .await
    .map_err(|err| HttpError::unauthorized(format!("login failed: {err}")))?;
  let user = match UserDb::find_by_uid(&entry.uid_number, &state.pool).await? {
    Some(user) => user,
    None => {
      let now = utils::key::now_millis();
      let user = UserDb::create(
        NewUserDb {
          uid: entry.uid_number.clone(),
          username: entry.cn.clone(),
          role: UserRole::Normal.to_string(),
          status: UserStatus::Enabled.to_string(),
          primary: false,
          email: entry.mail.clone(),
          gid_number: entry.gid_number.clone(),
          created_at: now,
          creator: entry.uid_number.clone(),
          updated_at: now,
          updater: entry.uid_number.clone(),
        },
        &state.pool,
      )
      .await?;
      log_user_operation(&state, &user.uid, "first_login", "first login").await;
      user
    }
  };
  if user.status() != UserStatus::Enabled {
    return Err(HttpError::forbidden("account is disabled"));
  }
  let info = TokenInfo {
    uid: user.uid.clone(),
    username: user.username.clone(),
    name: entry.display_name.clone(),
    role: user.role(),
    primary: user.primary,
  };
  let token = state.tokens.issue(info, TOKEN_LIFETIME)?;
  log_user_operation(&state, &user.uid, "login", "login").await;
  let reply = LoginReply {
    token,
    user: user.into(),
  };
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(reply)))
}

/// Evict the cached token, outstanding copies stop verifying immediately
#[web::post("/auth/logout")]
pub async fn logout(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  state.tokens.invalidate(&info.uid);
  log_user_operation(&state, &info.uid, "logout", "logout").await;
  Ok(web::HttpResponse::Ok().json(&ApiReply::empty()))
}

/// Return the account behind the presented token
#[web::get("/auth/profile")]
pub async fn profile(
  req: web::HttpRequest,
  state: web::types::State<SystemState>,
) -> HttpResult<web::HttpResponse> {
  let info = middlewares::authenticate(&req, &state)?;
  let user = UserDb::find_by_uid(&info.uid, &state.pool)
    .await?
    .ok_or_else(|| HttpError::not_found("user not found"))?;
  // keep the directory mail in sync on profile reads
  if user.email.is_empty() {
    if let Ok(Some(entry)) =
      state.directory.find_user_by_cn(&user.username).await
    {
      if !entry.mail.is_empty() {
        let values = UserUpdateDb {
          email: Some(entry.mail),
          ..Default::default()
        };
        let _ =
          UserDb::update_by_uid(&user.uid, values, &info.uid, &state.pool).await;
      }
    }
  }
  let mut user: User = user.into();
  user.group = state.groups.get(&user.gid_number).cloned().unwrap_or_default();
  Ok(web::HttpResponse::Ok().json(&ApiReply::ok(user)))
}

pub fn ntex_config(config: &mut web::ServiceConfig) {
  config.service(login);
  config.service(logout);
  config.service(profile);
}
