use ntex::http::header;
use ntex::web;

use vmhive_error::http::{HttpError, HttpResult};

use vmhive_stubs::token::TokenInfo;

use crate::models::SystemState;

/// Pull the token from the authorization header, `Authorization: Bearer <t>`
fn token_from_header(req: &web::HttpRequest) -> Option<String> {
  let bearer = req
    .headers()
    .get(&header::AUTHORIZATION)?
    .to_str()
    .ok()?;
  if bearer.len() > 7 && bearer[..6].eq_ignore_ascii_case("bearer") {
    return Some(bearer[7..].to_owned());
  }
  if bearer.is_empty() {
    None
  } else {
    Some(bearer.to_owned())
  }
}

/// Pull the token from a cookie named `jwt`
fn token_from_cookie(req: &web::HttpRequest) -> Option<String> {
  let cookies = req.headers().get(&header::COOKIE)?.to_str().ok()?;
  for part in cookies.split(';') {
    let part = part.trim();
    if let Some(value) = part.strip_prefix("jwt=") {
      if !value.is_empty() {
        return Some(value.to_owned());
      }
    }
  }
  None
}

/// Pull the token from the `jwt` query parameter
fn token_from_query(req: &web::HttpRequest) -> Option<String> {
  let query = req.uri().query()?;
  for pair in query.split('&') {
    if let Some(value) = pair.strip_prefix("jwt=") {
      if !value.is_empty() {
        return Some(value.to_owned());
      }
    }
  }
  None
}

/// Locate the bearer token, the first non empty source wins
pub fn find_token(req: &web::HttpRequest) -> Option<String> {
  token_from_header(req)
    .or_else(|| token_from_cookie(req))
    .or_else(|| token_from_query(req))
}

/// Guard every protected handler goes through first.
/// Verifies signature and cached copy, sliding the cache ttl on success.
pub fn authenticate(
  req: &web::HttpRequest,
  state: &SystemState,
) -> HttpResult<TokenInfo> {
  let token =
    find_token(req).ok_or_else(|| HttpError::unauthorized("missing token"))?;
  state
    .tokens
    .verify(&token)
    .map_err(|err| HttpError::unauthorized(format!("invalid token: {err}")))
}

/// Admin only modules reject everyone else
pub fn require_admin(info: &TokenInfo) -> HttpResult<()> {
  if !info.is_admin() {
    return Err(HttpError::forbidden("admin role required"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  use ntex::web::test::TestRequest;

  #[test]
  fn header_token_wins_over_cookie_and_query() {
    let req = TestRequest::default()
      .header("authorization", "Bearer header-token")
      .header("cookie", "jwt=cookie-token")
      .uri("/api/v1/vm?jwt=query-token")
      .to_http_request();
    assert_eq!(find_token(&req), Some("header-token".to_owned()));
  }

  #[test]
  fn cookie_token_wins_over_query() {
    let req = TestRequest::default()
      .header("cookie", "session=s; jwt=cookie-token")
      .uri("/api/v1/vm?jwt=query-token")
      .to_http_request();
    assert_eq!(find_token(&req), Some("cookie-token".to_owned()));
  }

  #[test]
  fn query_token_is_the_last_resort() {
    let req = TestRequest::default()
      .uri("/api/v1/vm?other=1&jwt=query-token")
      .to_http_request();
    assert_eq!(find_token(&req), Some("query-token".to_owned()));
  }

  #[test]
  fn missing_token_is_none() {
    let req = TestRequest::default().uri("/api/v1/vm").to_http_request();
    assert_eq!(find_token(&req), None);
  }

  #[test]
  fn unprefixed_authorization_header_is_taken_as_is() {
    let req = TestRequest::default()
      .header("authorization", "raw-token-value")
      .to_http_request();
    assert_eq!(find_token(&req), Some("raw-token-value".to_owned()));
  }
}
