use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use vmhive_error::io::{IoError, IoResult};

use vmhive_stubs::token::{TokenClaims, TokenInfo};

use super::cache::TtlCache;

const ISSUER: &str = "vmhive";
/// Sliding lifetime of the cached token copy, renewed on every verification
const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

fn cache_key(uid: &str) -> String {
  format!("token:{uid}")
}

fn now_secs() -> i64 {
  crate::utils::key::now_millis() / 1000
}

/// Issues and verifies api tokens.
///
/// A token is only valid while the cached copy under `token:<uid>` equals the
/// presented one, so evicting the cache entry revokes the token regardless of
/// its signature lifetime. Each successful verification slides the cache ttl.
#[derive(Clone)]
pub struct TokenManager {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  cache: TtlCache,
}

impl TokenManager {
  pub fn new(secret: &str, cache: TtlCache) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 5;
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      cache,
    }
  }

  /// Sign a token for the given identity and store it in the cache
  pub fn issue(&self, info: TokenInfo, expires_in: Duration) -> IoResult<String> {
    let iat = now_secs();
    let claims = TokenClaims {
      info: info.clone(),
      iss: ISSUER.to_owned(),
      iat,
      nbf: iat,
      exp: iat + expires_in.as_secs() as i64,
    };
    let token = encode(&Header::default(), &claims, &self.encoding_key)
      .map_err(|err| IoError::invalid_data("Token", &err.to_string()))?;
    self.cache.set(&cache_key(&info.uid), &token, CACHE_TTL);
    Ok(token)
  }

  /// Verify signature and cache copy, renewing the sliding ttl.
  /// A cache miss after a valid signature is still a verification failure.
  pub fn verify(&self, token: &str) -> IoResult<TokenInfo> {
    let claims = self.peek(token)?;
    let key = cache_key(&claims.uid);
    let cached = self
      .cache
      .get(&key)
      .ok_or_else(|| IoError::invalid_data("Token", "token not cached"))?;
    if cached != token {
      return Err(IoError::invalid_data("Token", "token does not match"));
    }
    self.cache.set(&key, token, CACHE_TTL);
    Ok(claims)
  }

  /// Decode the signature only, without touching the cache.
  /// Used for audit attribution where revocation does not matter.
  pub fn peek(&self, token: &str) -> IoResult<TokenInfo> {
    let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
      .map_err(|err| IoError::invalid_data("Token", &err.to_string()))?;
    Ok(data.claims.info)
  }

  /// Drop the cached copy, any outstanding token for this user stops
  /// verifying immediately
  pub fn invalidate(&self, uid: &str) {
    self.cache.delete(&cache_key(uid));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use vmhive_stubs::user::UserRole;

  fn sample_info() -> TokenInfo {
    TokenInfo {
      uid: "u1".to_owned(),
      username: "alice".to_owned(),
      name: "Alice".to_owned(),
      role: UserRole::Normal,
      primary: false,
    }
  }

  #[test]
  fn issue_then_verify_round_trip() {
    let manager = TokenManager::new("secret", TtlCache::new());
    let token = manager
      .issue(sample_info(), Duration::from_secs(3600))
      .unwrap();
    let info = manager.verify(&token).unwrap();
    assert_eq!(info, sample_info());
  }

  #[test]
  fn verify_fails_with_wrong_secret() {
    let manager = TokenManager::new("secret", TtlCache::new());
    let token = manager
      .issue(sample_info(), Duration::from_secs(3600))
      .unwrap();
    let other = TokenManager::new("other-secret", TtlCache::new());
    assert!(other.verify(&token).is_err());
  }

  #[test]
  fn replay_after_invalidate_is_rejected() {
    let manager = TokenManager::new("secret", TtlCache::new());
    let token = manager
      .issue(sample_info(), Duration::from_secs(3600))
      .unwrap();
    assert!(manager.verify(&token).is_ok());
    manager.invalidate("u1");
    // signature is still valid but the cached copy is gone
    assert!(manager.peek(&token).is_ok());
    assert!(manager.verify(&token).is_err());
  }

  #[test]
  fn reissue_invalidates_previous_token() {
    let manager = TokenManager::new("secret", TtlCache::new());
    let first = manager
      .issue(sample_info(), Duration::from_secs(3600))
      .unwrap();
    std::thread::sleep(Duration::from_millis(1100));
    let second = manager
      .issue(sample_info(), Duration::from_secs(3600))
      .unwrap();
    assert_ne!(first, second);
    assert!(manager.verify(&second).is_ok());
    assert!(manager.verify(&first).is_err());
  }
}
