use diesel::prelude::*;

use vmhive_stubs::user::{User, UserRole, UserStatus};

use crate::schema::users;

/// A user account row, created on first successful directory login
#[derive(Clone, Debug, Queryable, Identifiable)]
#[diesel(primary_key(id))]
#[diesel(table_name = users)]
pub struct UserDb {
  pub id: i64,
  pub uid: String,
  pub username: String,
  pub role: String,
  pub status: String,
  pub primary: bool,
  pub email: String,
  pub gid_number: String,
  pub created_at: i64,
  pub creator: String,
  pub updated_at: i64,
  pub updater: String,
  pub deleted_at: Option<i64>,
}

impl UserDb {
  pub fn role(&self) -> UserRole {
    self.role.parse().unwrap_or(UserRole::Normal)
  }

  pub fn status(&self) -> UserStatus {
    self.status.parse().unwrap_or(UserStatus::Disabled)
  }
}

impl From<UserDb> for User {
  fn from(db: UserDb) -> Self {
    let role = db.role();
    let status = db.status();
    Self {
      id: db.id,
      uid: db.uid,
      username: db.username,
      role,
      status,
      primary: db.primary,
      email: db.email,
      gid_number: db.gid_number,
      group: String::new(),
      created_at: db.created_at,
      updated_at: db.updated_at,
    }
  }
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserDb {
  pub uid: String,
  pub username: String,
  pub role: String,
  pub status: String,
  pub primary: bool,
  pub email: String,
  pub gid_number: String,
  pub created_at: i64,
  pub creator: String,
  pub updated_at: i64,
  pub updater: String,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserUpdateDb {
  pub username: Option<String>,
  pub role: Option<String>,
  pub status: Option<String>,
  pub email: Option<String>,
  pub gid_number: Option<String>,
  pub updated_at: Option<i64>,
  pub updater: Option<String>,
}
