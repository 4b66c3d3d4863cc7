use std::sync::Arc;

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use r2d2::PooledConnection;

mod system;
pub use system::*;

mod vm;
pub use vm::*;

mod vm_image;
pub use vm_image::*;

mod user;
pub use user::*;

mod audit_log;
pub use audit_log::*;

mod event_log;
pub use event_log::*;

mod operation_log;
pub use operation_log::*;

pub type Pool = Arc<r2d2::Pool<ConnectionManager<PgConnection>>>;
pub type DBConn = PooledConnection<ConnectionManager<PgConnection>>;
