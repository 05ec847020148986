//! Remote-control protocol: grammar, sessions, lock, authorization and the
//! engine that applies accepted commands.

mod auth;
mod command;
mod engine;
mod errors;
mod handler;
mod lock;
mod response;
mod server;
mod session;

pub use self::auth::ApiAccess;
pub use self::command::{
    Command, CommandError, LedColor, MAX_BRIGHTNESS, MAX_GAMMA, MAX_GAMMA_CHARS, MIN_GAMMA,
    Mutation, Query,
};
pub use self::engine::{ApiEngine, Collaborators};
pub use self::errors::ApiError;
pub use self::handler::{ApiConnectionHandler, MAX_REQUEST_BYTES};
pub use self::lock::{LockConflict, LockManager};
pub use self::response::{GREETING, Reply, ResponseWriter};
pub use self::server::ApiServer;
pub use self::session::{Session, SessionGuard, SessionId};

const API_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::api");
