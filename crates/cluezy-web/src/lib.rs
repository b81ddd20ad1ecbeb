//! # Cluezy Web
//!
//! axum HTTP surface of the search assistant:
//!
//! | method | path | |
//! |---|---|---|
//! | `POST` | `/api/chat` | stream one agent turn as server-sent events |
//! | `GET` | `/api/chat/{id}` | fetch a saved chat |
//! | `DELETE` | `/api/chat/{id}` | delete a saved chat |
//! | `PATCH` | `/api/chat/{id}` | rename a saved chat |
//! | `GET` | `/api/chats` | page through saved chats, newest first |
//! | `POST` | `/api/enhance-prompt` | rewrite a prompt |
//! | `GET` | `/health` | liveness |
//! | `GET` | `/ready` | readiness: `503` until a model key is configured |

pub mod routes;
pub mod server;

mod auth;
mod error;
mod state;

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use cluezy_config::WebConfig;
pub use error::{Result, WebError};
pub use server::{build_router, start_server};
pub use state::AppState;
