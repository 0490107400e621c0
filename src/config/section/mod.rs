//! Configuration section definitions.
//!
//! Each module corresponds to a section in `routelit.toml`:
//!
//! | Module      | TOML Section    | Purpose                              |
//! |-------------|-----------------|--------------------------------------|
//! | `serve`     | `[serve]`       | Demo host interface and port         |
//! | `session`   | `[session]`     | Cookie and query parameter names     |
//! | `lifecycle` | `[lifecycle]`   | Rerun limit per request              |

mod lifecycle;
mod serve;
mod session;

pub use lifecycle::LifecycleConfig;
pub use serve::ServeConfig;
pub use session::SessionConfig;
