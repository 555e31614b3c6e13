//! JSON-RPC 2.0 bridge between the engine and a hosting web page.
//!
//! The engine runs in an iframe; the parent page drives it with requests
//! over `postMessage` and listens for notifications.
//!
//! ```text
//! Parent page  <──postMessage──>  Engine (iframe)
//!      │                                │
//!      ├─ Request (with ID) ──────────> │
//!      │ <────────── Response (with ID) ┤
//!      │ <──────── Notification (no ID) ┤
//! ```
//!
//! ## Requests
//!
//! - `tool_selection {tool}`: `select`, `bulldoze` or a building id such as
//!   `residential` or `power-plant`.
//! - `toggle_pause`: flip the simulation pause flag.
//! - `start_city {name}`: found the city; the name must not be blank.
//! - `get_city_summary`: name, population, elapsed days and grid size.
//!
//! ## Notifications
//!
//! - `title_bar_updated {name, population, date}` after each simulation tick.
//! - `info_panel_updated {object}` with the selected object's fragment, or
//!   `null` to hide the panel.
//! - `tool_state_changed {tool, active}` when the active tool changes.
//!
//! ## Error Codes
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32000`: Request conflicts with the current state

/// Message types, the outgoing queue and request handlers.
pub mod web_rpc;

pub use web_rpc::{RpcError, RpcRequest, RpcResponse, WebRpcInterface, WebRpcPlugin};
