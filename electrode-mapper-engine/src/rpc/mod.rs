//! JSON-RPC 2.0 bridge to the page hosting the app.
//!
//! The app runs in an iframe; the page around it draws the side panels and
//! talks to the app with `postMessage`. Incoming requests are turned into
//! `SessionCommand` events, and screens push state back as notifications.
//!
//! ```text
//! Page (parent window)                       App (iframe)
//!   │ ── { method, params, id? } ──────────────> │ parse_session_command
//!   │ <───────────── { result | error, id } ──── │ only when id was given
//!   │ <───────────── { method, params } ──────── │ send_notification
//! ```
//!
//! ## Methods
//!
//! | method | params |
//! |---|---|
//! | `navigate` | `{ "screen": "fiducials" \| "electrodes" \| "correspondence" }` |
//! | `get_state` | none |
//! | `select_fiducial` | `{ "index": n }` |
//! | `set_selection_mode` | `{ "mode": "default" \| "lasso" \| "rectangle" }` |
//! | `remove_selected_electrodes` | none |
//! | `remove_electrode` | `{ "index": n }` |
//! | `choose_sphere_electrode` | `{ "label": string \| null }` |
//! | `choose_head_electrode` | `{ "index": n \| null }` |
//! | `confirm_connection` | none |
//! | `remove_connection` | `{ "index": n }` |
//!
//! A command that does not apply to the current state is accepted and then
//! ignored by the screen; only unknown methods (`-32601`), bad params
//! (`-32602`) and a wrong protocol version (`-32600`) are errors.
//!
//! ## Notifications
//!
//! `screen_changed`, `loading_progress`, `cursor_hint`, `fiducial_assigned`,
//! `fiducial_moved`, `fiducials_state`, `electrodes_changed`,
//! `selection_mode_changed`, `connections_changed`.
//!
//! ```rust,ignore
//! fn your_system(mut rpc: ResMut<WebRpcInterface>) {
//!     rpc.send_notification("electrodes_changed", json!({ "total": 12, "selected": 3 }));
//! }
//! ```

/// Side-panel commands and their parameter parsing.
pub mod commands;

/// Message queues, the wasm `postMessage` listener and the dispatch systems.
pub mod web_rpc;
