use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rpc::commands::{SessionCommand, parse_session_command};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

const JSONRPC_VERSION: &str = "2.0";

/// Incoming JSON-RPC 2.0 message. Without an `id` it is a notification and
/// gets no reply.
#[derive(Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

/// JSON-RPC error object.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn invalid_request(message: &str) -> Self {
        Self {
            code: -32600,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

/// A message waiting to be posted to the page, kept in send order.
#[derive(Debug, Clone, PartialEq)]
enum Outgoing {
    Notification { method: String, params: Value },
    Response { id: Value, outcome: Result<Value, RpcError> },
}

impl Outgoing {
    /// Wire form. A response carries exactly one of `result` or `error`.
    fn to_json(&self) -> Value {
        match self {
            Self::Notification { method, params } => serde_json::json!({
                "jsonrpc": JSONRPC_VERSION,
                "method": method,
                "params": params,
            }),
            Self::Response { id, outcome: Ok(result) } => serde_json::json!({
                "jsonrpc": JSONRPC_VERSION,
                "result": result,
                "id": id,
            }),
            Self::Response { id, outcome: Err(error) } => serde_json::json!({
                "jsonrpc": JSONRPC_VERSION,
                "error": error,
                "id": id,
            }),
        }
    }
}

/// Outbound side of the page bridge. Screens push notifications here; the
/// queue is flushed to the parent window once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outbox: Vec<Outgoing>,
}

impl WebRpcInterface {
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outbox.push(Outgoing::Notification {
            method: method.to_string(),
            params,
        });
    }

    fn respond(&mut self, id: Value, outcome: Result<Value, RpcError>) {
        self.outbox.push(Outgoing::Response { id, outcome });
    }
}

/// Bridges the hosting page (iframe `postMessage`) and the app's
/// `SessionCommand` events.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<SessionCommand>()
            .add_systems(
                Update,
                (drain_inbox, dispatch_requests, flush_outbox).chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, listen_for_page_messages);
    }
}

/// Raw message strings handed over by the JS callback.
#[derive(Resource, Clone, Default)]
struct RpcInbox(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage(String);

#[cfg(target_arch = "wasm32")]
fn listen_for_page_messages(mut commands: Commands) {
    let inbox = RpcInbox::default();
    let sink = inbox.clone();

    let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        // Only string payloads that look like JSON-RPC are queued.
        let Ok(text) = event.data().dyn_into::<js_sys::JsString>() else {
            return;
        };
        let text = String::from(text);
        if text.contains("jsonrpc") {
            if let Ok(mut queue) = sink.0.lock() {
                queue.push(text);
            }
        }
    });

    match window() {
        Some(window) => {
            if let Err(e) =
                window.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available, page commands are disabled"),
    }

    // The page owns the callback from here on.
    on_message.forget();
    commands.insert_resource(inbox);
}

fn drain_inbox(inbox: Option<Res<RpcInbox>>, mut incoming: EventWriter<IncomingRpcMessage>) {
    let Some(inbox) = inbox else {
        return;
    };
    let messages = match inbox.0.lock() {
        Ok(mut queue) => std::mem::take(&mut *queue),
        Err(_) => return,
    };
    for message in messages {
        incoming.write(IncomingRpcMessage(message));
    }
}

fn dispatch_requests(
    mut incoming: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut commands: EventWriter<SessionCommand>,
) {
    for IncomingRpcMessage(text) in incoming.read() {
        let request = match serde_json::from_str::<RpcRequest>(text) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
                continue;
            }
        };

        debug!("Processing RPC method: {}", request.method);
        let outcome = interpret_request(&request).map(|command| {
            info!("RPC command dispatched: {:?}", command);
            commands.write(command);
            serde_json::json!({ "success": true, "method": request.method })
        });
        if let Err(error) = &outcome {
            warn!("Rejected RPC {}: {}", request.method, error.message);
        }

        if let Some(id) = request.id {
            rpc_interface.respond(id, outcome);
        }
    }
}

fn interpret_request(request: &RpcRequest) -> Result<SessionCommand, RpcError> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(RpcError::invalid_request(&format!(
            "Unsupported jsonrpc version: {}",
            request.jsonrpc
        )));
    }
    parse_session_command(&request.method, &request.params)
}

fn flush_outbox(mut rpc_interface: ResMut<WebRpcInterface>) {
    if rpc_interface.outbox.is_empty() {
        return;
    }
    for message in rpc_interface.outbox.drain(..) {
        post_to_parent(&message.to_json());
    }
}

fn post_to_parent(message: &Value) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(parent) = window().and_then(|w| w.parent().ok().flatten()) else {
            warn!("No parent window available for message transmission");
            return;
        };
        if let Err(e) = parent.post_message(&JsValue::from_str(&message.to_string()), "*") {
            error!("Failed to send message to parent: {:?}", e);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        trace!("RPC out (no page attached): {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_and_id_are_optional() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"confirm_connection"}"#).unwrap();
        assert!(request.id.is_none());
        assert!(request.params.is_null());
        assert_eq!(interpret_request(&request), Ok(SessionCommand::ConfirmConnection));
    }

    #[test]
    fn wrong_version_is_invalid_request() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"1.0","method":"confirm_connection","id":3}"#).unwrap();
        assert_eq!(interpret_request(&request).unwrap_err().code, -32600);
    }

    #[test]
    fn responses_carry_either_result_or_error() {
        let ok = Outgoing::Response {
            id: serde_json::json!(1),
            outcome: Ok(serde_json::json!({ "success": true })),
        }
        .to_json();
        assert_eq!(ok["id"], 1);
        assert_eq!(ok["result"]["success"], true);
        assert!(ok.get("error").is_none());

        let failed = Outgoing::Response {
            id: serde_json::json!("abc"),
            outcome: Err(RpcError::method_not_found("nope")),
        }
        .to_json();
        assert_eq!(failed["id"], "abc");
        assert_eq!(failed["error"]["code"], -32601);
        assert_eq!(failed["error"]["data"]["method"], "nope");
        assert!(failed.get("result").is_none());
    }

    #[test]
    fn outbox_keeps_send_order() {
        let mut rpc = WebRpcInterface::default();
        rpc.send_notification("screen_changed", serde_json::json!({ "screen": "electrodes" }));
        rpc.respond(serde_json::json!(9), Ok(Value::Null));
        rpc.send_notification("cursor_hint", serde_json::json!({ "cursor": "move" }));

        let methods: Vec<_> = rpc
            .outbox
            .iter()
            .map(|m| m.to_json().get("method").cloned().unwrap_or(Value::Null))
            .collect();
        assert_eq!(methods, [serde_json::json!("screen_changed"), Value::Null, serde_json::json!("cursor_hint")]);
    }
}
