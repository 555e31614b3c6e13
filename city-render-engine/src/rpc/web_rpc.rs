use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::city::{City, CityModel, DisplayFragment};
use crate::engine::core::app_state::{StartCityEvent, UiState, validate_city_name};
use crate::engine::systems::{PresentationSink, TitleBar};
use crate::tools::{ToolSelectionEvent, ToolSelectionSource, ToolState};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Error)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    /// Application error: the request conflicts with current state.
    pub const INVALID_STATE: i32 = -32000;

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: Self::METHOD_NOT_FOUND,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn invalid_state(message: &str) -> Self {
        Self {
            code: Self::INVALID_STATE,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Outgoing message queue for the parent window. Doubles as the
/// presentation sink on the web build.
#[derive(Resource, Default, Debug)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Queue a notification for the frontend.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    pub fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    pub fn notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    pub fn responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }

    /// Drain queued notifications, then responses.
    pub fn take_outgoing(&mut self) -> (Vec<RpcNotification>, Vec<RpcResponse>) {
        (
            std::mem::take(&mut self.outgoing_notifications),
            std::mem::take(&mut self.outgoing_responses),
        )
    }
}

impl PresentationSink for WebRpcInterface {
    fn update_title_bar(&mut self, title: &TitleBar) {
        self.send_notification("title_bar_updated", serde_json::json!(title));
    }

    fn update_info_panel(&mut self, fragment: Option<&DisplayFragment>) {
        self.send_notification(
            "info_panel_updated",
            serde_json::json!({ "object": fragment }),
        );
    }

    fn tool_changed(&mut self, tool: ToolState) {
        self.send_notification(
            "tool_state_changed",
            serde_json::json!({ "tool": tool.id(), "active": true }),
        );
    }
}

/// Plugin wiring the postMessage bridge to the parent window.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::{Arc, Mutex};

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(err) =
                window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", err);
            }
        }
        None => error!("Window object not available"),
    }

    // The listener lives as long as the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Messages received by the browser listener, waiting for the next frame.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw RPC text from the frontend.
#[derive(Event, Debug, Clone)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = match queue_res.0.lock() {
        Ok(mut queue) => std::mem::take(&mut *queue),
        Err(_) => Vec::new(),
    };

    for content in messages {
        message_events.write(IncomingRpcMessage { content });
    }
}

/// Everything a request handler may read or write.
pub struct RpcContext<'a, 'w> {
    pub ui: &'a mut UiState,
    pub city: Option<&'a City>,
    pub tool_events: &'a mut EventWriter<'w, ToolSelectionEvent>,
    pub start_events: &'a mut EventWriter<'w, StartCityEvent>,
}

/// Parse received messages and dispatch them as requests.
pub fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut ui: ResMut<UiState>,
    city: Option<Res<City>>,
    tool_events: EventWriter<ToolSelectionEvent>,
    start_events: EventWriter<StartCityEvent>,
) {
    // Rebind so both writers can be shortened to the single `'w` RpcContext expects.
    let mut tool_events = tool_events;
    let mut start_events = start_events;
    let mut context = RpcContext {
        ui: ui.as_mut(),
        city: city.as_deref(),
        tool_events: &mut tool_events,
        start_events: &mut start_events,
    };

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => warn!("Discarding malformed RPC message: {}", parse_error),
        }
    }
}

/// Dispatch one request. Requests without an id are notifications and get
/// no response.
pub fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "tool_selection" => handle_tool_selection(&request.params, context),
        "toggle_pause" => handle_toggle_pause(context),
        "start_city" => handle_start_city(&request.params, context),
        "get_city_summary" => handle_get_city_summary(context),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError::method_not_found(&request.method))
        }
    };

    if let Err(err) = &result {
        debug!("RPC {} failed: {}", request.method, err);
    }

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_tool_selection(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ToolSelectionParams {
        tool: String,
    }

    let tool_params = serde_json::from_value::<ToolSelectionParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'tool' parameter"))?;

    let tool = ToolState::from_string(&tool_params.tool)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown tool: {}", tool_params.tool)))?;

    context.tool_events.write(ToolSelectionEvent {
        tool,
        source: ToolSelectionSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "active_tool": tool.id()
    }))
}

/// Flips the flag in place so the reply, and any later toggle in the same
/// frame, sees the state actually applied.
fn handle_toggle_pause(context: &mut RpcContext) -> Result<serde_json::Value, RpcError> {
    context.ui.paused = !context.ui.paused;
    info!(
        "Simulation {} by frontend",
        if context.ui.paused { "paused" } else { "resumed" }
    );
    Ok(serde_json::json!({ "paused": context.ui.paused }))
}

fn handle_start_city(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct StartCityParams {
        name: String,
    }

    let start_params = serde_json::from_value::<StartCityParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'name' parameter"))?;

    let name = validate_city_name(&start_params.name)
        .ok_or_else(|| RpcError::invalid_params("City name must not be empty"))?;

    if context.ui.city_started {
        return Err(RpcError::invalid_state("A city is already running"));
    }

    context.start_events.write(StartCityEvent {
        name: name.to_string(),
    });
    info!("City start requested: {}", name);

    Ok(serde_json::json!({ "success": true, "name": name }))
}

fn handle_get_city_summary(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let city = context
        .city
        .ok_or_else(|| RpcError::invalid_state("No city has been started"))?;
    let summary = city.summary();
    Ok(serde_json::json!({
        "summary": summary,
        "title": TitleBar::from_summary(&summary),
        "paused": context.ui.paused
    }))
}

/// Send queued notifications and responses to the parent window.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    let (notifications, responses) = rpc_interface.take_outgoing();

    for notification in &notifications {
        send_message_to_parent(notification);
    }

    for response in &responses {
        send_message_to_parent(response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}
