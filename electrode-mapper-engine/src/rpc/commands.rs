use bevy::prelude::*;
use serde::Deserialize;
use serde_json::Value;

use crate::engine::core::app_state::Screen;
use crate::rpc::web_rpc::RpcError;
use crate::tools::electrodes::gesture::SelectionMode;

/// Side-panel action requested by the hosting page (or a native shortcut).
/// Each screen plugin reads the commands that concern it and ignores the rest.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Navigate(Screen),
    SelectFiducial(usize),
    SetSelectionMode(SelectionMode),
    RemoveSelectedElectrodes,
    RemoveElectrode(usize),
    /// `None` resets the sphere side of the edited connection.
    ChooseSphereElectrode(Option<String>),
    /// `None` resets the head side of the edited connection.
    ChooseHeadElectrode(Option<usize>),
    ConfirmConnection,
    RemoveConnection(usize),
    /// Re-send the active screen's state notifications.
    ReportState,
}

#[derive(Deserialize)]
struct NavigateParams {
    screen: String,
}

#[derive(Deserialize)]
struct IndexParams {
    index: usize,
}

#[derive(Deserialize)]
struct ModeParams {
    mode: String,
}

#[derive(Deserialize)]
struct LabelParams {
    label: Option<String>,
}

#[derive(Deserialize)]
struct OptionalIndexParams {
    index: Option<usize>,
}

fn params<T: for<'de> Deserialize<'de>>(params: &Value, expected: &str) -> Result<T, RpcError> {
    serde_json::from_value::<T>(params.clone())
        .map_err(|_| RpcError::invalid_params(&format!("Expected {expected}")))
}

/// Translate a JSON-RPC method and its params into a command.
pub fn parse_session_command(method: &str, raw: &Value) -> Result<SessionCommand, RpcError> {
    let command = match method {
        "navigate" => {
            let p: NavigateParams = params(raw, "'screen' parameter")?;
            let screen = Screen::from_string(&p.screen)
                .ok_or_else(|| RpcError::invalid_params(&format!("Unknown screen: {}", p.screen)))?;
            SessionCommand::Navigate(screen)
        }
        "select_fiducial" => {
            let p: IndexParams = params(raw, "'index' parameter")?;
            SessionCommand::SelectFiducial(p.index)
        }
        "set_selection_mode" => {
            let p: ModeParams = params(raw, "'mode' parameter")?;
            let mode = SelectionMode::from_string(&p.mode)
                .ok_or_else(|| RpcError::invalid_params(&format!("Unknown mode: {}", p.mode)))?;
            SessionCommand::SetSelectionMode(mode)
        }
        "remove_selected_electrodes" => SessionCommand::RemoveSelectedElectrodes,
        "remove_electrode" => {
            let p: IndexParams = params(raw, "'index' parameter")?;
            SessionCommand::RemoveElectrode(p.index)
        }
        "choose_sphere_electrode" => {
            let p: LabelParams = params(raw, "'label' parameter (string or null)")?;
            SessionCommand::ChooseSphereElectrode(p.label)
        }
        "choose_head_electrode" => {
            let p: OptionalIndexParams = params(raw, "'index' parameter (number or null)")?;
            SessionCommand::ChooseHeadElectrode(p.index)
        }
        "confirm_connection" => SessionCommand::ConfirmConnection,
        "remove_connection" => {
            let p: IndexParams = params(raw, "'index' parameter")?;
            SessionCommand::RemoveConnection(p.index)
        }
        "get_state" => SessionCommand::ReportState,
        _ => return Err(RpcError::method_not_found(method)),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_every_method() {
        let cases = [
            ("navigate", json!({"screen": "correspondence"}), SessionCommand::Navigate(Screen::Correspondence)),
            ("select_fiducial", json!({"index": 2}), SessionCommand::SelectFiducial(2)),
            ("set_selection_mode", json!({"mode": "lasso"}), SessionCommand::SetSelectionMode(SelectionMode::Lasso)),
            ("remove_selected_electrodes", json!({}), SessionCommand::RemoveSelectedElectrodes),
            ("remove_electrode", json!({"index": 1}), SessionCommand::RemoveElectrode(1)),
            ("choose_sphere_electrode", json!({"label": "Cz"}), SessionCommand::ChooseSphereElectrode(Some("Cz".into()))),
            ("choose_sphere_electrode", json!({"label": null}), SessionCommand::ChooseSphereElectrode(None)),
            ("choose_head_electrode", json!({"index": 4}), SessionCommand::ChooseHeadElectrode(Some(4))),
            ("choose_head_electrode", json!({"index": null}), SessionCommand::ChooseHeadElectrode(None)),
            ("confirm_connection", Value::Null, SessionCommand::ConfirmConnection),
            ("remove_connection", json!({"index": 0}), SessionCommand::RemoveConnection(0)),
            ("get_state", json!({}), SessionCommand::ReportState),
        ];
        for (method, raw, expected) in cases {
            assert_eq!(parse_session_command(method, &raw).unwrap(), expected, "{method}");
        }
    }

    #[test]
    fn unknown_method_is_not_found() {
        let err = parse_session_command("get_fps", &json!({})).unwrap_err();
        assert_eq!(err.code, -32601);
    }

    #[test]
    fn bad_params_are_invalid() {
        for (method, raw) in [
            ("navigate", json!({"screen": "summary"})),
            ("navigate", json!({})),
            ("select_fiducial", json!({"index": -1})),
            ("set_selection_mode", json!({"mode": "circle"})),
            ("remove_connection", json!({"index": "first"})),
            ("remove_electrode", json!({})),
        ] {
            let err = parse_session_command(method, &raw).unwrap_err();
            assert_eq!(err.code, -32602, "{method}");
        }
    }
}
