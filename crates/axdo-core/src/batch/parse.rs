/*!
Batch program parsing: a sequence-of-maps JSON document (spec §6.2) into
[`super::Step`]s. Unknown top-level keys are a parse error; unknown action
names are a parse error too (the spec's "runtime error naming the
supported set" is not distinguishable from a parse error once we've
already rejected the program before any action ran, so both fold into
`CoreError::Parse` here, consistent with "aborts before any action runs").

A batch step's "tag" is the map's one key rather than a fixed field name,
which `serde`'s derive can't express directly — so this parses by hand
over `serde_json::Value` instead of via `#[derive(Deserialize)]`.
*/

use serde_json::Value;

use crate::a11y::RoleTag;
use crate::executor::condition::{Condition, PropertyChecks};
use crate::executor::{Action, ClipboardSubcmd, FieldDescriptor, ScrollDirection, Target, VerifyRequest};
use crate::platform::{MouseButton, WritableAttribute};
use crate::types::{ElementId, ProcessId, Ref, Scope, WindowId};

use crate::types::{CoreError, CoreResult};

use super::control::{IfExists, IfFocused};
use super::Step;

type ParseResult<T> = Result<T, String>;

fn err(msg: impl Into<String>) -> String {
  msg.into()
}

fn object(v: &Value, what: &str) -> ParseResult<&serde_json::Map<String, Value>> {
  v.as_object().ok_or_else(|| err(format!("{what} must be a JSON object")))
}

fn array(v: &Value, what: &str) -> ParseResult<&Vec<Value>> {
  v.as_array().ok_or_else(|| err(format!("{what} must be a JSON array")))
}

fn str_field<'a>(obj: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
  obj.get(key).and_then(Value::as_str)
}

fn bool_field(obj: &serde_json::Map<String, Value>, key: &str, default: bool) -> bool {
  obj.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn u64_field(obj: &serde_json::Map<String, Value>, key: &str, default: u64) -> u64 {
  obj.get(key).and_then(Value::as_u64).unwrap_or(default)
}

fn role_tag(s: &str) -> ParseResult<RoleTag> {
  serde_json::from_value(Value::String(s.to_string())).map_err(|_| err(format!("unknown role {s:?}")))
}

fn roles_field(obj: &serde_json::Map<String, Value>, key: &str) -> ParseResult<Vec<RoleTag>> {
  match obj.get(key) {
    None => Ok(Vec::new()),
    Some(v) => array(v, key)?.iter().map(|r| r.as_str().ok_or_else(|| err(format!("{key} entries must be strings"))).and_then(role_tag)).collect(),
  }
}

fn scope_from(obj: &serde_json::Map<String, Value>) -> Scope {
  Scope {
    app: str_field(obj, "app").map(str::to_string),
    window_title: str_field(obj, "window").map(str::to_string),
    window_id: obj.get("window-id").and_then(Value::as_u64).map(|n| WindowId(n as u32)),
    pid: obj.get("pid").and_then(Value::as_u64).map(|n| ProcessId(n as u32)),
  }
}

fn parse_target(v: &Value) -> ParseResult<Target> {
  let obj = object(v, "target")?;
  if let Some(r) = str_field(obj, "ref") {
    return Ok(Target::Ref(Ref(r.to_string())));
  }
  if let Some(id) = obj.get("id").and_then(Value::as_u64) {
    return Ok(Target::Id(ElementId(id as u32)));
  }
  if let Some(text) = obj.get("text") {
    let (query, roles, exact) = match text {
      Value::String(s) => (s.clone(), Vec::new(), false),
      Value::Object(inner) => (
        str_field(inner, "query").ok_or_else(|| err("target.text needs a query"))?.to_string(),
        roles_field(inner, "roles")?,
        bool_field(inner, "exact", false),
      ),
      _ => return Err(err("target.text must be a string or object")),
    };
    return Ok(Target::Text { query, roles, exact });
  }
  if let (Some(x), Some(y)) = (obj.get("x").and_then(Value::as_i64), obj.get("y").and_then(Value::as_i64)) {
    return Ok(Target::Point(crate::types::Point::new(x as i32, y as i32)));
  }
  Err(err("target needs one of ref, id, text, or x/y"))
}

fn parse_verify(obj: &serde_json::Map<String, Value>) -> VerifyRequest {
  match obj.get("verify") {
    Some(Value::Bool(b)) => VerifyRequest { enabled: *b, delay_ms: None, max_retries: None },
    Some(Value::Object(v)) => VerifyRequest {
      enabled: bool_field(v, "enabled", true),
      delay_ms: v.get("delay-ms").and_then(Value::as_u64),
      max_retries: v.get("max-retries").and_then(Value::as_u64).map(|n| n as u32),
    },
    _ => VerifyRequest::default(),
  }
}

fn parse_condition(obj: &serde_json::Map<String, Value>) -> ParseResult<Condition> {
  Ok(Condition {
    for_text: str_field(obj, "for-text").map(str::to_string),
    for_role: obj.get("for-role").and_then(Value::as_str).map(role_tag).transpose()?,
    for_id: obj.get("for-id").and_then(Value::as_u64).map(|n| ElementId(n as u32)),
    gone: bool_field(obj, "gone", false),
  })
}

fn parse_properties(obj: &serde_json::Map<String, Value>) -> PropertyChecks {
  PropertyChecks {
    value: str_field(obj, "value").map(str::to_string),
    value_contains: str_field(obj, "value-contains").map(str::to_string),
    checked: bool_field(obj, "checked", false),
    unchecked: bool_field(obj, "unchecked", false),
    enabled: bool_field(obj, "enabled", false),
    disabled: bool_field(obj, "disabled", false),
    focused: bool_field(obj, "focused", false),
  }
}

fn mouse_button(obj: &serde_json::Map<String, Value>) -> ParseResult<MouseButton> {
  match str_field(obj, "button").unwrap_or("left") {
    "left" => Ok(MouseButton::Left),
    "right" => Ok(MouseButton::Right),
    "middle" => Ok(MouseButton::Middle),
    other => Err(err(format!("unknown mouse button {other:?}"))),
  }
}

fn writable_attribute(obj: &serde_json::Map<String, Value>) -> ParseResult<WritableAttribute> {
  match str_field(obj, "attribute").unwrap_or("value") {
    "value" => Ok(WritableAttribute::Value),
    "selected" => Ok(WritableAttribute::Selected),
    "focused" => Ok(WritableAttribute::Focused),
    other => Err(err(format!("unknown writable attribute {other:?}"))),
  }
}

fn scroll_direction(s: &str) -> ParseResult<ScrollDirection> {
  serde_json::from_value(Value::String(s.to_string())).map_err(|_| err(format!("unknown scroll direction {s:?}")))
}

fn parse_action(name: &str, obj: &serde_json::Map<String, Value>) -> ParseResult<Action> {
  match name {
    "click" => Ok(Action::Click {
      target: parse_target(obj.get("target").ok_or_else(|| err("click needs a target"))?)?,
      button: mouse_button(obj)?,
      count: u64_field(obj, "count", 1) as u8,
      verify: parse_verify(obj),
      post_read: bool_field(obj, "post-read", false),
      display: bool_field(obj, "display", false),
    }),
    "hover" => Ok(Action::Hover {
      target: parse_target(obj.get("target").ok_or_else(|| err("hover needs a target"))?)?,
    }),
    "drag" => Ok(Action::Drag {
      from: parse_target(obj.get("from").ok_or_else(|| err("drag needs a from target"))?)?,
      to: parse_target(obj.get("to").ok_or_else(|| err("drag needs a to target"))?)?,
    }),
    "type" => Ok(Action::Type {
      target: obj.get("target").map(parse_target).transpose()?,
      text: str_field(obj, "text").map(str::to_string),
      key_combo: str_field(obj, "key-combo").map(str::to_string),
      select_all: bool_field(obj, "select-all", false),
      verify: parse_verify(obj),
      display: bool_field(obj, "display", false),
    }),
    "action" => Ok(Action::Action {
      target: parse_target(obj.get("target").ok_or_else(|| err("action needs a target"))?)?,
      action_name: str_field(obj, "action-name").ok_or_else(|| err("action needs an action-name"))?.to_string(),
      verify: parse_verify(obj),
      display: bool_field(obj, "display", false),
    }),
    "set-value" => Ok(Action::SetValue {
      target: parse_target(obj.get("target").ok_or_else(|| err("set-value needs a target"))?)?,
      value: str_field(obj, "value").ok_or_else(|| err("set-value needs a value"))?.to_string(),
      attribute: writable_attribute(obj)?,
      verify: parse_verify(obj),
      display: bool_field(obj, "display", false),
    }),
    "scroll" => Ok(Action::Scroll {
      direction: scroll_direction(str_field(obj, "direction").ok_or_else(|| err("scroll needs a direction"))?)?,
      amount: u64_field(obj, "amount", 1) as i32,
      target: obj.get("target").map(parse_target).transpose()?,
    }),
    "wait" => Ok(Action::Wait {
      condition: parse_condition(object(obj.get("condition").ok_or_else(|| err("wait needs a condition"))?, "condition")?)?,
      interval_ms: u64_field(obj, "interval-ms", 500),
      timeout_s: u64_field(obj, "timeout-s", 5),
    }),
    "assert" => Ok(Action::Assert {
      condition: parse_condition(object(obj.get("condition").ok_or_else(|| err("assert needs a condition"))?, "condition")?)?,
      properties: obj.get("properties").map(|v| object(v, "properties")).transpose()?.map(parse_properties).unwrap_or_default(),
    }),
    "focus" => Ok(Action::Focus {
      new_document: bool_field(obj, "new-document", false),
    }),
    "read" => Ok(Action::Read),
    "open" => Ok(Action::Open {
      target: str_field(obj, "target").ok_or_else(|| err("open needs a target"))?.to_string(),
    }),
    "clipboard" => {
      let subcmd = match str_field(obj, "subcmd").ok_or_else(|| err("clipboard needs a subcmd"))? {
        "read" => ClipboardSubcmd::Read,
        "write" => ClipboardSubcmd::Write(str_field(obj, "text").ok_or_else(|| err("clipboard write needs text"))?.to_string()),
        "clear" => ClipboardSubcmd::Clear,
        "grab" => ClipboardSubcmd::Grab,
        other => return Err(err(format!("unknown clipboard subcmd {other:?}"))),
      };
      Ok(Action::Clipboard { subcmd })
    }
    "fill" => {
      let fields = array(obj.get("fields").ok_or_else(|| err("fill needs a fields array"))?, "fields")?
        .iter()
        .map(|f| {
          let f = object(f, "fill field")?;
          Ok(FieldDescriptor {
            target: parse_target(f.get("target").ok_or_else(|| err("fill field needs a target"))?)?,
            value: str_field(f, "value").ok_or_else(|| err("fill field needs a value"))?.to_string(),
          })
        })
        .collect::<ParseResult<Vec<_>>>()?;
      Ok(Action::Fill {
        fields,
        submit: obj.get("submit").map(parse_target).transpose()?,
      })
    }
    "sleep" => Ok(Action::Sleep { ms: u64_field(obj, "ms", 0) }),
    other => Err(err(format!(
      "unknown action {other:?}; supported: click, hover, drag, type, action, set-value, scroll, wait, assert, focus, read, open, clipboard, fill, sleep"
    ))),
  }
}

fn parse_step(v: &Value) -> ParseResult<Step> {
  let obj = object(v, "step")?;
  if obj.len() != 1 {
    return Err(err("a step must have exactly one key naming its action or control kind"));
  }
  let (key, value) = obj.iter().next().expect("len checked above");

  match key.as_str() {
    "if-exists" => {
      let value = object(value, "if-exists")?;
      let condition = parse_condition(object(value.get("condition").ok_or_else(|| err("if-exists needs a condition"))?, "condition")?)?;
      Ok(Step::IfExists {
        branch: IfExists { condition },
        then_steps: parse_branch(value, "then")?,
        else_steps: parse_branch(value, "else")?,
      })
    }
    "if-focused" => {
      let value = object(value, "if-focused")?;
      Ok(Step::IfFocused {
        branch: IfFocused {
          roles: roles_field(value, "roles")?,
          text: str_field(value, "text").map(str::to_string),
        },
        then_steps: parse_branch(value, "then")?,
        else_steps: parse_branch(value, "else")?,
      })
    }
    "try" => Ok(Step::Try { steps: parse_steps(value)? }),
    action_name => {
      let params = object(value, action_name)?;
      Ok(Step::Regular {
        action: parse_action(action_name, params)?,
        scope: scope_from(params),
      })
    }
  }
}

fn parse_branch(obj: &serde_json::Map<String, Value>, key: &str) -> ParseResult<Vec<Step>> {
  match obj.get(key) {
    None => Ok(Vec::new()),
    Some(v) => parse_steps(v),
  }
}

fn parse_steps(v: &Value) -> ParseResult<Vec<Step>> {
  array(v, "batch program")?.iter().map(parse_step).collect()
}

/// Parse a full batch program: a JSON array of step maps (spec §6.2).
/// Malformed input is `CoreError::Parse`, surfaced before any action runs
/// (spec §7 kind 7).
pub fn parse_program(v: &Value) -> CoreResult<Vec<Step>> {
  parse_steps(v).map_err(CoreError::Parse)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn parses_a_regular_click_step() {
    let program = json!([{ "click": { "target": { "id": 2 }, "app": "Notes" } }]);
    let steps = parse_program(&program).unwrap();
    assert_eq!(steps.len(), 1);
    match &steps[0] {
      Step::Regular { action: Action::Click { target: Target::Id(id), .. }, scope } => {
        assert_eq!(id.0, 2);
        assert_eq!(scope.app.as_deref(), Some("Notes"));
      }
      other => panic!("expected a click step, got {other:?}"),
    }
  }

  #[test]
  fn parses_if_exists_with_then_and_else() {
    let program = json!([{
      "if-exists": {
        "condition": { "for-text": "Send" },
        "then": [{ "click": { "target": { "id": 2 } } }],
        "else": [{ "sleep": { "ms": 10 } }],
      }
    }]);
    let steps = parse_program(&program).unwrap();
    match &steps[0] {
      Step::IfExists { then_steps, else_steps, .. } => {
        assert_eq!(then_steps.len(), 1);
        assert_eq!(else_steps.len(), 1);
      }
      other => panic!("expected if-exists, got {other:?}"),
    }
  }

  #[test]
  fn parses_try_block() {
    let program = json!([{ "try": [{ "click": { "target": { "id": 2 } } }] }]);
    let steps = parse_program(&program).unwrap();
    assert!(matches!(&steps[0], Step::Try { steps } if steps.len() == 1));
  }

  #[test]
  fn rejects_unknown_action_name() {
    let program = json!([{ "frobnicate": {} }]);
    let err = parse_program(&program).unwrap_err().to_string();
    assert!(err.contains("unknown action"));
  }

  #[test]
  fn rejects_step_with_more_than_one_key() {
    let program = json!([{ "click": {}, "hover": {} }]);
    let err = parse_program(&program).unwrap_err().to_string();
    assert!(err.contains("exactly one key"));
  }
}
