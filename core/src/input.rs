use std::collections::HashMap;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::model::task::NewTask;
use crate::time::parse_due_date;

/// Metadata keys understood on the `add` command line.
pub const TASK_KEYS: &[&str] = &["due", "type"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut text_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && !value.is_empty() {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        text_parts.push(arg.as_str());
    }

    ParsedInput {
        text: text_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Builds a draft from `add` arguments such as `Pay rent due:eom` or `Floss t:daily`.
///
/// A due date on a daily habit is rejected rather than silently dropped.
pub fn new_task_from_args(args: &[String], today: NaiveDate) -> Result<NewTask> {
    let parsed = parse_args(args);
    if parsed.text.trim().is_empty() {
        return Err(anyhow!("Task text is required"));
    }

    let mut daily = false;
    let mut due_date = None;
    for (key, value) in &parsed.metadata {
        match expand_key(key, TASK_KEYS)?.as_str() {
            "due" => due_date = Some(parse_due_date(value, today)?),
            "type" => {
                daily = match value.to_lowercase().as_str() {
                    "daily" | "d" | "habit" => true,
                    "one-time" | "once" | "o" => false,
                    other => return Err(anyhow!("Unknown task type: {}", other)),
                }
            }
            other => return Err(anyhow!("Unsupported key: {}", other)),
        }
    }

    if daily {
        if due_date.is_some() {
            return Err(anyhow!("Daily habits cannot have a due date"));
        }
        Ok(NewTask::daily(parsed.text))
    } else {
        Ok(NewTask::one_time(parsed.text, due_date))
    }
}

/// Changes requested by `edit` arguments. `due:none` clears the due date.
#[derive(Debug, Default, PartialEq)]
pub struct TaskEdit {
    pub text: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
}

pub fn task_edit_from_args(args: &[String], today: NaiveDate) -> Result<TaskEdit> {
    let parsed = parse_args(args);
    let mut edit = TaskEdit {
        text: Some(parsed.text).filter(|t| !t.trim().is_empty()),
        due_date: None,
    };

    for (key, value) in &parsed.metadata {
        match expand_key(key, TASK_KEYS)?.as_str() {
            "due" => {
                edit.due_date = match value.to_lowercase().as_str() {
                    "none" | "clear" => Some(None),
                    _ => Some(Some(parse_due_date(value, today)?)),
                }
            }
            other => return Err(anyhow!("'{}' cannot be changed after creation", other)),
        }
    }

    if edit == TaskEdit::default() {
        return Err(anyhow!("Nothing to change"));
    }
    Ok(edit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::NewTaskKind;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&args(&["Buy", "milk", "due:tomorrow", "Type:daily", "at", "10:"]));
        assert_eq!(parsed.text, "Buy milk at 10:");
        assert_eq!(parsed.metadata.get("due"), Some(&"tomorrow".to_string()));
        assert_eq!(parsed.metadata.get("type"), Some(&"daily".to_string()));
    }

    #[test]
    fn test_expand_key() {
        let candidates = vec!["due", "type", "text"];

        assert_eq!(expand_key("d", &candidates).unwrap(), "due");
        assert_eq!(expand_key("ty", &candidates).unwrap(), "type");
        assert_eq!(expand_key("due", &candidates).unwrap(), "due");

        // matches type and text
        assert!(expand_key("t", &candidates).is_err());
        assert!(expand_key("x", &candidates).is_err());
    }

    #[test]
    fn test_new_task_from_args() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();

        let draft = new_task_from_args(&args(&["Pay", "rent", "due:2024-04-01"]), today).unwrap();
        assert_eq!(draft.text, "Pay rent");
        assert_eq!(draft.kind, NewTaskKind::OneTime { due_date: NaiveDate::from_ymd_opt(2024, 4, 1) });

        let habit = new_task_from_args(&args(&["Floss", "t:daily"]), today).unwrap();
        assert_eq!(habit.kind, NewTaskKind::Daily);

        assert!(new_task_from_args(&args(&["Floss", "t:daily", "due:tom"]), today).is_err());
        assert!(new_task_from_args(&args(&["due:tom"]), today).is_err());
        assert!(new_task_from_args(&args(&["Nap", "type:weekly"]), today).is_err());
    }

    #[test]
    fn test_task_edit_from_args() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();

        let edit = task_edit_from_args(&args(&["Call", "mom", "d:tom"]), today).unwrap();
        assert_eq!(edit.text.as_deref(), Some("Call mom"));
        assert_eq!(edit.due_date, Some(NaiveDate::from_ymd_opt(2024, 3, 14)));

        let clear = task_edit_from_args(&args(&["due:none"]), today).unwrap();
        assert_eq!(clear, TaskEdit { text: None, due_date: Some(None) });

        assert!(task_edit_from_args(&args(&[]), today).is_err());
        assert!(task_edit_from_args(&args(&["type:daily"]), today).is_err());
    }
}
