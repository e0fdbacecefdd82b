use serde_json::{Map, Value};

use super::InferenceError;

/// Parse the model's reply into its JSON object.
///
/// The reply may wrap the object in prose or code fences. An object whose
/// fields are all null (or blank strings) is reported as
/// [`InferenceError::EmptyResult`] so the caller can fall back.
pub fn parse_inference_response(reply: &str) -> Result<Map<String, Value>, InferenceError> {
    let object = extract_json_object(reply)?;

    let has_content = object.values().any(|value| match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    });
    if !has_content {
        return Err(InferenceError::EmptyResult);
    }

    Ok(object)
}

/// First balanced `{...}` in `text` that parses as a JSON object.
///
/// Braces inside string literals (including escaped quotes) do not count
/// toward nesting.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, InferenceError> {
    let mut last_error = None;

    for (start, _) in text.match_indices('{') {
        let Some(end) = balanced_end(&text[start..]) else {
            continue;
        };
        match serde_json::from_str::<Map<String, Value>>(&text[start..start + end]) {
            Ok(object) => return Ok(object),
            Err(e) => last_error = Some(e.to_string()),
        }
    }

    Err(match last_error {
        Some(message) => InferenceError::JsonParsing(message),
        None => InferenceError::MalformedResponse("No JSON object found".into()),
    })
}

/// Byte length of the balanced object starting at `text[0] == '{'`.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_object() {
        let object = parse_inference_response(r#"{"年龄": 16, "人数": 2}"#).unwrap();
        assert_eq!(object["年龄"], 16);
        assert_eq!(object["人数"], 2);
    }

    #[test]
    fn skips_surrounding_prose_and_fences() {
        let reply = "好的，提取结果如下：\n```json\n{\"活动类型\": \"环保\", \"日期\": null}\n```\n希望有帮助。";
        let object = parse_inference_response(reply).unwrap();
        assert_eq!(object["活动类型"], "环保");
    }

    #[test]
    fn takes_first_object_only() {
        let reply = r#"{"人数": 3} 以及 {"人数": 4}"#;
        assert_eq!(parse_inference_response(reply).unwrap()["人数"], 3);
    }

    #[test]
    fn braces_inside_strings_do_not_nest() {
        let reply = r#"结果 {"时间": "}{ \"quoted\" {", "人数": 1} 结束"#;
        let object = parse_inference_response(reply).unwrap();
        assert_eq!(object["时间"], "}{ \"quoted\" {");
    }

    #[test]
    fn nested_objects_are_kept_whole() {
        let object = parse_inference_response(r#"{"人数": 2, "extra": {"a": 1}}"#).unwrap();
        assert_eq!(object["extra"]["a"], 1);
    }

    #[test]
    fn skips_unparsable_brace_group() {
        let reply = r#"{not json} {"人数": 5}"#;
        assert_eq!(parse_inference_response(reply).unwrap()["人数"], 5);
    }

    #[test]
    fn no_object_is_malformed() {
        let err = parse_inference_response("抱歉，我无法回答").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = parse_inference_response("{年龄: 16}").unwrap_err();
        assert!(matches!(err, InferenceError::JsonParsing(_)));
    }

    #[test]
    fn unclosed_object_is_malformed() {
        let err = parse_inference_response(r#"{"年龄": 16"#).unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn all_null_object_is_empty_result() {
        let reply = r#"{"年龄": null, "人数": null, "日期": null, "时间": "", "活动类型": null}"#;
        assert_eq!(parse_inference_response(reply), Err(InferenceError::EmptyResult));
        assert_eq!(parse_inference_response("{}"), Err(InferenceError::EmptyResult));
    }
}
