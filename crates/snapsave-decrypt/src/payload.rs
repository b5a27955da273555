use snapsave_core::{SnapError, SnapResult};

pub const SNAPSAVE_ASSIGNMENT: &str = r#"getElementById("download-section").innerHTML = ""#;
pub const SNAPTIK_ASSIGNMENT: &str = r##"$("#download").innerHTML = ""##;
pub const ASSIGNMENT_END: &str = r#""; document.getElementById("inputData").remove(); "#;

/// The two proxy families differ only in which element receives the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFamily {
    SnapSave,
    SnapTik,
}

impl PayloadFamily {
    pub fn assignment(&self) -> &'static str {
        match self {
            PayloadFamily::SnapSave => SNAPSAVE_ASSIGNMENT,
            PayloadFamily::SnapTik => SNAPTIK_ASSIGNMENT,
        }
    }
}

pub fn unwrap_payload(script: &str, family: PayloadFamily) -> SnapResult<String> {
    let (_, rest) = script.split_once(family.assignment()).ok_or_else(|| {
        SnapError::MalformedPayload(format!("{family:?} payload assignment not found"))
    })?;
    let escaped = rest
        .split_once(ASSIGNMENT_END)
        .map_or(rest, |(escaped, _)| escaped);
    Ok(unescape(escaped))
}

/// Builds the script a proxy would emit for `html`.
pub fn wrap_payload(html: &str, family: PayloadFamily) -> String {
    let mut escaped = String::with_capacity(html.len());
    for c in html.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    let target = match family {
        PayloadFamily::SnapSave => format!("document.{SNAPSAVE_ASSIGNMENT}"),
        PayloadFamily::SnapTik => SNAPTIK_ASSIGNMENT.to_string(),
    };
    format!("{target}{escaped}{ASSIGNMENT_END}")
}

fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
