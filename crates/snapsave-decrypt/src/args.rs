use snapsave_core::{SnapError, SnapResult};

/// Marker closing the packer's decoder body; the call arguments follow it.
pub const CALL_SITE_OPEN: &str = "decodeURIComponent(escape(r))}(";
pub const CALL_SITE_CLOSE: &str = "))";

const ARGUMENT_COUNT: usize = 6;

/// The six arguments handed to the packer's decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedArgs {
    pub packed: String,
    pub padding: String,
    pub token_map: String,
    pub shift: u32,
    pub base: u32,
    pub aux: String,
}

pub fn extract_arguments(body: &str) -> SnapResult<PackedArgs> {
    let (_, rest) = body
        .split_once(CALL_SITE_OPEN)
        .ok_or_else(|| SnapError::MalformedPayload("decoder call site not found".to_string()))?;
    let (list, _) = rest.split_once(CALL_SITE_CLOSE).ok_or_else(|| {
        SnapError::MalformedPayload("decoder argument list is not terminated".to_string())
    })?;

    let values: Vec<String> = list
        .split(',')
        .map(|value| value.replace('"', "").trim().to_string())
        .collect();
    let [packed, padding, token_map, shift, base, aux]: [String; ARGUMENT_COUNT] =
        values.try_into().map_err(|values: Vec<String>| {
            SnapError::MalformedPayload(format!(
                "expected {ARGUMENT_COUNT} decoder arguments, found {}",
                values.len()
            ))
        })?;

    Ok(PackedArgs {
        packed,
        padding,
        token_map,
        shift: parse_number("shift", &shift)?,
        base: parse_number("base", &base)?,
        aux,
    })
}

fn parse_number(name: &str, value: &str) -> SnapResult<u32> {
    value
        .parse()
        .map_err(|err| SnapError::MalformedPayload(format!("invalid {name} '{value}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_six_arguments() {
        let body = r#"eval(function(h,u,n,t,e,r){return decodeURIComponent(escape(r))}("abcXdef",27,"abcdefgX",45,7,31))"#;
        let args = extract_arguments(body).unwrap();
        assert_eq!(args.packed, "abcXdef");
        assert_eq!(args.padding, "27");
        assert_eq!(args.token_map, "abcdefgX");
        assert_eq!(args.shift, 45);
        assert_eq!(args.base, 7);
        assert_eq!(args.aux, "31");
    }

    #[test]
    fn missing_call_site_is_malformed() {
        let result = extract_arguments("<html>Error 503</html>");
        assert!(matches!(result, Err(SnapError::MalformedPayload(_))));
    }

    #[test]
    fn wrong_arity_is_malformed() {
        let body = r#"decodeURIComponent(escape(r))}("abc",1,"map"))"#;
        match extract_arguments(body) {
            Err(SnapError::MalformedPayload(msg)) => assert!(msg.contains("found 3")),
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_shift_is_malformed() {
        let body = r#"decodeURIComponent(escape(r))}("abc",1,"map",x,5,2))"#;
        assert!(matches!(
            extract_arguments(body),
            Err(SnapError::MalformedPayload(_))
        ));
    }
}
