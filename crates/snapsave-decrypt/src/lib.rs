//! Static reversal of the packed JavaScript the downloader proxies return.
//! Nothing here executes script; the packer's decoder is re-implemented.

mod args;
mod numeral;
mod payload;

use snapsave_core::SnapResult;
use tracing::debug;

pub use args::{CALL_SITE_CLOSE, CALL_SITE_OPEN, PackedArgs, extract_arguments};
pub use numeral::{decode_packed, encode_packed};
pub use payload::{
    ASSIGNMENT_END, PayloadFamily, SNAPSAVE_ASSIGNMENT, SNAPTIK_ASSIGNMENT, unwrap_payload,
    wrap_payload,
};

const FIXTURE_TOKEN_MAP: &str = "kQvxTrLmpYhz";
const FIXTURE_BASE: u32 = 9;
const FIXTURE_SHIFT: u32 = 37;

/// Recovers the downloader markup from a raw proxy response body.
pub fn decrypt(body: &str, family: PayloadFamily) -> SnapResult<String> {
    let args = extract_arguments(body)?;
    debug!(
        packed_len = args.packed.len(),
        base = args.base,
        shift = args.shift,
        "extracted packed arguments"
    );
    let script = decode_packed(&args)?;
    let html = unwrap_payload(&script, family)?;
    debug!(html_len = html.len(), ?family, "recovered payload markup");
    Ok(html)
}

/// Produces a response body shaped like the proxies' own, carrying `html`.
/// Used to build fixtures for the decoder and everything downstream of it.
pub fn pack(html: &str, family: PayloadFamily) -> SnapResult<String> {
    let script = wrap_payload(html, family);
    let packed = encode_packed(&script, FIXTURE_TOKEN_MAP, FIXTURE_BASE, FIXTURE_SHIFT)?;
    Ok(format!(
        r#"<script>var _0xc6e=["","split"];eval(function(h,u,n,t,e,r){{r="";for(var i=0,len=h.length;i<len;i++){{}}return decodeURIComponent(escape(r))}}("{packed}",81,"{FIXTURE_TOKEN_MAP}",{FIXTURE_SHIFT},{FIXTURE_BASE},26))</script>"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsave_core::SnapError;

    #[test]
    fn decrypts_packed_snapsave_body() {
        let html = r#"<table class="table"><tbody><tr><td>720p (HD)</td><td></td><td><a href="https://cdn/v.mp4?dl=1">Download</a></td></tr></tbody></table>"#;
        let body = pack(html, PayloadFamily::SnapSave).unwrap();
        assert_eq!(decrypt(&body, PayloadFamily::SnapSave).unwrap(), html);
    }

    #[test]
    fn decrypts_packed_snaptik_body() {
        let html = r#"<div class="video-title">Ünïcode title</div><a class="download-file" href="https://snaptik.app/file">Download HD</a>"#;
        let body = pack(html, PayloadFamily::SnapTik).unwrap();
        assert_eq!(decrypt(&body, PayloadFamily::SnapTik).unwrap(), html);
    }

    #[test]
    fn error_page_is_malformed() {
        let result = decrypt("<html><body>Service unavailable</body></html>", PayloadFamily::SnapSave);
        assert!(matches!(result, Err(SnapError::MalformedPayload(_))));
    }
}
