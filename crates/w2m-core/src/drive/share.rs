//! Sharing-URL encoding for the Graph `/shares/{id}` endpoint.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Encode a sharing URL as a share id: `u!` + unpadded base64url of the URL.
pub fn encode_share_link(link: &str) -> String {
    format!("u!{}", URL_SAFE_NO_PAD.encode(link.trim()))
}
