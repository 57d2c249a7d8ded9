//! QR-code image links for opening a page on a phone.

/// Public QR-code image endpoint.
pub const QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Image URL for a square QR code of `size` pixels encoding `data`.
pub fn qr_image_url(data: &str, size: u32) -> String {
    format!(
        "{QR_ENDPOINT}?size={size}x{size}&data={}",
        percent_encode(data)
    )
}

/// Base URL of the dev server as reached from the local network.
pub fn lan_base_url(ip: &str, port: u16) -> String {
    format!("http://{ip}:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(percent_encode("a b/c?d=e&f"), "a%20b%2Fc%3Fd%3De%26f");
        assert_eq!(percent_encode("safe-._~"), "safe-._~");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn builds_image_url() {
        let url = qr_image_url("http://192.168.1.20:3000/ar-camera", 200);
        assert_eq!(
            url,
            "https://api.qrserver.com/v1/create-qr-code/?size=200x200\
             &data=http%3A%2F%2F192.168.1.20%3A3000%2Far-camera"
        );
    }
}
