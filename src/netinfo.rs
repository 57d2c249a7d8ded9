//! Local network address detection and env-file update for LAN access.

use std::fs;
use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::path::Path;

use tracing::{debug, warn};

/// Env key holding the detected address.
pub const IP_KEY: &str = "GRIDMIND_LOCAL_IP";
/// Env key holding the LAN base URL.
pub const URL_KEY: &str = "GRIDMIND_PUBLIC_URL";

/// Best-effort local network address.
///
/// Connects a UDP socket towards a public address (no packet is sent) and
/// reads back the chosen local interface. Falls back to loopback.
pub fn detect_local_ip() -> IpAddr {
    match probe_local_ip() {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Err(e) => {
            warn!(error = %e, "could not detect local network address, using loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn probe_local_ip() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    Ok(socket.local_addr()?.ip())
}

/// Sets `key=value` lines in env-file text, keeping all other lines.
pub fn upsert_env(contents: &str, pairs: &[(&str, &str)]) -> String {
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    for (key, value) in pairs {
        let entry = format!("{key}={value}");
        let existing = lines.iter_mut().find(|l| {
            l.split_once('=')
                .is_some_and(|(k, _)| k.trim() == *key && !k.trim_start().starts_with('#'))
        });
        match existing {
            Some(line) => *line = entry,
            None => lines.push(entry),
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Writes the detected address and URL into the env file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be read or written.
pub fn write_env_file(path: &Path, ip: IpAddr, port: u16) -> io::Result<String> {
    let current = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    let ip = ip.to_string();
    let url = crate::qr::lan_base_url(&ip, port);
    let updated = upsert_env(&current, &[(IP_KEY, &ip), (URL_KEY, &url)]);
    fs::write(path, &updated)?;
    debug!(path = %path.display(), %ip, "env file updated");
    Ok(url)
}
