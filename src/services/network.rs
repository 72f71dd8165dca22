use std::collections::BTreeMap;

use log::{debug, warn};

use super::sys::run_sys;

/// Shown for an interface without an address or without a reachable gateway.
pub const NO_CONNECTION: &str = "No Connection";

/// Interface name mapped to its IPv4 address or [`NO_CONNECTION`].
pub type Interfaces = BTreeMap<String, String>;

/// Enumerate broadcast-capable interfaces. Never fails; a missing or broken
/// `ifconfig` yields an empty map.
pub fn list_interfaces() -> Interfaces {
    match run_sys("ifconfig") {
        Ok(output) => parse_ifconfig(&output),
        Err(e) => {
            warn!("Could not list network interfaces: {:#}", e);
            Interfaces::new()
        }
    }
}

/// Parse `ifconfig` output into interface addresses.
///
/// Only interfaces flagged `BROADCAST` are listed, which leaves out
/// loopback. An interface counts as connected when an `inet` line with a
/// broadcast address follows its header.
pub fn parse_ifconfig(output: &str) -> Interfaces {
    let mut interfaces = Interfaces::new();
    let mut current: Option<String> = None;

    for line in output.lines() {
        let is_header = !line.starts_with(char::is_whitespace) && !line.trim().is_empty();

        if is_header {
            current = None;
            if line.contains("BROADCAST") {
                if let Some((name, _)) = line.split_once(':') {
                    let name = name.trim().to_string();
                    interfaces.insert(name.clone(), NO_CONNECTION.to_string());
                    current = Some(name);
                }
            }
            continue;
        }

        let trimmed = line.trim();
        if let Some(name) = &current {
            if trimmed.starts_with("inet ") && trimmed.contains("broadcast") {
                if let Some(address) = trimmed.split_whitespace().nth(1) {
                    interfaces.insert(name.clone(), address.to_string());
                }
            }
        }
    }

    interfaces
}

/// The conventional `.1` gateway of an IPv4 address's /24.
pub fn gateway_for(address: &str) -> Option<String> {
    let octets: Vec<&str> = address.split('.').collect();
    if octets.len() != 4 || octets.iter().any(|o| o.parse::<u8>().is_err()) {
        return None;
    }
    Some(format!("{}.{}.{}.1", octets[0], octets[1], octets[2]))
}

/// Ping each connected interface's gateway and mark unreachable ones.
pub fn probe_reachability(mut interfaces: Interfaces) -> Interfaces {
    for (name, address) in interfaces.iter_mut() {
        if address == NO_CONNECTION {
            continue;
        }

        let Some(gateway) = gateway_for(address) else {
            debug!("Skipping probe for {} with address {}", name, address);
            continue;
        };

        let reachable = match run_sys(&format!("ping -c 1 -W 2 -I {} {}", name, gateway)) {
            Ok(output) => !output.contains(" 0 received"),
            Err(e) => {
                debug!("Ping via {} failed: {:#}", name, e);
                false
            }
        };

        if !reachable {
            warn!("Gateway {} unreachable via {}", gateway, name);
            *address = NO_CONNECTION.to_string();
        }
    }
    interfaces
}
