//! Extend-and-index subnet calculation.
//!
//! `compute_subnet("10.10.0.0/24", 4, 15)` extends the /24 by 4 bits and
//! returns subnet number 15 of the resulting /28s: `10.10.0.240/28`.
//! Works for both IPv4 and IPv6 prefixes.

use crate::error::Error;
use colored::Colorize;
use ipnet::IpNet;
use num_bigint::BigUint;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Compute subnet `netnum` of `prefix` extended by `newbits`, as CIDR text.
pub fn compute_subnet(prefix: &str, newbits: i64, netnum: i64) -> Result<String, Error> {
    let subnet = extend_prefix(prefix, newbits, netnum)?;
    log::debug!(
        "{prefix} + {newbits} bits, netnum {netnum} => {subnet}",
        subnet = subnet.to_string().green()
    );
    Ok(subnet.to_string())
}

/// Same as [`compute_subnet`], returning the parsed network.
pub fn extend_prefix(prefix: &str, newbits: i64, netnum: i64) -> Result<IpNet, Error> {
    let base = parse_prefix(prefix)?;
    if newbits < 0 {
        return Err(Error::NegativeOperand {
            name: "newbits",
            value: newbits,
        });
    }
    if netnum < 0 {
        return Err(Error::NegativeOperand {
            name: "netnum",
            value: netnum,
        });
    }

    let ones = i64::from(base.prefix_len());
    let bits = i64::from(base.max_prefix_len());
    let insufficient = || Error::InsufficientAddressSpace {
        prefix: prefix.to_string(),
        newbits,
    };
    let new_prefix_len = ones
        .checked_add(newbits)
        .filter(|len| *len <= bits)
        .ok_or_else(insufficient)?;

    // A netnum of 63 bits or fewer always fits 64+ newbits.
    if newbits < 64 && netnum as u64 > (1u64 << newbits) - 1 {
        return Err(Error::NetnumOutOfRange { netnum, newbits });
    }

    // new_prefix_len <= bits <= 128 from here on
    let new_prefix_len = new_prefix_len as u8;
    let addr = carve(base.network(), new_prefix_len, netnum as u64).ok_or_else(insufficient)?;
    IpNet::new(addr, new_prefix_len).map_err(|_| insufficient())
}

/// Parse `addr/len`. IPv4 octets with leading zeros and signed or empty
/// lengths are rejected.
pub fn parse_prefix(prefix: &str) -> Result<IpNet, Error> {
    let invalid = |reason: String| Error::InvalidPrefix {
        prefix: prefix.to_string(),
        reason,
    };
    let (addr, len) = prefix
        .split_once('/')
        .ok_or_else(|| invalid("missing '/'".to_string()))?;
    let addr: IpAddr = addr
        .parse()
        .map_err(|e| invalid(format!("address {addr}: {e}")))?;
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("invalid mask length {len}")));
    }
    let len: u8 = len
        .parse()
        .map_err(|_| invalid(format!("invalid mask length {len}")))?;
    IpNet::new(addr, len).map_err(|e| invalid(e.to_string()))
}

/// OR `netnum`, shifted to sit just above the host bits of a
/// `/new_prefix_len`, into `base`. `base` is not masked first.
pub fn carve(base: IpAddr, new_prefix_len: u8, netnum: u64) -> Option<IpAddr> {
    let (octets, bits) = match base {
        IpAddr::V4(addr) => (addr.octets().to_vec(), 32u32),
        IpAddr::V6(addr) => (addr.octets().to_vec(), 128u32),
    };
    let shift = bits.checked_sub(u32::from(new_prefix_len))?;

    let value = BigUint::from_bytes_be(&octets) | (BigUint::from(netnum) << shift);
    log::trace!("carve {base} shift={shift} value={value:x}");

    match base {
        IpAddr::V4(_) => fill_bytes::<4>(&value).map(|b| IpAddr::V4(Ipv4Addr::from(b))),
        IpAddr::V6(_) => fill_bytes::<16>(&value).map(|b| IpAddr::V6(Ipv6Addr::from(b))),
    }
}

/// Big-endian bytes of `value`, left padded to `N`. `None` if it does not fit.
fn fill_bytes<const N: usize>(value: &BigUint) -> Option<[u8; N]> {
    let bytes = value.to_bytes_be();
    let start = N.checked_sub(bytes.len())?;
    let mut out = [0u8; N];
    out[start..].copy_from_slice(&bytes);
    Some(out)
}
