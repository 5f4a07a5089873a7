//! CIDR exclusion — dropping records from known crawler networks.
//!
//! Fetching the current range list is the feeds crate's job; this module
//! only parses CIDR text and tests membership.

use crate::error::CidrError;
use crate::types::Record;
use ipnet::IpNet;
use std::net::IpAddr;

/// Parse CIDR strings such as `66.249.64.0/27` or `2001:4860:4801:10::/64`.
/// A bare address is accepted as a single-host network.
pub fn parse_cidrs<I, S>(values: I) -> Result<Vec<IpNet>, CidrError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| parse_cidr(v.as_ref()))
        .collect()
}

fn parse_cidr(value: &str) -> Result<IpNet, CidrError> {
    let value = value.trim();
    if let Ok(net) = value.parse::<IpNet>() {
        return Ok(net);
    }
    let invalid = |reason: String| CidrError {
        value: value.to_string(),
        reason,
    };
    let ip = value
        .parse::<IpAddr>()
        .map_err(|e| invalid(e.to_string()))?;
    let host_prefix = if ip.is_ipv4() { 32 } else { 128 };
    IpNet::new(ip, host_prefix).map_err(|e| invalid(e.to_string()))
}

/// Whether `record`'s source address lies in any of `networks`.
pub fn in_any(record: &Record, networks: &[IpNet]) -> bool {
    let ip = IpAddr::V4(record.source_ip);
    networks.iter().any(|net| net.contains(&ip))
}

/// Records whose source address is outside every network in `networks`. An
/// empty list keeps everything.
pub fn exclude_networks<'a, I>(records: I, networks: &[IpNet]) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|r| !in_any(r, networks))
        .collect()
}
