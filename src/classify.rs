//! Mapping DNS responses to Prop279 outcomes.

use std::fmt;

use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;

/// Prop279 status codes as written on a `RESOLVED` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success = 0,
    GenericFail = 1,
    NotInZone = 2,
    NxDomain = 3,
    Timeout = 4,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Success,
        Status::GenericFail,
        Status::NotInZone,
        Status::NxDomain,
        Status::Timeout,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// The result string attached to an outcome.
///
/// Resolved values go on the wire bare, failure reasons go quoted. Clients
/// depend on this asymmetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Value(String),
    Reason(String),
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::Value(value) => f.write_str(value),
            Detail::Reason(reason) => write!(f, "\"{}\"", reason),
        }
    }
}

/// Classified result of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub detail: Detail,
}

impl Outcome {
    pub fn success(value: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            detail: Detail::Value(value.into()),
        }
    }

    pub fn failure(status: Status, reason: impl Into<String>) -> Self {
        Self {
            status,
            detail: Detail::Reason(reason.into()),
        }
    }

    pub fn is_nx_domain(&self) -> bool {
        self.status == Status::NxDomain
    }
}

/// Classify a response from the engine.
///
/// `parse_onion` selects between onion-service discovery (TXT answers naming
/// a `.onion` host) and direct resolution (A, then AAAA, then CNAME).
pub fn classify(response: &Message, parse_onion: bool) -> Outcome {
    match response.response_code() {
        ResponseCode::NXDomain => Outcome::failure(Status::NxDomain, "NXDOMAIN"),
        ResponseCode::Refused => Outcome::failure(Status::NotInZone, "Not in Namecoin zone"),
        ResponseCode::NoError => {
            let found = if parse_onion {
                find_onion(response)
            } else {
                find_address(response)
            };

            match found {
                Some(value) => Outcome::success(value),
                None => Outcome::failure(Status::NxDomain, "No matching records"),
            }
        }
        _ => Outcome::failure(Status::GenericFail, "Server failure"),
    }
}

fn find_onion(response: &Message) -> Option<String> {
    response.answers().iter().find_map(|record| {
        let RData::TXT(txt) = record.data() else {
            return None;
        };

        let first = txt.txt_data().first()?;
        let onion = std::str::from_utf8(first).ok()?;

        (is_domain_name(onion) && onion.ends_with(".onion")).then(|| onion.to_string())
    })
}

fn find_address(response: &Message) -> Option<String> {
    let answers = response.answers();

    // Each pass scans the whole answer list; an A record anywhere beats an
    // earlier AAAA or CNAME.
    answers
        .iter()
        .find_map(|record| match record.data() {
            RData::A(a) => Some(a.0.to_string()),
            _ => None,
        })
        .or_else(|| {
            answers.iter().find_map(|record| match record.data() {
                // IPv4-mapped addresses print in dotted quad form.
                RData::AAAA(aaaa) => Some(match aaaa.0.to_ipv4_mapped() {
                    Some(v4) => v4.to_string(),
                    None => aaaa.0.to_string(),
                }),
                _ => None,
            })
        })
        .or_else(|| {
            answers.iter().find_map(|record| match record.data() {
                RData::CNAME(cname) if cname.0.is_fqdn() => {
                    let target = cname.0.to_ascii();
                    Some(target.strip_suffix('.').unwrap_or(&target).to_string())
                }
                _ => None,
            })
        })
}

/// Syntactic domain name check for presentation-format names.
///
/// Accepts names with or without a trailing dot. Rejects empty names, empty
/// interior labels, labels over 63 octets and names over 255 octets.
pub fn is_domain_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name == "." {
        return true;
    }

    let trimmed = name.strip_suffix('.').unwrap_or(name);

    // Wire length: one length octet per label plus the root octet.
    let mut wire_len = 1;
    for label in trimmed.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        wire_len += label.len() + 1;
    }

    wire_len <= 255
}
