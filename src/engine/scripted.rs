//! In-memory engine for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};

use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::opt::{EdnsCode, EdnsOption};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, TXT};
use hickory_proto::rr::{Name, RData, Record, RecordType};

use super::{EngineError, ResolutionEngine};
use crate::query::STREAM_ISOLATION_OPTION;

#[derive(Clone)]
pub enum Reply {
    Message(Message),
    Timeout,
    IoError,
}

impl Reply {
    pub fn rcode(rcode: ResponseCode) -> Self {
        Reply::Message(response(rcode))
    }

    pub fn answers(answers: Vec<RData>) -> Self {
        let mut message = response(ResponseCode::NoError);
        let owner = Name::root();
        for rdata in answers {
            message.add_answer(Record::from_rdata(owner.clone(), 60, rdata));
        }
        Reply::Message(message)
    }
}

fn response(rcode: ResponseCode) -> Message {
    let mut message = Message::new();
    message
        .set_message_type(MessageType::Response)
        .set_response_code(rcode);
    message
}

pub fn a(ip: [u8; 4]) -> RData {
    RData::A(A(Ipv4Addr::from(ip)))
}

pub fn aaaa(ip: Ipv6Addr) -> RData {
    RData::AAAA(AAAA(ip))
}

pub fn txt(value: &str) -> RData {
    RData::TXT(TXT::new(vec![value.to_string()]))
}

pub fn cname(target: &str) -> RData {
    RData::CNAME(CNAME(Name::from_ascii(target).unwrap()))
}

/// A query as the engine saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub qname: String,
    pub qtype: RecordType,
    pub stream_id: Vec<u8>,
}

/// Answers from a fixed script keyed by (qname, qtype); anything unscripted
/// gets NXDOMAIN.
#[derive(Default)]
pub struct ScriptedEngine {
    replies: HashMap<(String, RecordType), Reply>,
    seen: RefCell<Vec<Seen>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `qname` is fully qualified, e.g. `"_tor.example.bit."`.
    pub fn on(mut self, qname: &str, qtype: RecordType, reply: Reply) -> Self {
        self.replies.insert((qname.to_string(), qtype), reply);
        self
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.borrow().clone()
    }

    pub fn seen_lookups(&self) -> Vec<(String, RecordType)> {
        self.seen()
            .into_iter()
            .map(|s| (s.qname, s.qtype))
            .collect()
    }
}

impl ResolutionEngine for ScriptedEngine {
    async fn resolve(&self, query: Message) -> Result<Message, EngineError> {
        let question = &query.queries()[0];
        let qname = question.name().to_ascii();
        let qtype = question.query_type();

        let stream_id = query
            .extensions()
            .as_ref()
            .and_then(|edns| edns.option(EdnsCode::from(STREAM_ISOLATION_OPTION)))
            .map(|opt| match opt {
                EdnsOption::Unknown(_, data) => data.clone(),
                _ => Vec::new(),
            })
            .unwrap_or_default();

        self.seen.borrow_mut().push(Seen {
            qname: qname.clone(),
            qtype,
            stream_id,
        });

        match self.replies.get(&(qname, qtype)) {
            Some(Reply::Message(message)) => {
                let mut response = message.clone();
                response.set_id(query.id());
                Ok(response)
            }
            Some(Reply::Timeout) => Err(EngineError::Timeout),
            Some(Reply::IoError) => Err(EngineError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            None => Ok(response(ResponseCode::NXDomain)),
        }
    }
}
