//! DNS query construction for resolution attempts.

use hickory_proto::ProtoError;
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::opt::EdnsOption;
use hickory_proto::rr::{Name, RecordType};

use crate::transport::MAX_DNS_PACKET_SIZE;

/// EDNS0 option code carrying the Prop279 stream isolation ID.
///
/// First code of the local/experimental range (RFC 6891 section 9); the
/// Namecoin resolver reads stream isolation from this option.
pub const STREAM_ISOLATION_OPTION: u16 = 0xFDE9;

/// One DNS lookup the resolver will try for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub qname: String,
    pub qtype: RecordType,
    /// Read TXT answers as onion service names instead of addresses.
    pub parse_onion: bool,
}

impl Attempt {
    /// Onion service discovery via `_tor.<name>` TXT.
    pub fn onion(name: &str) -> Self {
        Self {
            qname: format!("_tor.{}", name),
            qtype: RecordType::TXT,
            parse_onion: true,
        }
    }

    pub fn direct(name: &str, qtype: RecordType) -> Self {
        Self {
            qname: name.to_string(),
            qtype,
            parse_onion: false,
        }
    }

    /// Build the query message for this attempt.
    ///
    /// The stream isolation ID is passed through verbatim, even when empty.
    pub fn to_message(&self, stream_id: &str) -> Result<Message, ProtoError> {
        let mut name = Name::from_ascii(&self.qname)?;
        name.set_fqdn(true);

        let mut message = Message::new();
        message
            .set_id(fastrand::u16(..))
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_authoritative(true)
            .set_recursion_desired(true)
            .add_query(Query::query(name, self.qtype));

        let edns = message.extensions_mut().get_or_insert_with(Edns::new);
        edns.set_max_payload(MAX_DNS_PACKET_SIZE as u16);
        edns.options_mut().insert(EdnsOption::Unknown(
            STREAM_ISOLATION_OPTION,
            stream_id.as_bytes().to_vec(),
        ));

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::DNSClass;
    use hickory_proto::rr::rdata::opt::EdnsCode;

    fn stream_option(message: &Message) -> Option<Vec<u8>> {
        let edns = message.extensions().as_ref()?;
        match edns.option(EdnsCode::from(STREAM_ISOLATION_OPTION))? {
            EdnsOption::Unknown(_, data) => Some(data.clone()),
            _ => None,
        }
    }

    #[test]
    fn onion_attempt_targets_tor_txt() {
        let attempt = Attempt::onion("example.bit");

        assert_eq!(attempt.qname, "_tor.example.bit");
        assert_eq!(attempt.qtype, RecordType::TXT);
        assert!(attempt.parse_onion);
    }

    #[test]
    fn message_has_flags_and_single_question() {
        let message = Attempt::direct("example.bit", RecordType::AAAA)
            .to_message("s1")
            .unwrap();

        assert!(message.authoritative());
        assert!(message.recursion_desired());
        assert_eq!(message.op_code(), OpCode::Query);
        assert_eq!(message.message_type(), MessageType::Query);
        assert_eq!(message.queries().len(), 1);

        let query = &message.queries()[0];
        assert_eq!(query.name().to_ascii(), "example.bit.");
        assert!(query.name().is_fqdn());
        assert_eq!(query.query_type(), RecordType::AAAA);
        assert_eq!(query.query_class(), DNSClass::IN);
    }

    #[test]
    fn message_carries_stream_isolation_option() {
        let message = Attempt::onion("foo").to_message("circuit-42").unwrap();

        assert_eq!(stream_option(&message), Some(b"circuit-42".to_vec()));
    }

    #[test]
    fn empty_stream_id_is_still_sent() {
        let message = Attempt::onion("foo").to_message("").unwrap();

        assert_eq!(stream_option(&message), Some(Vec::new()));
    }

    #[test]
    fn already_qualified_name_is_unchanged() {
        let message = Attempt::direct("example.bit.", RecordType::A)
            .to_message("")
            .unwrap();

        assert_eq!(message.queries()[0].name().to_ascii(), "example.bit.");
    }

    #[test]
    fn oversized_label_is_rejected() {
        let name = format!("{}.bit", "x".repeat(64));

        assert!(Attempt::direct(&name, RecordType::A).to_message("").is_err());
    }

    #[test]
    fn message_survives_wire_encoding() {
        let message = Attempt::onion("foo").to_message("iso").unwrap();
        let decoded = Message::from_vec(&message.to_vec().unwrap()).unwrap();

        assert_eq!(decoded.id(), message.id());
        assert_eq!(stream_option(&decoded), Some(b"iso".to_vec()));
    }
}
