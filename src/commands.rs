//! Send and receive pipelines
//!
//! Each direction is a single pass over exactly one message: read it,
//! rewrite one header, emit it. Readers, writers and the transport are
//! injected so the flows run against buffers and mocks in tests.

use std::io::{Read, Write};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::mail::{munge_from, munge_to, parse_recipient, rewrite_header, MailTransport, Message};

/// Transport direction, dispatched from the first positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Send,
    Receive,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "send" => Ok(Mode::Send),
            "receive" | "recv" => Ok(Mode::Receive),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

/// Forward one outbound message onto the network
///
/// Resolves `rcpt` to an NNCP node, reduces the To header to the bare
/// mailbox name, and submits the serialized message to the transport
/// under `handle`.
pub fn send_mail<T: MailTransport>(
    transport: &T,
    rcpt: &str,
    handle: &str,
    input: &mut impl Read,
) -> Result<()> {
    tracing::debug!("send mail");

    if rcpt.is_empty() {
        return Err(Error::MissingRecipient);
    }

    let address = parse_recipient(rcpt).map_err(|source| Error::Recipient {
        input: rcpt.to_string(),
        source,
    })?;

    let mut msg = Message::read_from(input)?;
    rewrite_header(&mut msg, "To", munge_to)?;

    transport.submit(&address, handle, &msg.to_bytes())?;
    Ok(())
}

/// Deliver one inbound message to the local MTA
///
/// Requalifies the From header under `sender`'s identity domain and
/// writes the rewritten message to `output`.
pub fn recv_mail(sender: &str, input: &mut impl Read, output: &mut impl Write) -> Result<()> {
    tracing::debug!("mail receive");

    if sender.is_empty() {
        return Err(Error::MissingSender);
    }

    let mut msg = Message::read_from(input)?;
    rewrite_header(&mut msg, "From", |old| munge_from(old, sender))?;

    msg.write_to(output).map_err(Error::Write)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::{NncpMailAddress, TransportError};
    use std::cell::RefCell;
    use std::io::Cursor;

    /// Transport double capturing every submission
    #[derive(Default)]
    struct MockTransport {
        submissions: RefCell<Vec<(NncpMailAddress, String, Vec<u8>)>>,
        fail: bool,
    }

    impl MailTransport for MockTransport {
        fn submit(
            &self,
            recipient: &NncpMailAddress,
            handle: &str,
            message: &[u8],
        ) -> std::result::Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Delivery {
                    node: recipient.node_name().to_string(),
                    handle: handle.to_string(),
                    source: nncp_exec::Error::CommandFailed("mock failure".to_string()),
                });
            }
            self.submissions.borrow_mut().push((
                recipient.clone(),
                handle.to_string(),
                message.to_vec(),
            ));
            Ok(())
        }
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("send".parse::<Mode>().unwrap(), Mode::Send);
        assert_eq!("SEND".parse::<Mode>().unwrap(), Mode::Send);
        assert_eq!("receive".parse::<Mode>().unwrap(), Mode::Receive);
        assert_eq!("recv".parse::<Mode>().unwrap(), Mode::Receive);
        assert_eq!("Recv".parse::<Mode>().unwrap(), Mode::Receive);
        assert_eq!("".parse::<Mode>().unwrap(), Mode::Send);
    }

    #[test]
    fn test_mode_unknown_token() {
        let err = "bounce".parse::<Mode>().unwrap_err();
        assert!(matches!(err, Error::UnknownMode(ref t) if t == "bounce"));
    }

    #[test]
    fn test_send_mail_submits_rewritten_message() {
        let transport = MockTransport::default();
        let mut input = Cursor::new(b"To: foo@example.com\r\nSubject: Test\r\n\r\nHello!".to_vec());

        send_mail(&transport, "foo@alice.nncp", "sendmail", &mut input).unwrap();

        let submissions = transport.submissions.borrow();
        assert_eq!(submissions.len(), 1);
        let (recipient, handle, message) = &submissions[0];
        assert_eq!(recipient, &NncpMailAddress::new("foo", "alice"));
        assert_eq!(handle, "sendmail");

        let text = String::from_utf8(message.clone()).unwrap();
        assert!(text.contains("To: foo\r\n"));
        assert!(!text.contains("foo@example.com"));
        assert!(text.ends_with("Hello!"));
    }

    #[test]
    fn test_send_mail_custom_handle() {
        let transport = MockTransport::default();
        let mut input = Cursor::new(b"To: foo@example.com\r\n\r\n".to_vec());

        send_mail(&transport, "foo@alice.nncp", "mail-in", &mut input).unwrap();

        assert_eq!(transport.submissions.borrow()[0].1, "mail-in");
    }

    #[test]
    fn test_send_mail_resolves_node_id_recipient() {
        let transport = MockTransport::default();
        let mut input = Cursor::new(b"Subject: Test\r\n\r\n".to_vec());

        send_mail(&transport, "foo@abcd.id.nncp", "sendmail", &mut input).unwrap();

        let submissions = transport.submissions.borrow();
        assert_eq!(submissions[0].0, NncpMailAddress::new("foo", "ABCD"));
    }

    #[test]
    fn test_send_mail_missing_recipient() {
        let transport = MockTransport::default();
        let mut input = Cursor::new(Vec::new());

        let err = send_mail(&transport, "", "sendmail", &mut input).unwrap_err();
        assert!(matches!(err, Error::MissingRecipient));
    }

    #[test]
    fn test_send_mail_bad_recipient_names_input() {
        let transport = MockTransport::default();
        let mut input = Cursor::new(Vec::new());

        let err = send_mail(&transport, "foo@example.com", "sendmail", &mut input).unwrap_err();
        assert!(err.to_string().contains("foo@example.com"));
        assert!(transport.submissions.borrow().is_empty());
    }

    #[test]
    fn test_send_mail_transport_failure_propagates() {
        let transport = MockTransport {
            fail: true,
            ..Default::default()
        };
        let mut input = Cursor::new(b"To: foo@example.com\r\n\r\n".to_vec());

        let err = send_mail(&transport, "foo@alice.nncp", "sendmail", &mut input).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn test_recv_mail_rewrites_from() {
        let node_id = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        let mut input =
            Cursor::new(b"From: foo@example.com\r\nSubject: Test\r\n\r\nHello World!".to_vec());
        let mut output = Vec::new();

        recv_mail(node_id, &mut input, &mut output).unwrap();

        let msg = Message::parse(&output).unwrap();
        assert_eq!(
            msg.header_text("From").unwrap(),
            format!("foo@{}.id.nncp", node_id)
        );
        assert_eq!(msg.body(), b"Hello World!");
    }

    #[test]
    fn test_recv_mail_without_from_leaves_message_alone() {
        let mut input = Cursor::new(b"X-A-Header: Test\r\nSubject: Test\r\n\r\nHello!".to_vec());
        let mut output = Vec::new();

        recv_mail("NODE", &mut input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(!text.contains("From"));
        assert!(text.contains("Subject: Test"));
    }

    #[test]
    fn test_recv_mail_missing_sender() {
        let mut input = Cursor::new(b"From: foo@example.com\r\n\r\n".to_vec());
        let mut output = Vec::new();

        let err = recv_mail("", &mut input, &mut output).unwrap_err();
        assert!(matches!(err, Error::MissingSender));
        assert!(output.is_empty());
    }
}
