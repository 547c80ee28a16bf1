use siwe_codec::{
    Address, ChainId, Domain, Field, Message, Nonce, ParseError, RequestId, Scheme, Statement,
    StructureViolation, Timestamp, Uri, ValidationError, Version,
};
use serde_json::json;

const REFERENCE: &str = "service.invalid wants you to sign in with your Ethereum account:
0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2

I accept the ServiceOrg Terms of Service: https://service.invalid/tos

URI: https://service.invalid/login
Version: 1
Chain ID: 1
Nonce: 32891756
Issued At: 2021-09-30T16:25:24Z
Resources:
- ipfs://bafybeiemxf5abjwjbikoz4mc3a3dla6ual3jsgpdr4cjr3oz3evfyavhwq/
- https://example.com/my-web2-claim.json";

const MINIMAL: &str = "example.com wants you to sign in with your Ethereum account:
0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2


URI: https://example.com
Version: 1
Chain ID: 1
Nonce: 12345678
Issued At: 2021-09-30T16:25:24Z";

fn full_message() -> Message {
    Message {
        scheme: Some(Scheme::parse("https").unwrap()),
        domain: Domain::parse("example.com:8443").unwrap(),
        address: Address::parse("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap(),
        statement: Some(Statement::parse("Sign in to the dashboard.").unwrap()),
        uri: Uri::parse("https://example.com:8443/login?next=%2Fhome").unwrap(),
        version: Version::V1,
        chain_id: ChainId::parse("137").unwrap(),
        nonce: Nonce::parse("Zq4pVx9bTn2mLr7w").unwrap(),
        issued_at: Timestamp::parse("2024-01-01T00:00:00.000Z").unwrap(),
        expiration_time: Some(Timestamp::parse("2024-01-01T01:00:00+01:00").unwrap()),
        not_before: Some(Timestamp::parse("2024-01-01T00:00:00Z").unwrap()),
        request_id: Some(RequestId::parse("req-42:a@b").unwrap()),
        resources: vec![
            Uri::parse("https://example.com/resource/1").unwrap(),
            Uri::parse("urn:example:resource:2").unwrap(),
        ],
    }
}

fn replace_line(text: &str, from: &str, to: &str) -> String {
    assert!(text.contains(from), "fixture lacks {from:?}");
    text.replacen(from, to, 1)
}

#[test]
fn reference_message_parses() {
    let message = Message::parse(REFERENCE).unwrap();
    assert_eq!(message.scheme, None);
    assert_eq!(message.domain.as_str(), "service.invalid");
    assert_eq!(
        message.statement.as_ref().map(Statement::as_str),
        Some("I accept the ServiceOrg Terms of Service: https://service.invalid/tos")
    );
    assert_eq!(message.uri.as_str(), "https://service.invalid/login");
    assert_eq!(message.chain_id.value(), Some(1));
    assert_eq!(message.nonce.as_str(), "32891756");
    assert_eq!(message.resources.len(), 2);
    assert_eq!(message.expiration_time, None);
}

#[test]
fn reference_message_renders_byte_for_byte() {
    assert_eq!(Message::parse(REFERENCE).unwrap().to_string(), REFERENCE);
    assert_eq!(Message::parse(MINIMAL).unwrap().to_string(), MINIMAL);
}

#[test]
fn full_message_round_trips() {
    let message = full_message();
    let text = message.to_text();
    assert!(text.starts_with("https://example.com:8443 wants you"));
    assert_eq!(Message::parse(&text).unwrap(), message);
}

#[test]
fn round_trip_with_each_optional_alone() {
    let base = Message::parse(MINIMAL).unwrap();
    let full = full_message();
    let variants = [
        Message { scheme: full.scheme.clone(), ..base.clone() },
        Message { statement: full.statement.clone(), ..base.clone() },
        Message { expiration_time: full.expiration_time.clone(), ..base.clone() },
        Message { not_before: full.not_before.clone(), ..base.clone() },
        Message { request_id: full.request_id.clone(), ..base.clone() },
        Message { resources: full.resources.clone(), ..base.clone() },
        Message { request_id: Some(RequestId::parse("").unwrap()), ..base.clone() },
    ];
    for message in variants {
        assert_eq!(Message::parse(&message.to_string()).unwrap(), message);
    }
}

#[test]
fn json_view_uses_camel_case_and_omits_absent_fields() {
    let message = Message::parse(MINIMAL).unwrap();
    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "domain": "example.com",
            "address": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
            "uri": "https://example.com",
            "version": "1",
            "chainId": "1",
            "nonce": "12345678",
            "issuedAt": "2021-09-30T16:25:24Z"
        })
    );
    let back: Message = serde_json::from_value(serde_json::to_value(&message).unwrap()).unwrap();
    assert_eq!(back, message);
}

#[test]
fn json_view_validates_fields() {
    let err = serde_json::from_value::<Message>(json!({
        "domain": "example.com",
        "address": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
        "uri": "https://example.com",
        "version": "1",
        "chainId": "1",
        "nonce": "short",
        "issuedAt": "2021-09-30T16:25:24Z"
    }));
    assert!(err.is_err());
}

#[test]
fn version_two_is_a_field_error() {
    let text = replace_line(MINIMAL, "Version: 1", "Version: 2");
    let err = Message::parse(&text).unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidField {
            line: 6,
            field: Field::Version,
            source: ValidationError::Unsupported {
                field: "version",
                value: "2".into()
            }
        }
    );
    assert_eq!(err.field(), Some(Field::Version));
}

#[test]
fn nonce_minimum_length() {
    let short = replace_line(MINIMAL, "Nonce: 12345678", "Nonce: 1234567");
    assert!(matches!(
        Message::parse(&short),
        Err(ParseError::InvalidField {
            field: Field::Nonce,
            source: ValidationError::TooShort { min: 8, actual: 7, .. },
            ..
        })
    ));
    assert!(Message::parse(MINIMAL).is_ok());
}

#[test]
fn resources_header_needs_entries() {
    let text = format!("{MINIMAL}\nResources:");
    assert_eq!(
        Message::parse(&text).unwrap_err(),
        ParseError::Structure {
            line: 10,
            violation: StructureViolation::EmptyResources
        }
    );

    let bad_entry = format!("{MINIMAL}\nResources:\n- not a uri");
    assert!(matches!(
        Message::parse(&bad_entry),
        Err(ParseError::InvalidField {
            field: Field::Resources,
            ..
        })
    ));
}

#[test]
fn missing_required_field() {
    let text = replace_line(MINIMAL, "Chain ID: 1\n", "");
    assert_eq!(
        Message::parse(&text).unwrap_err(),
        ParseError::MissingField(Field::ChainId)
    );

    let truncated = MINIMAL.rsplit_once('\n').unwrap().0;
    assert_eq!(
        Message::parse(truncated).unwrap_err(),
        ParseError::MissingField(Field::IssuedAt)
    );
}

#[test]
fn optional_fields_must_keep_their_order() {
    let text = format!(
        "{MINIMAL}\nNot Before: 2021-09-30T16:25:24Z\nExpiration Time: 2021-10-30T16:25:24Z"
    );
    assert_eq!(
        Message::parse(&text).unwrap_err(),
        ParseError::Structure {
            line: 11,
            violation: StructureViolation::OutOfOrder(Field::ExpirationTime)
        }
    );
}

#[test]
fn literals_are_case_sensitive() {
    let text = replace_line(MINIMAL, "Chain ID: 1", "Chain Id: 1");
    assert!(matches!(
        Message::parse(&text),
        Err(ParseError::Structure {
            line: 7,
            violation: StructureViolation::UnexpectedLine(_)
        })
    ));

    let header = replace_line(MINIMAL, "sign in with", "sign-in with");
    assert_eq!(
        Message::parse(&header).unwrap_err(),
        ParseError::Structure {
            line: 1,
            violation: StructureViolation::HeaderLiteral
        }
    );
}

#[test]
fn trailing_line_feed_is_rejected() {
    let text = format!("{MINIMAL}\n");
    assert_eq!(
        Message::parse(&text).unwrap_err(),
        ParseError::Structure {
            line: 10,
            violation: StructureViolation::TrailingContent
        }
    );
}

#[test]
fn crlf_line_endings_are_rejected() {
    let text = MINIMAL.replace('\n', "\r\n");
    assert!(Message::parse(&text).is_err());
}

#[test]
fn statement_requires_trailing_blank_line() {
    let text = replace_line(
        MINIMAL,
        "Cc2\n\n\nURI",
        "Cc2\n\nA statement.\nURI",
    );
    assert_eq!(
        Message::parse(&text).unwrap_err(),
        ParseError::Structure {
            line: 5,
            violation: StructureViolation::ExpectedBlankLine
        }
    );
}

#[test]
fn zero_length_statement_reads_as_absent() {
    let text = replace_line(MINIMAL, "Cc2\n\n\nURI", "Cc2\n\n\n\nURI");
    let message = Message::parse(&text).unwrap();
    assert_eq!(message.statement, None);
    assert_eq!(message.to_string(), MINIMAL);
}

#[test]
fn malformed_values_name_their_field() {
    let cases = [
        (replace_line(MINIMAL, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "0xC02aaA39"), Field::Address),
        (replace_line(MINIMAL, "URI: https://example.com", "URI: example.com"), Field::Uri),
        (replace_line(MINIMAL, "Chain ID: 1", "Chain ID: one"), Field::ChainId),
        (replace_line(MINIMAL, "Issued At: 2021-09-30T16:25:24Z", "Issued At: yesterday"), Field::IssuedAt),
        (replace_line(MINIMAL, "example.com wants", "exa mple.com wants"), Field::Domain),
        (replace_line(MINIMAL, "example.com wants", "1https://example.com wants"), Field::Scheme),
    ];
    for (text, field) in cases {
        match Message::parse(&text) {
            Err(ParseError::InvalidField { field: got, .. }) => assert_eq!(got, field),
            other => panic!("expected invalid {field}, got {other:?}"),
        }
    }
}

#[test]
fn scheme_prefix_is_optional() {
    let text = replace_line(MINIMAL, "example.com wants", "https://example.com wants");
    let message = Message::parse(&text).unwrap();
    assert_eq!(message.scheme.as_ref().map(Scheme::as_str), Some("https"));
    assert_eq!(message.to_string(), text);
}
