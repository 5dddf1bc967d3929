use mercury_datatypes::{NullFlavor, Telecom, TelecomUse};
use mercury_xml_r1::{AnyRef, DetailKind, XmlIts1Formatter};

fn encode(tel: &Telecom) -> (String, mercury_xml_r1::Diagnostics) {
    XmlIts1Formatter::new()
        .graph_to_string("telecom", AnyRef::Tel(tel))
        .expect("encoding failed")
}

fn decode(xml: &str) -> (Telecom, mercury_xml_r1::Diagnostics) {
    let (value, diagnostics) = XmlIts1Formatter::new()
        .parse_str("TEL", xml)
        .expect("decoding failed");
    (value.into_tel().expect("expected a TEL value"), diagnostics)
}

#[test]
fn test_value_and_use_round_trip() {
    let mut tel = Telecom::new("tel:+13335551212");
    tel.use_codes = vec![TelecomUse::WorkPlace, TelecomUse::Direct];
    let (xml, diagnostics) = encode(&tel);
    assert!(
        xml.contains(r#"value="tel:+13335551212" use="WP DIR""#),
        "got: {xml}"
    );
    assert!(diagnostics.is_empty());

    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(decoded, tel);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_null_flavor_short_circuits() {
    let tel = Telecom::null(NullFlavor::Masked);
    let (xml, _) = encode(&tel);
    assert_eq!(xml, r#"<telecom xmlns="urn:hl7-org:v3" nullFlavor="MSK"/>"#);

    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(decoded, tel);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_usable_period_is_unsupported() {
    let mut tel = Telecom::new("tel:+13335551212");
    tel.usable_period = Some("weekdays".to_string());
    let (xml, diagnostics) = encode(&tel);
    assert_eq!(diagnostics.count_of(DetailKind::UnsupportedProperty), 1);
    assert!(!xml.contains("usablePeriod"));
}

#[test]
fn test_unknown_use_token_warns() {
    let (decoded, diagnostics) = decode(
        r#"<telecom xmlns="urn:hl7-org:v3" value="tel:+13335551212" use="WP XX"/>"#,
    );
    assert_eq!(decoded.use_codes, vec![TelecomUse::WorkPlace]);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_unsupported_child_element_is_skipped() {
    let (decoded, diagnostics) = decode(
        r#"<telecom xmlns="urn:hl7-org:v3" value="tel:+13335551212"><useablePeriod value="weekdays"/></telecom>"#,
    );
    assert_eq!(decoded.value.as_deref(), Some("tel:+13335551212"));
    assert_eq!(diagnostics.count_of(DetailKind::RecoveredChild), 1);
}

#[test]
fn test_empty_tel_is_a_validation_finding() {
    let (_, diagnostics) = decode(r#"<telecom xmlns="urn:hl7-org:v3"/>"#);
    assert_eq!(diagnostics.count_of(DetailKind::Validation), 1);
}
