use mercury_datatypes::{
    EncapsulatedData, IntegrityCheckAlgorithm, NullFlavor, Representation, Telecom,
};
use mercury_xml_r1::{AnyRef, DetailKind, Result, XmlIts1Formatter, integrity};

fn encode(ed: &EncapsulatedData) -> (String, mercury_xml_r1::Diagnostics) {
    XmlIts1Formatter::new()
        .graph_to_string("text", AnyRef::Ed(ed))
        .expect("encoding failed")
}

fn decode(xml: &str) -> (EncapsulatedData, mercury_xml_r1::Diagnostics) {
    let (value, diagnostics) = XmlIts1Formatter::new()
        .parse_str("ED", xml)
        .expect("decoding failed");
    (value.into_ed().expect("expected an ED value"), diagnostics)
}

#[test]
fn test_binary_content_is_base64() {
    let ed = EncapsulatedData::new_binary("application/octet-stream", vec![0x41, 0x42, 0x43]);
    let (xml, diagnostics) = encode(&ed);
    assert!(xml.contains(r#"representation="B64""#));
    assert!(xml.contains(">QUJD<"), "got: {xml}");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_text_content_attributes() {
    let mut ed = EncapsulatedData::new_text("Hello");
    ed.media_type = Some("text/plain".to_string());
    let (xml, _) = encode(&ed);
    assert!(
        xml.contains(r#"representation="TXT" mediaType="text/plain""#),
        "attribute order is fixed, got: {xml}"
    );
    assert!(xml.contains(">Hello<"));
}

#[test]
fn test_text_round_trip() {
    let mut ed = EncapsulatedData::new_text("Hello, wörld & <friends>");
    ed.media_type = Some("text/plain".to_string());
    ed.language = Some("en-CA".to_string());
    let (xml, _) = encode(&ed);
    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(decoded, ed);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.iter().collect::<Vec<_>>());
}

#[test]
fn test_binary_round_trip_is_lossless() {
    let bytes: Vec<u8> = (0u8..=255).collect();
    let ed = EncapsulatedData::new_binary("application/octet-stream", bytes.clone());
    let (xml, _) = encode(&ed);
    let (decoded, _) = decode(&xml);
    assert_eq!(decoded.representation, Representation::Binary);
    assert_eq!(decoded.content, bytes);
}

#[test]
fn test_integrity_check_round_trip_clean() {
    let mut ed = EncapsulatedData::new_text("signed payload");
    ed.integrity_check_algorithm = Some(IntegrityCheckAlgorithm::Sha256);
    ed.integrity_check = Some(integrity::compute(
        IntegrityCheckAlgorithm::Sha256,
        &ed.content,
    ));
    let (xml, _) = encode(&ed);
    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(decoded, ed);
    assert_eq!(diagnostics.count_of(DetailKind::IntegrityMismatch), 0);
}

#[test]
fn test_integrity_check_mismatch_is_one_warning() {
    let mut ed = EncapsulatedData::new_text("signed payload");
    ed.integrity_check_algorithm = Some(IntegrityCheckAlgorithm::Sha1);
    let mut digest = integrity::compute(IntegrityCheckAlgorithm::Sha1, &ed.content);
    digest[0] ^= 0x01;
    ed.integrity_check = Some(digest);
    let (xml, _) = encode(&ed);
    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(diagnostics.count_of(DetailKind::IntegrityMismatch), 1);
    // The value is still returned as-is.
    assert_eq!(decoded.content, b"signed payload");
}

#[test]
fn test_integrity_algorithm_wire_tokens() {
    let mut ed = EncapsulatedData::new_text("x");
    ed.integrity_check_algorithm = Some(IntegrityCheckAlgorithm::Sha1);
    ed.integrity_check = Some(integrity::compute(IntegrityCheckAlgorithm::Sha1, b"x"));
    let (xml, _) = encode(&ed);
    assert!(xml.contains(r#"integrityCheckAlgorithm="SHA-1""#), "got: {xml}");
    assert!(!xml.contains(r#"integrityCheckAlgorithm="SHA1""#));

    ed.integrity_check_algorithm = Some(IntegrityCheckAlgorithm::Sha256);
    ed.integrity_check = Some(integrity::compute(IntegrityCheckAlgorithm::Sha256, b"x"));
    let (xml, _) = encode(&ed);
    assert!(xml.contains(r#"integrityCheckAlgorithm="SHA-256""#));

    let (decoded, _) = decode(&xml);
    assert_eq!(
        decoded.integrity_check_algorithm,
        Some(IntegrityCheckAlgorithm::Sha256)
    );
}

#[test]
fn test_unrecognized_integrity_algorithm_is_ignored() {
    let (decoded, diagnostics) = decode(
        r#"<text xmlns="urn:hl7-org:v3" representation="TXT" integrityCheckAlgorithm="MD5">x</text>"#,
    );
    assert_eq!(decoded.integrity_check_algorithm, None);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_null_flavor_short_circuits_encode_and_decode() {
    let mut ed = EncapsulatedData::new_text("memory-only content");
    ed.media_type = Some("text/plain".to_string());
    ed.null_flavor = Some(NullFlavor::NoInformation);
    let (xml, _) = encode(&ed);
    assert_eq!(xml, r#"<text xmlns="urn:hl7-org:v3" nullFlavor="NI"/>"#);

    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(decoded, EncapsulatedData::null(NullFlavor::NoInformation));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_description_always_warns() {
    let mut ed = EncapsulatedData::new_text("Hello");
    ed.description = Some("a description".to_string());
    let (xml, diagnostics) = encode(&ed);
    assert!(diagnostics.count_of(DetailKind::UnsupportedProperty) >= 1);
    assert!(!xml.contains("description"));

    let detail = diagnostics
        .iter()
        .find(|d| d.kind == DetailKind::UnsupportedProperty)
        .unwrap();
    assert!(detail.message.contains("description"));
    assert!(detail.message.contains("ED"));
    assert_eq!(detail.location, "/text");
}

#[test]
fn test_translation_warns_like_description() {
    let mut ed = EncapsulatedData::new_text("Hello");
    ed.translation = vec![EncapsulatedData::new_text("Bonjour")];
    let (xml, diagnostics) = encode(&ed);
    assert_eq!(diagnostics.count_of(DetailKind::UnsupportedProperty), 1);
    assert!(!xml.contains("translation"));
}

#[test]
fn test_thumbnail_three_levels_round_trip() {
    let smallest = EncapsulatedData::new_binary("image/png", vec![9, 8, 7]);
    let mut smaller = EncapsulatedData::new_binary("image/png", vec![4, 5, 6]);
    smaller.thumbnail = Some(Box::new(smallest));
    let mut full = EncapsulatedData::new_binary("image/png", vec![1, 2, 3]);
    full.thumbnail = Some(Box::new(smaller));

    let (xml, _) = encode(&full);
    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(decoded, full);
    assert!(diagnostics.is_empty());

    let level2 = decoded.thumbnail.as_deref().unwrap();
    let level3 = level2.thumbnail.as_deref().unwrap();
    assert_eq!(level3.content, vec![9, 8, 7]);
    assert!(level3.thumbnail.is_none());
}

#[test]
fn test_reference_delegates_to_tel() {
    let mut ed = EncapsulatedData::new_text("see attachment");
    ed.reference = Some(Telecom::new("https://example.org/report.pdf"));
    let (xml, _) = encode(&ed);
    assert!(
        xml.contains(r#"<reference value="https://example.org/report.pdf"/>"#),
        "got: {xml}"
    );
    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(decoded, ed);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_mixed_content_forces_raw_markup() {
    let (decoded, _) = decode(
        r#"<text xmlns="urn:hl7-org:v3" representation="TXT">Formatted <content>markup</content> here</text>"#,
    );
    assert_eq!(decoded.representation, Representation::RawMarkup);
    // The embedded markup is captured verbatim, the significant spaces
    // around it included.
    assert_eq!(
        decoded.content_str(),
        "Formatted <content>markup</content> here"
    );
}

#[test]
fn test_text_edge_whitespace_round_trips() {
    let ed = EncapsulatedData::new_text(" padded ");
    let (xml, _) = encode(&ed);
    let (decoded, _) = decode(&xml);
    assert_eq!(decoded.content, b" padded ");
}

#[test]
fn test_character_references_decode_into_content() {
    let (decoded, _) = decode(
        r#"<text xmlns="urn:hl7-org:v3" representation="TXT">&#65;&amp;&#x42; &lt;ok&gt;</text>"#,
    );
    assert_eq!(decoded.content, b"A&B <ok>");
}

#[test]
fn test_attributes_decode_in_any_order() {
    let (decoded, diagnostics) = decode(
        r#"<text xmlns="urn:hl7-org:v3" language="en" mediaType="text/plain" representation="TXT">x</text>"#,
    );
    assert_eq!(decoded.representation, Representation::Text);
    assert_eq!(decoded.media_type.as_deref(), Some("text/plain"));
    assert_eq!(decoded.language.as_deref(), Some("en"));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_representation_defaults_to_text() {
    let (decoded, _) = decode(r#"<text xmlns="urn:hl7-org:v3">plain</text>"#);
    assert_eq!(decoded.representation, Representation::Text);
    assert_eq!(decoded.content, b"plain");
}

#[test]
fn test_malformed_nested_child_is_recovered() {
    // The thumbnail's digest is not valid base64; the thumbnail is dropped
    // but its siblings still parse.
    let (decoded, diagnostics) = decode(
        r#"<text xmlns="urn:hl7-org:v3" representation="TXT">hello<thumbnail representation="TXT" integrityCheck="%%%">t</thumbnail> world</text>"#,
    );
    assert!(decoded.thumbnail.is_none());
    assert_eq!(diagnostics.count_of(DetailKind::RecoveredChild), 1);
    assert_eq!(decoded.content, b"hello world");
}

#[test]
fn test_malformed_root_digest_is_fatal() {
    let result = XmlIts1Formatter::new().parse_str(
        "ED",
        r#"<text xmlns="urn:hl7-org:v3" representation="TXT" integrityCheck="%%%">x</text>"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_malformed_xml_is_fatal() {
    let result = XmlIts1Formatter::new()
        .parse_str("ED", r#"<text representation="TXT">unclosed"#);
    let err = result.unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_thumbnail_depth_cap_on_decode() {
    let mut xml = String::from("x");
    for _ in 0..18 {
        xml = format!(r#"<thumbnail representation="TXT">x{xml}</thumbnail>"#);
    }
    let xml = format!(r#"<text xmlns="urn:hl7-org:v3" representation="TXT">x{xml}</text>"#);

    let (decoded, diagnostics) = decode(&xml);
    assert_eq!(diagnostics.count_of(DetailKind::RecoveredChild), 1);
    assert_eq!(diagnostics.count_of(DetailKind::Validation), 0);

    // Exactly MAX_THUMBNAIL_DEPTH levels were followed below the root.
    let mut levels = 0;
    let mut cursor = &decoded;
    while let Some(thumbnail) = cursor.thumbnail.as_deref() {
        levels += 1;
        cursor = thumbnail;
    }
    assert_eq!(levels, mercury_xml_r1::formatters::ed::MAX_THUMBNAIL_DEPTH);
}

#[test]
fn test_empty_element_decodes_without_scanning() -> Result<()> {
    let (value, diagnostics) = XmlIts1Formatter::new()
        .parse_str("ED", r#"<text xmlns="urn:hl7-org:v3" representation="TXT"/>"#)?;
    let decoded = value.into_ed().unwrap();
    assert!(decoded.content.is_empty());
    // An ED without content, reference or null flavor is structurally
    // incomplete; that is a validation finding, not an error.
    assert_eq!(diagnostics.count_of(DetailKind::Validation), 1);
    Ok(())
}

#[test]
fn test_whitespace_in_base64_content_is_tolerated() {
    let (decoded, _) = decode(
        "<text xmlns=\"urn:hl7-org:v3\" representation=\"B64\">QUJD\nREVG</text>",
    );
    assert_eq!(decoded.content, b"ABCDEF");
}
