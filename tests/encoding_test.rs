use tourgroup::Document;

fn paragraph_text(doc: &Document) -> String {
    doc.at("p")
        .expect("valid selector")
        .text_content()
        .map(|t| t.to_string())
        .unwrap_or_default()
}

#[test]
fn utf8_bytes_parse_unchanged() {
    let html = "<html><head><meta charset=\"utf-8\"></head><body><p>é, ñ, ü, 中文</p></body></html>";
    let doc = Document::from_bytes(html.as_bytes());
    assert_eq!(paragraph_text(&doc), "é, ñ, ü, 中文");
}

#[test]
fn iso88591_converted_to_utf8() {
    // é = 0xE9, ñ = 0xF1, ü = 0xFC in ISO-8859-1
    let html = b"<html><head><meta charset=\"ISO-8859-1\"></head>\
        <body><p>Caf\xE9 espa\xF1ol M\xFCnchen</p></body></html>";
    let doc = Document::from_bytes(html);
    assert_eq!(paragraph_text(&doc), "Café español München");
}

#[test]
fn http_equiv_declaration_is_honoured() {
    let html = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"></head>\
        <body><p>\x93quoted\x94</p></body></html>";
    let doc = Document::from_bytes(html);
    assert_eq!(paragraph_text(&doc), "\u{201C}quoted\u{201D}");
}

#[test]
fn invalid_utf8_is_replaced_not_rejected() {
    let html = b"<html><body><p>ok \xFF\xFE end</p></body></html>";
    let doc = Document::from_bytes(html);
    let text = paragraph_text(&doc);
    assert!(text.starts_with("ok "));
    assert!(text.contains('\u{FFFD}'));
    assert!(text.ends_with(" end"));
}

#[test]
fn decoded_document_is_fully_usable() {
    let html = b"<meta charset=\"ISO-8859-1\"><ul><li id=\"a\">\xE0</li><li id=\"b\">\xE8</li></ul>";
    let doc = Document::from_bytes(html);
    let b = doc.at("#a").expect("valid").next(None).expect("valid");
    assert_eq!(b.text_content().as_deref(), Some("è"));
}
