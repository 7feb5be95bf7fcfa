// XML envelope for tagged output.

pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>\n";

/// Escape a merged concordance body. Only `&` is escaped: the body already
/// carries the tags inserted by the grammar outputs.
pub fn escape(body: &str) -> String {
    body.replace('&', "&amp;")
}

/// Complete tagged document for `query` (the grammar path) around `body`.
pub fn tagged_document(query: &str, body: &str) -> String {
    let body = escape(body);
    let mut doc = String::with_capacity(XML_DECLARATION.len() + query.len() + body.len() + 32);
    doc.push_str(XML_DECLARATION);
    doc.push_str("<TAGFILE query='");
    doc.push_str(query);
    doc.push_str("'>\n");
    doc.push_str(&body);
    doc.push_str("</TAGFILE>\n");
    doc
}
