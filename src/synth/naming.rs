//! Name and type-text shaping for emitted accessors.
//!
//! Documented field names are prose ("Record Count", "Entity ID"); accessor names
//! are camel-cased from them with a couple of historical substitutions so that
//! e.g. `EID` and `Entity Id` both surface as `EntityID`. Documented type text is
//! likewise prose and normalized to the emitted language's vocabulary, including
//! array phrasing ("Array of VarInt" becomes `int[]`).

/// Tokens that never name an array's element type.
const ARRAY_STOPWORDS: [&str; 2] = ["array", "of"];

/// Camel-case prose: words split on non-alphanumeric boundaries, each
/// capitalized ("Record Count" -> "RecordCount", "EID" -> "Eid").
#[must_use]
pub fn to_camel_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            output.extend(first.to_uppercase());
            output.extend(chars.flat_map(char::to_lowercase));
        }
    }
    output
}

/// The accessor stem for a documented field name: camel case plus the
/// substitutions accumulated over the wrapper library's history.
#[must_use]
pub fn accessor_stem(doc_name: &str) -> String {
    to_camel_case(doc_name)
        .replace("Eid", "EntityID")
        .replace("EntityId", "EntityID")
        .replace("JsonData", "Message")
}

/// Lowercase the first character, leaving the rest untouched.
#[must_use]
pub fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalize documented type prose into emitted type text.
///
/// Lowercases, applies the vocabulary substitutions (`varint` -> `int`, `slot` ->
/// `ItemStack`, `unsigned` dropped, ...), then either resolves array phrasing to
/// `element[]` or strips the remaining whitespace.
#[must_use]
pub fn normalize_type_text(kind: &str) -> String {
    let mut text = kind.to_ascii_lowercase();
    text = text
        .replace("slot", "ItemStack")
        .replace("metadata", "WrappedDataWatcher")
        .replace("unsigned", "")
        .replace("varint", "int");
    // "boolean" already contains "bool"; substitute only the short form
    if !text.contains("boolean") {
        text = text.replace("bool", "boolean");
    }
    text = text.replace("uuid", "UUID").replace("string", "String");

    if text.contains("array") {
        let element = longest_element_token(&text);
        format!("{}[]", element.replace("array", "").replace("of", ""))
    } else {
        text.split_whitespace().collect()
    }
}

/// The longest token that is not array phrasing; that token names the element
/// type. Falls back to the first token when everything is a stopword.
fn longest_element_token(text: &str) -> String {
    let mut selected: Option<&str> = None;
    for token in text.split_whitespace() {
        if ARRAY_STOPWORDS.contains(&token) {
            continue;
        }
        if selected.map_or(true, |current| token.len() > current.len()) {
            selected = Some(token);
        }
    }
    selected
        .or_else(|| text.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}
