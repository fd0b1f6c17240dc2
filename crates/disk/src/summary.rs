use diskarb_core::{keys, Description, Value};
use uuid::Uuid;

const NOT_MOUNTED: &str = "[not mounted]";

const NAME_END: usize = 10;
const KIND_END: usize = 19;
const UUID_END: usize = 56;
const VOLUME_NAME_END: usize = 80;

/// Pads `line` with spaces up to `column` characters; longer lines are kept.
fn pad_to(line: &mut String, column: usize) {
    let len = line.chars().count();
    if len < column {
        line.extend(std::iter::repeat(' ').take(column - len));
    }
}

fn push_text(line: &mut String, value: Option<&Value>) {
    if let Some(text) = value.and_then(Value::as_str) {
        line.push_str(text);
    }
}

/// `<bsd name> <kind> <volume uuid> <volume name> <mount path>`, each column
/// left-justified to a fixed end position. Only mountable volumes with a BSD
/// name have a summary.
pub fn summary_line(description: &Description) -> Option<String> {
    if !description.get(keys::VOLUME_MOUNTABLE)?.is_true() {
        return None;
    }
    let bsd_name = description.get(keys::MEDIA_BSD_NAME)?.as_str()?;

    let mut line = String::from(bsd_name);
    pad_to(&mut line, NAME_END);
    line.push(' ');

    push_text(&mut line, description.get(keys::VOLUME_KIND));
    pad_to(&mut line, KIND_END);
    line.push(' ');

    let uuid = description
        .get(keys::VOLUME_UUID)
        .and_then(Value::as_uuid)
        .copied()
        .unwrap_or_else(Uuid::nil);
    line.push_str(&uuid.hyphenated().to_string().to_uppercase());
    pad_to(&mut line, UUID_END);
    line.push(' ');

    push_text(&mut line, description.get(keys::VOLUME_NAME));
    pad_to(&mut line, VOLUME_NAME_END);
    line.push(' ');

    match description.get(keys::VOLUME_PATH) {
        Some(Value::Path(path)) => line.push_str(&path.display().to_string()),
        Some(Value::String(path)) => line.push_str(path),
        Some(_) => {}
        None => line.push_str(NOT_MOUNTED),
    }

    Some(line)
}
