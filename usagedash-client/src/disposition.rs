use usagedash_protocol::prelude::ExportFormat;

/// Picks the download file name from a `Content-Disposition` header.
///
/// Accepts `filename="name"` and the unquoted `filename=name`; anything
/// missing, empty or malformed falls back to `export.<ext>`.
pub fn export_filename(header: Option<&str>, format: ExportFormat) -> String {
    header
        .and_then(parse_filename)
        .unwrap_or_else(|| format.default_filename())
}

fn parse_filename(header: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }

        let value = value.trim();
        let name = match value.strip_prefix('"') {
            Some(quoted) => quoted.strip_suffix('"')?,
            None => value,
        };

        if name.is_empty() || name.contains(['/', '\\']) {
            None
        } else {
            Some(name.to_string())
        }
    })
}
