/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    if !content_type.trim_start().to_ascii_lowercase().starts_with("multipart/form-data") {
        return None;
    }
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// One file part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Extracts the file part named `field_name`, falling back to the first
/// file part when no part carries that name.
pub fn extract_file(body: &[u8], boundary: &str, field_name: &str) -> Option<FilePart> {
    let files = file_parts(body, boundary);
    let pos = files.iter().position(|f| f.field == field_name).unwrap_or(0);
    files.into_iter().nth(pos)
}

fn file_parts(body: &[u8], boundary: &str) -> Vec<FilePart> {
    let delimiter = format!("--{}", boundary);
    let sep = b"\r\n\r\n";
    let mut result = Vec::new();

    for part in split_on(body, delimiter.as_bytes()) {
        let Some(sep_pos) = find_subsequence(part, sep) else { continue };
        let headers = String::from_utf8_lossy(&part[..sep_pos]);
        let Some(filename) = quoted_param(&headers, "filename") else { continue };

        let raw = &part[sep_pos + sep.len()..];
        let data = raw.strip_suffix(b"\r\n").unwrap_or(raw).to_vec();
        result.push(FilePart {
            field: quoted_param(&headers, "name").unwrap_or_default(),
            filename,
            content_type: header_value(&headers, "content-type"),
            data,
        });
    }
    result
}

/// Reads `key="value"` from a Content-Disposition header. `name` does not
/// match inside `filename`.
fn quoted_param(headers: &str, key: &str) -> Option<String> {
    let needle = format!("{}=\"", key);
    let mut search = 0;
    while let Some(rel) = headers[search..].find(&needle) {
        let pos = search + rel;
        let preceded_ok = pos == 0
            || matches!(headers.as_bytes()[pos - 1], b' ' | b';' | b'\t');
        let rest = &headers[pos + needle.len()..];
        if preceded_ok {
            return rest.find('"').map(|end| rest[..end].to_owned());
        }
        search = pos + needle.len();
    }
    None
}

fn header_value(headers: &str, name: &str) -> Option<String> {
    headers.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        if k.trim().eq_ignore_ascii_case(name) {
            Some(v.trim().to_owned())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, filename, data) in parts {
            out.extend_from_slice(b"--XyZ\r\n");
            match filename {
                Some(f) => out.extend_from_slice(format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                    name, f
                ).as_bytes()),
                None => out.extend_from_slice(format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name
                ).as_bytes()),
            }
            out.extend_from_slice(data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"--XyZ--\r\n");
        out
    }

    #[test]
    fn boundary_is_parsed_from_header() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"XyZ\"").as_deref(),
            Some("XyZ")
        );
        assert_eq!(extract_boundary("application/x-www-form-urlencoded"), None);
    }

    #[test]
    fn named_file_part_is_found() {
        let b = body(&[
            ("note", None, b"hello"),
            ("other", Some("a.png"), b"AAA"),
            ("mri_file", Some("scan.png"), b"\x89PNG\r\n\r\nrest"),
        ]);
        let part = extract_file(&b, "XyZ", "mri_file").unwrap();
        assert_eq!(part.filename, "scan.png");
        assert_eq!(part.content_type.as_deref(), Some("image/png"));
        assert_eq!(part.data, b"\x89PNG\r\n\r\nrest");
    }

    #[test]
    fn falls_back_to_first_file_part() {
        let b = body(&[("upload", Some("x.jpg"), b"JJ")]);
        assert_eq!(extract_file(&b, "XyZ", "mri_file").unwrap().field, "upload");
    }

    #[test]
    fn text_only_body_has_no_file() {
        let b = body(&[("note", None, b"hello")]);
        assert!(extract_file(&b, "XyZ", "mri_file").is_none());
    }
}
