use std::collections::HashMap;

use axum::http::HeaderMap;
use bytes::Bytes;

/// Fields and files pulled out of a request body, before validation.
#[derive(Debug, Default)]
pub struct RawForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<FilePart>,
}

#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl RawForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// First file uploaded under `field`.
    pub fn file(&self, field: &str) -> Option<&FilePart> {
        self.files.iter().find(|f| f.field == field)
    }
}

/// Parse a non-multipart request body based on Content-Type header.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RawForm, String> {
    let ct = content_type.unwrap_or("application/x-www-form-urlencoded");

    if ct.contains("application/json") {
        parse_json(body)
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        Err(format!("Unsupported content type: {ct}"))
    }
}

fn parse_json(body: &[u8]) -> Result<RawForm, String> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?;
    let obj = value
        .as_object()
        .ok_or_else(|| "JSON body must be an object".to_string())?;

    let mut form = RawForm::default();
    for (key, value) in obj {
        // Only scalar values can stand in for form fields
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        form.fields.insert(key.clone(), text);
    }
    Ok(form)
}

fn parse_form_urlencoded(body: &[u8]) -> Result<RawForm, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    let fields: HashMap<String, String> = form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    Ok(RawForm {
        fields,
        files: Vec::new(),
    })
}

/// Parse multipart form data using multer.
pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<RawForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = RawForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(|m| m.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("File read error: {e}"))?;

                // An untouched browser file input still sends an empty part
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                form.files.push(FilePart {
                    field: name,
                    file_name,
                    content_type,
                    bytes,
                });
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Field read error: {e}"))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}
