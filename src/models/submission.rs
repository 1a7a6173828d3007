use bytes::Bytes;
use uuid::Uuid;

/// A validated form payload with its document. Lives for one request.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub date_of_birth: String,
    pub phone: String,
    pub id_number: String,
    pub document: Document,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Document {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
