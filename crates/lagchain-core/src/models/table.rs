use serde::Serialize;

/// A named, row-oriented result table. The column schema is the contract;
/// rows serialise as JSON objects, non-finite floats as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable<R> {
    pub name: String,
    pub rows: Vec<R>,
}

impl<R> ResultTable<R> {
    pub fn new(name: impl Into<String>, rows: Vec<R>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }
}

impl<R: Serialize> ResultTable<R> {
    /// One JSON object per line, each line newline-terminated.
    pub fn to_json_lines(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&serde_json::to_string(row)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// blake3 hex digest of the table name and its JSON lines. Equal
    /// fingerprints mean byte-identical tables.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.name.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.to_json_lines()?.as_bytes());
        Ok(hasher.finalize().to_hex().to_string())
    }
}

impl<R> IntoIterator for ResultTable<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
