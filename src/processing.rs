use serde_json::Value;

use crate::error::Result;

/// A page of hits serialized as JSON Lines, ready for writing
pub struct EncodedPage {
    pub buffer: Vec<u8>,
    pub doc_count: u64,
}

/// Serialize every hit, untouched, as one JSON object per line
pub fn encode_hits(hits: &[Value]) -> Result<EncodedPage> {
    if hits.is_empty() {
        return Ok(EncodedPage {
            buffer: Vec::new(),
            doc_count: 0,
        });
    }

    // Rough guess of ~1KB per hit, Vec reallocates if needed.
    let mut buffer = Vec::with_capacity(hits.len() * (1024 + 1));

    for hit in hits {
        serde_json::to_writer(&mut buffer, hit).map_err(std::io::Error::from)?;
        buffer.push(b'\n');
    }

    Ok(EncodedPage {
        buffer,
        doc_count: hits.len() as u64,
    })
}
