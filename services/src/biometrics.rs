//! Card and face factor comparison.

/// Canonical form of an NFC card identifier: uppercase ASCII letters and
/// digits only. Separators, whitespace and anything else are dropped.
pub fn normalize_nfc(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_uppercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Scales `v` to unit length. A zero vector is returned unchanged.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

/// Cosine similarity of two embeddings, in `-1.0..=1.0`.
///
/// Embeddings of different or zero length are treated as maximally
/// dissimilar.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return -1.0;
    }
    let a = l2_normalize(a);
    let b = l2_normalize(b);
    a.iter().zip(&b).map(|(x, y)| x * y).sum::<f32>().clamp(-1.0, 1.0)
}
