//! Prompt composition for grounded generation.
//!
//! The grounded prompt quotes a bounded excerpt of each retrieved article in
//! rank order and ends with a closed-book instruction: answer only from the
//! supplied context, and fall back to a fixed refusal sentence when the
//! context is not enough. The instruction is part of the functional contract,
//! not decoration — without it the generator answers from its own knowledge
//! and the corpus guarantee is gone.
//!
//! Prompt text is Indonesian to match the corpus and its audience.

use crate::models::RetrievalHit;

/// Fixed sentence the generator must emit when the context cannot answer
/// the question.
pub const REFUSAL_SENTENCE: &str =
    "Maaf, informasi tersebut tidak ditemukan dalam arsip berita yang tersedia.";

/// Closed-book instruction appended whenever context is supplied.
pub const GROUNDING_INSTRUCTION: &str = "Jawab pertanyaan HANYA berdasarkan konteks di atas. \
Jangan menggunakan pengetahuan di luar konteks. \
Jika konteks tidak memadai untuk menjawab, tulis persis kalimat berikut:";

/// Instruction used when retrieval produced no relevant article.
pub const NO_CONTEXT_INSTRUCTION: &str = "Tidak ada artikel dalam arsip berita yang relevan \
dengan pertanyaan pengguna. Sampaikan dengan jelas bahwa informasi tersebut tidak tersedia \
dalam arsip, dan jangan menjawab dari pengetahuan di luar arsip.";

/// Build the generation prompt from the question and retrieval hits.
///
/// With hits: one `--- Konteks N ---` block per hit in rank order, each
/// quoting at most `excerpt_chars` characters of content, followed by the
/// closed-book instruction and the refusal sentence. With no hits: the
/// corpus-insufficiency prompt, with no context block at all.
pub fn compose(question: &str, hits: &[RetrievalHit], excerpt_chars: usize) -> String {
    if hits.is_empty() {
        return format!(
            "{}\n\nPertanyaan pengguna: {}",
            NO_CONTEXT_INSTRUCTION, question
        );
    }

    let mut prompt = String::from(
        "Anda adalah asisten yang menjawab pertanyaan tentang berita resmi pemerintah Indonesia.\n",
    );

    for (i, hit) in hits.iter().enumerate() {
        let excerpt: String = hit.document.content.chars().take(excerpt_chars).collect();
        prompt.push_str(&format!(
            "\n--- Konteks {} ---\nSumber: {}\nJudul: {}\n{}\n",
            i + 1,
            hit.document.source,
            hit.document.title,
            excerpt
        ));
    }

    prompt.push_str(&format!(
        "\nPertanyaan: {}\n\n{}\n\"{}\"",
        question, GROUNDING_INSTRUCTION, REFUSAL_SENTENCE
    ));

    prompt
}
