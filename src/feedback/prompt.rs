//! Prompt composition for pronunciation assessment.
//!
//! [`ASSESSMENT_INSTRUCTION`] frames the feedback request as a structured
//! phonetic comparison: language detection, a 1–10 correctness score, an
//! itemized mispronunciation list, IPA transcriptions, confidence levels,
//! and free-text comments.  That structure is a convention of the prompt
//! wording only — the reply is displayed verbatim, never parsed.
//!
//! [`compose_feedback_prompt`] concatenates the instruction with the spoken
//! and expected sentences into the single prompt string the feedback
//! adapter sends.

/// Instruction template for the phonetic-assessment request.
pub const ASSESSMENT_INSTRUCTION: &str = "\
You are an expert in phonetics, pronunciation, and language assessment, \
specializing in multiple languages. Your task is to analyze the user's \
spoken sentence and compare it with the expected sentence. Provide detailed \
feedback on pronunciation, indicating which words or sounds are incorrect, \
how they can be improved, and a correctness score on a scale of 1 to 10.

The assessment should be able to handle and analyze the pronunciation in \
any language.

### Response Structure:
1. **Language Detected**: Indicate the language in which the spoken sentence \
was detected.
2. **Correctness Score**: Provide an overall correctness score on a scale of \
1 to 10 (where 10 is perfect pronunciation and 1 is entirely incorrect).
3. **Detailed Feedback**: Provide detailed feedback in the following format:
    - **Mispronounced Words**: List each word that was mispronounced.
    - **Sound/Syllable Issues**: For each mispronounced word, specify the \
exact sound(s) or syllable(s) that were incorrect.
    - **Suggested Improvements**: Provide a specific recommendation for \
improving the pronunciation for each word or sound.
4. **Phonetic Transcription**: Include the phonetic transcription of the \
expected and actual pronunciation using IPA (International Phonetic \
Alphabet) for comparison.
5. **Confidence Level**: Indicate the confidence level of the speech \
recognition or pronunciation analysis for each word (Low, Medium, High).
6. **Additional Comments**: (Optional) Any other relevant feedback or \
suggestions to help the user improve their pronunciation.

Ensure that the response is clear, concise, and properly formatted for easy \
reading and improvement.";

/// Build the single feedback prompt from the instruction template, the
/// transcript of what the user said, and the target sentence.
///
/// Both sentences are embedded verbatim.
///
/// # Example
/// ```rust
/// use pronounce_coach::feedback::{compose_feedback_prompt, ASSESSMENT_INSTRUCTION};
///
/// let prompt = compose_feedback_prompt(ASSESSMENT_INSTRUCTION, "hello word", "hello world");
/// assert!(prompt.contains("hello word"));
/// assert!(prompt.contains("hello world"));
/// ```
pub fn compose_feedback_prompt(template: &str, spoken: &str, expected: &str) -> String {
    format!(
        "{template}\nUser said: '{spoken}'\nExpected: '{expected}'. \
         Provide detailed feedback on the pronunciation accuracy."
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
