use serde::{Deserialize, Serialize};

/// One decoded frame of a streaming completion.
///
/// Content arrives as a sequence of these, each carrying a fragment of the
/// assistant reply under `choices[0].delta.content`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionChunk {
    /// The streamed choices; the first carries the content delta.
    pub choices: Vec<ChunkChoice>,
}

/// One choice within a streamed frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkChoice {
    /// The incremental update for this choice.
    pub delta: Delta,

    /// Why the stream finished, present only on the final content frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The incremental fields of a streamed choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Delta {
    /// A fragment of reply text. Absent on role-announcement and
    /// finish frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Returns the first choice's content fragment, if this frame carries one.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }
}
