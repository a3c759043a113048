use ws_core::HistoryTurn;

/// Upper bound on prior turns sent with any chat request.
pub const MAX_HISTORY_MESSAGES: usize = 12;

/// Keep the most recent `MAX_HISTORY_MESSAGES` turns, oldest first.
pub fn truncate_history(history: &[HistoryTurn]) -> Vec<HistoryTurn> {
    let start = history.len().saturating_sub(MAX_HISTORY_MESSAGES);
    history[start..].to_vec()
}

/// System-level instruction that primes the model on one article.
pub fn system_instruction(topic: &str, context: &str) -> String {
    let mut instruction = format!(
        "You are an expert guide helping users explore a Wikipedia topic. \
         Be concise, accurate, and cite useful facts. Topic title: \"{}\".",
        topic.trim()
    );

    let context = context.trim();
    if context.is_empty() {
        instruction.push_str(
            " No article context is available, so rely on your own general knowledge \
             and clearly indicate uncertainty when appropriate.",
        );
    } else {
        instruction.push_str(
            " Prioritize the context below for factual grounding. If it does not cover \
             the question, say so before falling back on general knowledge.\n\nContext:\n",
        );
        instruction.push_str(context);
    }
    instruction
}
