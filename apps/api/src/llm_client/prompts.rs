// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs alongside it; cross-cutting instructions live here.

/// Appended to every prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "Do not include any explanations, only provide a \
    RFC8259 compliant JSON response following this format without deviation. \
    Do NOT use markdown code fences.";
