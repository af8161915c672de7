use crate::ai_codec_types::FinishReason;

/// Map a wire `finish_reason`. Absent or null stays absent; any string we
/// do not recognize is `Unknown`.
pub fn map_finish_reason(reason: Option<&str>) -> Option<FinishReason> {
    let reason = reason?;
    Some(match reason {
        "stop" | "end_turn" | "eos" => FinishReason::Stop,
        "length" | "max_tokens" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        "function_call" | "tool_calls" => FinishReason::ToolCalls,
        _ => FinishReason::Unknown,
    })
}
