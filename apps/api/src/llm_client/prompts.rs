// Shared prompt fragments.
// Each theme defines its own persona and schema in quiz::theme; this file
// holds the cross-cutting output instructions appended to every template.

/// Instruction that forbids fencing and prose around the JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "请输出纯 JSON 数据，不要 Markdown 标记，不要代码块，\
    不要在 JSON 之外添加任何解释或前后缀文字。";

/// Instruction that keeps trait scores inside the radar chart's range.
pub const STATS_RANGE_INSTRUCTION: &str = "stats 中的每个数值必须是 0 到 100 之间的整数。";
